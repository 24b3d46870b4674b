//! Terminal explorer for a gRPC reflection HTTP API.
//!
//! Usage:
//!   reflection-explorer                                   # default config
//!   reflection-explorer --base-url http://reflect:3000    # other server
//!   reflection-explorer -c explorer.toml --log-level debug

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use rfx_explorer::config::{ConfigOverrides, ExplorerConfig};
use rfx_explorer::{console, logging};
use rfx_network::HttpGateway;

#[derive(Parser)]
#[command(name = "reflection-explorer")]
#[command(about = "Browse gRPC services, methods and fields through a reflection API")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Reflection API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Token sent in the X-Access-Token header
    #[arg(long)]
    access_token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            access_token: self.access_token.clone(),
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ExplorerConfig::resolve(cli.config.as_deref())?;
    config.apply_overrides(cli.overrides());
    config.validate()?;

    logging::init(&config.logging)?;

    let gateway = HttpGateway::new(config.gateway_config())?;
    let registry = match gateway.load_registry().await {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!(base_url = %gateway.base_url(), error = %e, "Failed to load service registry");
            return Err(e).context("loading service registry");
        }
    };

    console::run_explorer_console(&config, Arc::new(registry), Arc::new(gateway)).await
}
