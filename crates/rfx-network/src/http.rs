//! HTTP gateway against the reflection/discovery API.
//!
//! Every call is a plain `GET` with the query built by [`FetchRequest`].
//! The client is built without a request timeout: a hung reflection server
//! leaves the affected node loading.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use rfx_protocol::{
    FetchError, GrpcServicesResponse, NodeContext, ServiceRegistry, ACCESS_TOKEN_HEADER,
    GRPC_SERVICES_PATH,
};

use crate::gateway::{FetchGateway, FetchRequest};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Connection settings for the reflection API.
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    pub base_url: String,
    /// Sent as `X-Access-Token` when the server guards its routes.
    pub access_token: Option<String>,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self, FetchError> {
        let parsed = Url::parse(&config.base_url).map_err(|e| FetchError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(FetchError::InvalidBaseUrl {
                url: config.base_url,
                reason: "not a base url".to_string(),
            });
        }

        let client = Client::builder()
            .build()
            .map_err(|e| FetchError::Transport {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Load the service registry from `/grpcServices`.
    ///
    /// Called once at startup; there is no retry.
    pub async fn load_registry(&self) -> Result<ServiceRegistry, FetchError> {
        let response: GrpcServicesResponse = self.get_json(GRPC_SERVICES_PATH, &[]).await?;
        let registry = ServiceRegistry::from_response(response)?;
        tracing::info!(
            base_url = %self.base_url,
            services = registry.len(),
            "Service registry loaded"
        );
        Ok(registry)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url).query(query);
        if let Some(token) = &self.access_token {
            request = request.header(ACCESS_TOKEN_HEADER, token);
        }

        tracing::debug!(url = %url, params = ?query, "Reflection API request");

        let response = request.send().await.map_err(|e| FetchError::Transport {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Transport {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            url,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl FetchGateway for HttpGateway {
    async fn fetch(&self, context: &NodeContext) -> Result<Vec<String>, FetchError> {
        let request = FetchRequest::for_context(context)?;
        // A nil list is encoded as `null` by the reflection server.
        let labels: Option<Vec<String>> = self
            .get_json(request.endpoint.path(), &request.query)
            .await?;
        Ok(labels.unwrap_or_default())
    }
}
