//! Error types shared across the explorer crates.

/// Failure to load or interpret the `/grpcServices` registry body.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("service '{service}' version '{version}' has no endpoint addresses")]
    EmptyVersion { service: String, version: String },
}

/// Failure of a single per-node fetch against the reflection API.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Service groups resolve their children from the registry.
    #[error("service group '{0}' has no remote children")]
    NoRemoteChildren(String),

    #[error("invalid reflection base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
