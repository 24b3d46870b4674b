//! Fetch gateway: one asynchronous read per expansion.

use async_trait::async_trait;

use rfx_protocol::{
    FetchError, NodeContext, FIELDS_PATH, METHODS_PATH, METHOD_PARAM, SERVICES_PATH,
    SERVICE_PARAM, URL_PARAM,
};

/// Reads the child labels of a node from the reflection service.
///
/// Implementations are read-only and keep no state between calls: no
/// caching, no deduplication, no timeout.
#[async_trait]
pub trait FetchGateway: Send + Sync {
    async fn fetch(&self, context: &NodeContext) -> Result<Vec<String>, FetchError>;
}

/// Reflection API endpoint serving one level of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Services,
    Methods,
    Fields,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Services => SERVICES_PATH,
            Self::Methods => METHODS_PATH,
            Self::Fields => FIELDS_PATH,
        }
    }
}

/// A node context mapped onto exactly one endpoint and its query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub endpoint: Endpoint,
    pub query: Vec<(&'static str, String)>,
}

impl FetchRequest {
    /// Map a context to its endpoint. Query values are the literal labels
    /// carried in the context; encoding is left to the HTTP client.
    pub fn for_context(context: &NodeContext) -> Result<Self, FetchError> {
        match context {
            NodeContext::ServiceGroup { service_name } => {
                Err(FetchError::NoRemoteChildren(service_name.clone()))
            }
            NodeContext::VersionEndpoint { endpoint_url, .. } => Ok(Self {
                endpoint: Endpoint::Services,
                query: vec![(URL_PARAM, endpoint_url.clone())],
            }),
            NodeContext::ServiceDefinition {
                endpoint_url,
                service_def_name,
            } => Ok(Self {
                endpoint: Endpoint::Methods,
                query: vec![
                    (URL_PARAM, endpoint_url.clone()),
                    (SERVICE_PARAM, service_def_name.clone()),
                ],
            }),
            NodeContext::Method {
                endpoint_url,
                service_def_name,
                method_name,
            } => Ok(Self {
                endpoint: Endpoint::Fields,
                query: vec![
                    (URL_PARAM, endpoint_url.clone()),
                    (SERVICE_PARAM, service_def_name.clone()),
                    (METHOD_PARAM, method_name.clone()),
                ],
            }),
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}
