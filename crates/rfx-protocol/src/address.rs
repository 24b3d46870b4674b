//! Endpoint addresses of deployed service instances.

use serde::{Deserialize, Serialize};

/// A `(scheme, opaque)` pair identifying one deployed service instance.
///
/// The discovery API serializes these with Go-style capitalized keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointAddress {
    #[serde(rename = "Scheme")]
    pub scheme: String,
    #[serde(rename = "Opaque")]
    pub opaque: String,
}

impl EndpointAddress {
    pub fn new(scheme: impl Into<String>, opaque: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            opaque: opaque.into(),
        }
    }

    /// Canonical endpoint URL, `scheme + ":" + opaque`.
    ///
    /// The reflection API keys its connections by this exact string, so it is
    /// a plain concatenation with no normalization of either part.
    pub fn endpoint_url(&self) -> String {
        let mut url = String::with_capacity(self.scheme.len() + 1 + self.opaque.len());
        url.push_str(&self.scheme);
        url.push(':');
        url.push_str(&self.opaque);
        url
    }
}

impl std::fmt::Display for EndpointAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.scheme, self.opaque)
    }
}
