//! Node contexts: the identifying path each tree level needs to fetch its
//! children.
//!
//! A child's context is always built from its parent's context plus the
//! label that was activated, so deeper fetches never have to look at what
//! has been rendered.

use serde::{Deserialize, Serialize};

use crate::address::EndpointAddress;

/// Role tag of a tree row, one per depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    ServiceGroup,
    VersionEndpoint,
    ServiceDefinition,
    Method,
    Field,
}

impl NodeRole {
    pub fn depth(self) -> usize {
        match self {
            Self::ServiceGroup => 0,
            Self::VersionEndpoint => 1,
            Self::ServiceDefinition => 2,
            Self::Method => 3,
            Self::Field => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ServiceGroup => "service",
            Self::VersionEndpoint => "version",
            Self::ServiceDefinition => "definition",
            Self::Method => "method",
            Self::Field => "field",
        }
    }
}

impl std::fmt::Display for NodeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything required to fetch one node's children.
///
/// Field rows are leaves and have no context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeContext {
    ServiceGroup {
        service_name: String,
    },
    VersionEndpoint {
        service_name: String,
        version_label: String,
        endpoint_url: String,
    },
    ServiceDefinition {
        endpoint_url: String,
        service_def_name: String,
    },
    Method {
        endpoint_url: String,
        service_def_name: String,
        method_name: String,
    },
}

impl NodeContext {
    pub fn service_group(service_name: impl Into<String>) -> Self {
        Self::ServiceGroup {
            service_name: service_name.into(),
        }
    }

    /// Context of a version row, built from the registry entry.
    pub fn version_endpoint(
        service_name: impl Into<String>,
        version_label: impl Into<String>,
        address: &EndpointAddress,
    ) -> Self {
        Self::VersionEndpoint {
            service_name: service_name.into(),
            version_label: version_label.into(),
            endpoint_url: address.endpoint_url(),
        }
    }

    pub fn role(&self) -> NodeRole {
        match self {
            Self::ServiceGroup { .. } => NodeRole::ServiceGroup,
            Self::VersionEndpoint { .. } => NodeRole::VersionEndpoint,
            Self::ServiceDefinition { .. } => NodeRole::ServiceDefinition,
            Self::Method { .. } => NodeRole::Method,
        }
    }

    /// Role of the rows this node's activation produces.
    pub fn child_role(&self) -> NodeRole {
        match self {
            Self::ServiceGroup { .. } => NodeRole::VersionEndpoint,
            Self::VersionEndpoint { .. } => NodeRole::ServiceDefinition,
            Self::ServiceDefinition { .. } => NodeRole::Method,
            Self::Method { .. } => NodeRole::Field,
        }
    }

    /// Context of the child row with the given label.
    ///
    /// `None` when the child is a field (a leaf) or when the children of this
    /// node come from the registry rather than from a label.
    pub fn child(&self, label: &str) -> Option<NodeContext> {
        match self {
            Self::ServiceGroup { .. } | Self::Method { .. } => None,
            Self::VersionEndpoint { endpoint_url, .. } => Some(Self::ServiceDefinition {
                endpoint_url: endpoint_url.clone(),
                service_def_name: label.to_string(),
            }),
            Self::ServiceDefinition {
                endpoint_url,
                service_def_name,
            } => Some(Self::Method {
                endpoint_url: endpoint_url.clone(),
                service_def_name: service_def_name.clone(),
                method_name: label.to_string(),
            }),
        }
    }

    /// Endpoint URL carried by every level below the service group.
    pub fn endpoint_url(&self) -> Option<&str> {
        match self {
            Self::ServiceGroup { .. } => None,
            Self::VersionEndpoint { endpoint_url, .. }
            | Self::ServiceDefinition { endpoint_url, .. }
            | Self::Method { endpoint_url, .. } => Some(endpoint_url),
        }
    }
}

impl std::fmt::Display for NodeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ServiceGroup { service_name } => write!(f, "{service_name}"),
            Self::VersionEndpoint {
                service_name,
                version_label,
                endpoint_url,
            } => write!(f, "{service_name}@{version_label} ({endpoint_url})"),
            Self::ServiceDefinition {
                endpoint_url,
                service_def_name,
            } => write!(f, "{endpoint_url} {service_def_name}"),
            Self::Method {
                endpoint_url,
                service_def_name,
                method_name,
            } => write!(f, "{endpoint_url} {service_def_name}/{method_name}"),
        }
    }
}
