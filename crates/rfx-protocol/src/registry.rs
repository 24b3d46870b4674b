//! Immutable snapshot of every known service and its deployed versions.
//!
//! Loaded once from `/grpcServices` at startup and shared read-only. Services
//! and versions keep the order the server sent them in; nothing is sorted.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::address::EndpointAddress;
use crate::error::RegistryError;

/// versionLabel -> endpoint addresses (first one is used).
pub type VersionTable = IndexMap<String, Vec<EndpointAddress>>;

/// Raw body of `GET /grpcServices`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrpcServicesResponse {
    #[serde(default)]
    pub grpc_service: IndexMap<String, VersionTable>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceRegistry {
    services: IndexMap<String, VersionTable>,
}

impl ServiceRegistry {
    /// Build a registry, rejecting versions without any address.
    pub fn from_response(response: GrpcServicesResponse) -> Result<Self, RegistryError> {
        for (service, versions) in &response.grpc_service {
            for (version, addresses) in versions {
                if addresses.is_empty() {
                    return Err(RegistryError::EmptyVersion {
                        service: service.clone(),
                        version: version.clone(),
                    });
                }
            }
        }
        Ok(Self {
            services: response.grpc_service,
        })
    }

    pub fn from_json(body: &str) -> Result<Self, RegistryError> {
        let response: GrpcServicesResponse = serde_json::from_str(body)?;
        Self::from_response(response)
    }

    /// Service names in registry order; these are the root rows.
    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    /// Versions of a service paired with their primary (first) address.
    ///
    /// Pure lookup into the snapshot; `None` for an unknown service.
    pub fn versions_of(&self, service_name: &str) -> Option<Vec<(&str, &EndpointAddress)>> {
        let versions = self.services.get(service_name)?;
        Some(
            versions
                .iter()
                .filter_map(|(label, addresses)| {
                    addresses.first().map(|address| (label.as_str(), address))
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
