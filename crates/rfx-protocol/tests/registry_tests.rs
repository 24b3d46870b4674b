use rfx_protocol::{EndpointAddress, RegistryError, ServiceRegistry};

const ECHO_REGISTRY: &str = r#"{
    "grpc_service": {
        "Echo": {
            "v1": [{"Scheme":"dns","Opaque":"echo-v1:50051"}]
        }
    }
}"#;

#[test]
fn test_registry_parses_discovery_body() {
    let registry = ServiceRegistry::from_json(ECHO_REGISTRY).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.service_names().collect::<Vec<_>>(), vec!["Echo"]);

    let versions = registry.versions_of("Echo").unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].0, "v1");
    assert_eq!(versions[0].1.endpoint_url(), "dns:echo-v1:50051");
}

#[test]
fn test_registry_uses_first_address_of_each_version() {
    let body = r#"{"grpc_service": {"Echo": {"v2": [
        {"Scheme":"dns","Opaque":"primary:1"},
        {"Scheme":"dns","Opaque":"secondary:2"}
    ]}}}"#;
    let registry = ServiceRegistry::from_json(body).unwrap();
    let versions = registry.versions_of("Echo").unwrap();
    assert_eq!(versions, vec![("v2", &EndpointAddress::new("dns", "primary:1"))]);
}

#[test]
fn test_registry_keeps_server_order() {
    let body = r#"{"grpc_service": {
        "Zeta": {"v1": [{"Scheme":"dns","Opaque":"z:1"}]},
        "Alpha": {
            "v2": [{"Scheme":"dns","Opaque":"a2:1"}],
            "v1": [{"Scheme":"dns","Opaque":"a1:1"}]
        }
    }}"#;
    let registry = ServiceRegistry::from_json(body).unwrap();
    assert_eq!(registry.service_names().collect::<Vec<_>>(), vec!["Zeta", "Alpha"]);
    let labels: Vec<&str> = registry
        .versions_of("Alpha")
        .unwrap()
        .into_iter()
        .map(|(label, _)| label)
        .collect();
    assert_eq!(labels, vec!["v2", "v1"]);
}

#[test]
fn test_registry_unknown_service_is_none() {
    let registry = ServiceRegistry::from_json(ECHO_REGISTRY).unwrap();
    assert!(registry.versions_of("Missing").is_none());
}

#[test]
fn test_registry_rejects_empty_address_list() {
    let body = r#"{"grpc_service": {"Echo": {"v1": []}}}"#;
    match ServiceRegistry::from_json(body) {
        Err(RegistryError::EmptyVersion { service, version }) => {
            assert_eq!(service, "Echo");
            assert_eq!(version, "v1");
        }
        other => panic!("expected EmptyVersion, got {other:?}"),
    }
}

#[test]
fn test_registry_rejects_malformed_body() {
    let result = ServiceRegistry::from_json(r#"{"grpc_service": {"Echo": ["v1"]}}"#);
    assert!(matches!(result, Err(RegistryError::Decode(_))));
}

#[test]
fn test_registry_missing_root_key_is_empty() {
    let registry = ServiceRegistry::from_json("{}").unwrap();
    assert!(registry.is_empty());
}
