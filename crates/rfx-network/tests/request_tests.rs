use rfx_network::{Endpoint, FetchError, FetchRequest};
use rfx_protocol::{EndpointAddress, NodeContext};

fn version() -> NodeContext {
    NodeContext::version_endpoint("Echo", "v1", &EndpointAddress::new("dns", "echo-v1:50051"))
}

#[test]
fn test_version_maps_to_services_endpoint() {
    let req = FetchRequest::for_context(&version()).unwrap();
    assert_eq!(req.endpoint, Endpoint::Services);
    assert_eq!(req.endpoint.path(), "/services");
    assert_eq!(req.query, vec![("url", "dns:echo-v1:50051".to_string())]);
}

#[test]
fn test_definition_maps_to_methods_endpoint() {
    let ctx = version().child("EchoService").unwrap();
    let req = FetchRequest::for_context(&ctx).unwrap();
    assert_eq!(req.endpoint, Endpoint::Methods);
    assert_eq!(req.param("url"), Some("dns:echo-v1:50051"));
    assert_eq!(req.param("service"), Some("EchoService"));
    assert_eq!(req.param("method"), None);
}

#[test]
fn test_method_maps_to_fields_endpoint() {
    let ctx = version()
        .child("EchoService")
        .and_then(|d| d.child("Ping"))
        .unwrap();
    let req = FetchRequest::for_context(&ctx).unwrap();
    assert_eq!(req.endpoint, Endpoint::Fields);
    assert_eq!(
        req.query,
        vec![
            ("url", "dns:echo-v1:50051".to_string()),
            ("service", "EchoService".to_string()),
            ("method", "Ping".to_string()),
        ]
    );
}

#[test]
fn test_service_group_has_no_remote_request() {
    let result = FetchRequest::for_context(&NodeContext::service_group("Echo"));
    assert!(matches!(result, Err(FetchError::NoRemoteChildren(name)) if name == "Echo"));
}
