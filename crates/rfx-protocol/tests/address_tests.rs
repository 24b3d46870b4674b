use rfx_protocol::EndpointAddress;

#[test]
fn test_endpoint_url_is_plain_colon_join() {
    let addr = EndpointAddress::new("dns", "echo-v1:50051");
    assert_eq!(addr.endpoint_url(), "dns:echo-v1:50051");
    assert_eq!(addr.to_string(), addr.endpoint_url());
}

#[test]
fn test_endpoint_url_keeps_punctuation_verbatim() {
    let cases = [
        ("dns", "//resolver.local/echo.svc.cluster.local:50051"),
        ("unix", "/var/run/echo.sock"),
        ("passthrough", "a?b=c&d#frag"),
        ("", ":::"),
        ("k8s", "echo%20v1:8080"),
    ];
    for (scheme, opaque) in cases {
        let addr = EndpointAddress::new(scheme, opaque);
        assert_eq!(addr.endpoint_url(), format!("{}:{}", scheme, opaque));
    }
}

#[test]
fn test_address_uses_capitalized_wire_keys() {
    let addr: EndpointAddress =
        serde_json::from_str(r#"{"Scheme":"dns","Opaque":"echo-v1:50051"}"#).unwrap();
    assert_eq!(addr, EndpointAddress::new("dns", "echo-v1:50051"));

    let json = serde_json::to_value(&addr).unwrap();
    assert_eq!(json["Scheme"], "dns");
    assert_eq!(json["Opaque"], "echo-v1:50051");
}
