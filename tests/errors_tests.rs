use ipgeo::errors::IpGeoError;

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(IpGeoError::cache_connection("x").code(), "E001");
    assert_eq!(IpGeoError::duplicate_cache("x").code(), "E002");
    assert_eq!(IpGeoError::not_found("x").code(), "E003");
    assert_eq!(IpGeoError::validation("x").code(), "E004");
    assert_eq!(IpGeoError::serialization("x").code(), "E005");
    assert_eq!(IpGeoError::remote_api("x").code(), "E006");
    assert_eq!(IpGeoError::configuration("x").code(), "E007");
}

#[test]
fn test_display_carries_type_and_message() {
    let err = IpGeoError::not_found("no entry for '1.1.1.1' in any tier of the cache chain");
    let rendered = err.to_string();

    assert!(rendered.contains("Resource Not Found"));
    assert!(rendered.contains("1.1.1.1"));
}

#[test]
fn test_from_serde_json_error() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: IpGeoError = parse_err.into();

    assert!(matches!(err, IpGeoError::Serialization(_)));
}

#[test]
fn test_message_round_trip() {
    let err = IpGeoError::remote_api("provider unreachable");
    assert_eq!(err.message(), "provider unreachable");
    assert_eq!(err.error_type(), "Remote API Error");
}
