use super::*;
use serde_json::json;

#[test]
fn test_http_method_accepts_body() {
    assert!(HttpMethod::Post.accepts_body());
    assert!(HttpMethod::Put.accepts_body());
    assert!(HttpMethod::Patch.accepts_body());
    assert!(!HttpMethod::Get.accepts_body());
    assert!(!HttpMethod::Delete.accepts_body());
}

#[test]
fn test_http_method_from_str_is_case_insensitive() {
    assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
    assert_eq!("Patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
    assert!("TRACE".parse::<HttpMethod>().is_err());
}

#[test]
fn test_http_method_to_http() {
    assert_eq!(HttpMethod::Delete.to_http(), http::Method::DELETE);
    assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
}

#[test]
fn test_descriptor_deserialization_defaults() {
    let descriptor: EndpointDescriptor = serde_json::from_value(json!({
        "operation": "retrieve_loyalty_account",
        "method": "GET",
        "path": "/v2/loyalty/accounts/{account_id}",
        "path_parameters": [{ "name": "account_id" }]
    }))
    .expect("Failed to deserialize descriptor");

    assert_eq!(descriptor.method, HttpMethod::Get);
    assert!(descriptor.path_parameters[0].required);
    assert!(descriptor.query_parameters.is_empty());
    assert_eq!(descriptor.body, BodyKind::Json);
    assert!(descriptor.validate().is_ok());
}

#[test]
fn test_descriptor_deserialization_multipart() {
    let descriptor: EndpointDescriptor = serde_json::from_value(json!({
        "operation": "create_catalog_image",
        "method": "POST",
        "path": "/v2/catalog/images",
        "body": {
            "kind": "multipart",
            "json_part": "request",
            "file_parts": [{ "name": "image_file" }]
        }
    }))
    .expect("Failed to deserialize descriptor");

    assert!(descriptor.is_multipart());
    match &descriptor.body {
        BodyKind::Multipart {
            json_part,
            file_parts,
        } => {
            assert_eq!(json_part, "request");
            assert_eq!(file_parts.len(), 1);
            assert!(!file_parts[0].required);
        }
        BodyKind::Json => panic!("Expected multipart body"),
    }
}

#[test]
fn test_placeholders_in_order() {
    let descriptor = EndpointDescriptor::new(
        "retrieve_loyalty_promotion",
        HttpMethod::Get,
        "/v2/loyalty/programs/{program_id}/promotions/{promotion_id}",
    );

    assert_eq!(
        descriptor.placeholders(),
        vec!["program_id".to_string(), "promotion_id".to_string()]
    );
}

#[test]
fn test_validate_rejects_undeclared_placeholder() {
    let descriptor = EndpointDescriptor::new(
        "retrieve_loyalty_account",
        HttpMethod::Get,
        "/v2/loyalty/accounts/{account_id}",
    );

    let result = descriptor.validate();

    match result {
        Err(Error::CatalogError(msg)) => assert!(msg.contains("account_id")),
        other => panic!("Expected CatalogError, got {other:?}"),
    }
}

#[test]
fn test_validate_rejects_parameter_missing_from_path() {
    let descriptor = EndpointDescriptor::new("list_payments", HttpMethod::Get, "/v2/payments")
        .with_path_parameter("payment_id", true);

    assert!(matches!(descriptor.validate(), Err(Error::CatalogError(_))));
}

#[test]
fn test_validate_rejects_duplicate_parameters() {
    let descriptor = EndpointDescriptor::new(
        "retrieve_customer",
        HttpMethod::Get,
        "/v2/customers/{customer_id}",
    )
    .with_path_parameter("customer_id", true)
    .with_query_parameter("customer_id");

    assert!(matches!(descriptor.validate(), Err(Error::CatalogError(_))));
}

#[test]
fn test_validate_rejects_multipart_get() {
    let descriptor = EndpointDescriptor::new("list_images", HttpMethod::Get, "/v2/catalog/images")
        .with_multipart("request", vec![]);

    assert!(matches!(descriptor.validate(), Err(Error::CatalogError(_))));
}

#[test]
fn test_validate_rejects_relative_path() {
    let descriptor = EndpointDescriptor::new("list_locations", HttpMethod::Get, "v2/locations");

    assert!(matches!(descriptor.validate(), Err(Error::CatalogError(_))));
}
