use super::*;
use http::header::HeaderValue;
use serde_json::json;

fn response_with_type(status: u16, content_type: &str, body: &str) -> RawResponse {
    let mut response = RawResponse::new(status, body.as_bytes().to_vec());
    response
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
    response
}

#[test]
fn test_success_json_body() {
    let response = response_with_type(
        200,
        "application/json; charset=utf-8",
        r#"{"loyalty_account":{"id":"abc123","balance":10}}"#,
    );

    let normalized = DefaultResponseNormalizer
        .normalize(response)
        .expect("Failed to normalize response");

    assert_eq!(normalized.status, 200);
    assert_eq!(
        normalized.body,
        ResponseBody::Json(json!({"loyalty_account": {"id": "abc123", "balance": 10}}))
    );
}

#[test]
fn test_success_without_content_type_is_parsed_as_json() {
    let response = RawResponse::new(200, br#"{"locations":[]}"#.to_vec());

    let normalized = DefaultResponseNormalizer
        .normalize(response)
        .expect("Failed to normalize response");

    assert_eq!(normalized.body, ResponseBody::Json(json!({"locations": []})));
}

#[test]
fn test_success_empty_body() {
    let response = RawResponse::new(204, Vec::new());

    let normalized = DefaultResponseNormalizer
        .normalize(response)
        .expect("Failed to normalize response");

    assert_eq!(normalized.body, ResponseBody::Empty);
    assert_eq!(normalized.into_value(), serde_json::Value::Null);
}

#[test]
fn test_success_text_body() {
    let response = response_with_type(200, "text/plain", "OK");

    let normalized = DefaultResponseNormalizer
        .normalize(response)
        .expect("Failed to normalize response");

    assert_eq!(normalized.body, ResponseBody::Text("OK".to_string()));
    assert!(matches!(
        normalized.json::<serde_json::Value>(),
        Err(Error::DecodeFailure(_))
    ));
}

#[test]
fn test_success_with_malformed_json_is_decode_failure() {
    let response = response_with_type(200, "application/json", "{\"truncated\":");

    let result = DefaultResponseNormalizer.normalize(response);

    assert!(matches!(result, Err(Error::DecodeFailure(_))));
}

#[test]
fn test_error_status_with_structured_errors() {
    let response = response_with_type(
        404,
        "application/json",
        r#"{"errors":[{"category":"INVALID_REQUEST_ERROR","code":"NOT_FOUND","detail":"Loyalty account not found"}]}"#,
    );

    let result = DefaultResponseNormalizer.normalize(response);

    match result {
        Err(Error::RemoteError(remote)) => {
            assert_eq!(remote.status, 404);
            assert_eq!(remote.errors.len(), 1);
            assert_eq!(remote.errors[0].code, "NOT_FOUND");
            assert_eq!(
                remote.errors[0].detail.as_deref(),
                Some("Loyalty account not found")
            );
        }
        other => panic!("Expected RemoteError, got {other:?}"),
    }
}

#[test]
fn test_error_status_with_unstructured_body() {
    let response = response_with_type(503, "text/html", "<html>Service Unavailable</html>");

    let result = DefaultResponseNormalizer.normalize(response);

    match result {
        Err(Error::RemoteError(remote)) => {
            assert_eq!(remote.status, 503);
            assert!(remote.errors.is_empty());
            assert_eq!(remote.body, "<html>Service Unavailable</html>");
        }
        other => panic!("Expected RemoteError, got {other:?}"),
    }
}

#[test]
fn test_redirect_status_is_an_error() {
    let response = RawResponse::new(302, Vec::new());

    assert!(matches!(
        DefaultResponseNormalizer.normalize(response),
        Err(Error::RemoteError(_))
    ));
}

#[derive(Debug, serde::Deserialize)]
struct LoyaltyAccountResponse {
    loyalty_account: LoyaltyAccount,
}

#[derive(Debug, serde::Deserialize)]
struct LoyaltyAccount {
    id: String,
    balance: i64,
}

#[test]
fn test_typed_json_decode() {
    let normalized = NormalizedResponse {
        status: 200,
        headers: HeaderMap::new(),
        body: ResponseBody::Json(json!({"loyalty_account": {"id": "abc123", "balance": 42}})),
    };

    let decoded: LoyaltyAccountResponse = normalized.json().expect("Failed to decode");

    assert_eq!(decoded.loyalty_account.id, "abc123");
    assert_eq!(decoded.loyalty_account.balance, 42);
}

#[test]
fn test_typed_json_decode_mismatch() {
    let normalized = NormalizedResponse {
        status: 200,
        headers: HeaderMap::new(),
        body: ResponseBody::Json(json!({"unexpected": true})),
    };

    let result = normalized.json::<LoyaltyAccountResponse>();

    assert!(matches!(result, Err(Error::DecodeFailure(_))));
}

#[test]
fn test_empty_body_decodes_as_option() {
    let normalized = NormalizedResponse {
        status: 204,
        headers: HeaderMap::new(),
        body: ResponseBody::Empty,
    };

    let decoded: Option<LoyaltyAccountResponse> = normalized.json().expect("Failed to decode");

    assert!(decoded.is_none());
}
