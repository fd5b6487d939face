use super::*;
use crate::arguments::FileUpload;
use crate::descriptor::HttpMethod;
use http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport() -> ReqwestTransport {
    ReqwestTransport::from_config(&ClientConfig::default()).expect("Failed to create transport")
}

#[tokio::test]
async fn test_send_json_body_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/loyalty/accounts/abc123/accumulate"))
        .and(header("authorization", "Bearer token-123"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"points": 10})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer token-123"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let request = OutboundRequest {
        method: HttpMethod::Post,
        url: Url::parse(&format!(
            "{}/v2/loyalty/accounts/abc123/accumulate",
            mock_server.uri()
        ))
        .unwrap(),
        headers,
        body: Some(RequestBody::Json(json!({"points": 10}))),
    };

    let response = transport().send(request).await.expect("Request failed");

    assert_eq!(response.status, 200);
    let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body, json!({"events": []}));
}

#[tokio::test]
async fn test_send_returns_error_status_without_failing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/locations/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&mock_server)
        .await;

    let request = OutboundRequest {
        method: HttpMethod::Get,
        url: Url::parse(&format!("{}/v2/locations/missing", mock_server.uri())).unwrap(),
        headers: HeaderMap::new(),
        body: None,
    };

    let response = transport().send(request).await.expect("Request failed");

    assert_eq!(response.status, 404);
    assert_eq!(response.body, b"not here".to_vec());
}

#[tokio::test]
async fn test_send_multipart_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/catalog/images"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"image": {"id": "IMG_1"}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = OutboundRequest {
        method: HttpMethod::Post,
        url: Url::parse(&format!("{}/v2/catalog/images", mock_server.uri())).unwrap(),
        headers: HeaderMap::new(),
        body: Some(RequestBody::Multipart(vec![
            MultipartPart::Json {
                name: "request".to_string(),
                value: json!({"idempotency_key": "key-1"}),
            },
            MultipartPart::File {
                name: "image_file".to_string(),
                upload: FileUpload::new("logo.png", b"PNGDATA".to_vec())
                    .with_content_type("image/png"),
            },
        ])),
    };

    let response = transport().send(request).await.expect("Request failed");
    assert_eq!(response.status, 200);

    let received = mock_server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&received[0].body).into_owned();
    assert!(body.contains("name=\"request\""));
    assert!(body.contains("{\"idempotency_key\":\"key-1\"}"));
    assert!(body.contains("name=\"image_file\"; filename=\"logo.png\""));
    assert!(body.contains("Content-Type: image/png"));
    assert!(body.contains("PNGDATA"));
}

#[tokio::test]
async fn test_send_connection_refused_is_transport_failure() {
    // Bind and drop a listener to obtain an address nothing listens on
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let request = OutboundRequest {
        method: HttpMethod::Get,
        url: Url::parse(&format!("{}/v2/locations", uri)).unwrap(),
        headers: HeaderMap::new(),
        body: None,
    };

    let result = transport().send(request).await;

    assert!(matches!(result, Err(Error::TransportFailure(_))));
}

#[test]
fn test_multipart_form_rejects_invalid_content_type() {
    let result = multipart_form(vec![MultipartPart::File {
        name: "image_file".to_string(),
        upload: FileUpload::new("logo.png", vec![1]).with_content_type("not a mime type"),
    }]);

    match result {
        Err(Error::InvalidParameter { name, .. }) => assert_eq!(name, "image_file"),
        other => panic!("Expected InvalidParameter, got {other:?}"),
    }
}
