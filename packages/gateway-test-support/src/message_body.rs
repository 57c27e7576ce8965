//! Assertions for the gateway's `{ "message": ... }` error contract.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

/// Assert status, JSON content type, and a body of exactly `{"message": expected_message}`.
pub async fn assert_message_response<B>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
    expected_message: &str,
) where
    B: MessageBody,
{
    assert_eq!(resp.status(), expected_status);

    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("application/json"),
        "Content-Type must be application/json (got {content_type})"
    );
    assert!(
        resp.headers().get("x-trace-id").is_some(),
        "gateway error responses carry x-trace-id"
    );

    let body = test::read_body(resp).await;
    let json: Value = serde_json::from_slice(&body).expect("error body should be JSON");
    assert_eq!(
        json,
        serde_json::json!({ "message": expected_message }),
        "error body must only carry the message"
    );
}
