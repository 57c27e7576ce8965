mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use gateway_test_support::{assert_message_response, unused_local_url};
use serde_json::{json, Value};

use common::{all_services, init_gateway, test_config};

#[actix_web::test]
async fn test_health_and_ready_answer_locally() {
    // No backend is running; local endpoints must not care.
    let app = init_gateway(test_config(all_services(&unused_local_url()))).await;

    for _ in 0..2 {
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("x-request-id").is_some());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "status": "UP" }));

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/ready").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "status": "READY" }));
    }
}

#[actix_web::test]
async fn test_non_get_on_health_is_not_found() {
    let app = init_gateway(test_config(all_services(&unused_local_url()))).await;

    let resp =
        test::call_service(&app, test::TestRequest::post().uri("/health").to_request()).await;

    assert_message_response(resp, StatusCode::NOT_FOUND, "Not found").await;
}
