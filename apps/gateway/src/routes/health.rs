use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
}

async fn health() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(StatusResponse { status: "UP" }))
}

async fn ready() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(StatusResponse { status: "READY" }))
}

/// `/health` and `/ready` answer locally and never touch a backend. Other
/// methods on these paths fall through to the proxy, which has no route for
/// them.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/health")
            .route(web::get().to(health))
            .default_service(web::to(super::proxy::forward)),
    )
    .service(
        web::resource("/ready")
            .route(web::get().to(ready))
            .default_service(web::to(super::proxy::forward)),
    );
}
