use actix_web::error::ResponseError;
use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::auth::jwt::AuthError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Body of every error response the gateway produces itself.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid token: {cause}")]
    InvalidToken { cause: AuthError },
    #[error("No route for {path}")]
    RouteNotFound { path: String },
    #[error("Payload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },
    #[error("Backend {service} unreachable: {detail}")]
    BackendUnreachable { service: String, detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::MissingToken => ErrorCode::UnauthorizedMissingBearer,
            AppError::InvalidToken {
                cause: AuthError::Expired,
            } => ErrorCode::UnauthorizedExpiredJwt,
            AppError::InvalidToken { .. } => ErrorCode::UnauthorizedInvalidJwt,
            AppError::RouteNotFound { .. } => ErrorCode::RouteNotFound,
            AppError::PayloadTooLarge { .. } => ErrorCode::PayloadTooLarge,
            AppError::BackendUnreachable { .. } => ErrorCode::BadGateway,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Client-facing message. Never carries internal detail.
    pub fn message(&self) -> &'static str {
        match self {
            AppError::MissingToken => "No token provided",
            AppError::InvalidToken { .. } => "Invalid token",
            AppError::RouteNotFound { .. } => "Not found",
            AppError::PayloadTooLarge { .. } => "Payload too large",
            AppError::BackendUnreachable { .. } => "Bad gateway",
            AppError::Internal { .. } | AppError::Config { .. } => "Something went wrong!",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingToken | AppError::InvalidToken { .. } => StatusCode::UNAUTHORIZED,
            AppError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::BackendUnreachable { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } | AppError::Config { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn internal(detail: String) -> Self {
        Self::Internal { detail }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    pub fn route_not_found(path: impl Into<String>) -> Self {
        Self::RouteNotFound { path: path.into() }
    }

    pub fn backend_unreachable(service: impl Into<String>, detail: String) -> Self {
        Self::BackendUnreachable {
            service: service.into(),
            detail,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingToken => AppError::MissingToken,
            cause => AppError::InvalidToken { cause },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code();
        let trace_id = trace_ctx::trace_id();
        let detail = self.to_string();

        if status.is_server_error() {
            error!(error.code = %code, error.detail = %Redacted(&detail), trace_id = %trace_id, "request failed");
        } else {
            debug!(error.code = %code, error.detail = %Redacted(&detail), trace_id = %trace_id, "request rejected");
        }

        let mut builder = HttpResponse::build(status);
        builder.insert_header(("x-trace-id", trace_id));
        if status == StatusCode::UNAUTHORIZED {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }

        builder.json(ErrorBody {
            message: self.message().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    #[test]
    fn auth_errors_map_to_401_codes() {
        let missing: AppError = AuthError::MissingToken.into();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(missing.code(), ErrorCode::UnauthorizedMissingBearer);
        assert_eq!(missing.message(), "No token provided");

        let invalid: AppError = AuthError::InvalidSignature.into();
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.code(), ErrorCode::UnauthorizedInvalidJwt);
        assert_eq!(invalid.message(), "Invalid token");

        let expired: AppError = AuthError::Expired.into();
        assert_eq!(expired.code(), ErrorCode::UnauthorizedExpiredJwt);
        assert_eq!(expired.message(), "Invalid token");
    }

    #[test]
    fn gateway_errors_map_to_statuses() {
        assert_eq!(
            AppError::route_not_found("/nope").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::PayloadTooLarge { limit: 1 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::backend_unreachable("blog", "connection refused".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn error_response_hides_internal_detail() {
        let err = AppError::internal("db password is hunter2".to_string());
        let resp = err.error_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.headers().get("x-trace-id").is_some());
        assert!(resp.headers().get(header::WWW_AUTHENTICATE).is_none());

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Something went wrong!" }));
    }

    #[actix_web::test]
    async fn unauthorized_response_carries_www_authenticate() {
        let resp = AppError::MissingToken.error_response();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}
