//! One `request_completed` record per request, levelled by status class.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

/// Fields captured before the request is handed downstream.
struct RequestLine {
    method: String,
    path: String,
    trace_id: String,
    started: Instant,
}

impl RequestLine {
    /// `gateway_error` separates the gateway's own rejections from statuses
    /// relayed from a backend.
    fn log(&self, status: StatusCode, gateway_error: bool) {
        let status_code = status.as_u16();
        let duration_us = self.started.elapsed().as_micros() as u64;
        let (method, path, trace_id) = (&self.method, &self.path, &self.trace_id);

        if status.is_server_error() {
            error!(http.method=%method, url.path=%path, http.status_code=%status_code, gateway_error, duration_us=%duration_us, trace_id=%trace_id, message="request_completed");
        } else if status.is_client_error() {
            warn!(http.method=%method, url.path=%path, http.status_code=%status_code, gateway_error, duration_us=%duration_us, trace_id=%trace_id, message="request_completed");
        } else {
            info!(http.method=%method, url.path=%path, http.status_code=%status_code, gateway_error, duration_us=%duration_us, trace_id=%trace_id, message="request_completed");
        }
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Query strings may carry tokens; only the path is logged.
        let line = RequestLine {
            method: req.method().to_string(),
            path: req.path().to_string(),
            trace_id: req
                .extensions()
                .get::<String>()
                .cloned()
                .unwrap_or_else(|| "unknown".to_string()),
            started: Instant::now(),
        };

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            match &result {
                Ok(res) => line.log(res.status(), res.response().error().is_some()),
                Err(err) => line.log(err.as_response_error().status_code(), true),
            }

            result
        })
    }
}
