//! Per-request trace id and tracing span.
//!
//! Generates a UUID trace id, stores it in request extensions, installs it as
//! the task-local trace id (see `trace_ctx`), runs the downstream service inside
//! a `request` span, and echoes the id back as `X-Request-Id`.
//!
//! Wire it outermost so every other middleware and handler sees the id:
//!
//! App::new()
//!     .wrap(StructuredLogger)
//!     .wrap(RequestTrace)
//!     // routes...

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::InternalError;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::trace_ctx;

pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
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
        let trace_id = Uuid::new_v4().to_string();
        req.extensions_mut().insert(trace_id.clone());

        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path()
        );

        let fut = self.service.call(req);

        // The response is finished inside the trace scope so that errors
        // rendered here see the same trace id as the handler did.
        let scoped = trace_ctx::with_trace_id(trace_id.clone(), async move {
            let name = HeaderName::from_static("x-request-id");
            let value = HeaderValue::from_str(&trace_id)
                .unwrap_or_else(|_| HeaderValue::from_static("invalid-uuid"));

            match fut.await {
                Ok(mut res) => {
                    res.headers_mut().insert(name, value);
                    Ok(res)
                }
                // The server would render this after the scope has ended and
                // without the id header.
                Err(err) => {
                    let mut response = err.error_response();
                    response.headers_mut().insert(name, value);
                    Err(Error::from(InternalError::from_response(err, response)))
                }
            }
        });

        Box::pin(scoped.instrument(span))
    }
}
