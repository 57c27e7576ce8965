//! Converts a panic anywhere below it into the generic 500 response.
//!
//! The panic payload is logged through `AppError::error_response`; the client
//! only sees `{"message":"Something went wrong!"}`. The request itself is never
//! held here: the router needs sole ownership of it to record match info.

use std::any::Any;
use std::future::{ready, Ready};
use std::panic::{self, AssertUnwindSafe};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::InternalError;
use actix_web::{Error, ResponseError};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;

use crate::error::AppError;

#[derive(Clone, Default)]
pub struct PanicGuard;

impl<S, B> Transform<S, ServiceRequest> for PanicGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = PanicGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PanicGuardMiddleware { service }))
    }
}

pub struct PanicGuardMiddleware<S> {
    service: S,
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Must run while the request future is being polled, so the rendered
/// response picks up the request's trace id.
fn panic_error(detail: String) -> Error {
    let err = AppError::internal(format!("panic: {detail}"));
    let response = err.error_response();
    Error::from(InternalError::from_response(err, response))
}

impl<S, B> Service<ServiceRequest> for PanicGuardMiddleware<S>
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
        let fut = match panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req))) {
            Ok(fut) => fut,
            Err(payload) => {
                let detail = panic_detail(&*payload);
                return Box::pin(async move { Err::<ServiceResponse<B>, _>(panic_error(detail)) });
            }
        };

        Box::pin(async move {
            AssertUnwindSafe(fut)
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(panic_error(panic_detail(&*payload))))
        })
    }
}
