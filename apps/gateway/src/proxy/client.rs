//! Pooled HTTP client for backend calls.
//!
//! One client is built at startup and shared by every request. A call is made
//! exactly once: connection failures and timeouts surface as
//! `AppError::BackendUnreachable` and are never retried.

use std::time::Duration;

use actix_web::http::header::HeaderMap as InboundHeaderMap;
use actix_web::http::{Method as InboundMethod, StatusCode};
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::Method;
use tracing::debug;

use crate::config::gateway::GatewayConfig;
use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::proxy::headers::relay_response_headers;

const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend response, already translated into actix types.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: InboundHeaderMap,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .connect_timeout(config.upstream_timeout.min(MAX_CONNECT_TIMEOUT))
            .tcp_keepalive(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            // Redirects are the client's business, relay them as-is.
            .redirect(Policy::none())
            .build()
            .map_err(|e| AppError::config(format!("Failed to build upstream client: {e}")))?;

        Ok(Self { client })
    }

    /// Perform one backend exchange and buffer the response body.
    pub async fn send(
        &self,
        service: &str,
        method: &InboundMethod,
        url: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<UpstreamResponse, AppError> {
        let method = Method::from_bytes(method.as_str().as_bytes())
            .map_err(|e| AppError::internal(format!("Unsupported method {method}: {e}")))?;

        debug!(service, %method, url = %url, "forwarding request");

        let response = self
            .client
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| classify(service, e))?;

        let status = StatusCode::from_u16(response.status().as_u16()).map_err(|e| {
            AppError::internal(format!("Backend {service} returned unusable status: {e}"))
        })?;
        let headers = relay_response_headers(response.headers());
        let body = response.bytes().await.map_err(|e| classify(service, e))?;

        debug!(service, status = status.as_u16(), bytes = body.len(), "backend responded");

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

fn classify(service: &str, e: reqwest::Error) -> AppError {
    let detail = Redacted(&e.to_string()).to_string();
    if e.is_builder() {
        AppError::internal(format!("Failed to build request for {service}: {detail}"))
    } else if e.is_timeout() {
        AppError::backend_unreachable(service, format!("timed out: {detail}"))
    } else {
        AppError::backend_unreachable(service, detail)
    }
}
