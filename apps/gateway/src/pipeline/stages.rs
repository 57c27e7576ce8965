use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpResponse;
use bytes::Bytes;
use tracing::debug;

use crate::auth::bearer::extract_bearer;
use crate::auth::jwt::TokenVerifier;
use crate::error::AppError;
use crate::pipeline::context::{AuthorizedRequest, RequestContext, RoutedRequest};
use crate::proxy::client::{UpstreamClient, UpstreamResponse};
use crate::proxy::headers::upstream_request_headers;
use crate::routing::route_table::RouteTable;

/// Named pipeline stages, used as a log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Authenticate,
    Forward,
    Relay,
}

impl Stage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Stage::Resolve => "resolve",
            Stage::Authenticate => "authenticate",
            Stage::Forward => "forward",
            Stage::Relay => "relay",
        }
    }
}

/// Resolve: match the path against the route table.
pub fn resolve(table: &RouteTable, context: RequestContext) -> Result<RoutedRequest<'_>, AppError> {
    let Some(route) = table.resolve(&context.path) else {
        return Err(AppError::route_not_found(context.path));
    };

    debug!(stage = Stage::Resolve.as_str(), route = %route.name, "route matched");
    Ok(RoutedRequest { context, route })
}

/// Authenticate: verify the bearer token when the route requires it.
pub fn authenticate<'t>(
    verifier: &TokenVerifier,
    routed: RoutedRequest<'t>,
) -> Result<AuthorizedRequest<'t>, AppError> {
    let RoutedRequest { context, route } = routed;
    if !route.requires_auth {
        return Ok(AuthorizedRequest {
            context,
            route,
            subject: None,
        });
    }

    let token = extract_bearer(context.headers.get(AUTHORIZATION))?;
    let subject = verifier.verify(token)?;

    debug!(stage = Stage::Authenticate.as_str(), route = %route.name, "token verified");
    Ok(AuthorizedRequest {
        context,
        route,
        subject: Some(subject),
    })
}

/// Forward: send the request to the route's backend.
pub async fn forward(
    client: &UpstreamClient,
    request: AuthorizedRequest<'_>,
    body: Bytes,
) -> Result<UpstreamResponse, AppError> {
    let url = request.upstream_url();
    let headers = upstream_request_headers(
        &request.context.headers,
        request.subject.as_ref(),
        &request.context.trace_id,
    );

    debug!(stage = Stage::Forward.as_str(), route = %request.route.name, "forwarding");
    client
        .send(
            &request.route.name,
            &request.context.method,
            &url,
            headers,
            body,
        )
        .await
}

/// Relay: copy the backend's status, headers and body back to the caller.
pub fn relay(upstream: UpstreamResponse) -> HttpResponse {
    debug!(stage = Stage::Relay.as_str(), status = upstream.status.as_u16(), "relaying");

    let mut builder = HttpResponse::build(upstream.status);
    for (name, value) in upstream.headers.iter() {
        builder.append_header((name.clone(), value.clone()));
    }
    builder.body(upstream.body)
}
