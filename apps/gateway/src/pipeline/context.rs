use actix_web::http::header::HeaderMap;
use actix_web::http::Method;
use actix_web::HttpRequest;

use crate::auth::claims::SubjectId;
use crate::routing::route_table::RouteEntry;
use crate::trace_ctx;

/// Everything the pipeline needs from an inbound request except its body.
///
/// Created when the request arrives and dropped once the response is sent.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub trace_id: String,
}

impl RequestContext {
    pub fn from_request(req: &HttpRequest) -> Self {
        Self {
            method: req.method().clone(),
            path: req.path().to_string(),
            query: Some(req.query_string())
                .filter(|q| !q.is_empty())
                .map(str::to_string),
            headers: req.headers().clone(),
            trace_id: trace_ctx::trace_id(),
        }
    }
}

/// A request whose path matched a registered route.
#[derive(Debug)]
pub struct RoutedRequest<'t> {
    pub context: RequestContext,
    pub route: &'t RouteEntry,
}

/// A routed request that is cleared for forwarding.
///
/// `subject` is set exactly when the route requires auth and the token passed
/// verification.
#[derive(Debug)]
pub struct AuthorizedRequest<'t> {
    pub context: RequestContext,
    pub route: &'t RouteEntry,
    pub subject: Option<SubjectId>,
}

impl AuthorizedRequest<'_> {
    /// Backend URL: target address, rebased path and the original query string.
    pub fn upstream_url(&self) -> String {
        let path = self.route.rebase(&self.context.path);
        match &self.context.query {
            Some(query) => format!("{}{}?{}", self.route.target_address, path, query),
            None => format!("{}{}", self.route.target_address, path),
        }
    }
}
