use std::future::Future;

use actix_web::HttpResponse;
use bytes::Bytes;

use crate::auth::jwt::TokenVerifier;
use crate::error::AppError;
use crate::pipeline::context::RequestContext;
use crate::pipeline::stages;
use crate::proxy::client::UpstreamClient;
use crate::routing::route_table::RouteTable;
use crate::state::security_config::SecurityConfig;

/// Runs a request through resolve, authenticate, forward and relay.
///
/// Holds only read-only state, so one instance serves every worker.
#[derive(Debug)]
pub struct Dispatcher {
    routes: RouteTable,
    verifier: TokenVerifier,
    client: UpstreamClient,
}

impl Dispatcher {
    pub fn new(routes: RouteTable, security: &SecurityConfig, client: UpstreamClient) -> Self {
        Self {
            routes,
            verifier: TokenVerifier::new(security),
            client,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Handle one request.
    ///
    /// `body` is only awaited once the request has been routed and
    /// authenticated, so rejected requests never have their payload read.
    pub async fn handle<B>(&self, context: RequestContext, body: B) -> Result<HttpResponse, AppError>
    where
        B: Future<Output = Result<Bytes, AppError>>,
    {
        let routed = stages::resolve(&self.routes, context)?;
        let authorized = stages::authenticate(&self.verifier, routed)?;
        let body = body.await?;
        let upstream = stages::forward(&self.client, authorized, body).await?;

        Ok(stages::relay(upstream))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use actix_web::http::header::HeaderMap;
    use actix_web::http::Method;

    use super::*;
    use crate::config::gateway::GatewayConfig;

    fn dispatcher() -> Dispatcher {
        let config = GatewayConfig::new(SecurityConfig::default());
        Dispatcher::new(
            RouteTable::from_config(&config).unwrap(),
            &config.security,
            UpstreamClient::new(&config).unwrap(),
        )
    }

    fn context(path: &str) -> RequestContext {
        RequestContext {
            method: Method::DELETE,
            path: path.to_string(),
            query: None,
            headers: HeaderMap::new(),
            trace_id: "dispatch-test".to_string(),
        }
    }

    #[actix_web::test]
    async fn rejected_requests_never_read_the_body() {
        let dispatcher = dispatcher();
        let body_read = Cell::new(false);

        let err = dispatcher
            .handle(context("/api/comments/abc"), async {
                body_read.set(true);
                Ok(Bytes::new())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingToken));

        let err = dispatcher
            .handle(context("/nowhere"), async {
                body_read.set(true);
                Ok(Bytes::new())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RouteNotFound { .. }));

        assert!(!body_read.get());
    }

    #[actix_web::test]
    async fn body_errors_stop_the_pipeline() {
        let dispatcher = dispatcher();

        let err = dispatcher
            .handle(context("/api/auth/register"), async {
                Err(AppError::PayloadTooLarge { limit: 8 })
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PayloadTooLarge { limit: 8 }));
    }
}
