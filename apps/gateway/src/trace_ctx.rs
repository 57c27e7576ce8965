//! Task-local trace id for the request currently being handled.
//!
//! `RequestTrace` scopes each request future with its trace id so that error
//! rendering and the upstream forwarder can read it without threading it
//! through every call.

use std::future::Future;

use tokio::task_local;

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

/// Trace id of the current request, or `"unknown"` outside a request scope.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|id| id.clone())
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

/// Run `future` with `trace_id` installed as the current trace id.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn outside_scope_is_unknown() {
        assert_eq!(trace_id(), "unknown");
    }

    #[tokio::test]
    async fn scope_installs_and_restores() {
        let inner = with_trace_id("outer-123".to_string(), async {
            assert_eq!(trace_id(), "outer-123");

            let inner = with_trace_id("inner-456".to_string(), async { trace_id() }).await;
            assert_eq!(trace_id(), "outer-123");
            inner
        })
        .await;

        assert_eq!(inner, "inner-456");
        assert_eq!(trace_id(), "unknown");
    }
}
