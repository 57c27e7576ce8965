#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod errors;
pub mod logging;
pub mod middleware;
pub mod pipeline;
pub mod proxy;
pub mod routes;
pub mod routing;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use app::build_app;
pub use auth::jwt::{mint_access_token, AuthError, TokenVerifier};
pub use auth::claims::{Claims, SubjectId};
pub use config::gateway::{GatewayConfig, ServiceUrls};
pub use error::AppError;
pub use errors::ErrorCode;
pub use middleware::cors::cors_middleware;
pub use middleware::panic_guard::PanicGuard;
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use pipeline::dispatcher::Dispatcher;
pub use routing::route_table::{RouteEntry, RouteTable};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    gateway_test_support::logging::init();
}
