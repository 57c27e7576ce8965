pub mod cors;
pub mod panic_guard;
pub mod request_trace;
pub mod structured_logger;

pub use cors::cors_middleware;
pub use panic_guard::PanicGuard;
pub use request_trace::RequestTrace;
pub use structured_logger::StructuredLogger;
