//! Per-request dispatch pipeline.
//!
//! A request moves through named stages, each of which either hands the next
//! stage its input or ends the request with an `AppError`:
//!
//! ```text
//! Received -> Resolve -> (Authenticate) -> Forward -> Relay -> Responded
//! ```
//!
//! The stages are plain functions over `RequestContext` and friends so they can
//! be exercised without a running server; `Dispatcher` strings them together.

pub mod context;
pub mod dispatcher;
pub mod stages;

pub use context::{AuthorizedRequest, RequestContext, RoutedRequest};
pub use dispatcher::Dispatcher;
pub use stages::Stage;
