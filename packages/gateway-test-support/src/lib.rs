//! Gateway test support utilities
//!
//! Shared by the gateway's unit and integration tests: logging setup, error
//! body assertions, and a recording mock backend.

pub mod logging;
pub mod message_body;
pub mod mock_backend;

pub use message_body::assert_message_response;
pub use mock_backend::{unused_local_url, CannedResponse, MockBackend, RecordedRequest};
