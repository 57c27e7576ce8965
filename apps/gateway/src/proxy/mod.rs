pub mod client;
pub mod headers;

pub use client::{UpstreamClient, UpstreamResponse};
pub use headers::{relay_response_headers, upstream_request_headers, USER_ID_HEADER};
