pub mod gateway;

pub use gateway::{GatewayConfig, ServiceUrls};
