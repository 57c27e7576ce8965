use std::sync::Arc;

use crate::config::gateway::GatewayConfig;
use crate::pipeline::dispatcher::Dispatcher;

/// Application state shared read-only by every worker
#[derive(Debug, Clone)]
pub struct AppState {
    /// Immutable configuration the gateway was started with
    pub config: Arc<GatewayConfig>,
    /// Route table, token verifier and upstream client
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(config: Arc<GatewayConfig>, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            dispatcher: Arc::new(dispatcher),
        }
    }
}
