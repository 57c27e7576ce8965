use std::sync::Arc;

use crate::config::gateway::GatewayConfig;
use crate::error::AppError;
use crate::pipeline::dispatcher::Dispatcher;
use crate::proxy::client::UpstreamClient;
use crate::routing::route_table::RouteTable;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    config: GatewayConfig,
    route_table: Option<RouteTable>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: GatewayConfig::new(SecurityConfig::default()),
            route_table: None,
        }
    }

    pub fn with_config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.config.security = security_config;
        self
    }

    /// Replace the route table derived from the configured service URLs.
    pub fn with_route_table(mut self, route_table: RouteTable) -> Self {
        self.route_table = Some(route_table);
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let route_table = match self.route_table {
            Some(table) => table,
            None => RouteTable::from_config(&self.config)?,
        };
        let client = UpstreamClient::new(&self.config)?;
        let dispatcher = Dispatcher::new(route_table, &self.config.security, client);

        Ok(AppState::new(Arc::new(self.config), dispatcher))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
