//! Process-scoped application context shared by all handlers

use std::sync::Arc;

use crate::auth::{AuthResolver, AuthService};
use crate::config::Config;
use crate::database::{Connector, ConnectionCache, DefaultConnector};

/// Built once at startup and injected as router state
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub connections: Arc<ConnectionCache>,
    pub auth: Arc<AuthResolver>,
}

impl AppContext {
    /// Context using the default (Postgres / `memory://`) connector
    pub fn new(config: Config) -> Self {
        Self::with_connector(config, Arc::new(DefaultConnector::new()))
    }

    pub fn with_connector(config: Config, connector: Arc<dyn Connector>) -> Self {
        let config = Arc::new(config);
        let connections = Arc::new(ConnectionCache::new(
            config.database_uri().map(String::from),
            connector,
        ));
        let auth = Arc::new(AuthResolver::new(
            Arc::clone(&config),
            Arc::clone(&connections),
        ));

        Self {
            config,
            connections,
            auth,
        }
    }

    /// Resolved once from configuration at startup
    pub fn has_database(&self) -> bool {
        self.config.has_database()
    }

    pub async fn auth_service(&self) -> Arc<AuthService> {
        self.auth.get_auth_service().await
    }
}
