//! Resolves the process-wide auth service

use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::auth::options::AuthOptions;
use crate::auth::service::{AuthService, BackedAuth, DegradedAuth, DegradedReason};
use crate::config::Config;
use crate::database::ConnectionCache;

/// Builds the auth service on first use and hands out the same instance after.
pub struct AuthResolver {
    config: Arc<Config>,
    connections: Arc<ConnectionCache>,
    instance: OnceCell<Arc<AuthService>>,
}

impl AuthResolver {
    pub fn new(config: Arc<Config>, connections: Arc<ConnectionCache>) -> Self {
        Self {
            config,
            connections,
            instance: OnceCell::new(),
        }
    }

    /// The auth service. Concurrent first callers wait on one resolution.
    pub async fn get_auth_service(&self) -> Arc<AuthService> {
        self.instance
            .get_or_init(|| async {
                Arc::new(resolve_auth_service(&self.config, &self.connections).await)
            })
            .await
            .clone()
    }

    /// Whether resolution already happened
    pub fn is_resolved(&self) -> bool {
        self.instance.initialized()
    }
}

/// Build an auth service from the current database state.
///
/// Never fails: every problem ends in a degraded service.
pub async fn resolve_auth_service(config: &Config, connections: &ConnectionCache) -> AuthService {
    let degraded = |reason: DegradedReason| {
        tracing::warn!("Running without database - auth features disabled ({})", reason);
        AuthService::Degraded(DegradedAuth::new(AuthOptions::degraded(&config.auth), reason))
    };

    let Some(handle) = connections.get_connection().await else {
        return degraded(if connections.is_configured() {
            DegradedReason::ConnectionFailed
        } else {
            DegradedReason::NotConfigured
        });
    };

    let Some(store) = handle.auth_store() else {
        return degraded(DegradedReason::MissingDatabase);
    };

    match BackedAuth::new(AuthOptions::backed(&config.auth), store).await {
        Ok(backed) => {
            tracing::info!("Auth service ready ({} store)", handle.backend());
            AuthService::Backed(backed)
        }
        Err(e) => degraded(DegradedReason::ConstructionFailed(e.to_string())),
    }
}
