//! Auth provider resolution tests
//! Every failure path must end in a degraded but usable service.

use async_trait::async_trait;
use futures_util::future::join_all;
use gatehouse::auth::models::{Session, User, UserRecord};
use gatehouse::auth::{resolve_auth_service, AuthResolver, DegradedReason, SignUpRequest};
use gatehouse::database::{
    AuthStore, ConnectionCache, Connector, Database, DatabaseHandle, MemoryConnector,
    MemoryDatabase,
};
use gatehouse::error::{Error, Result};
use gatehouse::Config;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn memory_config() -> Config {
    let mut config = Config::default().with_database_uri("memory://");
    config.auth.password_memory_kib = 256;
    config.auth.password_iterations = 1;
    config
}

fn resolver(config: Config, connector: Arc<dyn Connector>) -> AuthResolver {
    let config = Arc::new(config);
    let cache = Arc::new(ConnectionCache::new(
        config.database_uri().map(String::from),
        connector,
    ));
    AuthResolver::new(config, cache)
}

/// Always refuses to connect
struct RefusingConnector;

#[async_trait]
impl Connector for RefusingConnector {
    async fn connect(&self, _uri: &str) -> Result<DatabaseHandle> {
        Err(Error::Connection("connection refused".to_string()))
    }
}

/// Connects, but the handle exposes no store
struct DetachedConnector;

#[async_trait]
impl Connector for DetachedConnector {
    async fn connect(&self, _uri: &str) -> Result<DatabaseHandle> {
        Ok(Arc::new(MemoryDatabase::detached()))
    }
}

/// Store whose schema setup fails
struct BrokenStore;

#[async_trait]
impl AuthStore for BrokenStore {
    async fn migrate(&self) -> Result<()> {
        Err(Error::Connection("permission denied for schema public".to_string()))
    }

    async fn find_user_by_email(&self, _email: &str) -> Result<Option<UserRecord>> {
        Ok(None)
    }

    async fn find_user_by_id(&self, _id: &str) -> Result<Option<User>> {
        Ok(None)
    }

    async fn insert_user(&self, _record: &UserRecord) -> Result<()> {
        Ok(())
    }

    async fn insert_session(&self, _session: &Session) -> Result<()> {
        Ok(())
    }

    async fn find_session(&self, _token: &str) -> Result<Option<Session>> {
        Ok(None)
    }

    async fn delete_session(&self, _token: &str) -> Result<()> {
        Ok(())
    }
}

struct BrokenDatabase;

impl Database for BrokenDatabase {
    fn auth_store(&self) -> Option<Arc<dyn AuthStore>> {
        Some(Arc::new(BrokenStore))
    }

    fn backend(&self) -> &'static str {
        "broken"
    }
}

struct BrokenConnector;

#[async_trait]
impl Connector for BrokenConnector {
    async fn connect(&self, _uri: &str) -> Result<DatabaseHandle> {
        Ok(Arc::new(BrokenDatabase))
    }
}

/// Fails until switched on, counting calls
struct SwitchConnector {
    up: AtomicBool,
    calls: AtomicUsize,
    inner: MemoryConnector,
}

#[async_trait]
impl Connector for SwitchConnector {
    async fn connect(&self, uri: &str) -> Result<DatabaseHandle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        if self.up.load(Ordering::SeqCst) {
            self.inner.connect(uri).await
        } else {
            Err(Error::Connection("database is down".to_string()))
        }
    }
}

#[tokio::test]
async fn test_not_configured() {
    let resolver = resolver(Config::default(), Arc::new(MemoryConnector::new()));
    let auth = resolver.get_auth_service().await;

    assert_eq!(auth.degraded_reason(), Some(&DegradedReason::NotConfigured));
    assert!(!auth.options().email_and_password.enabled);
}

#[tokio::test]
async fn test_connection_failure() {
    let resolver = resolver(memory_config(), Arc::new(RefusingConnector));
    let auth = resolver.get_auth_service().await;

    assert_eq!(auth.degraded_reason(), Some(&DegradedReason::ConnectionFailed));
}

#[tokio::test]
async fn test_missing_database_reference() {
    let resolver = resolver(memory_config(), Arc::new(DetachedConnector));
    let auth = resolver.get_auth_service().await;

    assert_eq!(auth.degraded_reason(), Some(&DegradedReason::MissingDatabase));
}

#[tokio::test]
async fn test_construction_failure() {
    let resolver = resolver(memory_config(), Arc::new(BrokenConnector));
    let auth = resolver.get_auth_service().await;

    match auth.degraded_reason() {
        Some(DegradedReason::ConstructionFailed(msg)) => {
            assert!(msg.contains("permission denied"));
        }
        other => panic!("expected construction failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_degraded_service_is_structurally_valid() {
    let mut config = Config::default();
    config.auth.secret = "configured-secret".to_string();
    config.auth.base_url = "https://app.example.com".to_string();

    let config = Arc::new(config);
    let cache = ConnectionCache::new(None, Arc::new(MemoryConnector::new()));
    let auth = resolve_auth_service(&config, &cache).await;

    assert_eq!(auth.options().secret, "configured-secret");
    assert_eq!(auth.options().base_url, "https://app.example.com");
    assert!(auth.get_session(None).await.is_err());
    assert!(auth.sign_out(None).await.is_ok());
    assert!(matches!(
        auth.sign_up_email(SignUpRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await,
        Err(Error::EmailPasswordDisabled)
    ));
}

#[tokio::test]
async fn test_backed_service_options() {
    let resolver = resolver(memory_config(), Arc::new(MemoryConnector::new()));
    let auth = resolver.get_auth_service().await;

    assert!(auth.is_backed());
    let email = &auth.options().email_and_password;
    assert!(email.enabled);
    assert!(email.auto_sign_in);
    assert!(!email.require_email_verification);
    assert_eq!((email.min_password_length, email.max_password_length), (8, 128));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_resolution_yields_one_instance() {
    let connector = Arc::new(SwitchConnector {
        up: AtomicBool::new(true),
        calls: AtomicUsize::new(0),
        inner: MemoryConnector::new(),
    });
    let resolver = Arc::new(resolver(memory_config(), connector.clone()));

    let tasks = (0..12).map(|_| {
        let resolver = Arc::clone(&resolver);
        tokio::spawn(async move { resolver.get_auth_service().await })
    });
    let services: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    for service in &services {
        assert!(Arc::ptr_eq(service, &services[0]));
    }
    assert_eq!(connector.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_variant_is_fixed_after_first_resolution() {
    let connector = Arc::new(SwitchConnector {
        up: AtomicBool::new(false),
        calls: AtomicUsize::new(0),
        inner: MemoryConnector::new(),
    });
    let resolver = resolver(memory_config(), connector.clone());

    let first = resolver.get_auth_service().await;
    assert!(!first.is_backed());

    // Database comes back, but the resolved service does not change
    connector.up.store(true, Ordering::SeqCst);
    let second = resolver.get_auth_service().await;

    assert!(Arc::ptr_eq(&first, &second));
    assert!(!second.is_backed());
    assert_eq!(connector.calls.load(Ordering::SeqCst), 1);
}
