//! Database connection handling and auth storage

mod cache;
mod memory;
mod postgres;

pub use cache::ConnectionCache;
pub use memory::{MemoryConnector, MemoryDatabase, MemoryStore};
pub use postgres::{PostgresConnector, PostgresDatabase, PostgresStore};

use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};

use crate::auth::models::{Session, User, UserRecord};
use crate::error::Result;

/// Opaque reference to a live database connection
pub type DatabaseHandle = Arc<dyn Database>;

/// Establishes database connections
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, uri: &str) -> Result<DatabaseHandle>;
}

/// A live database connection
pub trait Database: Send + Sync {
    /// Storage for users and sessions, if the connection can still serve one
    fn auth_store(&self) -> Option<Arc<dyn AuthStore>>;

    /// Short backend name for logs
    fn backend(&self) -> &'static str;
}

/// Persistence used by the auth service
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Create the tables the store needs, if missing
    async fn migrate(&self) -> Result<()>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Insert a user; fails with `UserAlreadyExists` on a duplicate email
    async fn insert_user(&self, record: &UserRecord) -> Result<()>;

    async fn insert_session(&self, session: &Session) -> Result<()>;

    async fn find_session(&self, token: &str) -> Result<Option<Session>>;

    async fn delete_session(&self, token: &str) -> Result<()>;
}

/// Connector used by the server: `memory://` URIs get an in-process store,
/// everything else goes to Postgres.
pub struct DefaultConnector {
    memory: MemoryConnector,
    postgres: PostgresConnector,
}

impl DefaultConnector {
    pub fn new() -> Self {
        Self {
            memory: MemoryConnector::new(),
            postgres: PostgresConnector,
        }
    }
}

impl Default for DefaultConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for DefaultConnector {
    async fn connect(&self, uri: &str) -> Result<DatabaseHandle> {
        if uri.starts_with(memory::MEMORY_SCHEME) {
            self.memory.connect(uri).await
        } else {
            self.postgres.connect(uri).await
        }
    }
}

/// Hide the password part of a connection string
pub fn redact_uri(uri: &str) -> String {
    CREDENTIALS.replace(uri, "://$1:****@").to_string()
}

static CREDENTIALS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"://([^:/@]+):([^@]+)@")
        .expect("Invalid regex pattern - this is a bug in the codebase")
});
