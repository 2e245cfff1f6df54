//! In-process auth storage for `memory://` databases and tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{AuthStore, Connector, Database, DatabaseHandle};
use crate::auth::models::{Session, User, UserRecord};
use crate::error::{Error, Result};

pub(super) const MEMORY_SCHEME: &str = "memory://";

/// User and session storage kept in memory
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserRecord>>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn migrate(&self) -> Result<()> {
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|r| r.user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(id).map(|r| r.user.clone()))
    }

    async fn insert_user(&self, record: &UserRecord) -> Result<()> {
        let mut users = self.users.write().await;
        if users.values().any(|r| r.user.email == record.user.email) {
            return Err(Error::UserAlreadyExists);
        }
        users.insert(record.user.id.clone(), record.clone());
        Ok(())
    }

    async fn insert_session(&self, session: &Session) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get(token).cloned();
        if session.as_ref().is_some_and(Session::is_expired) {
            sessions.remove(token);
            return Ok(None);
        }
        Ok(session)
    }

    async fn delete_session(&self, token: &str) -> Result<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}

/// Connection to an in-memory store
pub struct MemoryDatabase {
    store: Option<Arc<MemoryStore>>,
}

impl MemoryDatabase {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A connection that exposes no store
    pub fn detached() -> Self {
        Self { store: None }
    }
}

impl Database for MemoryDatabase {
    fn auth_store(&self) -> Option<Arc<dyn AuthStore>> {
        self.store
            .as_ref()
            .map(|store| Arc::clone(store) as Arc<dyn AuthStore>)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Connector handing out connections to one shared in-memory store
#[derive(Clone, Default)]
pub struct MemoryConnector {
    store: Arc<MemoryStore>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, uri: &str) -> Result<DatabaseHandle> {
        if !uri.starts_with(MEMORY_SCHEME) {
            return Err(Error::Connection(format!("Unsupported memory URI: {}", uri)));
        }
        Ok(Arc::new(MemoryDatabase::new(self.store())))
    }
}
