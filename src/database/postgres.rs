//! PostgreSQL connection and auth storage

use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::{Client, NoTls, Row};

use super::{AuthStore, Connector, Database, DatabaseHandle};
use crate::auth::models::{Session, User, UserRecord};
use crate::error::{Error, Result};

const AUTH_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS auth_user (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    email_verified BOOLEAN NOT NULL DEFAULT FALSE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS auth_session (
    token TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES auth_user(id) ON DELETE CASCADE,
    expires_at TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS auth_session_user_id_idx ON auth_session (user_id);
"#;

const PURGE_EXPIRED_SESSION: &str =
    "DELETE FROM auth_session WHERE token = $1 AND expires_at <= now()";

const FIND_LIVE_SESSION: &str = "SELECT token, user_id, expires_at, created_at FROM auth_session \
     WHERE token = $1 AND expires_at > now()";

/// Connects with `tokio-postgres`
pub struct PostgresConnector;

#[async_trait]
impl Connector for PostgresConnector {
    async fn connect(&self, uri: &str) -> Result<DatabaseHandle> {
        let (client, connection) = tokio_postgres::connect(uri, NoTls).await?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Arc::new(PostgresDatabase::new(client)))
    }
}

/// A live PostgreSQL connection
pub struct PostgresDatabase {
    client: Arc<Client>,
}

impl PostgresDatabase {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Database for PostgresDatabase {
    fn auth_store(&self) -> Option<Arc<dyn AuthStore>> {
        // A closed client can no longer serve queries
        if self.client.is_closed() {
            return None;
        }
        Some(Arc::new(PostgresStore {
            client: Arc::clone(&self.client),
        }))
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Users and sessions in `auth_user` / `auth_session`
pub struct PostgresStore {
    client: Arc<Client>,
}

fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        email_verified: row.get("email_verified"),
        created_at: row.get("created_at"),
    }
}

fn session_from_row(row: &Row) -> Session {
    Session {
        token: row.get("token"),
        user_id: row.get("user_id"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl AuthStore for PostgresStore {
    async fn migrate(&self) -> Result<()> {
        self.client.batch_execute(AUTH_SCHEMA).await?;
        tracing::debug!("Auth schema is up to date");
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let row = self
            .client
            .query_opt(
                "SELECT id, name, email, email_verified, password_hash, created_at \
                 FROM auth_user WHERE email = $1",
                &[&email],
            )
            .await?;

        Ok(row.map(|row| UserRecord {
            user: user_from_row(&row),
            password_hash: row.get("password_hash"),
        }))
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let row = self
            .client
            .query_opt(
                "SELECT id, name, email, email_verified, created_at FROM auth_user WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn insert_user(&self, record: &UserRecord) -> Result<()> {
        let user = &record.user;
        let inserted = self
            .client
            .execute(
                "INSERT INTO auth_user (id, name, email, email_verified, password_hash, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT (email) DO NOTHING",
                &[
                    &user.id,
                    &user.name,
                    &user.email,
                    &user.email_verified,
                    &record.password_hash,
                    &user.created_at,
                ],
            )
            .await?;

        if inserted == 0 {
            return Err(Error::UserAlreadyExists);
        }
        Ok(())
    }

    async fn insert_session(&self, session: &Session) -> Result<()> {
        self.client
            .execute(
                "INSERT INTO auth_session (token, user_id, expires_at, created_at) \
                 VALUES ($1, $2, $3, $4)",
                &[
                    &session.token,
                    &session.user_id,
                    &session.expires_at,
                    &session.created_at,
                ],
            )
            .await?;
        Ok(())
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>> {
        let purged = self
            .client
            .execute(PURGE_EXPIRED_SESSION, &[&token])
            .await?;
        if purged > 0 {
            tracing::debug!("Removed expired session");
            return Ok(None);
        }

        let row = self.client.query_opt(FIND_LIVE_SESSION, &[&token]).await?;
        Ok(row.as_ref().map(session_from_row))
    }

    async fn delete_session(&self, token: &str) -> Result<()> {
        self.client
            .execute("DELETE FROM auth_session WHERE token = $1", &[&token])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_lookup_deletes_and_live_lookup_filters() {
        assert!(PURGE_EXPIRED_SESSION.starts_with("DELETE FROM auth_session"));
        assert!(PURGE_EXPIRED_SESSION.contains("expires_at <= now()"));
        assert!(FIND_LIVE_SESSION.contains("expires_at > now()"));
    }
}
