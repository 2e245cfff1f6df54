//! Postgres store tests
//! Need a reachable database in GATEHOUSE_TEST_DATABASE_URI.
//!
//! Run with: cargo test --test postgres_store_tests -- --ignored --test-threads=1

use gatehouse::auth::models::{Session, User, UserRecord};
use gatehouse::database::{AuthStore, Connector, PostgresConnector};
use std::sync::Arc;

async fn test_store() -> Option<Arc<dyn AuthStore>> {
    let uri = std::env::var("GATEHOUSE_TEST_DATABASE_URI").ok()?;
    let handle = PostgresConnector.connect(&uri).await.ok()?;
    let store = handle.auth_store()?;
    store.migrate().await.ok()?;
    Some(store)
}

async fn insert_user(store: &Arc<dyn AuthStore>) -> User {
    let user = User::new(
        "Pg Test".to_string(),
        format!("pg-{}@example.com", uuid::Uuid::new_v4().simple()),
    );
    store
        .insert_user(&UserRecord {
            user: user.clone(),
            password_hash: "unused".to_string(),
        })
        .await
        .unwrap();
    user
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored --test-threads=1
async fn test_expired_session_row_is_deleted_on_lookup() {
    let Some(store) = test_store().await else {
        println!("⚠ Skipping test: Postgres not available");
        return;
    };
    let user = insert_user(&store).await;

    let expired = Session::new(user.id.clone(), -60);
    store.insert_session(&expired).await.unwrap();

    assert!(store.find_session(&expired.token).await.unwrap().is_none());

    // Re-inserting the same token only works if the expired row is gone
    store.insert_session(&expired).await.unwrap();
    store.delete_session(&expired.token).await.unwrap();
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored --test-threads=1
async fn test_live_session_round_trip() {
    let Some(store) = test_store().await else {
        println!("⚠ Skipping test: Postgres not available");
        return;
    };
    let user = insert_user(&store).await;

    let session = Session::new(user.id.clone(), 3600);
    store.insert_session(&session).await.unwrap();

    let found = store.find_session(&session.token).await.unwrap();
    assert_eq!(found.map(|s| s.user_id), Some(user.id));

    store.delete_session(&session.token).await.unwrap();
    assert!(store.find_session(&session.token).await.unwrap().is_none());
}
