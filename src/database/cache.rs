//! Process-wide connection cache with single-flight connect

use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{redact_uri, Connector, DatabaseHandle};

type PendingConnect = Shared<BoxFuture<'static, Option<DatabaseHandle>>>;

enum Slot {
    Idle,
    Connecting(PendingConnect),
    Connected(DatabaseHandle),
}

/// Memoizes one database connection per process.
///
/// Concurrent callers share a single in-flight attempt. A failed attempt is
/// not cached: the next call starts a fresh one.
pub struct ConnectionCache {
    uri: Option<String>,
    connector: Arc<dyn Connector>,
    slot: Mutex<Slot>,
    attempts: AtomicUsize,
}

impl ConnectionCache {
    pub fn new(uri: Option<String>, connector: Arc<dyn Connector>) -> Self {
        Self {
            uri: uri.filter(|uri| !uri.trim().is_empty()),
            connector,
            slot: Mutex::new(Slot::Idle),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Get the cached connection, connecting on first use.
    ///
    /// Returns `None` when no connection string is configured or the attempt
    /// failed. Failures are logged, never returned.
    pub async fn get_connection(&self) -> Option<DatabaseHandle> {
        let Some(uri) = self.uri.clone() else {
            tracing::warn!("No database connection string set - running without database");
            return None;
        };

        let pending = {
            let mut slot = self.lock_slot();
            let in_flight = match &*slot {
                Slot::Connected(handle) => return Some(handle.clone()),
                Slot::Connecting(pending) => Some(pending.clone()),
                Slot::Idle => None,
            };

            match in_flight {
                Some(pending) => pending,
                None => {
                    let pending = self.start_attempt(uri);
                    *slot = Slot::Connecting(pending.clone());
                    pending
                }
            }
        };

        let result = pending.clone().await;

        let mut slot = self.lock_slot();
        // Only the attempt we awaited may settle the slot
        let settles = matches!(&*slot, Slot::Connecting(current) if current.ptr_eq(&pending));
        if settles {
            *slot = match &result {
                Some(handle) => Slot::Connected(handle.clone()),
                None => Slot::Idle,
            };
        }

        result
    }

    /// Whether a live connection is cached
    pub fn is_connected(&self) -> bool {
        matches!(&*self.lock_slot(), Slot::Connected(_))
    }

    /// Number of connect attempts started so far
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn is_configured(&self) -> bool {
        self.uri.is_some()
    }

    fn start_attempt(&self, uri: String) -> PendingConnect {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let connector = Arc::clone(&self.connector);

        async move {
            let target = redact_uri(&uri);
            match connector.connect(&uri).await {
                Ok(handle) => {
                    tracing::info!("Connected to {} database {}", handle.backend(), target);
                    Some(handle)
                }
                Err(e) => {
                    tracing::warn!(
                        "Database connection to {} failed - running without database: {}",
                        target,
                        e
                    );
                    None
                }
            }
        }
        .boxed()
        .shared()
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
