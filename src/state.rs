use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::models::BookingChange;
use crate::services::notifier::Notifier;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub notifier: Arc<dyn Notifier>,
    pub changes_tx: broadcast::Sender<BookingChange>,
    pub booking_locks: BookingLocks,
}

// One async mutex per booking id. Confirmation operations hold the lock for
// the whole read-validate-write sequence, so a double submit against the same
// booking serializes instead of racing on the status check. Dropping the
// guard removes the map entry once no other task holds or waits on it, so
// requests against arbitrary ids do not leave entries behind.
pub struct BookingLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl BookingLocks {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub async fn acquire(&self, id: &str) -> BookingLockGuard<'_> {
        let lock = {
            let mut map = self.inner.lock().unwrap();
            map.entry(id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        let guard = lock.lock_owned().await;
        BookingLockGuard {
            locks: self,
            id: id.to_string(),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    pub(crate) fn entry_count(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

impl Default for BookingLocks {
    fn default() -> Self {
        Self::new()
    }
}

pub struct BookingLockGuard<'a> {
    locks: &'a BookingLocks,
    id: String,
    guard: Option<tokio::sync::OwnedMutexGuard<()>>,
}

impl Drop for BookingLockGuard<'_> {
    fn drop(&mut self) {
        let mut map = self.locks.inner.lock().unwrap();
        // Release the per-id mutex before counting references. The map lock
        // is held across both steps, so a concurrent acquire cannot clone the
        // entry mid-check; strong_count == 1 means the map holds the only
        // reference left.
        self.guard = None;
        if let Some(lock) = map.get(&self.id) {
            if Arc::strong_count(lock) == 1 {
                map.remove(&self.id);
            }
        }
    }
}
