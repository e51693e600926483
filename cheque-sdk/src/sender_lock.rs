use ckb_types::packed::{Byte32, Script};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use std::sync::Arc;

type LockMap = DashMap<Byte32, Arc<Mutex<()>>>;

/// One mutex per sender lock hash.
///
/// Two builds for the same sender would race for the same lock-only cells.
/// Holding the guard for the whole build serializes them; builds for
/// different senders never wait on each other.
#[derive(Clone, Default)]
pub struct SenderLocks {
    locks: Arc<LockMap>,
}

/// Held while a build of one sender is in flight. The sender's entry is
/// removed on drop once nobody else holds or waits for it.
pub struct SenderGuard {
    locks: Arc<LockMap>,
    key: Byte32,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SenderGuard {
    fn drop(&mut self) {
        // release first, the guard keeps a reference to the mutex
        self.guard.take();
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl SenderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other build of `sender_lock` is in flight. The scope
    /// ends when the guard drops, on success and failure alike.
    pub async fn acquire(&self, sender_lock: &Script) -> SenderGuard {
        let key = sender_lock.calc_script_hash();
        let lock = self.locks.entry(key.clone()).or_default().clone();
        let guard = lock.lock_owned().await;
        SenderGuard {
            locks: Arc::clone(&self.locks),
            key,
            guard: Some(guard),
        }
    }

    /// Senders currently building or waiting to build.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
