//! Per-actor serialization of invocations.

use std::collections::HashMap;
use std::sync::Arc;

use bridge_core::ActorRef;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async lock per `(system, name)`.
///
/// Tokio's mutex hands the lock out in FIFO order, so invocations on one
/// actor run one at a time in arrival order while different actors proceed
/// in parallel. Entries are kept for the life of the process.
#[derive(Debug, Default)]
pub struct ActorLocks {
    locks: Mutex<HashMap<ActorRef, Arc<AsyncMutex<()>>>>,
}

impl ActorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `actor`.
    pub async fn acquire(&self, actor: &ActorRef) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            Arc::clone(locks.entry(actor.clone()).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of actors seen so far.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_actor_waits() {
        let locks = Arc::new(ActorLocks::new());
        let actor = ActorRef::new("system", "counter");

        let guard = locks.acquire(&actor).await;
        let waiter = {
            let locks = Arc::clone(&locks);
            let actor = actor.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&actor).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn test_other_actor_does_not_wait() {
        let locks = ActorLocks::new();
        let _first = locks.acquire(&ActorRef::new("system", "a")).await;
        let _second = tokio::time::timeout(Duration::from_secs(1), locks.acquire(&ActorRef::new("system", "b")))
            .await
            .unwrap();
        let _other_system = tokio::time::timeout(Duration::from_secs(1), locks.acquire(&ActorRef::new("other", "a")))
            .await
            .unwrap();
        assert_eq!(locks.len(), 3);
    }
}
