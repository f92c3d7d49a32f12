//! Per-conversation write serialization.
//!
//! Two exchanges on the same conversation would otherwise interleave their
//! user/assistant writes and build context windows from each other's
//! half-finished state. `ConversationLocks` hands out one async mutex per
//! conversation id; exchanges on different conversations never contend.
//!
//! Entries are dropped from the table as soon as nobody holds or waits on
//! them, so the table only ever contains in-flight conversations.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Default)]
pub struct ConversationLocks {
    inner: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a conversation.
    pub async fn acquire(&self, conversation_id: Uuid) -> ConversationGuard<'_> {
        let mutex = self.inner.entry(conversation_id).or_default().clone();
        let guard = mutex.lock_owned().await;
        ConversationGuard {
            locks: self,
            conversation_id,
            guard: Some(guard),
        }
    }

    /// Number of conversations currently locked or waited on.
    pub fn in_flight(&self) -> usize {
        self.inner.len()
    }
}

/// Exclusive access to one conversation, released on drop.
pub struct ConversationGuard<'a> {
    locks: &'a ConversationLocks,
    conversation_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ConversationGuard<'_> {
    fn drop(&mut self) {
        // Release first so the strong count below only counts the table and waiters.
        self.guard.take();
        self.locks
            .inner
            .remove_if(&self.conversation_id, |_, m| Arc::strong_count(m) == 1);
    }
}
