//! Eventual-persistence outbox.
//!
//! Services apply a change to their in-memory state first and then enqueue
//! the store write here. `flush` pushes writes in order; failures are logged
//! and kept for the next flush until they run out of attempts. Local state is
//! never rolled back.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::Store;

/// Default number of flushes a write survives before it is dropped.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WriteOp {
    Save { data: serde_json::Value },
    Remove,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingWrite {
    pub owner_id: String,
    pub collection: String,
    pub id: String,
    pub op: WriteOp,
    pub attempts: u32,
}

#[derive(Debug)]
pub struct Outbox {
    pending: VecDeque<PendingWrite>,
    max_attempts: u32,
}

impl Outbox {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            pending: VecDeque::new(),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn enqueue_save(
        &mut self,
        owner_id: &str,
        collection: &str,
        id: &str,
        data: serde_json::Value,
    ) {
        self.enqueue(owner_id, collection, id, WriteOp::Save { data });
    }

    pub fn enqueue_remove(&mut self, owner_id: &str, collection: &str, id: &str) {
        self.enqueue(owner_id, collection, id, WriteOp::Remove);
    }

    fn enqueue(&mut self, owner_id: &str, collection: &str, id: &str, op: WriteOp) {
        // A newer write to the same document supersedes the queued one.
        self.pending
            .retain(|w| !(w.owner_id == owner_id && w.collection == collection && w.id == id));
        self.pending.push_back(PendingWrite {
            owner_id: owner_id.to_string(),
            collection: collection.to_string(),
            id: id.to_string(),
            op,
            attempts: 0,
        });
    }

    /// Attempt every pending write once. Returns the number that succeeded.
    pub fn flush(&mut self, store: &dyn Store) -> usize {
        let mut written = 0;
        let mut retry = VecDeque::new();

        while let Some(mut write) = self.pending.pop_front() {
            let result = match &write.op {
                WriteOp::Save { data } => {
                    store.save(&write.owner_id, &write.collection, &write.id, data)
                }
                WriteOp::Remove => store.remove(&write.owner_id, &write.collection, &write.id),
            };
            match result {
                Ok(()) => written += 1,
                Err(e) => {
                    write.attempts += 1;
                    if write.attempts >= self.max_attempts {
                        tracing::warn!(
                            collection = %write.collection,
                            id = %write.id,
                            attempts = write.attempts,
                            "dropping write after repeated failures: {e}"
                        );
                    } else {
                        tracing::warn!(
                            collection = %write.collection,
                            id = %write.id,
                            "write failed, will retry: {e}"
                        );
                        retry.push_back(write);
                    }
                }
            }
        }

        self.pending = retry;
        written
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &PendingWrite> {
        self.pending.iter()
    }
}

impl Default for Outbox {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[test]
    fn flush_writes_in_order() {
        let store = MemoryStore::new();
        let mut outbox = Outbox::default();
        outbox.enqueue_save("me", "people", "a", json!({"n": 1}));
        outbox.enqueue_save("me", "people", "b", json!({"n": 2}));
        outbox.enqueue_remove("me", "people", "a");

        assert_eq!(outbox.len(), 2);
        assert_eq!(outbox.flush(&store), 2);
        assert!(outbox.is_empty());
        let docs = store.fetch_all("me", "people", None).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["id"], "b");
    }

    #[test]
    fn failed_writes_are_dropped_after_max_attempts() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut outbox = Outbox::new(2);
        outbox.enqueue_save("me", "people", "a", json!({}));

        assert_eq!(outbox.flush(&store), 0);
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox.pending().next().unwrap().attempts, 1);

        assert_eq!(outbox.flush(&store), 0);
        assert!(outbox.is_empty());
    }
}
