use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use super::{sort_documents, Store};
use crate::error::StoreError;

type Key = (String, String, String);

/// In-process [`Store`]. Writes can be switched to fail to exercise the
/// best-effort paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RefCell<BTreeMap<Key, serde_json::Value>>,
    fail_writes: Cell<bool>,
    save_calls: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of `save` calls received, including rejected ones.
    pub fn save_calls(&self) -> usize {
        self.save_calls.get()
    }

    fn key(owner_id: &str, collection: &str, id: &str) -> Key {
        (owner_id.to_string(), collection.to_string(), id.to_string())
    }
}

impl Store for MemoryStore {
    fn fetch_all(
        &self,
        owner_id: &str,
        collection: &str,
        sort_key: Option<&str>,
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        let mut docs: Vec<serde_json::Value> = self
            .docs
            .borrow()
            .iter()
            .filter(|((owner, coll, _), _)| owner == owner_id && coll == collection)
            .map(|((_, _, id), data)| {
                let mut doc = data.clone();
                if let Some(obj) = doc.as_object_mut() {
                    obj.insert("id".into(), serde_json::Value::String(id.clone()));
                }
                doc
            })
            .collect();
        if let Some(key) = sort_key {
            sort_documents(&mut docs, key);
        }
        Ok(docs)
    }

    fn save(
        &self,
        owner_id: &str,
        collection: &str,
        id: &str,
        data: &serde_json::Value,
    ) -> Result<(), StoreError> {
        self.save_calls.set(self.save_calls.get() + 1);
        if self.fail_writes.get() {
            return Err(StoreError::Rejected("memory store is read-only".into()));
        }
        self.docs
            .borrow_mut()
            .insert(Self::key(owner_id, collection, id), data.clone());
        Ok(())
    }

    fn remove(&self, owner_id: &str, collection: &str, id: &str) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Rejected("memory store is read-only".into()));
        }
        self.docs
            .borrow_mut()
            .remove(&Self::key(owner_id, collection, id));
        Ok(())
    }
}
