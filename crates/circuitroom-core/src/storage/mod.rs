mod config;
pub mod database;
mod memory;
mod outbox;

pub use config::{ComposerConfig, Config, CueConfig, Phrases, StreakRules};
pub use database::Database;
pub use memory::MemoryStore;
pub use outbox::{Outbox, PendingWrite, WriteOp};

use std::path::PathBuf;

use crate::error::{ConfigError, StoreError};

/// Best-effort document persistence, one JSON document per `(owner, collection, id)`.
///
/// Implementations return the stored `id` merged into each fetched document
/// under the `"id"` key.
pub trait Store {
    /// All documents of a collection, ordered by `sort_key` ascending when given.
    fn fetch_all(
        &self,
        owner_id: &str,
        collection: &str,
        sort_key: Option<&str>,
    ) -> Result<Vec<serde_json::Value>, StoreError>;

    fn save(
        &self,
        owner_id: &str,
        collection: &str,
        id: &str,
        data: &serde_json::Value,
    ) -> Result<(), StoreError>;

    fn remove(&self, owner_id: &str, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// Returns the data directory, creating it if needed.
///
/// `CIRCUITROOM_DATA_DIR` wins when set; otherwise `~/.config/circuitroom[-dev]/`
/// based on `CIRCUITROOM_ENV`.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("CIRCUITROOM_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("CIRCUITROOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("circuitroom-dev")
            } else {
                base_dir.join("circuitroom")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Sort documents by a top-level field. Numbers compare numerically, everything
/// else by its string form; documents missing the key sort first.
pub(crate) fn sort_documents(docs: &mut [serde_json::Value], key: &str) {
    docs.sort_by(|a, b| {
        let (a, b) = (a.get(key), b.get(key));
        match (a.and_then(|v| v.as_f64()), b.and_then(|v| v.as_f64())) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => {
                let render = |v: Option<&serde_json::Value>| v.map(|v| v.to_string());
                render(a).cmp(&render(b))
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sort_documents_numeric_and_missing() {
        let mut docs = vec![json!({"date": 30}), json!({}), json!({"date": 4})];
        sort_documents(&mut docs, "date");
        assert_eq!(docs, vec![json!({}), json!({"date": 4}), json!({"date": 30})]);
    }
}
