//! Durable blob storage for the state containers.
//!
//! Each container persists one named JSON blob wrapped in a small envelope
//! (`{"state": ..., "version": N}`). The adapter is injected into the
//! containers; the sidecar runs against [`SqliteStorage`] and unit tests
//! against an in-memory adapter.

use anyhow::Context;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

use crate::db;

pub const STORAGE_VERSION: i64 = 0;

pub trait StateStorage {
    fn load(&self, name: &str) -> anyhow::Result<Option<serde_json::Value>>;
    fn save(&self, name: &str, value: &serde_json::Value) -> anyhow::Result<()>;
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn new(conn: Connection) -> anyhow::Result<Self> {
        db::init_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl StateStorage for SqliteStorage {
    fn load(&self, name: &str) -> anyhow::Result<Option<serde_json::Value>> {
        db::kv_get_json(&self.conn, name).with_context(|| format!("failed to load blob {name}"))
    }

    fn save(&self, name: &str, value: &serde_json::Value) -> anyhow::Result<()> {
        db::kv_set_json(&self.conn, name, value).with_context(|| format!("failed to save blob {name}"))
    }
}

/// Process-local adapter; nothing survives a restart.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    blobs: RefCell<HashMap<String, serde_json::Value>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl StateStorage for MemoryStorage {
    fn load(&self, name: &str) -> anyhow::Result<Option<serde_json::Value>> {
        Ok(self.blobs.borrow().get(name).cloned())
    }

    fn save(&self, name: &str, value: &serde_json::Value) -> anyhow::Result<()> {
        self.blobs
            .borrow_mut()
            .insert(name.to_string(), value.clone());
        Ok(())
    }
}

/// Read and unwrap a persisted snapshot.
///
/// Returns `Ok(None)` when the blob is absent. A blob with a foreign version
/// or a state that does not decode is an error; callers decide whether to
/// fall back to defaults.
pub fn load_state<T: DeserializeOwned>(
    storage: &dyn StateStorage,
    name: &str,
) -> anyhow::Result<Option<T>> {
    let Some(blob) = storage.load(name)? else {
        return Ok(None);
    };
    let version = blob.get("version").and_then(|v| v.as_i64()).unwrap_or(0);
    if version != STORAGE_VERSION {
        anyhow::bail!("unsupported {name} version: {version}");
    }
    let state = blob
        .get("state")
        .cloned()
        .with_context(|| format!("{name} has no state"))?;
    let decoded = serde_json::from_value(state).with_context(|| format!("{name} state is invalid"))?;
    Ok(Some(decoded))
}

pub fn save_state<T: Serialize>(
    storage: &dyn StateStorage,
    name: &str,
    state: &T,
) -> anyhow::Result<()> {
    let state =
        serde_json::to_value(state).with_context(|| format!("failed to serialize {name}"))?;
    let blob = json!({
        "state": state,
        "version": STORAGE_VERSION,
    });
    storage.save(name, &blob)
}
