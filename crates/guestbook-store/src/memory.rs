//! In-memory store.
//!
//! Same semantics as the Redis backend for the commands the guestbook uses.
//! There is no replication, so reads always observe the latest write.

use std::collections::HashMap;

use async_trait::async_trait;
use guestbook_core::error::{GuestbookError, Result};
use guestbook_core::traits::GuestbookStore;
use tokio::sync::RwLock;

#[derive(Default)]
struct MemoryState {
    lists: HashMap<String, Vec<String>>,
    hashes: HashMap<String, HashMap<String, String>>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a hash field, as `HSET` would. Recipient counters are
    /// normally seeded outside the service; this is the local equivalent.
    pub async fn set_counter(&self, hash: &str, field: &str, value: &str) {
        let mut state = self.state.write().await;
        state
            .hashes
            .entry(hash.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
    }
}

#[async_trait]
impl GuestbookStore for MemoryStore {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn append(&self, list: &str, value: &str) -> Result<usize> {
        let mut state = self.state.write().await;
        let entries = state.lists.entry(list.to_string()).or_default();
        entries.push(value.to_string());
        Ok(entries.len())
    }

    async fn read_all(&self, list: &str) -> Result<Vec<String>> {
        let state = self.state.read().await;
        Ok(state.lists.get(list).cloned().unwrap_or_default())
    }

    async fn snapshot(&self, lists: &[&str]) -> Result<Vec<Vec<String>>> {
        let state = self.state.read().await;
        Ok(lists
            .iter()
            .map(|list| state.lists.get(*list).cloned().unwrap_or_default())
            .collect())
    }

    async fn get_counter(&self, hash: &str, field: &str) -> Result<Option<String>> {
        let state = self.state.read().await;
        Ok(state.hashes.get(hash).and_then(|h| h.get(field)).cloned())
    }

    async fn increment_counter(&self, hash: &str, field: &str) -> Result<String> {
        let mut state = self.state.write().await;
        let slot = state
            .hashes
            .entry(hash.to_string())
            .or_default()
            .entry(field.to_string())
            .or_insert_with(|| "0".to_string());
        let current: i64 = slot
            .parse()
            .map_err(|_| GuestbookError::Store("ERR hash value is not an integer".into()))?;
        let next = current.checked_add(1).ok_or_else(|| {
            GuestbookError::Store("ERR increment or decrement would overflow".into())
        })?;
        *slot = next.to_string();
        Ok(slot.clone())
    }

    async fn info(&self) -> Result<Vec<u8>> {
        let state = self.state.read().await;
        let info = format!(
            "# Server\r\nbackend:memory\r\n# Keyspace\r\nlists:{}\r\nhashes:{}\r\n",
            state.lists.len(),
            state.hashes.len()
        );
        Ok(info.into_bytes())
    }
}
