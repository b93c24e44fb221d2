//! Seams between the guestbook components.
//!
//! The HTTP surface and the outbox scanner only ever see these traits, so the
//! Redis backend can be swapped for the in-memory one in tests and local runs.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::DispatchOutcome;

/// Lists and counters kept in the shared key-value store.
///
/// Writes go to the primary, list reads go to the replica. Implementations
/// must be cheap to share across tasks.
#[async_trait]
pub trait GuestbookStore: Send + Sync {
    /// Backend name, for logs and health output.
    fn backend(&self) -> &str;

    /// Append `value` to the end of `list`. Returns the new list length.
    async fn append(&self, list: &str, value: &str) -> Result<usize>;

    /// Every element of `list`, in append order. A missing list is empty.
    async fn read_all(&self, list: &str) -> Result<Vec<String>>;

    /// Read several lists as one consistent snapshot.
    async fn snapshot(&self, lists: &[&str]) -> Result<Vec<Vec<String>>>;

    /// Counter `field` of hash `hash`, as stored. `None` if it was never set.
    async fn get_counter(&self, hash: &str, field: &str) -> Result<Option<String>>;

    /// Atomically add one to `field`, creating it at 1. Returns the new value.
    async fn increment_counter(&self, hash: &str, field: &str) -> Result<String>;

    /// The store's own diagnostic report, unparsed.
    async fn info(&self) -> Result<Vec<u8>>;
}

/// Outbound text-message channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    /// Send `message` to `recipient`. A provider-side failure status is still
    /// `Ok`; only transport failures are errors.
    async fn send(&self, recipient: &str, message: &str) -> Result<DispatchOutcome>;
}
