//! # Guestbook Store
//!
//! Implementations of [`GuestbookStore`](guestbook_core::GuestbookStore):
//!
//! ```text
//! RedisStore
//!   ├── primary (read-write)  → RPUSH, HGET, HINCRBY, INFO
//!   └── replica (read-only)   → LRANGE, MULTI/EXEC snapshots
//! MemoryStore
//!   └── RwLock<lists + hashes>  → tests and --memory-store runs
//! ```

pub mod memory;
pub mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;
