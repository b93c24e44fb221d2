//! # Guestbook Core
//!
//! Shared building blocks for the guestbook workspace:
//! - [`error::GuestbookError`] — the one error type every crate returns
//! - [`config::GuestbookConfig`] — defaults, TOML file, environment overrides
//! - [`traits`] — the `GuestbookStore` and `Notifier` seams
//! - [`keys`] — names of the lists and hashes kept in the store

pub mod config;
pub mod error;
pub mod keys;
pub mod traits;
pub mod types;

pub use config::GuestbookConfig;
pub use error::{GuestbookError, Result};
pub use traits::{GuestbookStore, Notifier};
pub use types::{DispatchOutcome, Notification};
