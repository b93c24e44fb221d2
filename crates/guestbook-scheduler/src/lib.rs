//! # Guestbook Scheduler
//!
//! Relays new guestbook entries to subscribed phone numbers.
//!
//! ## Architecture
//! ```text
//! spawn_scanner (tokio interval, watch shutdown)
//!   └── OutboxScanner::tick
//!         ├── snapshot [phoneNumbers, guestbook]
//!         ├── per recipient: HGET outbox → compare → HINCRBY outbox
//!         └── Notifier::send → TwilioDispatcher (form POST, basic auth)
//! ```
//!
//! Delivery is at-most-once: a recipient's counter advances before the
//! message goes out, and failed sends are logged, not retried.

pub mod dispatch;
pub mod engine;

pub use dispatch::{SMS_BODY_LIMIT, SMS_SUFFIX, TwilioDispatcher, build_sms_form, sms_body};
pub use engine::{OutboxScanner, TickReport, spawn_scanner};
