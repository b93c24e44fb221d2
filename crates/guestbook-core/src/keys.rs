//! Store key names. One flat namespace, no prefixing.

/// Guestbook entries, appended by the HTTP surface.
pub const ENTRIES: &str = "guestbook";

/// Recipient phone numbers, populated outside this service.
pub const RECIPIENTS: &str = "phoneNumbers";

/// Hash of recipient → last-notified entry count.
pub const OUTBOX: &str = "outbox";
