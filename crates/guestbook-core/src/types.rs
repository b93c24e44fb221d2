//! Types passed between the scanner, the dispatcher, and the HTTP surface.

use chrono::{DateTime, Utc};

/// What happened to a single outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The provider was called; `status` is its HTTP status code.
    Sent { status: u16 },
    /// No credentials configured, nothing was sent.
    Skipped,
}

impl DispatchOutcome {
    pub fn was_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// A notification relayed by the outbox scanner.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Recipient phone number.
    pub recipient: String,
    /// Zero-based position of the entry in the guestbook list.
    pub entry_index: usize,
    /// The entry text as read from the store (before truncation).
    pub body: String,
    pub outcome: DispatchOutcome,
    pub sent_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(recipient: &str, entry_index: usize, body: &str, outcome: DispatchOutcome) -> Self {
        Self {
            recipient: recipient.to_string(),
            entry_index,
            body: body.to_string(),
            outcome,
            sent_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_keeps_entry_text() {
        let n = Notification::new("+15550001", 2, "hey", DispatchOutcome::Skipped);
        assert_eq!(n.recipient, "+15550001");
        assert_eq!(n.entry_index, 2);
        assert_eq!(n.body, "hey");
        assert!(!n.outcome.was_sent());
        assert!(n.sent_at <= Utc::now());
    }

    #[test]
    fn test_was_sent() {
        assert!(DispatchOutcome::Sent { status: 500 }.was_sent());
        assert!(!DispatchOutcome::Skipped.was_sent());
    }
}
