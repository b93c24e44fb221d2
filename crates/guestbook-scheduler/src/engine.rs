//! Outbox scanner — the loop that relays new guestbook entries.
//! Uses tokio::interval; all state lives in the store, none in-process.

use std::sync::Arc;
use std::time::Duration;

use guestbook_core::error::{GuestbookError, Result};
use guestbook_core::keys;
use guestbook_core::traits::{GuestbookStore, Notifier};
use guestbook_core::types::Notification;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// What one tick did.
#[derive(Debug, Default, Clone)]
pub struct TickReport {
    pub recipients: usize,
    pub entries: usize,
    pub notified: Vec<Notification>,
    /// Recipients whose counter was missing, unreadable, or failed to dispatch.
    pub skipped: usize,
}

enum RecipientScan {
    UpToDate,
    Uninitialized,
    Notified(Notification),
}

/// Compares every recipient's outbox counter with the guestbook length and
/// sends at most one entry per recipient per tick.
pub struct OutboxScanner {
    store: Arc<dyn GuestbookStore>,
    notifier: Arc<dyn Notifier>,
}

impl OutboxScanner {
    pub fn new(store: Arc<dyn GuestbookStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Run one scan over all recipients. Never fails: problems are logged
    /// and the affected recipient is skipped until the next tick.
    pub async fn tick(&self) -> TickReport {
        let mut report = TickReport::default();

        let snapshot = match self.store.snapshot(&[keys::RECIPIENTS, keys::ENTRIES]).await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("⚠️ Outbox scan: failed to read lists: {e}");
                return report;
            }
        };
        let mut lists = snapshot.into_iter();
        let recipients = lists.next().unwrap_or_default();
        let entries = lists.next().unwrap_or_default();
        report.recipients = recipients.len();
        report.entries = entries.len();

        for recipient in &recipients {
            match self.scan_recipient(recipient, &entries).await {
                Ok(RecipientScan::UpToDate) => {}
                Ok(RecipientScan::Uninitialized) => {
                    tracing::debug!("Outbox has no counter for {recipient}, skipping");
                    report.skipped += 1;
                }
                Ok(RecipientScan::Notified(notification)) => report.notified.push(notification),
                Err(e) => {
                    tracing::warn!("⚠️ Outbox scan: skipping {recipient}: {e}");
                    report.skipped += 1;
                }
            }
        }

        report
    }

    async fn scan_recipient(&self, recipient: &str, entries: &[String]) -> Result<RecipientScan> {
        let Some(raw) = self.store.get_counter(keys::OUTBOX, recipient).await? else {
            return Ok(RecipientScan::Uninitialized);
        };
        let last = parse_counter(recipient, &raw)?;

        // Counter past the end (entries trimmed, or replica behind): nothing to send.
        if last >= entries.len() {
            return Ok(RecipientScan::UpToDate);
        }

        let raw = self.store.increment_counter(keys::OUTBOX, recipient).await?;
        let advanced = parse_counter(recipient, &raw)?;
        if advanced != last + 1 {
            return Err(GuestbookError::Store(format!(
                "outbox counter moved concurrently ({last} → {advanced}), not sending"
            )));
        }

        let entry = &entries[last];
        let outcome = self.notifier.send(recipient, entry).await?;
        tracing::debug!(
            "Outbox {recipient}: entry #{last} via {} → {outcome:?}",
            self.notifier.name()
        );
        Ok(RecipientScan::Notified(Notification::new(
            recipient, last, entry, outcome,
        )))
    }
}

fn parse_counter(recipient: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse()
        .map_err(|_| GuestbookError::InvalidCounter {
            recipient: recipient.to_string(),
            value: raw.to_string(),
        })
}

/// Spawn the scanner loop as a background tokio task.
/// The loop exits when `shutdown` flips to `true` or its sender is dropped,
/// abandoning an in-flight tick.
pub fn spawn_scanner(
    scanner: Arc<OutboxScanner>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("⏰ Outbox scanner started (every {}ms)", every.as_millis());

        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait_for(|stop| *stop) => break,
                _ = interval.tick() => {}
            }

            tokio::select! {
                biased;
                _ = shutdown.wait_for(|stop| *stop) => break,
                report = scanner.tick() => {
                    for n in &report.notified {
                        if n.outcome.was_sent() {
                            tracing::info!(
                                "📣 Relayed entry #{} to {} ({:?})",
                                n.entry_index,
                                n.recipient,
                                n.outcome
                            );
                        } else {
                            tracing::debug!(
                                "Entry #{} for {} not sent, SMS relay disabled",
                                n.entry_index,
                                n.recipient
                            );
                        }
                    }
                }
            }
        }

        tracing::info!("🛑 Outbox scanner stopped");
    })
}
