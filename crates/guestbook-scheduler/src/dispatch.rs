//! SMS dispatch — sends a guestbook entry to a phone number via the Twilio
//! Messages API. Fire-and-forget: the response status is logged, never retried.

use std::time::Duration;

use async_trait::async_trait;
use guestbook_core::config::TwilioConfig;
use guestbook_core::error::{GuestbookError, Result};
use guestbook_core::traits::Notifier;
use guestbook_core::types::DispatchOutcome;

/// Characters of the entry kept in the message body.
pub const SMS_BODY_LIMIT: usize = 110;

/// Appended to every message body.
pub const SMS_SUFFIX: &str = " To stop reply STOP";

/// Message body: the first [`SMS_BODY_LIMIT`] characters plus the opt-out suffix.
pub fn sms_body(message: &str) -> String {
    let truncated: String = message.chars().take(SMS_BODY_LIMIT).collect();
    format!("{truncated}{SMS_SUFFIX}")
}

/// Form parameters for one outbound message, in wire order.
pub fn build_sms_form(to: &str, from: &str, message: &str) -> Vec<(&'static str, String)> {
    vec![
        ("To", to.to_string()),
        ("From", from.to_string()),
        ("Body", sms_body(message)),
    ]
}

pub struct TwilioDispatcher {
    config: TwilioConfig,
    client: reqwest::Client,
}

impl TwilioDispatcher {
    pub fn new(config: TwilioConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: TwilioConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.credentials().is_some()
    }

    fn messages_url(&self, account_sid: &str) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            account_sid
        )
    }
}

#[async_trait]
impl Notifier for TwilioDispatcher {
    fn name(&self) -> &str {
        "twilio"
    }

    async fn send(&self, recipient: &str, message: &str) -> Result<DispatchOutcome> {
        let Some((account_sid, auth_token)) = self.config.credentials() else {
            tracing::info!(
                "📵 Twilio credentials not set, not sending number={recipient} msg={message}"
            );
            return Ok(DispatchOutcome::Skipped);
        };

        let form = build_sms_form(recipient, &self.config.from_number, message);
        let resp = self
            .client
            .post(self.messages_url(account_sid))
            .basic_auth(account_sid, Some(auth_token))
            .header("Accept", "application/json")
            .form(&form)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await
            .map_err(|e| GuestbookError::Notify(format!("Twilio send failed: {e}")))?;

        let status = resp.status();
        tracing::info!("📨 Twilio response for {recipient}: {status}");
        Ok(DispatchOutcome::Sent {
            status: status.as_u16(),
        })
    }
}
