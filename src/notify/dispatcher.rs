//! Per-contact notification fan-out.
//!
//! # Design Decisions
//! - Sequential, in stored contact order; the caller waits for every attempt
//! - One contact failing never stops the rest
//! - No retries and no aggregate result back to the webhook caller

use std::sync::Arc;

use crate::accounts::Account;
use crate::notify::transport::{MessagingTransport, TransportError};
use crate::observability::metrics;

/// Text sent to each contact when a fax arrives.
pub fn fax_message(media_url: &str) -> String {
    format!("You have a fax!\n\n{}", media_url)
}

/// Result of one send attempt.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub contact: String,
    pub result: Result<(), TransportError>,
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    transport: Arc<dyn MessagingTransport>,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn MessagingTransport>) -> Self {
        Self { transport }
    }

    /// Send a single notification.
    pub async fn send(&self, from: &str, to: &str, message: &str) -> Result<(), TransportError> {
        self.transport.send(from, to, message).await
    }

    /// Notify every contact of `account` that a fax is available at `media_url`.
    ///
    /// Exactly one attempt per contact, duplicates included. The account's own
    /// fax number is the sender.
    pub async fn notify_all(&self, account: &Account, media_url: &str) -> Vec<DispatchOutcome> {
        let message = fax_message(media_url);
        let mut outcomes = Vec::with_capacity(account.contacts.len());

        for contact in &account.contacts {
            let result = self.send(&account.fax_number, contact, &message).await;
            match &result {
                Ok(()) => {
                    metrics::record_notification("sent");
                    tracing::info!(fax_num = %account.fax_number, contact = %contact, "SMS sent");
                }
                Err(e) => {
                    metrics::record_notification("failed");
                    tracing::warn!(
                        fax_num = %account.fax_number,
                        contact = %contact,
                        error = %e,
                        "failed SMS"
                    );
                }
            }
            outcomes.push(DispatchOutcome {
                contact: contact.clone(),
                result,
            });
        }

        outcomes
    }
}
