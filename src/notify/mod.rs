//! Push notifications to students.
//!
//! Delivery is best-effort: callers log a failed send and carry on.

mod fcm;

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

pub use fcm::{DEFAULT_FCM_ENDPOINT, FcmSink};

/// External service failure while delivering a notification.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("notification service rejected the message with status {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    async fn send(&self, target_token: &str, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Used when no push credentials are configured.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn send(&self, target_token: &str, title: &str, body: &str) -> Result<(), NotifyError> {
        info!(target_token, title, body, "Notification (log only)");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub target_token: String,
    pub title: String,
    pub body: String,
}

/// Keeps every notification in memory; can be told to fail instead.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<SentNotification>>,
    fail_with: Mutex<Option<u16>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every later send fails as if the service answered `status`.
    pub fn fail_with(&self, status: u16) {
        if let Ok(mut guard) = self.fail_with.lock() {
            *guard = Some(status);
        }
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, target_token: &str, title: &str, body: &str) -> Result<(), NotifyError> {
        if let Some(status) = self.fail_with.lock().ok().and_then(|guard| *guard) {
            return Err(NotifyError::Rejected(status));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentNotification {
                target_token: target_token.to_string(),
                title: title.to_string(),
                body: body.to_string(),
            });
        }
        Ok(())
    }
}
