use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use super::{NotificationSink, NotifyError};

pub const DEFAULT_FCM_ENDPOINT: &str = "https://fcm.googleapis.com/fcm/send";

/// Firebase Cloud Messaging over the legacy HTTP API (server key auth).
pub struct FcmSink {
    client: Client,
    endpoint: String,
    server_key: String,
}

impl FcmSink {
    pub fn new(endpoint: impl Into<String>, server_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            server_key: server_key.into(),
        }
    }
}

#[async_trait]
impl NotificationSink for FcmSink {
    async fn send(&self, target_token: &str, title: &str, body: &str) -> Result<(), NotifyError> {
        let payload = json!({
            "to": target_token,
            "notification": {
                "title": title,
                "body": body,
            }
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "FCM responded");
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}
