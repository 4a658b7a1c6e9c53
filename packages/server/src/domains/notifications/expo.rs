use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::common::UserId;
use crate::domains::notifications::NotificationKind;
use crate::domains::users::store::BaseUserStore;
use crate::kernel::BaseNotificationService;

const EXPO_PUSH_URL: &str = "https://exp.host/--/api/v2/push/send";

/// Push notification delivery via the Expo push API.
///
/// Resolves the recipient's push token through the user store; users without
/// a registered device are skipped silently.
pub struct ExpoNotificationService {
    http: Client,
    access_token: Option<String>,
    users: Arc<dyn BaseUserStore>,
}

impl ExpoNotificationService {
    pub fn new(access_token: Option<String>, users: Arc<dyn BaseUserStore>) -> Self {
        Self {
            http: Client::new(),
            access_token,
            users,
        }
    }
}

#[async_trait]
impl BaseNotificationService for ExpoNotificationService {
    async fn notify(
        &self,
        user_id: UserId,
        kind: NotificationKind,
        payload: serde_json::Value,
    ) -> Result<()> {
        let profile = self
            .users
            .find_profile(user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Unknown user: {}", user_id))?;

        let Some(push_token) = profile.expo_push_token else {
            debug!(user_id = %user_id, "No push token registered, skipping notification");
            return Ok(());
        };

        let message = json!({
            "to": push_token,
            "title": kind.title(),
            "body": kind.body(),
            "data": {
                "type": kind.to_string(),
                "payload": payload,
            },
        });

        let mut request = self.http.post(EXPO_PUSH_URL).json(&message);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Expo push API error {}: {}", status, body);
        }

        debug!(user_id = %user_id, kind = %kind, "Push notification sent");

        Ok(())
    }
}
