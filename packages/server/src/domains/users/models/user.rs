use serde::{Deserialize, Serialize};

use crate::common::UserId;

/// Mini-profile attached to connection listings and used for push delivery
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: Option<String>,
    /// Expo push token; absent for users who never registered a device
    pub expo_push_token: Option<String>,
}
