use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{GoalId, UserId};

/// Goal - something a user wants to achieve, with optional text describing
/// how they can help others in return.
///
/// Embeddings are computed once at creation time and are immutable
/// thereafter; they live in storage and are read back only as match
/// candidates, so the model itself does not carry them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Goal {
    pub id: GoalId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub help_text: Option<String>,
    /// Progress percentage, 0..=100
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// The text that gets embedded for a goal
    pub fn embedding_text(title: &str, description: &str) -> String {
        format!("{}\n\n{}", title, description)
    }
}

/// New goal row, embeddings already computed.
///
/// Goal creation embeds before it persists: if the embedding provider is
/// down there is no partial goal row to clean up afterwards.
#[derive(Debug, Clone)]
pub struct NewGoalRecord {
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub help_text: Option<String>,
    pub embedding: Vec<f32>,
    pub help_embedding: Option<Vec<f32>>,
}
