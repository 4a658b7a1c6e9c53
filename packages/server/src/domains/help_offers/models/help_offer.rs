use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::UserId;

/// HelpOffer - a user's standing offer of help, one per user.
///
/// The embedding is recomputed by the profile service whenever the text
/// changes; a missing embedding means none has been attempted yet (the
/// backfill bin fills those in).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HelpOffer {
    pub user_id: UserId,
    pub help_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
