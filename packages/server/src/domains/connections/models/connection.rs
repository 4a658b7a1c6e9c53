use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::common::{ChatRoomId, ConnectionId, GoalId, UserId};

/// Overall connection status.
///
/// Becomes `Accepted` only when both per-side decisions are accepted;
/// becomes `Rejected` as soon as either side rejects. Both are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ConnectionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ConnectionStatus::Pending)
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Pending => write!(f, "pending"),
            ConnectionStatus::Accepted => write!(f, "accepted"),
            ConnectionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ConnectionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(ConnectionStatus::Pending),
            "accepted" => Ok(ConnectionStatus::Accepted),
            "rejected" => Ok(ConnectionStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid connection status: {}", s)),
        }
    }
}

/// One side's decision on a connection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Pending => write!(f, "pending"),
            Decision::Accepted => write!(f, "accepted"),
            Decision::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Decision::Pending),
            "accepted" => Ok(Decision::Accepted),
            "rejected" => Ok(Decision::Rejected),
            _ => Err(anyhow::anyhow!("Invalid decision: {}", s)),
        }
    }
}

/// Which side of a connection a user is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Helper,
    Seeker,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Helper => Side::Seeker,
            Side::Seeker => Side::Helper,
        }
    }
}

/// Connection - a proposed helper/seeker pairing around one goal.
///
/// Created pending/pending/pending by the matching pass, mutated only by the
/// two involved users' decisions, and retained as history once terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub helper_id: UserId,
    pub seeker_id: UserId,
    pub goal_id: GoalId,
    /// The cosine similarity that triggered creation
    pub similarity: f32,
    pub status: ConnectionStatus,
    pub helper_decision: Decision,
    pub seeker_decision: Decision,
    /// Set once, lazily, when both sides have accepted
    pub chat_room_id: Option<ChatRoomId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Connection {
    /// The side `user_id` occupies, if they are party to this connection
    pub fn side_of(&self, user_id: UserId) -> Option<Side> {
        if user_id == self.helper_id {
            Some(Side::Helper)
        } else if user_id == self.seeker_id {
            Some(Side::Seeker)
        } else {
            None
        }
    }

    pub fn decision_for(&self, side: Side) -> Decision {
        match side {
            Side::Helper => self.helper_decision,
            Side::Seeker => self.seeker_decision,
        }
    }

    pub fn user_for(&self, side: Side) -> UserId {
        match side {
            Side::Helper => self.helper_id,
            Side::Seeker => self.seeker_id,
        }
    }
}

fn decode_enum<T: std::str::FromStr<Err = anyhow::Error>>(
    row: &PgRow,
    column: &'static str,
) -> Result<T, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: anyhow::Error| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: e.into(),
    })
}

// Status and decisions are TEXT columns; decode through FromStr so the model
// keeps typed enums.
impl<'r> sqlx::FromRow<'r, PgRow> for Connection {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            helper_id: row.try_get("helper_id")?,
            seeker_id: row.try_get("seeker_id")?,
            goal_id: row.try_get("goal_id")?,
            similarity: row.try_get("similarity")?,
            status: decode_enum(row, "status")?,
            helper_decision: decode_enum(row, "helper_decision")?,
            seeker_decision: decode_enum(row, "seeker_decision")?,
            chat_room_id: row.try_get("chat_room_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// A connection proposal from one directional match
#[derive(Debug, Clone)]
pub struct NewConnection {
    pub helper_id: UserId,
    pub seeker_id: UserId,
    pub goal_id: GoalId,
    pub similarity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrips_through_strings() {
        for status in [
            ConnectionStatus::Pending,
            ConnectionStatus::Accepted,
            ConnectionStatus::Rejected,
        ] {
            let parsed: ConnectionStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("cancelled".parse::<ConnectionStatus>().is_err());
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!ConnectionStatus::Pending.is_terminal());
        assert!(ConnectionStatus::Accepted.is_terminal());
        assert!(ConnectionStatus::Rejected.is_terminal());
    }
}
