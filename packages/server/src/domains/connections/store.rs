//! Connection persistence.
//!
//! `apply_decision` is the concurrency-sensitive piece: it must be a single
//! atomic read-modify-write so that when both users accept at nearly the
//! same time, exactly one caller observes the both-accepted transition and
//! provisions the chat room. The Postgres implementation does this with one
//! conditional UPDATE; the in-memory test store holds a mutex across the
//! whole step.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::{ChatRoomId, ConnectionId, UserId};
use crate::domains::connections::models::connection::{
    Connection, Decision, NewConnection, Side,
};

#[async_trait]
pub trait BaseConnectionStore: Send + Sync {
    /// Insert proposals as pending/pending/pending rows, suppressing
    /// duplicates on the (helper, seeker, goal) key. Returns only the rows
    /// actually inserted, so re-running formation creates (and notifies)
    /// nothing for already-known triples.
    async fn insert_pending(&self, proposals: Vec<NewConnection>) -> Result<Vec<Connection>>;

    async fn find_by_id(&self, id: ConnectionId) -> Result<Option<Connection>>;

    /// Connections where the user is helper or seeker, newest first
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Connection>>;

    /// Atomically record one side's decision.
    ///
    /// The update applies only if the connection is still pending overall
    /// and the acting side has not decided yet; otherwise `None` is returned
    /// and nothing changes. When an accept finds the other side already
    /// accepted, the same atomic step flips the overall status, so the
    /// returned row's status tells the caller whether it owns finalization.
    ///
    /// `decision` must not be `Decision::Pending`.
    async fn apply_decision(
        &self,
        id: ConnectionId,
        side: Side,
        decision: Decision,
    ) -> Result<Option<Connection>>;

    /// Store the provisioned chat room id (first writer wins)
    async fn attach_chat_room(&self, id: ConnectionId, room_id: ChatRoomId) -> Result<()>;
}

const CONNECTION_COLUMNS: &str = "id, helper_id, seeker_id, goal_id, similarity, status, \
     helper_decision, seeker_decision, chat_room_id, created_at, updated_at";

fn decision_column(side: Side) -> &'static str {
    match side {
        Side::Helper => "helper_decision",
        Side::Seeker => "seeker_decision",
    }
}

/// Postgres-backed connection store
pub struct PgConnectionStore {
    pool: PgPool,
}

impl PgConnectionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseConnectionStore for PgConnectionStore {
    async fn insert_pending(&self, proposals: Vec<NewConnection>) -> Result<Vec<Connection>> {
        let query = format!(
            "INSERT INTO connections
                 (id, helper_id, seeker_id, goal_id, similarity,
                  status, helper_decision, seeker_decision)
             VALUES ($1, $2, $3, $4, $5, 'pending', 'pending', 'pending')
             ON CONFLICT (helper_id, seeker_id, goal_id) DO NOTHING
             RETURNING {CONNECTION_COLUMNS}"
        );

        let mut inserted = Vec::with_capacity(proposals.len());
        for proposal in proposals {
            let row = sqlx::query_as::<_, Connection>(&query)
                .bind(ConnectionId::new())
                .bind(proposal.helper_id)
                .bind(proposal.seeker_id)
                .bind(proposal.goal_id)
                .bind(proposal.similarity)
                .fetch_optional(&self.pool)
                .await?;

            if let Some(connection) = row {
                inserted.push(connection);
            }
        }

        Ok(inserted)
    }

    async fn find_by_id(&self, id: ConnectionId) -> Result<Option<Connection>> {
        let query = format!("SELECT {CONNECTION_COLUMNS} FROM connections WHERE id = $1");
        let connection = sqlx::query_as::<_, Connection>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(connection)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Connection>> {
        let query = format!(
            "SELECT {CONNECTION_COLUMNS} FROM connections
             WHERE helper_id = $1 OR seeker_id = $1
             ORDER BY created_at DESC"
        );
        let connections = sqlx::query_as::<_, Connection>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(connections)
    }

    async fn apply_decision(
        &self,
        id: ConnectionId,
        side: Side,
        decision: Decision,
    ) -> Result<Option<Connection>> {
        let side_col = decision_column(side);
        let other_col = decision_column(side.opposite());

        // One conditional UPDATE; Postgres row locking serializes concurrent
        // decisions, so at most one accept sees the other side already
        // accepted and returns the finalized row.
        let query = match decision {
            Decision::Accepted => format!(
                "UPDATE connections
                 SET {side_col} = 'accepted',
                     status = CASE WHEN {other_col} = 'accepted'
                              THEN 'accepted' ELSE status END,
                     updated_at = NOW()
                 WHERE id = $1 AND status = 'pending' AND {side_col} = 'pending'
                 RETURNING {CONNECTION_COLUMNS}"
            ),
            Decision::Rejected => format!(
                "UPDATE connections
                 SET {side_col} = 'rejected',
                     status = 'rejected',
                     updated_at = NOW()
                 WHERE id = $1 AND status = 'pending' AND {side_col} = 'pending'
                 RETURNING {CONNECTION_COLUMNS}"
            ),
            Decision::Pending => {
                anyhow::bail!("cannot apply a pending decision")
            }
        };

        let updated = sqlx::query_as::<_, Connection>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn attach_chat_room(&self, id: ConnectionId, room_id: ChatRoomId) -> Result<()> {
        sqlx::query(
            "UPDATE connections SET chat_room_id = $2, updated_at = NOW()
             WHERE id = $1 AND chat_room_id IS NULL",
        )
        .bind(id)
        .bind(room_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
