//! Goal persistence behind a trait so tests can run against the in-memory
//! store from kernel::test_dependencies.

use anyhow::Result;
use async_trait::async_trait;
use pgvector::Vector;
use sqlx::PgPool;
use std::collections::HashMap;

use crate::common::{GoalId, UserId};
use crate::domains::goals::models::goal::{Goal, NewGoalRecord};
use crate::domains::matching::EmbeddedCandidate;

/// A goal's embedding plus ownership, as read back for the Direction B scan
/// ("offer help": the new goal owner's help text against other users' goals).
#[derive(Debug, Clone)]
pub struct GoalCandidate {
    pub goal_id: GoalId,
    pub owner_id: UserId,
    pub embedding: Vec<f32>,
}

impl EmbeddedCandidate for GoalCandidate {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }

    fn embedding(&self) -> &[f32] {
        &self.embedding
    }
}

#[async_trait]
pub trait BaseGoalStore: Send + Sync {
    /// Insert a new goal with its precomputed embeddings
    async fn insert(&self, record: NewGoalRecord) -> Result<Goal>;

    async fn find_by_id(&self, id: GoalId) -> Result<Option<Goal>>;

    async fn list_for_user(&self, owner_id: UserId) -> Result<Vec<Goal>>;

    /// Update progress, returning the updated goal (None if it no longer exists)
    async fn update_progress(&self, id: GoalId, progress: i32) -> Result<Option<Goal>>;

    async fn delete(&self, id: GoalId) -> Result<()>;

    /// All embedded goals owned by anyone other than `owner_id`
    async fn goal_candidates_excluding(&self, owner_id: UserId) -> Result<Vec<GoalCandidate>>;

    /// Titles for the given goal ids; ids of deleted goals are simply absent
    async fn titles_by_ids(&self, ids: &[GoalId]) -> Result<HashMap<GoalId, String>>;
}

const GOAL_COLUMNS: &str =
    "id, owner_id, title, description, help_text, progress, created_at, updated_at";

/// Postgres-backed goal store (embeddings in pgvector columns)
pub struct PgGoalStore {
    pool: PgPool,
}

impl PgGoalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseGoalStore for PgGoalStore {
    async fn insert(&self, record: NewGoalRecord) -> Result<Goal> {
        let query = format!(
            "INSERT INTO goals (id, owner_id, title, description, help_text, progress, embedding, help_embedding)
             VALUES ($1, $2, $3, $4, $5, 0, $6, $7)
             RETURNING {GOAL_COLUMNS}"
        );

        let goal = sqlx::query_as::<_, Goal>(&query)
            .bind(GoalId::new())
            .bind(record.owner_id)
            .bind(&record.title)
            .bind(&record.description)
            .bind(&record.help_text)
            .bind(Vector::from(record.embedding))
            .bind(record.help_embedding.map(Vector::from))
            .fetch_one(&self.pool)
            .await?;

        Ok(goal)
    }

    async fn find_by_id(&self, id: GoalId) -> Result<Option<Goal>> {
        let query = format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = $1");
        let goal = sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(goal)
    }

    async fn list_for_user(&self, owner_id: UserId) -> Result<Vec<Goal>> {
        let query = format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        let goals = sqlx::query_as::<_, Goal>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(goals)
    }

    async fn update_progress(&self, id: GoalId, progress: i32) -> Result<Option<Goal>> {
        let query = format!(
            "UPDATE goals SET progress = $2, updated_at = NOW() WHERE id = $1
             RETURNING {GOAL_COLUMNS}"
        );
        let goal = sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .bind(progress)
            .fetch_optional(&self.pool)
            .await?;

        Ok(goal)
    }

    async fn delete(&self, id: GoalId) -> Result<()> {
        sqlx::query("DELETE FROM goals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn goal_candidates_excluding(&self, owner_id: UserId) -> Result<Vec<GoalCandidate>> {
        let rows = sqlx::query_as::<_, (GoalId, UserId, Vector)>(
            "SELECT id, owner_id, embedding FROM goals
             WHERE owner_id <> $1 AND embedding IS NOT NULL",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(goal_id, owner_id, embedding)| GoalCandidate {
                goal_id,
                owner_id,
                embedding: embedding.to_vec(),
            })
            .collect())
    }

    async fn titles_by_ids(&self, ids: &[GoalId]) -> Result<HashMap<GoalId, String>> {
        let rows = sqlx::query_as::<_, (GoalId, String)>(
            "SELECT id, title FROM goals WHERE id = ANY($1)",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
