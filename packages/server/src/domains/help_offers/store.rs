use anyhow::Result;
use async_trait::async_trait;
use pgvector::Vector;
use sqlx::PgPool;

use crate::common::UserId;
use crate::domains::help_offers::models::help_offer::HelpOffer;
use crate::domains::matching::EmbeddedCandidate;

/// A help offer's embedding plus ownership, as read back for the Direction A
/// scan ("seek help": the new goal against all stored help offers).
#[derive(Debug, Clone)]
pub struct OfferCandidate {
    pub user_id: UserId,
    pub embedding: Vec<f32>,
}

impl EmbeddedCandidate for OfferCandidate {
    fn owner_id(&self) -> UserId {
        self.user_id
    }

    fn embedding(&self) -> &[f32] {
        &self.embedding
    }
}

#[async_trait]
pub trait BaseHelpOfferStore: Send + Sync {
    /// All embedded help offers owned by anyone other than `owner_id`
    async fn offer_candidates_excluding(&self, owner_id: UserId) -> Result<Vec<OfferCandidate>>;

    /// Offers whose embedding has never been computed (backfill input)
    async fn find_missing_embeddings(&self) -> Result<Vec<HelpOffer>>;

    async fn update_embedding(&self, user_id: UserId, embedding: &[f32]) -> Result<()>;
}

/// Postgres-backed help offer store
pub struct PgHelpOfferStore {
    pool: PgPool,
}

impl PgHelpOfferStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseHelpOfferStore for PgHelpOfferStore {
    async fn offer_candidates_excluding(&self, owner_id: UserId) -> Result<Vec<OfferCandidate>> {
        let rows = sqlx::query_as::<_, (UserId, Vector)>(
            "SELECT user_id, embedding FROM help_offers
             WHERE user_id <> $1 AND embedding IS NOT NULL",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, embedding)| OfferCandidate {
                user_id,
                embedding: embedding.to_vec(),
            })
            .collect())
    }

    async fn find_missing_embeddings(&self) -> Result<Vec<HelpOffer>> {
        let offers = sqlx::query_as::<_, HelpOffer>(
            "SELECT user_id, help_text, created_at, updated_at FROM help_offers
             WHERE embedding IS NULL AND help_text <> ''",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(offers)
    }

    async fn update_embedding(&self, user_id: UserId, embedding: &[f32]) -> Result<()> {
        sqlx::query("UPDATE help_offers SET embedding = $2, updated_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .bind(Vector::from(embedding.to_vec()))
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
