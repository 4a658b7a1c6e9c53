// Backfill missing help-offer embeddings.
//
// The profile service normally embeds an offer when its text changes; this
// fills in offers that predate embedding support or whose generation failed.

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::time::sleep;

use dreamnest_core::config::Config;
use dreamnest_core::domains::help_offers::store::{BaseHelpOfferStore, PgHelpOfferStore};
use dreamnest_core::kernel::{BaseEmbeddingService, OpenAIEmbeddingService};
use sqlx::PgPool;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Connected to database");

    let offers = PgHelpOfferStore::new(pool);
    let embedding_service = OpenAIEmbeddingService::new(config.openai_api_key.clone());

    let missing = offers
        .find_missing_embeddings()
        .await
        .context("Failed to find offers without embeddings")?;

    println!("Found {} help offers without embeddings", missing.len());

    let total = missing.len();
    let mut updated = 0;
    let mut failed = 0;

    for (idx, offer) in missing.iter().enumerate() {
        match embedding_service.generate(&offer.help_text).await {
            Ok(embedding) => {
                if let Err(e) = offers.update_embedding(offer.user_id, &embedding).await {
                    failed += 1;
                    eprintln!(
                        "Failed to store embedding for offer {}: {}",
                        offer.user_id, e
                    );
                } else {
                    updated += 1;
                    println!(
                        "  [{}/{}] Updated embedding for offer {}",
                        idx + 1,
                        total,
                        offer.user_id
                    );
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!(
                    "Failed to generate embedding for offer {}: {}",
                    offer.user_id, e
                );
            }
        }

        // Pace API calls to stay under the provider's rate limits
        if idx + 1 < total {
            sleep(Duration::from_millis(100)).await;
        }
    }

    println!("\nDone: {} updated, {} failed", updated, failed);

    Ok(())
}
