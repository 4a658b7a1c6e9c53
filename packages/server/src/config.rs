use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::domains::matching::MatchingConfig;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub expo_access_token: Option<String>,
    /// Minimum cosine similarity for a match (MATCH_SIMILARITY_THRESHOLD, default 0.4)
    pub similarity_threshold: f32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            openai_api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            expo_access_token: env::var("EXPO_ACCESS_TOKEN").ok(),
            similarity_threshold: match env::var("MATCH_SIMILARITY_THRESHOLD") {
                Ok(raw) => raw
                    .parse()
                    .context("MATCH_SIMILARITY_THRESHOLD must be a valid float")?,
                Err(_) => MatchingConfig::default().similarity_threshold,
            },
        })
    }

    /// Matching configuration derived from this config.
    ///
    /// The threshold is read from the environment exactly once, here; the
    /// matcher itself never touches global state.
    pub fn matching(&self) -> MatchingConfig {
        MatchingConfig {
            similarity_threshold: self.similarity_threshold,
        }
    }
}
