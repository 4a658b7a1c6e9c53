//! OpenAI embedding client (text-embedding-3-small, 1536 dimensions).
//!
//! Goal creation depends on this service hard: if embedding generation fails
//! after all retries, the goal is not persisted. Retries with linear backoff
//! smooth over transient API errors before that failure surfaces.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::kernel::BaseEmbeddingService;

/// Expected dimensionality of text-embedding-3-small vectors
pub const EMBEDDING_DIMENSIONS: usize = 1536;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 1000;

/// Embedding service using OpenAI's text-embedding-3-small
pub struct OpenAIEmbeddingService {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAIEmbeddingService {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: "text-embedding-3-small".to_string(),
        }
    }

    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post("https://api.openai.com/v1/embeddings")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&EmbeddingRequest {
                model: self.model.clone(),
                input: text.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            anyhow::bail!("OpenAI API error {}: {}", status, body);
        }

        let embedding_response: EmbeddingResponse = response.json().await?;

        let embedding = embedding_response
            .data
            .first()
            .ok_or_else(|| anyhow::anyhow!("No embedding returned"))?
            .embedding
            .clone();

        if embedding.len() != EMBEDDING_DIMENSIONS {
            anyhow::bail!(
                "Invalid embedding dimension: expected {}, got {}",
                EMBEDDING_DIMENSIONS,
                embedding.len()
            );
        }

        Ok(embedding)
    }
}

#[async_trait]
impl BaseEmbeddingService for OpenAIEmbeddingService {
    async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let mut retries = 0;

        loop {
            match self.request_embedding(text).await {
                Ok(embedding) => return Ok(embedding),
                Err(e) if retries < MAX_RETRIES => {
                    retries += 1;
                    tracing::warn!(
                        error = %e,
                        retry = retries,
                        max_retries = MAX_RETRIES,
                        "Failed to generate embedding, retrying..."
                    );
                    sleep(Duration::from_millis(RETRY_DELAY_MS * retries as u64)).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to generate embedding after all retries");
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires API key
    async fn test_generate_embedding() {
        let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
        let service = OpenAIEmbeddingService::new(api_key);

        let embedding = service
            .generate("I want to run a marathon next spring")
            .await
            .expect("Failed to generate embedding");

        assert_eq!(embedding.len(), EMBEDDING_DIMENSIONS);
    }
}
