//! Pure similarity functions for the matching pass
//!
//! These functions contain NO side effects - they implement the scoring and
//! filtering logic used by connection formation. The corpus scan is a full
//! O(n) pass; fine at current scale, and there is no index to preserve.

use crate::common::UserId;

/// Default minimum cosine similarity for a match
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.4;

/// Matching configuration, passed in explicitly at construction time
#[derive(Debug, Clone, Copy)]
pub struct MatchingConfig {
    pub similarity_threshold: f32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// A candidate record carrying an embedding and its owning user
pub trait EmbeddedCandidate {
    fn owner_id(&self) -> UserId;
    fn embedding(&self) -> &[f32];
}

/// Cosine similarity of two vectors: dot(a,b) / (|a|*|b|).
///
/// Returns 0.0 (never NaN, never an error) when either vector is empty,
/// the lengths differ, or either norm is zero. Treating the degenerate
/// cases as "no similarity" keeps division-by-zero out of the match scan.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Score candidates against a query embedding and keep every one that meets
/// the configured threshold, paired with its similarity score.
///
/// Candidates owned by `query_owner` are excluded before scoring: a user's
/// own offers and goals are never proposed back to them. No top-k cutoff is
/// applied.
pub fn find_matches<C: EmbeddedCandidate>(
    query: &[f32],
    query_owner: UserId,
    candidates: Vec<C>,
    config: &MatchingConfig,
) -> Vec<(C, f32)> {
    candidates
        .into_iter()
        .filter(|c| c.owner_id() != query_owner)
        .filter_map(|c| {
            let score = cosine_similarity(query, c.embedding());
            if score >= config.similarity_threshold {
                Some((c, score))
            } else {
                None
            }
        })
        .collect()
}
