// Matching domain - cosine similarity scan and connection formation

pub mod formation;
pub mod similarity;

pub use formation::form_connections;
pub use similarity::{cosine_similarity, find_matches, EmbeddedCandidate, MatchingConfig};
