// Help offers domain - each user's free-text description of how they can
// help others. Writes happen in the profile service; this side only reads
// the corpus for matching and backfills missing embeddings.

pub mod models;
pub mod store;

pub use models::help_offer::HelpOffer;
