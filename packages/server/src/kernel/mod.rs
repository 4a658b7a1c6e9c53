// Kernel - infrastructure services and dependency wiring
//
// Domain logic lives in domains/; everything here is either a trait boundary
// to an external collaborator or a production client for one.

pub mod deps;
pub mod embeddings;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use embeddings::OpenAIEmbeddingService;
pub use traits::*;
