//! Corpus index and embedding search
//!
//! Exact cosine scan over catalog embeddings, filtered by query constraints.

pub mod cache;
pub mod embeddings;
pub mod index;
pub mod snapshot;

pub use cache::{CacheStats, EmbeddingCache};
pub use embeddings::{Embedder, HashEmbedder, cosine_similarity};
pub use index::{AssessmentIndex, CorpusIndex, ScoredRecord, SearchResult, similarity_score};
pub use snapshot::{load_snapshot, save_snapshot};
