//! Request pipeline: job-posting normalization, retrieval orchestration and
//! the response schema.

pub mod normalizer;
pub mod orchestrator;
pub mod response;

pub use normalizer::{JobPostingNormalizer, NormalizeOutcome, NormalizedQuery};
pub use orchestrator::{DEFAULT_MAX_RESULTS, PipelineOptions, Recommender, find_url};
pub use response::{AssessmentResponse, SearchResponse};
