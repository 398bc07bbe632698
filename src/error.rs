//! Error taxonomy for the recommendation pipeline.
//!
//! Mandatory pipeline steps (URL fetch, query embedding) surface distinct
//! variants so callers can tell "bad input" from "try again". Failures in
//! optional steps (normalization) are recovered locally and only show up as
//! `ExternalCallDegraded` inside the normalizer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecError {
    /// Unusable or unreachable URL, or an invalid request shape.
    #[error("invalid input: {0}")]
    InputError(String),

    /// Inconsistent embedding dimensions, empty corpus or duplicate ids.
    #[error("corpus integrity violation: {0}")]
    CorpusIntegrity(String),

    /// An optional external call failed and was replaced by a fallback.
    #[error("external call degraded: {0}")]
    ExternalCallDegraded(String),

    /// The query embedding could not be computed.
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RecError {
    /// Stable machine-readable code used in robot output.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InputError(_) => "input_error",
            Self::CorpusIntegrity(_) => "corpus_integrity",
            Self::ExternalCallDegraded(_) => "external_call_degraded",
            Self::EmbeddingUnavailable(_) => "embedding_unavailable",
            Self::Catalog(_) => "catalog_error",
            Self::Config(_) => "config_error",
            Self::MissingConfig(_) => "missing_config",
            Self::Provider(_) => "provider_error",
            Self::Io(_) => "io_error",
            Self::Serialization(_) => "serialization_error",
        }
    }

    /// Whether the caller may retry the same request unchanged.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::EmbeddingUnavailable(_) | Self::Provider(_))
    }
}

pub type Result<T> = std::result::Result<T, RecError>;
