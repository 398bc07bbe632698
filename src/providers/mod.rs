//! External capabilities used by the pipeline.
//!
//! Each capability is a trait so the pipeline can run against mocks; the
//! concrete adapters talk to the Gemini REST API and to job-posting pages.

pub mod fetch;
pub mod gemini;

use crate::error::{RecError, Result};

pub use fetch::{HttpPageFetcher, extract_posting_text};
pub use gemini::{GeminiClient, GeminiSettings};

/// Generative text: prompt in, completion out.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Page retrieval: URL in, visible job-posting text out.
pub trait PageFetcher: Send + Sync {
    fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Generator used when generation is switched off; every call fails, so the
/// normalizer always falls back to the raw posting text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

impl TextGenerator for DisabledGenerator {
    fn generate(&self, _prompt: &str) -> Result<String> {
        Err(RecError::Provider("text generation is disabled".to_string()))
    }
}
