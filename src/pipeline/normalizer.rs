//! Job-posting normalizer: raw scraped posting text → concise search query.
//!
//! Generation is best-effort. Any failure degrades to the raw posting text
//! (truncated to the same limit) and is logged, never returned.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::error::RecError;
use crate::providers::TextGenerator;

pub const DEFAULT_PROMPT_CHAR_LIMIT: usize = 3000;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:\*\*)?\s*(?:search\s+query|query)\s*(?:\*\*)?\s*:\s*(?:\*\*)?\s*")
        .expect("valid regex")
});

/// How the search query was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeOutcome {
    Generated,
    /// Generation failed; the query is the truncated raw text.
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub text: String,
    pub outcome: NormalizeOutcome,
}

impl NormalizedQuery {
    pub const fn is_fallback(&self) -> bool {
        matches!(self.outcome, NormalizeOutcome::Fallback { .. })
    }
}

pub struct JobPostingNormalizer {
    generator: Arc<dyn TextGenerator>,
    char_limit: usize,
}

impl JobPostingNormalizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            char_limit: DEFAULT_PROMPT_CHAR_LIMIT,
        }
    }

    #[must_use]
    pub fn with_char_limit(mut self, char_limit: usize) -> Self {
        self.char_limit = char_limit.max(1);
        self
    }

    /// Turn a posting into a search query. Never fails.
    pub fn normalize(&self, raw_posting: &str) -> NormalizedQuery {
        let excerpt = truncate_chars(raw_posting.trim(), self.char_limit);

        match self.try_generate(excerpt) {
            Ok(text) => {
                debug!(query = %text, "normalized job posting");
                NormalizedQuery {
                    text,
                    outcome: NormalizeOutcome::Generated,
                }
            }
            Err(err) => {
                warn!(error = %err, "query generation failed; searching with raw posting text");
                NormalizedQuery {
                    text: excerpt.to_string(),
                    outcome: NormalizeOutcome::Fallback {
                        reason: err.to_string(),
                    },
                }
            }
        }
    }

    fn try_generate(&self, excerpt: &str) -> Result<String, RecError> {
        let output = self
            .generator
            .generate(&build_prompt(excerpt))
            .map_err(|err| RecError::ExternalCallDegraded(err.to_string()))?;
        let cleaned = clean_output(&output);
        if cleaned.is_empty() {
            return Err(RecError::ExternalCallDegraded(
                "generator returned an empty query".to_string(),
            ));
        }
        Ok(cleaned)
    }
}

/// Instruction prompt wrapped around the posting excerpt.
pub fn build_prompt(excerpt: &str) -> String {
    format!(
        "Based on the following job description, create a concise search query to find \
         appropriate assessment tests that would help screen candidates for this position.\n\n\
         JOB DESCRIPTION:\n{excerpt}\n\n\
         Focus on:\n\
         1. Technical skills required\n\
         2. Soft skills mentioned\n\
         3. Any specific assessment requirements\n\
         4. Time constraints for assessments if mentioned\n\n\
         Return ONLY the search query, nothing else."
    )
}

/// Strip labels, wrapping quotes or code fences, and collapse whitespace.
pub fn clean_output(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(inner) = text.strip_prefix("```") {
        let inner = inner.strip_suffix("```").unwrap_or(inner);
        // Drop a language tag on the fence line.
        text = match inner.split_once('\n') {
            Some((first, rest)) if !first.trim().contains(' ') => rest,
            _ => inner,
        };
    }

    let text = LABEL_RE.replace(text.trim(), "");
    let mut text = text.trim();
    for (open, close) in [('"', '"'), ('\'', '\''), ('`', '`'), ('“', '”')] {
        if text.len() > 1 && text.starts_with(open) && text.ends_with(close) {
            text = text[open.len_utf8()..text.len() - close.len_utf8()].trim();
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Longest prefix of `text` with at most `limit` characters.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}
