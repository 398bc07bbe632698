//! Retrieval orchestrator: raw request → ranked, constraint-satisfying
//! recommendations.
//!
//! Stages run in order: resolve the URL, normalize the posting, extract
//! constraints, embed the query, search, assemble. Only URL resolution and
//! query embedding can fail a request; normalization degrades in place.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info};

use super::normalizer::{DEFAULT_PROMPT_CHAR_LIMIT, JobPostingNormalizer};
use super::response::{AssessmentResponse, DEFAULT_DESCRIPTION_MAX_CHARS, SearchResponse};
use crate::error::{RecError, Result};
use crate::providers::{PageFetcher, TextGenerator};
use crate::query::ConstraintExtractor;
use crate::search::{AssessmentIndex, CacheStats, Embedder, EmbeddingCache};

pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const DEFAULT_MAX_RESULTS_LIMIT: usize = 10;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'`]+"#).expect("valid regex"));

static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*minutes?\b").expect("valid regex"));

/// Request-shaping limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Largest accepted `max_results`.
    pub max_results_limit: usize,
    pub description_max_chars: usize,
    /// Characters of posting text handed to the generator.
    pub prompt_char_limit: usize,
    pub embedding_cache_size: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_results_limit: DEFAULT_MAX_RESULTS_LIMIT,
            description_max_chars: DEFAULT_DESCRIPTION_MAX_CHARS,
            prompt_char_limit: DEFAULT_PROMPT_CHAR_LIMIT,
            embedding_cache_size: crate::search::cache::DEFAULT_EMBEDDING_CACHE_SIZE,
        }
    }
}

/// The request pipeline. Shareable across threads; every request is
/// independent.
pub struct Recommender {
    index: Arc<dyn AssessmentIndex>,
    embedder: Arc<dyn Embedder>,
    embedder_id: String,
    fetcher: Arc<dyn PageFetcher>,
    normalizer: JobPostingNormalizer,
    extractor: ConstraintExtractor,
    cache: EmbeddingCache,
    options: PipelineOptions,
}

impl Recommender {
    /// Wire the pipeline. The query embedder must be the one the index was
    /// built with.
    pub fn new(
        index: Arc<dyn AssessmentIndex>,
        embedder: Arc<dyn Embedder>,
        fetcher: Arc<dyn PageFetcher>,
        generator: Arc<dyn TextGenerator>,
        options: PipelineOptions,
    ) -> Result<Self> {
        let embedder_id = embedder.model_id();
        if embedder_id != index.embedder_id() {
            return Err(RecError::CorpusIntegrity(format!(
                "index was built with embedder {} but queries would use {embedder_id}",
                index.embedder_id()
            )));
        }

        Ok(Self {
            index,
            embedder,
            embedder_id,
            fetcher,
            normalizer: JobPostingNormalizer::new(generator)
                .with_char_limit(options.prompt_char_limit),
            extractor: ConstraintExtractor::new(),
            cache: EmbeddingCache::new(options.embedding_cache_size),
            options,
        })
    }

    pub const fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn index(&self) -> &dyn AssessmentIndex {
        self.index.as_ref()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Answer one request.
    ///
    /// # Errors
    ///
    /// `InputError` for an invalid `max_results`, an empty query, or a URL
    /// request whose page cannot be resolved; `EmbeddingUnavailable` when the
    /// query cannot be embedded.
    pub fn recommend(
        &self,
        input: &str,
        is_url: bool,
        max_results: usize,
    ) -> Result<SearchResponse> {
        if max_results == 0 || max_results > self.options.max_results_limit {
            return Err(RecError::InputError(format!(
                "max_results must be between 1 and {} (got {max_results})",
                self.options.max_results_limit
            )));
        }
        let input = input.trim();
        if input.is_empty() {
            return Err(RecError::InputError("query is empty".to_string()));
        }

        let (search_query, job_description_url, degraded) = if is_url {
            let url = find_url(input)
                .ok_or_else(|| RecError::InputError(format!("no http(s) url found in: {input}")))?;
            let posting = self.fetcher.fetch_text(url).map_err(|err| match err {
                RecError::InputError(_) => err,
                other => RecError::InputError(format!("could not fetch {url}: {other}")),
            })?;
            debug!(url, chars = posting.chars().count(), "resolved job posting");

            let normalized = self.normalizer.normalize(&posting);
            let degraded = normalized.is_fallback();
            let query = with_duration_hint(normalized.text, input);
            (query, Some(url.to_string()), degraded)
        } else {
            (input.to_string(), None, false)
        };

        let constraints = self.extractor.extract(&search_query);

        let embedding = self
            .cache
            .get_or_try_insert(&self.embedder_id, &search_query, || {
                self.embedder.embed(&search_query)
            })
            .map_err(|err| match err {
                RecError::EmbeddingUnavailable(_) => err,
                other => RecError::EmbeddingUnavailable(other.to_string()),
            })?;

        let found = self.index.search(&embedding, &constraints, max_results)?;
        let results: Vec<AssessmentResponse> = found
            .iter()
            .map(|hit| AssessmentResponse::from_hit(hit, self.options.description_max_chars))
            .collect();

        info!(
            is_url,
            degraded,
            candidates = found.candidates,
            returned = results.len(),
            "recommendation complete"
        );

        Ok(SearchResponse {
            search_query,
            original_query: input.to_string(),
            is_url,
            job_description_url,
            constraints,
            degraded,
            results,
        })
    }
}

/// First http(s) URL in `input`, without trailing punctuation.
pub fn find_url(input: &str) -> Option<&str> {
    URL_RE
        .find(input)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', ')', ']', '!', '?']))
        .filter(|url| !url.ends_with("://"))
}

/// Carry a "N minutes" requirement from the raw request into a generated
/// query that dropped it.
pub fn with_duration_hint(query: String, original_input: &str) -> String {
    let Some(caps) = MINUTES_RE.captures(original_input) else {
        return query;
    };
    let lowered = query.to_lowercase();
    if lowered.contains("time") || lowered.contains("minute") {
        return query;
    }
    format!("{query} Assessment duration less than {} minutes.", &caps[1])
}
