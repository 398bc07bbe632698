//! In-memory corpus index: one embedding per assessment plus its metadata.
//!
//! Search is an exact linear scan, which is plenty for a catalog of a few
//! hundred records. The [`AssessmentIndex`] trait is the seam for swapping in
//! an approximate index later.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info};

use super::embeddings::{Embedder, cosine_similarity};
use crate::catalog::AssessmentRecord;
use crate::error::{RecError, Result};
use crate::query::QueryConstraints;

/// Similarity search with a metadata predicate.
pub trait AssessmentIndex: Send + Sync {
    /// Rank every record satisfying `constraints` by similarity to
    /// `query_embedding`, returning at most `top_k` hits.
    fn search(
        &self,
        query_embedding: &[f32],
        constraints: &QueryConstraints,
        top_k: usize,
    ) -> Result<SearchResult<'_>>;

    /// Embedding dimensionality of the corpus.
    fn dimension(&self) -> usize;

    /// Id of the embedder the corpus was embedded with.
    fn embedder_id(&self) -> &str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A record with its similarity score in `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct ScoredRecord<'a> {
    pub record: &'a AssessmentRecord,
    pub score: f32,
}

/// Ranked hits, best first.
#[derive(Debug, Clone, Default)]
pub struct SearchResult<'a> {
    pub hits: Vec<ScoredRecord<'a>>,
    /// Records that satisfied the predicate before the `top_k` cut.
    pub candidates: usize,
}

impl<'a> SearchResult<'a> {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredRecord<'a>> {
        self.hits.iter()
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.hits.iter().map(|hit| hit.record.id.as_str()).collect()
    }
}

/// Exact-scan index over an immutable record set.
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    records: Vec<AssessmentRecord>,
    dimension: usize,
    embedder_id: String,
}

impl CorpusIndex {
    /// Build the index, embedding every record that does not already carry
    /// an embedding.
    ///
    /// Fails with `CorpusIntegrity` on an empty corpus, empty id or url,
    /// duplicate ids, or embeddings of inconsistent dimensionality.
    pub fn build(mut records: Vec<AssessmentRecord>, embedder: &dyn Embedder) -> Result<Self> {
        check_records(&records)?;

        let missing = records.iter().filter(|r| r.embedding.is_empty()).count();
        records
            .par_iter_mut()
            .filter(|record| record.embedding.is_empty())
            .try_for_each(|record| -> Result<()> {
                record.embedding = embedder.embed(&record.canonical_text())?;
                Ok(())
            })?;

        let index = Self::from_parts(records, embedder.model_id())?;
        if index.dimension != embedder.dimension() {
            return Err(RecError::CorpusIntegrity(format!(
                "corpus embeddings have dimension {} but embedder {} produces {}",
                index.dimension,
                index.embedder_id,
                embedder.dimension()
            )));
        }

        info!(
            records = index.records.len(),
            embedded = missing,
            dimension = index.dimension,
            embedder = %index.embedder_id,
            "corpus index built"
        );
        Ok(index)
    }

    /// [`CorpusIndex::build`] on a dedicated pool of at most `max_concurrency`
    /// threads, so a remote embedder sees a bounded number of calls in flight.
    pub fn build_bounded(
        records: Vec<AssessmentRecord>,
        embedder: &dyn Embedder,
        max_concurrency: usize,
    ) -> Result<Self> {
        let threads = max_concurrency.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| RecError::Config(format!("index build thread pool: {err}")))?;
        debug!(threads, "building corpus index");
        pool.install(|| Self::build(records, embedder))
    }

    /// Assemble an index from already-embedded records, validating them.
    pub fn from_parts(records: Vec<AssessmentRecord>, embedder_id: String) -> Result<Self> {
        check_records(&records)?;

        let dimension = records.first().map_or(0, |r| r.embedding.len());
        if dimension == 0 {
            return Err(RecError::CorpusIntegrity(format!(
                "record {} has an empty embedding",
                records[0].id
            )));
        }
        if let Some(bad) = records.iter().find(|r| r.embedding.len() != dimension) {
            return Err(RecError::CorpusIntegrity(format!(
                "record {} has embedding dimension {} (expected {dimension})",
                bad.id,
                bad.embedding.len()
            )));
        }

        Ok(Self {
            records,
            dimension,
            embedder_id,
        })
    }

    /// Records in catalog insertion order.
    pub fn records(&self) -> &[AssessmentRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&AssessmentRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

impl AssessmentIndex for CorpusIndex {
    fn search(
        &self,
        query_embedding: &[f32],
        constraints: &QueryConstraints,
        top_k: usize,
    ) -> Result<SearchResult<'_>> {
        if query_embedding.len() != self.dimension {
            return Err(RecError::EmbeddingUnavailable(format!(
                "query embedding has dimension {} but the corpus uses {} ({})",
                query_embedding.len(),
                self.dimension,
                self.embedder_id
            )));
        }

        let mut hits: Vec<ScoredRecord<'_>> = self
            .records
            .iter()
            .filter(|record| constraints.matches(record))
            .map(|record| ScoredRecord {
                record,
                score: similarity_score(query_embedding, &record.embedding),
            })
            .collect();
        let candidates = hits.len();

        // Stable sort keeps catalog order among equal scores.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);

        debug!(
            candidates,
            returned = hits.len(),
            top_k,
            "index search complete"
        );
        Ok(SearchResult { hits, candidates })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embedder_id(&self) -> &str {
        &self.embedder_id
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// Cosine similarity mapped from `[-1, 1]` onto `[0, 1]`.
pub fn similarity_score(a: &[f32], b: &[f32]) -> f32 {
    ((cosine_similarity(a, b) + 1.0) / 2.0).clamp(0.0, 1.0)
}

fn check_records(records: &[AssessmentRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(RecError::CorpusIntegrity("corpus is empty".to_string()));
    }

    let mut seen = HashSet::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        if record.id.trim().is_empty() {
            return Err(RecError::CorpusIntegrity(format!(
                "record at position {position} ({}) has an empty id",
                record.name
            )));
        }
        if record.url.trim().is_empty() {
            return Err(RecError::CorpusIntegrity(format!(
                "record {} has an empty url",
                record.id
            )));
        }
        if !seen.insert(record.id.as_str()) {
            return Err(RecError::CorpusIntegrity(format!(
                "duplicate record id {}",
                record.id
            )));
        }
    }
    Ok(())
}
