//! Response schema returned to callers.

use serde::{Deserialize, Serialize};

use super::normalizer::truncate_chars;
use crate::query::QueryConstraints;
use crate::search::ScoredRecord;

pub const DEFAULT_DESCRIPTION_MAX_CHARS: usize = 500;

/// One recommended assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub job_levels: Vec<String>,
    pub languages: Vec<String>,
    /// Minutes; `None` when the catalog does not state a duration.
    pub duration: Option<u32>,
    pub test_types: Vec<String>,
    pub remote_testing: bool,
    pub adaptive_irt: bool,
    pub score: f32,
}

impl AssessmentResponse {
    pub fn from_hit(hit: &ScoredRecord<'_>, description_max_chars: usize) -> Self {
        let record = hit.record;
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            url: record.url.clone(),
            description: truncate_chars(record.description.trim(), description_max_chars)
                .to_string(),
            job_levels: record.job_levels.iter().map(ToString::to_string).collect(),
            languages: record.languages.clone(),
            duration: record.duration_minutes,
            test_types: record.test_types.iter().map(ToString::to_string).collect(),
            remote_testing: record.remote_testing,
            adaptive_irt: record.adaptive_irt,
            score: hit.score,
        }
    }
}

/// Full answer to one recommendation request, best match first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Text that was actually embedded and searched.
    pub search_query: String,
    pub original_query: String,
    pub is_url: bool,
    pub job_description_url: Option<String>,
    /// Constraints extracted from `search_query`.
    pub constraints: QueryConstraints,
    /// True when query generation failed and the raw posting was searched.
    #[serde(default)]
    pub degraded: bool,
    pub results: Vec<AssessmentResponse>,
}

impl SearchResponse {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
