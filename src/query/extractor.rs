//! Constraint extraction from free-text queries.
//!
//! Pure and deterministic: the output depends only on the input text and the
//! static tables in [`super::dictionary`].

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use super::constraints::QueryConstraints;
use super::dictionary::{JOB_LEVELS, TEST_TYPES, normalize_tokens};
use crate::catalog::Language;

const QUALIFIERS: &str = r"under|within|max|maximum|at most|less than|fewer than|no more than|not more than|up to|upto|below|shorter than|not exceeding|no longer than|in";
const NUMBER: &str = r"(\d+(?:\.\d+)?)";
const UNIT: &str = r"(minutes?|mins?|hours?|hrs?|h|m)\b";

static QUALIFIED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?:\b(?:{QUALIFIERS})|<=?)\s*[:.]?\s*(?:of\s+)?(?:about\s+|around\s+|approximately\s+|approx\.?\s+)?{NUMBER}\s*-?\s*{UNIT}"
    ))
    .expect("valid regex")
});

static TRAILING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b{NUMBER}\s*-?\s*{UNIT}\s+(?:or less|or fewer|or under|max|maximum|tops|at most)\b"
    ))
    .expect("valid regex")
});

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?:between\s+)?\d+(?:\.\d+)?\s*(?:-|–|to|and)\s*{NUMBER}\s*-?\s*{UNIT}"
    ))
    .expect("valid regex")
});

static HOUR_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?:{QUALIFIERS})\s+(an hour and a half|half an hour|half-an-hour|a half hour|an hour|one hour)\b"
    ))
    .expect("valid regex")
});

static BARE_MINUTES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d+(?:\.\d+)?)\s*-?\s*(minutes?|mins?)\b").expect("valid regex")
});

static LOWER_BOUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:at least|more than|longer than|greater than|over|minimum|min|upwards of)\s*[:.]?\s*(?:of\s+)?$",
    )
    .expect("valid regex")
});

/// Parses free text into [`QueryConstraints`]. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintExtractor;

impl ConstraintExtractor {
    pub const fn new() -> Self {
        Self
    }

    pub fn extract(&self, query_text: &str) -> QueryConstraints {
        let tokens = normalize_tokens(query_text);

        let job_levels: BTreeSet<_> = JOB_LEVELS.scan(&tokens).into_iter().collect();
        let test_types: BTreeSet<_> = TEST_TYPES.scan(&tokens).into_iter().collect();
        let languages: BTreeSet<_> = Language::find_all(query_text).into_iter().collect();

        let has_token = |words: &[&str]| tokens.iter().any(|t| words.contains(&t.as_str()));
        let remote = has_token(&["remote", "remotely"]);
        let adaptive = has_token(&["adaptive", "irt"]);

        let constraints = QueryConstraints {
            max_duration_minutes: extract_max_duration(query_text),
            job_levels: (!job_levels.is_empty()).then_some(job_levels),
            test_types: (!test_types.is_empty()).then_some(test_types),
            languages: (!languages.is_empty()).then_some(languages),
            remote_testing: remote.then_some(true),
            adaptive_irt: adaptive.then_some(true),
        };
        debug!(?constraints, "extracted constraints");
        constraints
    }
}

/// Convenience wrapper around [`ConstraintExtractor::extract`].
pub fn extract_constraints(query_text: &str) -> QueryConstraints {
    ConstraintExtractor::new().extract(query_text)
}

/// Find the most restrictive stated upper bound on duration, in minutes.
///
/// Qualified expressions ("under 30 minutes", "20-30 mins", "45 min max",
/// "within an hour") are preferred; a bare "N minutes" is only used when no
/// qualified expression exists, and never when a lower-bound qualifier such
/// as "at least" precedes it.
pub fn extract_max_duration(text: &str) -> Option<u32> {
    let lowered: String = text.nfkc().flat_map(char::to_lowercase).collect();

    let mut bounds: Vec<u32> = Vec::new();
    for re in [&*QUALIFIED_RE, &*TRAILING_RE, &*RANGE_RE] {
        bounds.extend(re.captures_iter(&lowered).filter_map(|caps| numeric_bound(&caps)));
    }
    bounds.extend(
        HOUR_PHRASE_RE
            .captures_iter(&lowered)
            .filter_map(|caps| hour_phrase_minutes(&caps[1])),
    );

    if bounds.is_empty() {
        bounds.extend(
            BARE_MINUTES_RE
                .captures_iter(&lowered)
                .filter(|caps| {
                    let start = caps.get(0).map_or(0, |m| m.start());
                    !LOWER_BOUND_RE.is_match(&lowered[..start])
                })
                .filter_map(|caps| numeric_bound(&caps)),
        );
    }

    bounds.into_iter().min()
}

fn numeric_bound(caps: &Captures<'_>) -> Option<u32> {
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str();
    let minutes = if unit.starts_with('h') { value * 60.0 } else { value };
    to_minutes(minutes)
}

fn hour_phrase_minutes(phrase: &str) -> Option<u32> {
    match phrase {
        "an hour and a half" => Some(90),
        "half an hour" | "half-an-hour" | "a half hour" => Some(30),
        "an hour" | "one hour" => Some(60),
        _ => None,
    }
}

fn to_minutes(value: f64) -> Option<u32> {
    if !value.is_finite() || value <= 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let minutes = value.round() as u32;
    (minutes > 0).then_some(minutes)
}
