//! The assessment record model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::tags::{JobLevel, Language, TestType};

/// One catalogued assessment product.
///
/// Records are immutable once the index is built; `embedding` is empty until
/// the index computes it from [`AssessmentRecord::canonical_text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub job_levels: BTreeSet<JobLevel>,
    /// Display strings as they appear in the catalog.
    pub languages: Vec<String>,
    /// Canonical languages used for matching.
    pub language_tags: BTreeSet<Language>,
    pub test_types: BTreeSet<TestType>,
    /// `None` means the catalog did not state a duration.
    pub duration_minutes: Option<u32>,
    pub remote_testing: bool,
    pub adaptive_irt: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

impl AssessmentRecord {
    /// Create a record with an id derived from `url`.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: id_from_url(&url),
            name: name.into(),
            url,
            description: String::new(),
            job_levels: BTreeSet::new(),
            languages: Vec::new(),
            language_tags: BTreeSet::new(),
            test_types: BTreeSet::new(),
            duration_minutes: None,
            remote_testing: false,
            adaptive_irt: false,
            embedding: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_job_levels(mut self, levels: impl IntoIterator<Item = JobLevel>) -> Self {
        self.job_levels = levels.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_test_types(mut self, types: impl IntoIterator<Item = TestType>) -> Self {
        self.test_types = types.into_iter().collect();
        self
    }

    /// Set display languages; canonical tags are derived from them.
    #[must_use]
    pub fn with_languages<S: Into<String>>(
        mut self,
        languages: impl IntoIterator<Item = S>,
    ) -> Self {
        self.languages = languages.into_iter().map(Into::into).collect();
        self.language_tags = self
            .languages
            .iter()
            .flat_map(|name| Language::find_all(name))
            .collect();
        self
    }

    #[must_use]
    pub const fn with_duration(mut self, minutes: Option<u32>) -> Self {
        self.duration_minutes = minutes;
        self
    }

    #[must_use]
    pub const fn with_flags(mut self, remote_testing: bool, adaptive_irt: bool) -> Self {
        self.remote_testing = remote_testing;
        self.adaptive_irt = adaptive_irt;
        self
    }

    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    /// Text that is embedded for similarity search: name, description and tags.
    pub fn canonical_text(&self) -> String {
        let levels = join_or(
            self.job_levels.iter().map(|l| l.as_str()),
            " and ",
            "various job levels",
        );
        let languages = join_or(
            self.languages.iter().map(String::as_str),
            " and ",
            "multiple languages",
        );
        let types = join_or(
            self.test_types.iter().map(|t| t.as_str()),
            ", ",
            "various assessments",
        );
        let duration = self
            .duration_minutes
            .map_or_else(|| "unspecified".to_string(), |m| format!("{m} minutes"));

        format!(
            "{name}. {description}\nJob levels: {levels}.\nLanguages: {languages}.\n\
             Test types: {types}.\nDuration: {duration}.\nRemote testing: {remote}. Adaptive: {adaptive}.",
            name = self.name,
            description = self.description.trim(),
            remote = yes_no(self.remote_testing),
            adaptive = yes_no(self.adaptive_irt),
        )
    }
}

/// Derive a stable identifier from an assessment URL.
///
/// Uses the last non-empty path segment when there is one, otherwise a
/// short SHA-256 digest of the whole URL.
pub fn id_from_url(url: &str) -> String {
    let trimmed = url.trim();
    let without_query = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
    let path = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);
    let slug = path
        .split('/')
        .skip(1)
        .filter(|segment| !segment.is_empty())
        .last();

    match slug {
        Some(segment) => segment.to_ascii_lowercase(),
        None if trimmed.is_empty() => String::new(),
        None => {
            let digest = Sha256::digest(trimmed.as_bytes());
            hex::encode(&digest[..8])
        }
    }
}

/// Canonical form of an assessment URL for duplicate detection: trimmed,
/// lowercased, without query, fragment or trailing slashes.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    let without_query = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
    without_query.trim_end_matches('/').to_ascii_lowercase()
}

/// Identifier for a URL whose slug is already taken by a different URL:
/// the slug plus a short digest of the normalized URL.
pub fn disambiguated_id(url: &str) -> String {
    let normalized = normalize_url(url);
    let digest = Sha256::digest(normalized.as_bytes());
    let slug = id_from_url(url);
    format!("{slug}-{}", hex::encode(&digest[..4]))
}

fn join_or<'a>(items: impl Iterator<Item = &'a str>, sep: &str, empty: &str) -> String {
    let joined = items.collect::<Vec<_>>().join(sep);
    if joined.is_empty() { empty.to_string() } else { joined }
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_url_uses_slug() {
        assert_eq!(
            id_from_url("https://www.shl.com/products/product-catalog/view/java-8-new/"),
            "java-8-new"
        );
        assert_eq!(id_from_url("https://example.com/a/B?x=1"), "b");
    }

    #[test]
    fn test_id_from_url_falls_back_to_digest() {
        let id = id_from_url("https://example.com");
        assert_eq!(id.len(), 16);
        assert_eq!(id, id_from_url("https://example.com"));
        assert_eq!(id_from_url("   "), "");
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url(" https://Example.com/View/Java/?ref=1#top "),
            "https://example.com/view/java"
        );
        assert_eq!(
            normalize_url("https://example.com/view/java"),
            normalize_url("https://example.com/view/java/")
        );
    }

    #[test]
    fn test_disambiguated_id_keeps_slug() {
        let a = disambiguated_id("https://a.example.com/catalog/java/");
        let b = disambiguated_id("https://b.example.com/other/java/");
        assert!(a.starts_with("java-"));
        assert_eq!(a.len(), "java-".len() + 8);
        assert_ne!(a, b);
        assert_eq!(a, disambiguated_id("https://a.example.com/catalog/java"));
    }

    #[test]
    fn test_canonical_text_includes_tags() {
        let record = AssessmentRecord::new("OPQ32r", "https://example.com/opq32r")
            .with_description("Occupational personality questionnaire.")
            .with_job_levels([JobLevel::Manager])
            .with_test_types([TestType::Personality])
            .with_languages(["English (USA)"])
            .with_duration(Some(25));

        let text = record.canonical_text();
        assert!(text.starts_with("OPQ32r. Occupational personality"));
        assert!(text.contains("Job levels: Manager."));
        assert!(text.contains("Test types: Personality."));
        assert!(text.contains("Duration: 25 minutes."));
    }

    #[test]
    fn test_languages_derive_tags() {
        let record = AssessmentRecord::new("x", "https://example.com/x")
            .with_languages(["English (USA)", "Latin American Spanish"]);
        let tags: Vec<&str> = record.language_tags.iter().map(Language::as_str).collect();
        assert_eq!(tags, vec!["english", "spanish"]);
    }
}
