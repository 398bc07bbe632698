//! Structured filter predicates derived from a query.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{AssessmentRecord, JobLevel, Language, TestType};

/// Per-request constraints. An unset (or empty) field means "no constraint".
///
/// Fields combine with AND; the members of a set field combine with OR.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_levels: Option<BTreeSet<JobLevel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_types: Option<BTreeSet<TestType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<BTreeSet<Language>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_testing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adaptive_irt: Option<bool>,
}

impl QueryConstraints {
    /// True when no field constrains anything.
    pub fn is_unconstrained(&self) -> bool {
        self.max_duration_minutes.is_none()
            && active(self.job_levels.as_ref()).is_none()
            && active(self.test_types.as_ref()).is_none()
            && active(self.languages.as_ref()).is_none()
            && self.remote_testing != Some(true)
            && self.adaptive_irt != Some(true)
    }

    /// Evaluate the predicate against one record.
    ///
    /// A record with an unspecified duration fails an active duration bound,
    /// since it cannot be shown to satisfy it.
    pub fn matches(&self, record: &AssessmentRecord) -> bool {
        if let Some(max) = self.max_duration_minutes {
            match record.duration_minutes {
                Some(minutes) if minutes <= max => {}
                _ => return false,
            }
        }
        if let Some(levels) = active(self.job_levels.as_ref()) {
            if levels.is_disjoint(&record.job_levels) {
                return false;
            }
        }
        if let Some(types) = active(self.test_types.as_ref()) {
            if types.is_disjoint(&record.test_types) {
                return false;
            }
        }
        if let Some(languages) = active(self.languages.as_ref()) {
            if languages.is_disjoint(&record.language_tags) {
                return false;
            }
        }
        if self.remote_testing == Some(true) && !record.remote_testing {
            return false;
        }
        if self.adaptive_irt == Some(true) && !record.adaptive_irt {
            return false;
        }
        true
    }
}

fn active<T>(set: Option<&BTreeSet<T>>) -> Option<&BTreeSet<T>> {
    set.filter(|s| !s.is_empty())
}
