//! Human-readable rendering of recommendations and extracted constraints.

use std::collections::BTreeSet;
use std::fmt::Display;

use console::style;

use crate::cli::output::HumanLayout;
use crate::pipeline::{AssessmentResponse, SearchResponse};
use crate::query::QueryConstraints;

/// Render one recommendation response.
pub fn render_response(response: &SearchResponse) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout.title("Recommended assessments");
    layout.kv("Query", &response.original_query);
    if let Some(url) = &response.job_description_url {
        layout.kv("Job posting", url);
    }
    if response.search_query != response.original_query {
        layout.kv("Searched for", &response.search_query);
    }
    if response.degraded {
        layout.kv(
            "Note",
            &style("query generation unavailable; searched the raw posting text")
                .yellow()
                .to_string(),
        );
    }
    append_constraints(&mut layout, &response.constraints);
    layout.blank();

    if response.is_empty() {
        layout.push_line(style("! No assessments matched").yellow().to_string());
        layout.blank();
        layout.push_line("Try:");
        layout.push_line("  - Relaxing the duration limit");
        layout.push_line("  - Naming fewer job levels or test types");
        return layout;
    }

    for (rank, result) in response.results.iter().enumerate() {
        append_result(&mut layout, rank + 1, result);
    }
    layout
}

fn append_result(layout: &mut HumanLayout, rank: usize, result: &AssessmentResponse) {
    layout.push_line(format!(
        "{}. {} {}",
        rank,
        style(&result.name).bold(),
        style(format!("[{:.3}]", result.score)).dim()
    ));
    layout.push_line(format!("   {}", style(&result.url).cyan()));

    let mut facts = vec![
        result
            .duration
            .map_or_else(|| "untimed".to_string(), |m| format!("{m} min")),
    ];
    if !result.test_types.is_empty() {
        facts.push(result.test_types.join(", "));
    }
    if result.remote_testing {
        facts.push("remote".to_string());
    }
    if result.adaptive_irt {
        facts.push("adaptive".to_string());
    }
    layout.push_line(format!("   {}", facts.join(" | ")));

    if !result.job_levels.is_empty() {
        layout.push_line(format!("   Levels: {}", result.job_levels.join(", ")));
    }
    if !result.description.is_empty() {
        layout.push_line(format!("   {}", result.description));
    }
    layout.blank();
}

/// Render the constraints extracted from a query.
pub fn render_constraints(query: &str, constraints: &QueryConstraints) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout.title("Extracted constraints");
    layout.kv("Query", query);
    if constraints.is_unconstrained() {
        layout.kv("Constraints", "none");
    } else {
        append_constraints(&mut layout, constraints);
    }
    layout
}

fn append_constraints(layout: &mut HumanLayout, constraints: &QueryConstraints) {
    if let Some(minutes) = constraints.max_duration_minutes {
        layout.kv("Max duration", &format!("{minutes} min"));
    }
    if let Some(levels) = non_empty(constraints.job_levels.as_ref()) {
        layout.kv("Job levels", &join(levels));
    }
    if let Some(types) = non_empty(constraints.test_types.as_ref()) {
        layout.kv("Test types", &join(types));
    }
    if let Some(languages) = non_empty(constraints.languages.as_ref()) {
        layout.kv("Languages", &join(languages));
    }
    if constraints.remote_testing == Some(true) {
        layout.kv("Remote testing", "required");
    }
    if constraints.adaptive_irt == Some(true) {
        layout.kv("Adaptive/IRT", "required");
    }
}

fn non_empty<T>(set: Option<&BTreeSet<T>>) -> Option<&BTreeSet<T>> {
    set.filter(|s| !s.is_empty())
}

fn join<T: Display>(items: &BTreeSet<T>) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(results: Vec<AssessmentResponse>) -> SearchResponse {
        SearchResponse {
            search_query: "java under 30 minutes".to_string(),
            original_query: "java under 30 minutes".to_string(),
            is_url: false,
            job_description_url: None,
            constraints: QueryConstraints {
                max_duration_minutes: Some(30),
                ..QueryConstraints::default()
            },
            degraded: false,
            results,
        }
    }

    #[test]
    fn test_empty_response_suggests_relaxing() {
        let text = render_response(&response(Vec::new())).build();
        assert!(text.contains("No assessments matched"));
        assert!(text.contains("30 min"));
    }

    #[test]
    fn test_results_are_numbered() {
        let result = AssessmentResponse {
            id: "java-8".to_string(),
            name: "Java 8".to_string(),
            url: "https://example.com/java-8".to_string(),
            description: "Java knowledge".to_string(),
            job_levels: vec!["Mid-Professional".to_string()],
            languages: vec!["English (USA)".to_string()],
            duration: Some(18),
            test_types: vec!["Knowledge".to_string()],
            remote_testing: true,
            adaptive_irt: false,
            score: 0.87,
        };
        let text = render_response(&response(vec![result])).build();
        assert!(text.contains("Java 8"));
        assert!(text.contains("18 min | Knowledge | remote"));
        assert!(text.contains("Levels: Mid-Professional"));
    }

    #[test]
    fn test_unconstrained_query() {
        let text = render_constraints("people person", &QueryConstraints::default()).build();
        assert!(text.contains("none"));
    }
}
