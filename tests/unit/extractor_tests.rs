use std::collections::BTreeSet;

use assessrec::catalog::{JobLevel, Language, TestType};
use assessrec::query::{extract_constraints, extract_max_duration};
use assessrec::test_utils::{TestCase, run_table_tests};

#[test]
fn max_duration_phrasings() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "under minutes",
            input: "Java developer test under 30 minutes",
            expected: Some(30),
            should_panic: false,
        },
        TestCase {
            name: "within an hour",
            input: "something for analysts within an hour",
            expected: Some(60),
            should_panic: false,
        },
        TestCase {
            name: "hours unit",
            input: "max 1.5 hours please",
            expected: Some(90),
            should_panic: false,
        },
        TestCase {
            name: "range takes upper end",
            input: "assessments of 20-40 mins",
            expected: Some(40),
            should_panic: false,
        },
        TestCase {
            name: "most restrictive wins",
            input: "under 60 minutes, ideally less than 45 minutes",
            expected: Some(45),
            should_panic: false,
        },
        TestCase {
            name: "trailing qualifier",
            input: "a 25 minute or less test",
            expected: Some(25),
            should_panic: false,
        },
        TestCase {
            name: "bare minutes",
            input: "a 40 minute personality test",
            expected: Some(40),
            should_panic: false,
        },
        TestCase {
            name: "lower bound is not a limit",
            input: "a test of at least 30 minutes",
            expected: None,
            should_panic: false,
        },
        TestCase {
            name: "more than is not a limit",
            input: "more than 45 minutes please",
            expected: None,
            should_panic: false,
        },
        TestCase {
            name: "no duration",
            input: "senior data analyst with SQL",
            expected: None,
            should_panic: false,
        },
    ];

    run_table_tests(cases, extract_max_duration)?;
    Ok(())
}

#[test]
fn personality_query_extracts_type_and_bound() {
    let constraints = extract_constraints("personality test under 30 minutes");
    assert_eq!(constraints.max_duration_minutes, Some(30));
    assert_eq!(
        constraints.test_types,
        Some(BTreeSet::from([TestType::Personality]))
    );
    assert_eq!(constraints.job_levels, None);
    assert_eq!(constraints.languages, None);
}

#[test]
fn manager_query_with_language_and_remote() {
    let constraints = extract_constraints(
        "Hiring a sales manager, assessment in Spanish, remote testing required",
    );
    let levels = constraints.job_levels.expect("job levels");
    assert!(levels.contains(&JobLevel::Manager));
    let languages = constraints.languages.expect("languages");
    assert!(languages.iter().any(|lang| lang.as_str() == "spanish"));
    assert_eq!(constraints.remote_testing, Some(true));
    assert_eq!(constraints.max_duration_minutes, None);
}

#[test]
fn analyst_query_constrains_job_level() {
    let constraints = extract_constraints("senior data analyst with SQL");
    assert_eq!(
        constraints.job_levels,
        Some(BTreeSet::from([JobLevel::Senior, JobLevel::Analyst]))
    );
}

#[test]
fn unconstrained_query() {
    let constraints = extract_constraints("someone who is good with people");
    assert!(constraints.is_unconstrained());
    assert_eq!(Language::find_all("no languages here"), Vec::new());
}

#[test]
fn empty_query_is_unconstrained() {
    assert!(extract_constraints("").is_unconstrained());
    assert!(extract_constraints("   ").is_unconstrained());
}
