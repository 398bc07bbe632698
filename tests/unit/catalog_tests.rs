use std::path::PathBuf;

use assessrec::catalog::{JobLevel, TestType, load_catalog, read_json};
use assessrec::test_utils::fixtures::{SAMPLE_CATALOG_CSV, UnitTestFixture, sample_records};

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn catalog_fixture_skips_malformed_rows() {
    let catalog = load_catalog(&fixture_path("tests/fixtures/catalog.csv")).unwrap();
    assert_eq!(catalog.records.len(), 6);
    let skipped: Vec<usize> = catalog.skipped.iter().map(|s| s.row).collect();
    assert_eq!(skipped, vec![7, 8]);
    assert!(catalog.skipped[0].reason.contains("missing url"));
    assert!(catalog.skipped[1].reason.contains("duration"));
}

#[test]
fn catalog_csv_matches_sample_records() {
    let fixture = UnitTestFixture::new();
    let path = fixture.create_file("assessments.csv", SAMPLE_CATALOG_CSV);
    let catalog = load_catalog(&path).unwrap();
    assert!(catalog.skipped.is_empty());
    assert_eq!(catalog.records, sample_records());
}

#[test]
fn catalog_json_rows() {
    let json = r#"[
        {"name": "Verify G+", "url": "https://catalog.example.com/view/verify-g/",
         "job_levels": ["Graduate", "Manager"], "test_type": ["A"],
         "languages": "English (USA)", "duration": "max 36", "remote_testing": true},
        "not a row",
        {"name": "No Url"}
    ]"#;
    let catalog = read_json(json.as_bytes()).unwrap();
    assert_eq!(catalog.records.len(), 1);
    assert_eq!(catalog.skipped.len(), 2);

    let record = &catalog.records[0];
    assert_eq!(record.id, "verify-g");
    assert_eq!(record.duration_minutes, Some(36));
    assert!(record.remote_testing);
    assert!(!record.adaptive_irt);
    assert!(record.job_levels.contains(&JobLevel::Manager));
    assert!(record.test_types.contains(&TestType::Cognitive));
    assert!(record.test_types.contains(&TestType::Aptitude));
}

#[test]
fn catalog_missing_file_is_catalog_error() {
    let err = load_catalog(&fixture_path("tests/fixtures/absent.csv")).unwrap_err();
    assert_eq!(err.code(), "catalog_error");
}
