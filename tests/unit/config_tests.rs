use std::collections::HashMap;
use std::path::{Path, PathBuf};

use assessrec::RecError;
use assessrec::config::{Config, EmbeddingBackend, GenerationBackend};
use assessrec::test_utils::{TestCase, run_table_tests};

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn load_fixture(relative: &str, env: &HashMap<&str, &str>) -> assessrec::Result<Config> {
    let lookup = |key: &str| env.get(key).map(|value| (*value).to_string());
    Config::load_with(Some(&fixture_path(relative)), Path::new("/nonexistent"), &lookup)
}

#[test]
fn config_sections_from_fixture() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "default",
            input: "tests/fixtures/configs/default.toml",
            expected: (
                EmbeddingBackend::Hash,
                384usize,
                GenerationBackend::Disabled,
                3000usize,
                5usize,
                10usize,
                true,
            ),
            should_panic: false,
        },
        TestCase {
            name: "custom",
            input: "tests/fixtures/configs/custom.toml",
            expected: (
                EmbeddingBackend::Gemini,
                384usize,
                GenerationBackend::Gemini,
                2000usize,
                3usize,
                10usize,
                false,
            ),
            should_panic: false,
        },
    ];

    run_table_tests(cases, |relative_path| {
        let config = load_fixture(relative_path, &HashMap::new()).expect("load config");
        (
            config.embedding.backend,
            config.embedding.hash_dims,
            config.generation.backend,
            config.generation.prompt_char_limit,
            config.pipeline.default_max_results,
            config.pipeline.max_results_limit,
            config.index.auto_build,
        )
    })?;
    Ok(())
}

#[test]
fn config_custom_paths_and_untouched_defaults() {
    let config = load_fixture("tests/fixtures/configs/custom.toml", &HashMap::new()).unwrap();
    assert_eq!(config.catalog.path, PathBuf::from("/srv/catalog/assessments.json"));
    assert_eq!(
        config.snapshot_path(),
        PathBuf::from("/var/cache/assessrec/index.json")
    );
    assert_eq!(config.embedding.timeout_secs, 5);
    assert_eq!(config.embedding.cache_size, 512);
    assert_eq!(config.generation.timeout_secs, 30);
    assert_eq!(config.pipeline.max_concurrency, 8);
    assert_eq!(config.pipeline.description_max_chars, 500);
    assert_eq!(config.gemini.base_url, "http://127.0.0.1:9999");
}

#[test]
fn config_env_overrides_file_values() {
    let env = HashMap::from([
        ("ASSESSREC_EMBEDDING_BACKEND", "hash"),
        ("ASSESSREC_PIPELINE_DEFAULT_MAX_RESULTS", "7"),
        ("ASSESSREC_INDEX_AUTO_BUILD", "true"),
        ("GEMINI_API_KEY", "from-env"),
    ]);
    let config = load_fixture("tests/fixtures/configs/custom.toml", &env).unwrap();
    assert_eq!(config.embedding.backend, EmbeddingBackend::Hash);
    assert_eq!(config.pipeline.default_max_results, 7);
    assert!(config.index.auto_build);
    assert_eq!(config.gemini_api_key().unwrap(), "from-env");
}

#[test]
fn config_rejects_invalid_values() {
    let env = HashMap::from([("ASSESSREC_PIPELINE_DEFAULT_MAX_RESULTS", "11")]);
    let err = load_fixture("tests/fixtures/configs/default.toml", &env).unwrap_err();
    assert!(matches!(err, RecError::Config(_)), "got {err:?}");

    let env = HashMap::from([("ASSESSREC_EMBEDDING_BACKEND", "word2vec")]);
    let err = load_fixture("tests/fixtures/configs/default.toml", &env).unwrap_err();
    assert!(matches!(err, RecError::Config(_)), "got {err:?}");
}

#[test]
fn config_missing_explicit_file_is_missing_config() {
    let err = load_fixture("tests/fixtures/configs/absent.toml", &HashMap::new()).unwrap_err();
    assert!(matches!(err, RecError::MissingConfig(_)), "got {err:?}");
}
