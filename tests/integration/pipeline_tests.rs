use std::sync::Arc;

use assessrec::RecError;
use assessrec::catalog::TestType;
use assessrec::pipeline::{PipelineOptions, Recommender};
use assessrec::search::{Embedder, HashEmbedder, cosine_similarity};
use assessrec::test_utils::fixtures::{
    FIXTURE_DIMS, sample_index, sample_recommender, text_recommender,
};
use assessrec::test_utils::mocks::{
    CountingEmbedder, FailingEmbedder, FailingGenerator, StaticFetcher, StaticGenerator,
};

const POSTING_URL: &str = "https://jobs.example.com/postings/123";
const POSTING_TEXT: &str = "We are hiring a Java developer to build backend services. \
    Requirements: strong Java 8 knowledge, Spring, SQL.";

fn url_recommender(generator: Arc<StaticGenerator>) -> Recommender {
    sample_recommender(
        Arc::new(StaticFetcher::default().with_page(POSTING_URL, POSTING_TEXT)),
        generator,
    )
}

#[test]
fn personality_under_thirty_minutes_returns_only_opq() {
    let recommender = text_recommender();
    let response = recommender
        .recommend("personality test under 30 minutes", false, 5)
        .unwrap();

    assert_eq!(response.search_query, "personality test under 30 minutes");
    assert!(!response.is_url);
    assert!(!response.degraded);
    assert_eq!(response.job_description_url, None);
    assert_eq!(response.constraints.max_duration_minutes, Some(30));
    assert_eq!(response.len(), 1);
    assert_eq!(response.results[0].id, "opq32r");
    assert_eq!(response.results[0].test_types, vec!["Personality".to_string()]);
    assert_eq!(response.results[0].duration, Some(25));
}

#[test]
fn max_results_cuts_ranked_candidates() {
    const QUERY: &str = "remote assessments";
    let embedder = HashEmbedder::new(FIXTURE_DIMS);
    let index = sample_index(&embedder);
    let query = embedder.embed(QUERY).unwrap();

    let mut remote: Vec<(&str, f32)> = index
        .records()
        .iter()
        .filter(|r| r.remote_testing)
        .map(|r| (r.id.as_str(), cosine_similarity(&query, &r.embedding)))
        .collect();
    assert_eq!(remote.len(), 5);
    remote.sort_by(|a, b| b.1.total_cmp(&a.1));
    let expected: Vec<&str> = remote.iter().take(3).map(|(id, _)| *id).collect();

    let recommender = text_recommender();
    let response = recommender.recommend(QUERY, false, 3).unwrap();

    assert_eq!(response.constraints.remote_testing, Some(true));
    assert_eq!(response.constraints.test_types, None);
    assert_eq!(response.len(), 3);
    let ids: Vec<&str> = response.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, expected);
    for pair in response.results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert!(ids.iter().all(|id| *id != "customer-service-simulation"));
}

#[test]
fn unsatisfiable_constraints_return_empty_list() {
    let recommender = text_recommender();
    let response = recommender
        .recommend("simulation exercise under 10 minutes", false, 5)
        .unwrap();
    assert!(response.is_empty());
}

#[test]
fn url_request_uses_generated_query() {
    let generator = Arc::new(StaticGenerator::new(
        "**Search Query:** Java developer knowledge test",
    ));
    let recommender = url_recommender(generator.clone());

    let response = recommender.recommend(POSTING_URL, true, 5).unwrap();
    assert!(response.is_url);
    assert!(!response.degraded);
    assert_eq!(response.job_description_url.as_deref(), Some(POSTING_URL));
    assert_eq!(response.search_query, "Java developer knowledge test");
    assert_eq!(
        response.constraints.test_types,
        Some([TestType::Knowledge].into_iter().collect())
    );
    assert_eq!(response.results[0].id, "java-8-new");

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("strong Java 8 knowledge"));
}

#[test]
fn url_request_carries_duration_from_the_raw_input() {
    let generator = Arc::new(StaticGenerator::new("Java developer knowledge test"));
    let recommender = url_recommender(generator);

    let input = format!("Find tests for {POSTING_URL}, each under 40 minutes");
    let response = recommender.recommend(&input, true, 5).unwrap();
    assert_eq!(
        response.search_query,
        "Java developer knowledge test Assessment duration less than 40 minutes."
    );
    assert_eq!(response.constraints.max_duration_minutes, Some(40));
    assert_eq!(response.job_description_url.as_deref(), Some(POSTING_URL));
}

#[test]
fn generator_failure_degrades_to_posting_text() {
    let recommender = sample_recommender(
        Arc::new(StaticFetcher::default().with_page(POSTING_URL, POSTING_TEXT)),
        Arc::new(FailingGenerator),
    );

    let response = recommender.recommend(POSTING_URL, true, 5).unwrap();
    assert!(response.degraded);
    assert_eq!(response.search_query, POSTING_TEXT);
    assert!(!response.is_empty());
}

#[test]
fn unreachable_url_is_input_error() {
    let recommender = text_recommender();
    let err = recommender
        .recommend("https://jobs.example.com/missing", true, 5)
        .unwrap_err();
    assert!(matches!(err, RecError::InputError(_)), "got {err:?}");
    assert!(!err.is_retryable());
}

#[test]
fn url_flag_without_url_is_input_error() {
    let recommender = text_recommender();
    let err = recommender.recommend("no link in here", true, 5).unwrap_err();
    assert!(matches!(err, RecError::InputError(_)), "got {err:?}");
}

#[test]
fn invalid_requests_are_input_errors() {
    let recommender = text_recommender();
    for (query, max_results) in [("java", 0), ("java", 11), ("   ", 5)] {
        let err = recommender.recommend(query, false, max_results).unwrap_err();
        assert_eq!(err.code(), "input_error", "{query:?} / {max_results}");
    }
}

#[test]
fn embedding_failure_is_embedding_unavailable() {
    let reference = HashEmbedder::new(FIXTURE_DIMS);
    let index = Arc::new(sample_index(&reference));
    let failing = Arc::new(FailingEmbedder::mimicking(&reference));
    let recommender = Recommender::new(
        index,
        failing.clone(),
        Arc::new(StaticFetcher::default()),
        Arc::new(FailingGenerator),
        PipelineOptions::default(),
    )
    .unwrap();

    let err = recommender.recommend("java developer", false, 5).unwrap_err();
    assert!(matches!(err, RecError::EmbeddingUnavailable(_)), "got {err:?}");

    // Failures are not cached.
    let _ = recommender.recommend("java developer", false, 5);
    assert_eq!(failing.calls(), 2);
}

#[test]
fn mismatched_embedder_is_rejected() {
    let index = Arc::new(sample_index(&HashEmbedder::new(FIXTURE_DIMS)));
    let result = Recommender::new(
        index,
        Arc::new(HashEmbedder::new(FIXTURE_DIMS * 2)),
        Arc::new(StaticFetcher::default()),
        Arc::new(FailingGenerator),
        PipelineOptions::default(),
    );
    assert!(matches!(result, Err(RecError::CorpusIntegrity(_))));
}

#[test]
fn repeated_queries_hit_the_embedding_cache() {
    let counting = Arc::new(CountingEmbedder::new(HashEmbedder::new(FIXTURE_DIMS)));
    let index = Arc::new(sample_index(counting.as_ref()));
    let indexed_calls = counting.calls();

    let recommender = Recommender::new(
        index,
        counting.clone(),
        Arc::new(StaticFetcher::default()),
        Arc::new(FailingGenerator),
        PipelineOptions::default(),
    )
    .unwrap();

    let first = recommender.recommend("numerical reasoning", false, 5).unwrap();
    let second = recommender.recommend("numerical reasoning", false, 5).unwrap();
    assert_eq!(first, second);
    assert_eq!(counting.calls(), indexed_calls + 1);

    let stats = recommender.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[test]
fn descriptions_are_truncated() {
    let embedder = Arc::new(HashEmbedder::new(FIXTURE_DIMS));
    let index = Arc::new(sample_index(embedder.as_ref()));
    let options = PipelineOptions {
        description_max_chars: 12,
        ..PipelineOptions::default()
    };
    let recommender = Recommender::new(
        index,
        embedder,
        Arc::new(StaticFetcher::default()),
        Arc::new(FailingGenerator),
        options,
    )
    .unwrap();

    let response = recommender.recommend("java", false, 10).unwrap();
    assert_eq!(response.len(), 6);
    assert!(
        response
            .results
            .iter()
            .all(|r| r.description.chars().count() <= 12)
    );
}

#[test]
fn responses_are_shareable_across_threads() {
    let recommender = Arc::new(text_recommender());
    let handles: Vec<_> = ["manager", "graduate", "remote"]
        .into_iter()
        .map(|query| {
            let recommender = Arc::clone(&recommender);
            std::thread::spawn(move || recommender.recommend(query, false, 5).map(|r| r.len()))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap().unwrap() > 0);
    }
}

#[test]
fn hash_embedder_identity_is_stable() {
    assert_eq!(
        HashEmbedder::new(FIXTURE_DIMS).model_id(),
        HashEmbedder::new(FIXTURE_DIMS).model_id()
    );
}
