use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use assessrec::RecError;
use assessrec::pipeline::{PipelineOptions, Recommender};
use assessrec::providers::{
    GeminiClient, GeminiSettings, HttpPageFetcher, PageFetcher, TextGenerator,
};
use assessrec::search::{Embedder, HashEmbedder};
use assessrec::test_utils::fixtures::{FIXTURE_DIMS, sample_index};

const API_KEY: &str = "test-key";

fn gemini(server: &MockServer, dimension: usize) -> GeminiClient {
    let mut settings = GeminiSettings::new(API_KEY);
    settings.base_url = server.base_url();
    settings.embedding_dimension = dimension;
    settings.embedding_timeout = Duration::from_secs(5);
    settings.generation_timeout = Duration::from_secs(5);
    GeminiClient::new(settings).unwrap()
}

fn fetcher() -> HttpPageFetcher {
    HttpPageFetcher::new(Duration::from_secs(5), "assessrec-tests").unwrap()
}

const POSTING_HTML: &str = r#"<html>
<head><title>Backend Engineer</title></head>
<body>
  <nav>Home | Jobs | About</nav>
  <div class="job-description">
    <p>We are hiring a Java developer.</p>
    <p>Strong Java 8 knowledge required.</p>
  </div>
</body>
</html>"#;

#[test]
fn gemini_embed_returns_values() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/embedding-001:embedContent")
            .header("x-goog-api-key", API_KEY);
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "embedding": { "values": [0.25, -0.5, 1.0] } }));
    });

    let client = gemini(&server, 3);
    let values = client.embed("java developer").unwrap();
    mock.assert();
    assert_eq!(values, vec![0.25, -0.5, 1.0]);
    assert_eq!(client.model_id(), "gemini/embedding-001/3");
}

#[test]
fn gemini_embed_wrong_dimension_is_unavailable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1beta/models/embedding-001:embedContent");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "embedding": { "values": [0.25, -0.5] } }));
    });

    let err = gemini(&server, 3).embed("java developer").unwrap_err();
    assert!(matches!(err, RecError::EmbeddingUnavailable(_)), "got {err:?}");
}

#[test]
fn gemini_embed_server_error_is_retryable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1beta/models/embedding-001:embedContent");
        then.status(503);
    });

    let err = gemini(&server, 3).embed("java developer").unwrap_err();
    assert!(matches!(err, RecError::EmbeddingUnavailable(_)), "got {err:?}");
    assert!(err.is_retryable());
}

#[test]
fn gemini_generate_joins_first_candidate_parts() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash:generateContent")
            .header("x-goog-api-key", API_KEY);
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "candidates": [
                    { "content": { "parts": [{ "text": "Java developer " }, { "text": "knowledge test" }] } },
                    { "content": { "parts": [{ "text": "ignored" }] } }
                ]
            }));
    });

    let text = gemini(&server, 3).generate("prompt").unwrap();
    mock.assert();
    assert_eq!(text, "Java developer knowledge test");
}

#[test]
fn gemini_generate_without_candidates_is_provider_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1beta/models/gemini-2.0-flash:generateContent");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "candidates": [] }));
    });

    let err = gemini(&server, 3).generate("prompt").unwrap_err();
    assert!(matches!(err, RecError::Provider(_)), "got {err:?}");
}

#[test]
fn fetcher_extracts_description_block() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/jobs/42");
        then.status(200)
            .header("content-type", "text/html")
            .body(POSTING_HTML);
    });

    let text = fetcher().fetch_text(&server.url("/jobs/42")).unwrap();
    assert!(text.contains("We are hiring a Java developer."));
    assert!(text.contains("Strong Java 8 knowledge required."));
    assert!(!text.contains("Home | Jobs"));
}

#[test]
fn fetcher_http_error_is_input_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/jobs/gone");
        then.status(404);
    });

    let err = fetcher().fetch_text(&server.url("/jobs/gone")).unwrap_err();
    assert!(matches!(err, RecError::InputError(_)), "got {err:?}");
}

#[test]
fn url_pipeline_over_http() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/jobs/42");
        then.status(200)
            .header("content-type", "text/html")
            .body(POSTING_HTML);
    });
    let generate = server.mock(|when, then| {
        when.method(POST).path("/v1beta/models/gemini-2.0-flash:generateContent");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": "```\nQuery: Java knowledge test\n```" }] } }]
            }));
    });

    let embedder = Arc::new(HashEmbedder::new(FIXTURE_DIMS));
    let index = Arc::new(sample_index(embedder.as_ref()));
    let recommender = Recommender::new(
        index,
        embedder,
        Arc::new(fetcher()),
        Arc::new(gemini(&server, FIXTURE_DIMS)),
        PipelineOptions::default(),
    )
    .unwrap();

    let url = server.url("/jobs/42");
    let response = recommender.recommend(&url, true, 5).unwrap();
    generate.assert();
    assert!(!response.degraded);
    assert_eq!(response.search_query, "Java knowledge test");
    assert_eq!(response.job_description_url.as_deref(), Some(url.as_str()));
    assert_eq!(response.results[0].id, "java-8-new");
}
