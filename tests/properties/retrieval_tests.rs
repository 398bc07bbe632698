use proptest::prelude::*;

use assessrec::query::extract_constraints;
use assessrec::search::{AssessmentIndex, Embedder, HashEmbedder};
use assessrec::test_utils::fixtures::{FIXTURE_DIMS, sample_index};

const PHRASES: &[&str] = &[
    "personality",
    "under 30 minutes",
    "manager",
    "graduate",
    "remote",
    "adaptive",
    "in French",
    "java developer",
    "knowledge test",
    "sales",
    "simulation",
    "within an hour",
];

fn query_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(PHRASES), 0..4).prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn test_results_satisfy_constraints(query in query_strategy(), top_k in 1usize..10usize) {
        let embedder = HashEmbedder::new(FIXTURE_DIMS);
        let index = sample_index(&embedder);
        let constraints = extract_constraints(&query);
        let embedding = embedder.embed(&query).unwrap();

        let satisfying = index
            .records()
            .iter()
            .filter(|record| constraints.matches(record))
            .count();

        let found = index.search(&embedding, &constraints, top_k).unwrap();
        prop_assert_eq!(found.candidates, satisfying);
        prop_assert_eq!(found.len(), top_k.min(satisfying));
        for hit in found.iter() {
            prop_assert!(constraints.matches(hit.record));
            prop_assert!((0.0..=1.0).contains(&hit.score));
        }
        for pair in found.hits.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_search_is_deterministic(query in query_strategy()) {
        let embedder = HashEmbedder::new(FIXTURE_DIMS);
        let index = sample_index(&embedder);
        let constraints = extract_constraints(&query);
        let embedding = embedder.embed(&query).unwrap();

        let first = index.search(&embedding, &constraints, 5).unwrap().ids();
        let second = index.search(&embedding, &constraints, 5).unwrap().ids();
        prop_assert_eq!(first, second);
    }
}
