use proptest::prelude::*;

use assessrec::query::{extract_constraints, extract_max_duration};
use assessrec::search::{Embedder, HashEmbedder};

proptest! {
    #[test]
    fn test_hash_embedding_deterministic(text in ".*") {
        let embedder = HashEmbedder::new(64);
        let first = embedder.embed(&text).unwrap();
        let second = embedder.embed(&text).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_hash_embedding_length(text in ".*", dim in 1usize..256usize) {
        let embedder = HashEmbedder::new(dim);
        let embedding = embedder.embed(&text).unwrap();
        prop_assert_eq!(embedding.len(), dim);
    }

    #[test]
    fn test_extraction_is_idempotent(text in ".{0,200}") {
        prop_assert_eq!(extract_constraints(&text), extract_constraints(&text));
    }

    #[test]
    fn test_text_without_digits_or_hours_has_no_duration(text in "[a-zA-Z ,.]{0,120}") {
        prop_assume!(!text.to_lowercase().contains("hour"));
        prop_assert_eq!(extract_max_duration(&text), None);
    }

    #[test]
    fn test_under_n_minutes_is_n(n in 1u32..1000u32, prefix in "[a-z ]{0,30}") {
        prop_assume!(!prefix.contains("hour"));
        let text = format!("{prefix} test under {n} minutes");
        prop_assert_eq!(extract_max_duration(&text), Some(n));
    }

    #[test]
    fn test_two_bounds_take_the_minimum(a in 1u32..500u32, b in 1u32..500u32) {
        let text = format!("under {a} minutes, and no more than {b} minutes");
        prop_assert_eq!(extract_max_duration(&text), Some(a.min(b)));
    }
}
