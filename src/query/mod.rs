//! Query understanding: constraint extraction from free text.

pub mod constraints;
pub mod dictionary;
pub mod extractor;

pub use constraints::QueryConstraints;
pub use extractor::{ConstraintExtractor, extract_constraints, extract_max_duration};
