//! Property test suite entry point.

mod determinism_tests;
mod retrieval_tests;
