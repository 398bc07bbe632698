//! Integration test suite entry point.

mod pipeline_tests;
mod provider_tests;
