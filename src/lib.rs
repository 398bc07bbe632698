//! assessrec - assessment recommendation over a pre-indexed catalog
//!
//! Free-text hiring queries or job-posting URLs go in; a ranked,
//! constraint-satisfying list of catalogued assessments comes out.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod query;
pub mod search;
pub mod test_utils;

pub use error::{RecError, Result};
