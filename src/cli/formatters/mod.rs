//! Output formatters for CLI commands

pub mod recommendations;

pub use recommendations::{render_constraints, render_response};
