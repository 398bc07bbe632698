//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod batch;
pub mod constraints;
pub mod index;
pub mod recommend;

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Index(args) => index::run(ctx, args),
        Commands::Recommend(args) => recommend::run(ctx, args),
        Commands::Batch(args) => batch::run(ctx, args),
        Commands::Constraints(args) => constraints::run(ctx, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Embed the catalog and write the index snapshot
    Index(index::IndexArgs),

    /// Recommend assessments for a query or job posting
    Recommend(recommend::RecommendArgs),

    /// Answer a file of requests in parallel
    Batch(batch::BatchArgs),

    /// Show the constraints extracted from a query
    Constraints(constraints::ConstraintsArgs),
}
