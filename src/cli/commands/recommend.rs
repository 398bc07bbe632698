//! assessrec recommend - Recommend assessments for one query or job posting

use clap::Args;

use crate::app::AppContext;
use crate::cli::formatters::render_response;
use crate::cli::output::{emit_human, emit_json, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Free-text hiring query, or text containing a job-posting URL with --url
    pub query: String,

    /// Treat the query as (or as containing) a job-posting URL
    #[arg(long)]
    pub url: bool,

    /// Maximum number of results (defaults to pipeline.default_max_results)
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &RecommendArgs) -> Result<()> {
    let recommender = ctx.recommender()?;
    let limit = args.limit.unwrap_or(ctx.config.pipeline.default_max_results);
    let response = recommender.recommend(&args.query, args.url, limit)?;

    if ctx.robot_mode {
        let warnings = if response.degraded {
            vec!["query generation failed; searched the raw posting text".to_string()]
        } else {
            Vec::new()
        };
        return emit_json(&robot_ok(response).with_warnings(warnings));
    }

    emit_human(render_response(&response));
    Ok(())
}
