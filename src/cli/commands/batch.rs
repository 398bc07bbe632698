//! assessrec batch - Answer many requests in parallel
//!
//! One request per line. Lines starting with `url:` are job-posting URL
//! requests; blank lines and `#` comments are ignored. Output order matches
//! input order.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::app::AppContext;
use crate::cli::formatters::render_response;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok, robot_partial};
use crate::error::{RecError, Result};
use crate::pipeline::{Recommender, SearchResponse};

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// File with one request per line ("-" reads stdin)
    pub file: PathBuf,

    /// Maximum number of results per request
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    /// 1-based line number in the input.
    pub line: usize,
    pub query: String,
    pub is_url: bool,
}

#[derive(Debug, Serialize)]
struct BatchItem {
    line: usize,
    query: String,
    is_url: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<SearchResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<BatchError>,
}

#[derive(Debug, Serialize)]
struct BatchError {
    code: &'static str,
    message: String,
    retryable: bool,
}

/// Parse batch input into requests.
pub fn parse_batch(input: &str) -> Vec<BatchRequest> {
    input
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let (query, is_url) = match line.strip_prefix("url:") {
                Some(rest) => (rest.trim(), true),
                None => (line, false),
            };
            (!query.is_empty()).then(|| BatchRequest {
                line: idx + 1,
                query: query.to_string(),
                is_url,
            })
        })
        .collect()
}

fn read_input(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(file)?)
}

fn answer_all(
    recommender: &Recommender,
    requests: &[BatchRequest],
    limit: usize,
    threads: usize,
) -> Result<Vec<BatchItem>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .map_err(|err| RecError::Config(format!("batch thread pool: {err}")))?;

    Ok(pool.install(|| {
        requests
            .par_iter()
            .map(|request| {
                let outcome = recommender.recommend(&request.query, request.is_url, limit);
                let (response, error) = match outcome {
                    Ok(response) => (Some(response), None),
                    Err(err) => (
                        None,
                        Some(BatchError {
                            code: err.code(),
                            message: err.to_string(),
                            retryable: err.is_retryable(),
                        }),
                    ),
                };
                BatchItem {
                    line: request.line,
                    query: request.query.clone(),
                    is_url: request.is_url,
                    response,
                    error,
                }
            })
            .collect()
    }))
}

pub fn run(ctx: &AppContext, args: &BatchArgs) -> Result<()> {
    let requests = parse_batch(&read_input(&args.file)?);
    if requests.is_empty() {
        return Err(RecError::InputError(format!(
            "no requests found in {}",
            args.file.display()
        )));
    }

    let recommender = ctx.recommender()?;
    let limit = args.limit.unwrap_or(ctx.config.pipeline.default_max_results);
    let items = answer_all(&recommender, &requests, limit, ctx.config.pipeline.max_concurrency)?;

    let failed = items.iter().filter(|item| item.error.is_some()).count();
    let completed = items.len() - failed;
    let stats = recommender.cache_stats();
    info!(
        requests = items.len(),
        completed,
        failed,
        cache_hits = stats.hits,
        "batch complete"
    );

    if ctx.robot_mode {
        return if failed == 0 {
            emit_json(&robot_ok(items))
        } else {
            emit_json(&robot_partial(items, completed, failed))
        };
    }

    for item in &items {
        let mut header = HumanLayout::new();
        header.section(&format!("Line {}: {}", item.line, item.query));
        emit_human(header);
        match (&item.response, &item.error) {
            (Some(response), _) => emit_human(render_response(response)),
            (None, Some(error)) => println!("{} {}\n", style("Error:").red().bold(), error.message),
            (None, None) => {}
        }
    }
    println!("{completed} succeeded, {failed} failed");
    Ok(())
}
