//! assessrec constraints - Show the constraints extracted from a query

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::formatters::render_constraints;
use crate::cli::output::{emit_human, emit_json, robot_ok};
use crate::error::Result;
use crate::query::{QueryConstraints, extract_constraints};

#[derive(Args, Debug)]
pub struct ConstraintsArgs {
    /// Free-text hiring query
    pub query: String,
}

#[derive(Debug, Serialize)]
struct ConstraintsReport<'a> {
    query: &'a str,
    unconstrained: bool,
    constraints: QueryConstraints,
}

pub fn run(ctx: &AppContext, args: &ConstraintsArgs) -> Result<()> {
    let constraints = extract_constraints(&args.query);

    if ctx.robot_mode {
        return emit_json(&robot_ok(ConstraintsReport {
            query: &args.query,
            unconstrained: constraints.is_unconstrained(),
            constraints,
        }));
    }

    emit_human(render_constraints(&args.query, &constraints));
    Ok(())
}
