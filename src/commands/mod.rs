//! # CLI Command Implementations
//!
//! Each subcommand of the `gitops-bootstrap` tool lives in its own file with
//! an `Args` struct derived using `clap` and an `execute` function that
//! calls into the `gitops_bootstrap` library.

pub mod bootstrap;
pub mod gitops;
pub mod metaphor;
pub mod platforms;

use gitops_bootstrap::plan::Plan;

/// Print a plan as a numbered list of steps.
fn print_plan(plan: &Plan) {
    println!("🔎 DRY RUN - {} plan ({} steps)", plan.name(), plan.len());
    for (index, step) in plan.steps().iter().enumerate() {
        println!("  {:>2}. {}", index + 1, step);
    }
}
