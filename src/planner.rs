//! End-to-end planning.
//!
//! One planning run is a blocking compile → solve → materialize pipeline
//! over caller-owned inputs. The rule list and capacity limits live with
//! the caller's session; nothing here holds state between runs.

use std::collections::HashMap;

use crate::materialize::materialize;
use crate::milp::{compile, MilpSolver, RuleSkip, ScoreWeights, SolveStatus};
use crate::models::{PlanGrid, Roster, Rule};

/// Result of one planning run.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// Solve status; only `Optimal` yields a grid.
    pub status: SolveStatus,
    /// The materialized assignment grid, `None` when no solution was found.
    pub grid: Option<PlanGrid>,
    /// Rules that did not make it into the model.
    pub skipped_rules: Vec<RuleSkip>,
}

impl PlanOutcome {
    /// Whether the run produced an assignment.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

/// Runs one planning pass: compiles the model, solves it, and materializes
/// the grid.
///
/// `limits` maps instrument → max resources per slot (0 or absent means
/// uncapped). Any non-`Optimal` solver status is surfaced as "no solution"
/// in the outcome; nothing panics on infeasibility.
pub fn plan<S: MilpSolver>(
    roster: &Roster,
    limits: &HashMap<String, u32>,
    rules: &[Rule],
    weights: &ScoreWeights,
    solver: &S,
) -> PlanOutcome {
    log::info!(
        "planning {} resources over {} slots ({} rules)",
        roster.resource_count(),
        roster.slot_count(),
        rules.len()
    );
    let model = compile(roster, limits, rules, weights);
    let outcome = solver.solve(&model);
    let grid = materialize(roster, &model, &outcome);

    PlanOutcome {
        status: outcome.status,
        grid,
        skipped_rules: model.skipped,
    }
}
