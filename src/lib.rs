//! Ensemble roster planner.
//!
//! Assigns (person, instrument) resources to performance slots by
//! compiling a roster, capacity limits, and user-declared pairing rules
//! into a mixed-integer program, solving it, and materializing the result
//! as a reviewable grid. Hand edits to that grid are re-checked against
//! the same invariants by the validator.
//!
//! # Modules
//!
//! - **`models`**: domain types — `Roster`, `Resource`, `Rule`, `PlanGrid`
//! - **`milp`**: constraint compilation and the solver seam
//!   (`CompiledModel`, `MilpSolver`, `GoodLpSolver`)
//! - **`materialize`**: solution → grid, plus the per-person mailing list
//! - **`validation`**: post-edit re-validation of (possibly edited) grids
//! - **`planner`**: one-call compile → solve → materialize pipeline
//!
//! # Example
//!
//! ```
//! use ensemble_planner::milp::{GoodLpSolver, ScoreWeights};
//! use ensemble_planner::models::{RawTable, Roster, Rule};
//! use ensemble_planner::planner::plan;
//! use std::collections::HashMap;
//!
//! let table = RawTable::new(
//!     ["Name", "Instrument", "Wish", "Show 1", "Show 2"]
//!         .iter()
//!         .map(|s| s.to_string())
//!         .collect(),
//! )
//! .with_row(vec!["Alice".into(), "Violin".into(), "2".into(), "3".into(), "3".into()])
//! .with_row(vec!["Carol".into(), "Cello".into(), "-".into(), "3".into(), "3".into()]);
//!
//! let roster = Roster::from_table(&table).unwrap();
//! let limits = HashMap::from([("Violin".to_string(), 1)]);
//! let rules = vec![Rule::must_all("Carol")];
//!
//! let outcome = plan(&roster, &limits, &rules, &ScoreWeights::default(), &GoodLpSolver::new());
//! assert!(outcome.is_optimal());
//! ```

pub mod materialize;
pub mod milp;
pub mod models;
pub mod planner;
pub mod validation;
