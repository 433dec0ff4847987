//! MILP formulation and solving.
//!
//! [`compiler::compile`] turns a roster, capacity limits, and rules into a
//! solver-agnostic [`CompiledModel`]; any [`MilpSolver`] implementation can
//! solve it. [`GoodLpSolver`] is the bundled `good_lp`-backed engine.

mod adapter;
pub mod compiler;
mod model;

pub use adapter::GoodLpSolver;
pub use compiler::{compile, RuleError, RuleSkip, ScoreWeights};
pub use model::{
    CompiledModel, LinearConstraint, MilpSolver, Relation, SolveOutcome, SolveStatus, VarRef,
};
