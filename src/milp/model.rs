//! Solver-agnostic MILP model.
//!
//! A [`CompiledModel`] is the neutral contract between the constraint
//! compiler and whichever engine solves it: binary variables keyed by
//! (resource, slot), linear constraints, and a maximize objective. Engines
//! plug in behind the [`MilpSolver`] trait and never see domain types.

use std::collections::HashMap;

use super::compiler::RuleSkip;

/// Opaque handle to one binary decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarRef(usize);

impl VarRef {
    /// Position of the variable in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Comparison relation of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `expr <= bound`
    LessEq,
    /// `expr == bound`
    Eq,
    /// `expr >= bound`
    GreaterEq,
}

/// One linear constraint: `Σ coeff·var  relation  bound`.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    /// Variable terms with coefficients.
    pub terms: Vec<(VarRef, f64)>,
    /// Comparison relation.
    pub relation: Relation,
    /// Right-hand side.
    pub bound: f64,
}

/// A compiled assignment model, ready to hand to a [`MilpSolver`].
#[derive(Debug, Clone, Default)]
pub struct CompiledModel {
    vars: Vec<(usize, usize)>,
    index: HashMap<(usize, usize), VarRef>,
    objective: Vec<(VarRef, f64)>,
    constraints: Vec<LinearConstraint>,
    /// Rules that could not be compiled, with the reason each was skipped.
    pub skipped: Vec<RuleSkip>,
}

impl CompiledModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a binary variable for a (resource, slot) pair.
    ///
    /// Declaring the same pair twice returns the existing variable.
    pub fn add_binary(&mut self, resource: usize, slot: usize) -> VarRef {
        if let Some(&var) = self.index.get(&(resource, slot)) {
            return var;
        }
        let var = VarRef(self.vars.len());
        self.vars.push((resource, slot));
        self.index.insert((resource, slot), var);
        var
    }

    /// Looks up the variable for a (resource, slot) pair.
    pub fn var(&self, resource: usize, slot: usize) -> Option<VarRef> {
        self.index.get(&(resource, slot)).copied()
    }

    /// The (resource, slot) pair a variable stands for.
    pub fn assignment(&self, var: VarRef) -> (usize, usize) {
        self.vars[var.0]
    }

    /// All variables in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = (VarRef, usize, usize)> + '_ {
        self.vars
            .iter()
            .enumerate()
            .map(|(i, &(r, s))| (VarRef(i), r, s))
    }

    /// Adds a linear constraint.
    pub fn add_constraint(&mut self, terms: Vec<(VarRef, f64)>, relation: Relation, bound: f64) {
        self.constraints.push(LinearConstraint {
            terms,
            relation,
            bound,
        });
    }

    /// Sets the (maximized) linear objective.
    pub fn set_objective(&mut self, terms: Vec<(VarRef, f64)>) {
        self.objective = terms;
    }

    /// Objective terms, maximized by the solver.
    pub fn objective(&self) -> &[(VarRef, f64)] {
        &self.objective
    }

    /// All constraints.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Number of declared variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

/// Outcome classification of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// An optimal assignment was found.
    Optimal,
    /// The constraints admit no assignment at all.
    Infeasible,
    /// Any other engine outcome (unbounded, error, timeout).
    Other,
}

/// Result of one solve. Only `Optimal` outcomes carry variable values.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Solve status.
    pub status: SolveStatus,
    values: Vec<bool>,
}

impl SolveOutcome {
    /// An optimal outcome with one value per declared variable.
    pub fn optimal(values: Vec<bool>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
        }
    }

    /// A failed outcome carrying no values.
    pub fn failed(status: SolveStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
        }
    }

    /// Whether an optimal assignment was found.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// The solved value of a variable (`false` when there is no solution).
    pub fn value(&self, var: VarRef) -> bool {
        self.values.get(var.index()).copied().unwrap_or(false)
    }
}

/// Capability interface to an external MILP engine.
///
/// One solve is a blocking call; implementations must map every engine
/// failure to a non-`Optimal` status instead of panicking.
pub trait MilpSolver {
    /// Solves the model, maximizing its objective.
    fn solve(&self, model: &CompiledModel) -> SolveOutcome;
}
