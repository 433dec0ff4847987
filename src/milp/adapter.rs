//! `good_lp` solver adapter.
//!
//! Bridges a [`CompiledModel`] onto the `good_lp` capability surface
//! (declare variables, add constraints, set objective, solve, read values).
//! The engine behind `default_solver` is whichever backend the crate was
//! built with; this module never depends on a specific one.

use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};

use super::model::{CompiledModel, MilpSolver, Relation, SolveOutcome, SolveStatus};

/// MILP solver backed by `good_lp`'s default engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    /// Creates a new solver.
    pub fn new() -> Self {
        Self
    }
}

impl MilpSolver for GoodLpSolver {
    fn solve(&self, model: &CompiledModel) -> SolveOutcome {
        let mut vars = ProblemVariables::new();
        let lp_vars: Vec<Variable> = (0..model.var_count())
            .map(|_| vars.add(variable().binary()))
            .collect();

        let objective: Expression = model
            .objective()
            .iter()
            .map(|(v, coeff)| *coeff * lp_vars[v.index()])
            .sum();

        let mut problem = vars.maximise(objective).using(default_solver);
        for c in model.constraints() {
            let expr: Expression = c
                .terms
                .iter()
                .map(|(v, coeff)| *coeff * lp_vars[v.index()])
                .sum();
            problem = match c.relation {
                Relation::LessEq => problem.with(constraint!(expr <= c.bound)),
                Relation::Eq => problem.with(constraint!(expr == c.bound)),
                Relation::GreaterEq => problem.with(constraint!(expr >= c.bound)),
            };
        }

        match problem.solve() {
            Ok(solution) => {
                let values = lp_vars.iter().map(|v| solution.value(*v) > 0.5).collect();
                SolveOutcome::optimal(values)
            }
            Err(ResolutionError::Infeasible) => {
                log::info!("model is infeasible");
                SolveOutcome::failed(SolveStatus::Infeasible)
            }
            Err(e) => {
                log::warn!("solver returned no solution: {e}");
                SolveOutcome::failed(SolveStatus::Other)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maximizes_objective() {
        let mut model = CompiledModel::new();
        let v0 = model.add_binary(0, 0);
        let v1 = model.add_binary(1, 0);
        model.set_objective(vec![(v0, 10.0), (v1, 5.0)]);
        model.add_constraint(vec![(v0, 1.0), (v1, 1.0)], Relation::LessEq, 1.0);

        let outcome = GoodLpSolver::new().solve(&model);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!(outcome.value(v0));
        assert!(!outcome.value(v1));
    }

    #[test]
    fn test_negative_weight_left_unassigned() {
        let mut model = CompiledModel::new();
        let v0 = model.add_binary(0, 0);
        model.set_objective(vec![(v0, -100.0)]);

        let outcome = GoodLpSolver::new().solve(&model);
        assert!(outcome.is_optimal());
        assert!(!outcome.value(v0));
    }

    #[test]
    fn test_equality_overrides_penalty() {
        // A hard constraint forces an assignment the objective penalizes.
        let mut model = CompiledModel::new();
        let v0 = model.add_binary(0, 0);
        model.set_objective(vec![(v0, -10_000.0)]);
        model.add_constraint(vec![(v0, 1.0)], Relation::Eq, 1.0);

        let outcome = GoodLpSolver::new().solve(&model);
        assert!(outcome.is_optimal());
        assert!(outcome.value(v0));
    }

    #[test]
    fn test_infeasible_model() {
        let mut model = CompiledModel::new();
        let v0 = model.add_binary(0, 0);
        model.set_objective(vec![(v0, 1.0)]);
        model.add_constraint(vec![(v0, 1.0)], Relation::GreaterEq, 1.0);
        model.add_constraint(vec![(v0, 1.0)], Relation::LessEq, 0.0);

        let outcome = GoodLpSolver::new().solve(&model);
        assert!(!outcome.is_optimal());
        assert!(!outcome.value(v0));
    }
}
