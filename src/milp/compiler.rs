//! Constraint compilation.
//!
//! Translates a roster, its capacity limits, and the declared rule list
//! into a [`CompiledModel`]: one binary variable per (resource, slot), a
//! preference-weighted maximize objective, and the hard constraint
//! families (capacity, uniqueness, wish tolerance, rules).
//!
//! Rules compile independently; a rule referencing people or slots missing
//! from the roster is recorded in [`CompiledModel::skipped`] and the rest
//! of the batch still compiles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{CompiledModel, LinearConstraint, Relation, VarRef};
use crate::models::{Roster, Rule};

/// Objective weight per preference score.
///
/// The defaults reproduce the planner's fixed heuristic: scores 0 and 1
/// carry steep penalties so they are de-facto forbidden rather than hard
/// excluded. A hard constraint can still force such an assignment; the
/// objective never volunteers one. The relative ordering
/// `forbidden < discouraged < 0 < acceptable < preferred` is load-bearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight for score 3.
    pub preferred: f64,
    /// Weight for score 2.
    pub acceptable: f64,
    /// Weight for score 1.
    pub discouraged: f64,
    /// Weight for score 0 or a missing/non-numeric cell.
    pub forbidden: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            preferred: 10.0,
            acceptable: 5.0,
            discouraged: -100.0,
            forbidden: -10_000.0,
        }
    }
}

impl ScoreWeights {
    /// Maps a preference score to its objective weight.
    ///
    /// Scores outside 0..=3 contribute nothing to the objective.
    pub fn weight(&self, score: Option<i32>) -> f64 {
        match score {
            Some(3) => self.preferred,
            Some(2) => self.acceptable,
            Some(1) => self.discouraged,
            Some(0) | None => self.forbidden,
            Some(_) => 0.0,
        }
    }
}

/// Why a rule could not be compiled against the current roster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The rule names a person the roster does not contain.
    #[error("unknown person '{0}'")]
    UnknownPerson(String),
    /// The rule names a slot the roster does not contain.
    #[error("unknown slot '{0}'")]
    UnknownSlot(String),
}

/// A rule that was skipped during compilation, with its position in the
/// declared rule list and the reason.
#[derive(Debug, Clone)]
pub struct RuleSkip {
    /// Index in the rule list handed to [`compile`].
    pub index: usize,
    /// The skipped rule.
    pub rule: Rule,
    /// Why it was skipped.
    pub error: RuleError,
}

/// Compiles the full assignment model.
///
/// `limits` maps instrument → maximum resources per slot; an absent entry
/// or a limit of 0 means unlimited. Rules are compiled in declaration
/// order; failures are isolated per rule.
pub fn compile(
    roster: &Roster,
    limits: &HashMap<String, u32>,
    rules: &[Rule],
    weights: &ScoreWeights,
) -> CompiledModel {
    let mut model = CompiledModel::new();

    // Decision variables, resource-major.
    for r in 0..roster.resource_count() {
        for s in 0..roster.slot_count() {
            model.add_binary(r, s);
        }
    }

    // Objective: maximize preference satisfaction.
    let objective: Vec<(VarRef, f64)> = model
        .variables()
        .map(|(var, r, s)| (var, weights.weight(roster.resources[r].preference(s))))
        .collect();
    model.set_objective(objective);

    // Capacity: per slot, per instrument with a declared nonzero limit.
    for s in 0..roster.slot_count() {
        for instrument in roster.instruments() {
            let Some(&limit) = limits.get(instrument) else {
                continue;
            };
            if limit == 0 {
                continue; // 0 means uncapped
            }
            let terms = resource_terms(&model, roster.resources_for_instrument(instrument), s);
            model.add_constraint(terms, Relation::LessEq, f64::from(limit));
        }
    }

    // Uniqueness: a person plays at most one instrument per slot.
    // With a single resource the bound is vacuous for a binary variable.
    for person in roster.persons() {
        let resources = roster.resources_for_person(person);
        if resources.len() < 2 {
            continue;
        }
        for s in 0..roster.slot_count() {
            let terms = resource_terms(&model, resources, s);
            model.add_constraint(terms, Relation::LessEq, 1.0);
        }
    }

    // Wish tolerance: total assignments within wish ± 1.
    for person in roster.persons() {
        let Some(wish) = roster.wish(person) else {
            continue;
        };
        let terms = person_total_terms(&model, roster, person);
        model.add_constraint(
            terms.clone(),
            Relation::GreaterEq,
            f64::from(wish.saturating_sub(1)),
        );
        model.add_constraint(terms, Relation::LessEq, f64::from(wish + 1));
    }

    // Rule constraints, one rule at a time.
    for (index, rule) in rules.iter().enumerate() {
        match compile_rule(&model, roster, rule) {
            Ok(constraints) => {
                for c in constraints {
                    model.add_constraint(c.terms, c.relation, c.bound);
                }
            }
            Err(error) => {
                log::warn!("skipping rule #{index} ({rule}): {error}");
                model.skipped.push(RuleSkip {
                    index,
                    rule: rule.clone(),
                    error,
                });
            }
        }
    }

    log::info!(
        "compiled model: {} variables, {} constraints, {} rules skipped",
        model.var_count(),
        model.constraint_count(),
        model.skipped.len()
    );
    model
}

/// Compiles one rule into constraints.
///
/// # Errors
/// [`RuleError`] when a referenced person or slot is absent; the caller
/// skips the rule and keeps going.
fn compile_rule(
    model: &CompiledModel,
    roster: &Roster,
    rule: &Rule,
) -> Result<Vec<LinearConstraint>, RuleError> {
    for person in rule.people() {
        if !roster.has_person(person) {
            return Err(RuleError::UnknownPerson(person.to_string()));
        }
    }

    let mut constraints = Vec::new();
    match rule {
        Rule::Conflict { a, b } => {
            for s in 0..roster.slot_count() {
                let mut terms = person_slot_terms(model, roster, a, s);
                terms.extend(person_slot_terms(model, roster, b, s));
                constraints.push(LinearConstraint {
                    terms,
                    relation: Relation::LessEq,
                    bound: 1.0,
                });
            }
        }
        Rule::Together { a, b } => {
            // Per-slot activity of a and b must be exactly equal.
            for s in 0..roster.slot_count() {
                let mut terms = person_slot_terms(model, roster, a, s);
                terms.extend(
                    person_slot_terms(model, roster, b, s)
                        .into_iter()
                        .map(|(v, c)| (v, -c)),
                );
                constraints.push(LinearConstraint {
                    terms,
                    relation: Relation::Eq,
                    bound: 0.0,
                });
            }
        }
        Rule::MustAll { person } => {
            for s in 0..roster.slot_count() {
                constraints.push(LinearConstraint {
                    terms: person_slot_terms(model, roster, person, s),
                    relation: Relation::Eq,
                    bound: 1.0,
                });
            }
        }
        Rule::ForceShow { person, slot } => {
            let s = roster
                .slot_index(slot)
                .ok_or_else(|| RuleError::UnknownSlot(slot.clone()))?;
            constraints.push(LinearConstraint {
                terms: person_slot_terms(model, roster, person, s),
                relation: Relation::Eq,
                bound: 1.0,
            });
        }
        Rule::MinShows { person, count } => {
            constraints.push(LinearConstraint {
                terms: person_total_terms(model, roster, person),
                relation: Relation::GreaterEq,
                bound: f64::from(*count),
            });
        }
    }
    Ok(constraints)
}

/// Unit terms for a set of resources in one slot.
fn resource_terms(model: &CompiledModel, resources: &[usize], slot: usize) -> Vec<(VarRef, f64)> {
    resources
        .iter()
        .filter_map(|&r| model.var(r, slot))
        .map(|v| (v, 1.0))
        .collect()
}

/// Unit terms for all of a person's resources in one slot.
fn person_slot_terms(
    model: &CompiledModel,
    roster: &Roster,
    person: &str,
    slot: usize,
) -> Vec<(VarRef, f64)> {
    resource_terms(model, roster.resources_for_person(person), slot)
}

/// Unit terms for all of a person's resources across all slots.
fn person_total_terms(model: &CompiledModel, roster: &Roster, person: &str) -> Vec<(VarRef, f64)> {
    let mut terms = Vec::new();
    for s in 0..roster.slot_count() {
        terms.extend(person_slot_terms(model, roster, person, s));
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawTable;

    fn sample_roster() -> Roster {
        let table = RawTable::new(
            ["Name", "Instrument", "Wish", "Show 1", "Show 2"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .with_row(vec![
            "Alice".into(),
            "Violin".into(),
            "2".into(),
            "3".into(),
            "3".into(),
        ])
        .with_row(vec![
            "Bob".into(),
            "Violin, Viola".into(),
            "-".into(),
            "2".into(),
            "1".into(),
        ])
        .with_row(vec![
            "Carol".into(),
            "Cello".into(),
            "".into(),
            "3".into(),
            "0".into(),
        ]);
        Roster::from_table(&table).unwrap()
    }

    #[test]
    fn test_score_weights() {
        let w = ScoreWeights::default();
        assert_eq!(w.weight(Some(3)), 10.0);
        assert_eq!(w.weight(Some(2)), 5.0);
        assert_eq!(w.weight(Some(1)), -100.0);
        assert_eq!(w.weight(Some(0)), -10_000.0);
        assert_eq!(w.weight(None), -10_000.0);
        assert_eq!(w.weight(Some(7)), 0.0);
    }

    #[test]
    fn test_one_variable_per_resource_slot() {
        let roster = sample_roster();
        let model = compile(&roster, &HashMap::new(), &[], &ScoreWeights::default());
        // 4 resources × 2 slots.
        assert_eq!(model.var_count(), 8);
        assert!(model.var(3, 1).is_some());
    }

    #[test]
    fn test_objective_follows_preferences() {
        let roster = sample_roster();
        let model = compile(&roster, &HashMap::new(), &[], &ScoreWeights::default());

        let coeff = |r: usize, s: usize| {
            let var = model.var(r, s).unwrap();
            model
                .objective()
                .iter()
                .find(|(v, _)| *v == var)
                .map(|(_, c)| *c)
                .unwrap()
        };
        assert_eq!(coeff(0, 0), 10.0); // Alice score 3
        assert_eq!(coeff(1, 0), 5.0); // Bob score 2
        assert_eq!(coeff(1, 1), -100.0); // Bob score 1
        assert_eq!(coeff(3, 1), -10_000.0); // Carol score 0
    }

    #[test]
    fn test_base_constraint_families() {
        let roster = sample_roster();
        let model = compile(&roster, &HashMap::new(), &[], &ScoreWeights::default());
        // Uniqueness for Bob (2 slots) + wish band for Alice (2 bounds).
        assert_eq!(model.constraint_count(), 4);
    }

    #[test]
    fn test_capacity_constraints() {
        let roster = sample_roster();
        let limits = HashMap::from([
            ("Violin".to_string(), 1),
            ("Cello".to_string(), 0), // 0 = uncapped, no constraint
        ]);
        let model = compile(&roster, &limits, &[], &ScoreWeights::default());
        // 2 capacity (Violin × 2 slots) on top of the 4 base constraints.
        assert_eq!(model.constraint_count(), 6);

        let capacity = &model.constraints()[0];
        assert_eq!(capacity.relation, Relation::LessEq);
        assert_eq!(capacity.bound, 1.0);
        assert_eq!(capacity.terms.len(), 2); // Alice (Violin), Bob (Violin)
    }

    #[test]
    fn test_rule_constraint_counts() {
        let roster = sample_roster();
        let weights = ScoreWeights::default();
        let base = compile(&roster, &HashMap::new(), &[], &weights).constraint_count();

        let per_rule = [
            (Rule::conflict("Alice", "Bob"), 2),
            (Rule::together("Alice", "Carol"), 2),
            (Rule::must_all("Carol"), 2),
            (Rule::force_show("Bob", "Show 2"), 1),
            (Rule::min_shows("Alice", 2), 1),
        ];
        for (rule, expected) in per_rule {
            let model = compile(&roster, &HashMap::new(), &[rule.clone()], &weights);
            assert!(model.skipped.is_empty(), "rule {rule} was skipped");
            assert_eq!(model.constraint_count(), base + expected, "rule {rule}");
        }
    }

    #[test]
    fn test_together_is_exact_equality() {
        let roster = sample_roster();
        let model = compile(
            &roster,
            &HashMap::new(),
            &[Rule::together("Alice", "Bob")],
            &ScoreWeights::default(),
        );
        let eq = model
            .constraints()
            .iter()
            .find(|c| c.relation == Relation::Eq)
            .unwrap();
        assert_eq!(eq.bound, 0.0);
        // Alice has 1 resource (+1), Bob has 2 (−1 each).
        let positives = eq.terms.iter().filter(|(_, c)| *c > 0.0).count();
        let negatives = eq.terms.iter().filter(|(_, c)| *c < 0.0).count();
        assert_eq!((positives, negatives), (1, 2));
    }

    #[test]
    fn test_unknown_person_skipped() {
        let roster = sample_roster();
        let model = compile(
            &roster,
            &HashMap::new(),
            &[Rule::conflict("Alice", "Zed")],
            &ScoreWeights::default(),
        );
        assert_eq!(model.skipped.len(), 1);
        assert_eq!(
            model.skipped[0].error,
            RuleError::UnknownPerson("Zed".into())
        );
    }

    #[test]
    fn test_unknown_slot_skipped() {
        let roster = sample_roster();
        let model = compile(
            &roster,
            &HashMap::new(),
            &[Rule::force_show("Alice", "Show 9")],
            &ScoreWeights::default(),
        );
        assert_eq!(model.skipped.len(), 1);
        assert_eq!(model.skipped[0].error, RuleError::UnknownSlot("Show 9".into()));
    }

    #[test]
    fn test_failed_rule_does_not_abort_batch() {
        let roster = sample_roster();
        let weights = ScoreWeights::default();
        let base = compile(&roster, &HashMap::new(), &[], &weights).constraint_count();

        let rules = vec![
            Rule::force_show("Ghost", "Show 1"), // skipped
            Rule::must_all("Carol"),             // still compiled
        ];
        let model = compile(&roster, &HashMap::new(), &rules, &weights);
        assert_eq!(model.skipped.len(), 1);
        assert_eq!(model.skipped[0].index, 0);
        assert_eq!(model.constraint_count(), base + 2);
    }
}
