//! Post-edit validation of assignment grids.
//!
//! Re-checks, against an arbitrary grid (solver output or a hand-edited
//! copy), the same invariants the compiler encodes as hard constraints:
//! - Capacity overage per (slot, instrument)
//! - Double booking: one person on two instruments in the same slot
//! - Every declared rule
//!
//! All findings are collected; no check short-circuits the rest, and a
//! rule that no longer matches the grid (stale person or slot) is skipped
//! exactly as the compiler skips it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{PlanGrid, Rule};

/// A detected inconsistency in an assignment grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Violation category.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of grid violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// More resources of one instrument in a slot than its limit allows.
    CapacityExceeded,
    /// A person holds more than one marker in a single slot.
    DoubleBooking,
    /// A conflict rule's two people share a slot.
    ConflictViolated,
    /// A together rule's two people diverge in some slot.
    TogetherViolated,
    /// A must-all rule's person misses at least one slot.
    MustAllViolated,
    /// A force-show rule's person misses the targeted slot.
    ForceShowViolated,
    /// A min-shows rule's person is below the required total.
    MinShowsViolated,
}

impl Violation {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a grid against capacity limits and the declared rules.
///
/// Pure function of its inputs; safe to call repeatedly on the same grid.
/// Returns every violation found, in check order (capacity, double
/// booking, rules in declaration order). An empty vector means the grid is
/// consistent with all declared constraints, though not necessarily
/// optimal.
pub fn validate(grid: &PlanGrid, limits: &HashMap<String, u32>, rules: &[Rule]) -> Vec<Violation> {
    let mut violations = Vec::new();

    check_capacity(grid, limits, &mut violations);
    check_double_booking(grid, &mut violations);
    for rule in rules {
        check_rule(grid, rule, &mut violations);
    }

    violations
}

/// Capacity overage per (slot, instrument with a nonzero limit).
fn check_capacity(grid: &PlanGrid, limits: &HashMap<String, u32>, out: &mut Vec<Violation>) {
    let mut instruments: Vec<&str> = Vec::new();
    for row in &grid.rows {
        if !instruments.contains(&row.instrument.as_str()) {
            instruments.push(&row.instrument);
        }
    }

    for (s, slot) in grid.slots.iter().enumerate() {
        for &instrument in &instruments {
            let Some(&limit) = limits.get(instrument) else {
                continue;
            };
            if limit == 0 {
                continue;
            }
            let count = grid
                .rows_for_instrument(instrument)
                .iter()
                .filter(|r| r.assigned[s])
                .count();
            if count > limit as usize {
                out.push(Violation::new(
                    ViolationKind::CapacityExceeded,
                    format!("{count} × {instrument} in {slot} (limit {limit})"),
                ));
            }
        }
    }
}

/// A person with more than one marker in the same slot.
fn check_double_booking(grid: &PlanGrid, out: &mut Vec<Violation>) {
    for person in grid.persons() {
        let rows = grid.rows_for_person(person);
        for (s, slot) in grid.slots.iter().enumerate() {
            let played: Vec<&str> = rows
                .iter()
                .filter(|r| r.assigned[s])
                .map(|r| r.instrument.as_str())
                .collect();
            if played.len() > 1 {
                out.push(Violation::new(
                    ViolationKind::DoubleBooking,
                    format!(
                        "{person} plays {} instruments at once in {slot} ({})",
                        played.len(),
                        played.join(", ")
                    ),
                ));
            }
        }
    }
}

/// Re-checks one rule against the grid. Stale rules are skipped.
fn check_rule(grid: &PlanGrid, rule: &Rule, out: &mut Vec<Violation>) {
    if rule.people().into_iter().any(|p| !grid.has_person(p)) {
        log::debug!("skipping stale rule ({rule})");
        return;
    }

    match rule {
        Rule::Conflict { a, b } => {
            let shared = slot_names(grid, |s| {
                grid.person_active(a, s) && grid.person_active(b, s)
            });
            if !shared.is_empty() {
                out.push(Violation::new(
                    ViolationKind::ConflictViolated,
                    format!("{a} and {b} are scheduled together in {}", shared.join(", ")),
                ));
            }
        }
        Rule::Together { a, b } => {
            let diverging = slot_names(grid, |s| {
                grid.person_active(a, s) != grid.person_active(b, s)
            });
            if !diverging.is_empty() {
                out.push(Violation::new(
                    ViolationKind::TogetherViolated,
                    format!("{a} and {b} diverge in {}", diverging.join(", ")),
                ));
            }
        }
        Rule::MustAll { person } => {
            let missing = slot_names(grid, |s| !grid.person_active(person, s));
            if !missing.is_empty() {
                out.push(Violation::new(
                    ViolationKind::MustAllViolated,
                    format!("{person} is missing from {}", missing.join(", ")),
                ));
            }
        }
        Rule::ForceShow { person, slot } => {
            let Some(s) = grid.slot_index(slot) else {
                log::debug!("skipping stale rule ({rule}): unknown slot");
                return;
            };
            if !grid.person_active(person, s) {
                out.push(Violation::new(
                    ViolationKind::ForceShowViolated,
                    format!("{person} is missing from {slot}"),
                ));
            }
        }
        Rule::MinShows { person, count } => {
            let total = grid.person_total(person);
            if total < *count as usize {
                out.push(Violation::new(
                    ViolationKind::MinShowsViolated,
                    format!("{person} has {total} shows (minimum {count})"),
                ));
            }
        }
    }
}

/// Names of the slots matching a predicate, in slot order.
fn slot_names(grid: &PlanGrid, pred: impl Fn(usize) -> bool) -> Vec<String> {
    grid.slots
        .iter()
        .enumerate()
        .filter(|&(s, _)| pred(s))
        .map(|(_, name)| name.clone())
        .collect()
}
