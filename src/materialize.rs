//! Result materialization.
//!
//! Turns a solved model back into a human-reviewable [`PlanGrid`]: one row
//! per resource, grouped by instrument in first-seen order and sorted by
//! person name within a group. Also derives the per-person mailing list
//! handed to the export layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::milp::{CompiledModel, SolveOutcome};
use crate::models::{PlanGrid, PlanRow, Roster};

/// Materializes an assignment grid from a solved model.
///
/// Returns `None` for any non-optimal outcome; only `Optimal` carries a
/// usable variable assignment.
pub fn materialize(
    roster: &Roster,
    model: &CompiledModel,
    outcome: &SolveOutcome,
) -> Option<PlanGrid> {
    if !outcome.is_optimal() {
        return None;
    }

    let mut grid = PlanGrid::new(roster.slots.clone());
    for (r, resource) in roster.resources.iter().enumerate() {
        let mut row = PlanRow::new(&resource.person, &resource.instrument, roster.slot_count());
        for s in 0..roster.slot_count() {
            if let Some(var) = model.var(r, s) {
                row.assigned[s] = outcome.value(var);
            }
        }
        grid.rows.push(row);
    }

    let rank: HashMap<&str, usize> = roster
        .instruments()
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    grid.rows.sort_by(|a, b| {
        let ra = rank.get(a.instrument.as_str()).copied().unwrap_or(usize::MAX);
        let rb = rank.get(b.instrument.as_str()).copied().unwrap_or(usize::MAX);
        ra.cmp(&rb).then_with(|| a.person.cmp(&b.person))
    });

    log::info!(
        "materialized grid: {} rows, {} assignments",
        grid.rows.len(),
        grid.rows.iter().map(PlanRow::total).sum::<usize>()
    );
    Some(grid)
}

/// One per-person line of the mailing list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailingEntry {
    /// Person name.
    pub person: String,
    /// E-mail address, when the roster had an email column.
    pub email: Option<String>,
    /// Instruments the person appears with in the grid.
    pub instruments: Vec<String>,
    /// Slots the person is scheduled for, in slot order.
    pub slots: Vec<String>,
}

/// Builds the per-person mailing list from the current grid.
///
/// Entries follow grid row order; people without assignments still get an
/// entry with an empty slot list, so everyone can be notified.
pub fn mailing_list(roster: &Roster, grid: &PlanGrid) -> Vec<MailingEntry> {
    grid.persons()
        .into_iter()
        .map(|person| {
            let instruments = grid
                .rows_for_person(person)
                .iter()
                .map(|r| r.instrument.clone())
                .collect();
            let slots = grid
                .slots
                .iter()
                .enumerate()
                .filter(|&(s, _)| grid.person_active(person, s))
                .map(|(_, name)| name.clone())
                .collect();
            MailingEntry {
                person: person.to_string(),
                email: roster.email(person).map(str::to_string),
                instruments,
                slots,
            }
        })
        .collect()
}
