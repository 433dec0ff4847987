//! Assignment grid (solution) model.
//!
//! A grid is one row per resource with a boolean marker per slot. It is
//! produced by the materializer from a solved model, owned by the caller,
//! and may be hand-edited before being re-checked by the validator.

use serde::{Deserialize, Serialize};

/// A complete assignment grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanGrid {
    /// Slot names, in roster order.
    pub slots: Vec<String>,
    /// One row per resource.
    pub rows: Vec<PlanRow>,
}

/// One resource row of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRow {
    /// Person name.
    pub person: String,
    /// Instrument name.
    pub instrument: String,
    /// One marker per slot, aligned to [`PlanGrid::slots`].
    pub assigned: Vec<bool>,
}

impl PlanRow {
    /// Creates an unassigned row.
    pub fn new(person: impl Into<String>, instrument: impl Into<String>, slots: usize) -> Self {
        Self {
            person: person.into(),
            instrument: instrument.into(),
            assigned: vec![false; slots],
        }
    }

    /// Number of slots this resource is assigned to.
    pub fn total(&self) -> usize {
        self.assigned.iter().filter(|&&a| a).count()
    }
}

impl PlanGrid {
    /// Creates an empty grid over the given slots.
    pub fn new(slots: Vec<String>) -> Self {
        Self {
            slots,
            rows: Vec::new(),
        }
    }

    /// Index of a slot by name.
    pub fn slot_index(&self, slot: &str) -> Option<usize> {
        self.slots.iter().position(|s| s == slot)
    }

    /// Rows belonging to a person.
    pub fn rows_for_person(&self, person: &str) -> Vec<&PlanRow> {
        self.rows.iter().filter(|r| r.person == person).collect()
    }

    /// Rows belonging to an instrument.
    pub fn rows_for_instrument(&self, instrument: &str) -> Vec<&PlanRow> {
        self.rows
            .iter()
            .filter(|r| r.instrument == instrument)
            .collect()
    }

    /// Whether a person is active in a slot on any of their instruments.
    pub fn person_active(&self, person: &str, slot_idx: usize) -> bool {
        self.rows
            .iter()
            .any(|r| r.person == person && r.assigned.get(slot_idx).copied().unwrap_or(false))
    }

    /// Whether the grid contains any row for the person.
    pub fn has_person(&self, person: &str) -> bool {
        self.rows.iter().any(|r| r.person == person)
    }

    /// People in row order, deduplicated.
    pub fn persons(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.person.as_str()) {
                seen.push(row.person.as_str());
            }
        }
        seen
    }

    /// Total number of a person's assignments across all instruments and slots.
    pub fn person_total(&self, person: &str) -> usize {
        self.rows_for_person(person).iter().map(|r| r.total()).sum()
    }

    /// Sets a marker on the (person, instrument) row for a manual edit.
    ///
    /// Returns `false` when the row or slot does not exist.
    pub fn set(&mut self, person: &str, instrument: &str, slot: &str, value: bool) -> bool {
        let Some(slot_idx) = self.slot_index(slot) else {
            return false;
        };
        match self
            .rows
            .iter_mut()
            .find(|r| r.person == person && r.instrument == instrument)
        {
            Some(row) => {
                row.assigned[slot_idx] = value;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> PlanGrid {
        let mut grid = PlanGrid::new(vec!["Show 1".into(), "Show 2".into()]);
        grid.rows.push(PlanRow {
            person: "Alice".into(),
            instrument: "Violin".into(),
            assigned: vec![true, false],
        });
        grid.rows.push(PlanRow {
            person: "Bob".into(),
            instrument: "Violin".into(),
            assigned: vec![false, true],
        });
        grid.rows.push(PlanRow {
            person: "Bob".into(),
            instrument: "Viola".into(),
            assigned: vec![true, false],
        });
        grid
    }

    #[test]
    fn test_row_total() {
        let grid = sample_grid();
        assert_eq!(grid.rows[0].total(), 1);
        assert_eq!(grid.person_total("Bob"), 2);
    }

    #[test]
    fn test_person_active() {
        let grid = sample_grid();
        assert!(grid.person_active("Alice", 0));
        assert!(!grid.person_active("Alice", 1));
        // Bob is active in both slots, on different instruments.
        assert!(grid.person_active("Bob", 0));
        assert!(grid.person_active("Bob", 1));
        assert!(!grid.person_active("Nobody", 0));
    }

    #[test]
    fn test_persons_deduplicated() {
        let grid = sample_grid();
        assert_eq!(grid.persons(), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_rows_for_instrument() {
        let grid = sample_grid();
        assert_eq!(grid.rows_for_instrument("Violin").len(), 2);
        assert_eq!(grid.rows_for_instrument("Viola").len(), 1);
    }

    #[test]
    fn test_manual_edit() {
        let mut grid = sample_grid();
        assert!(grid.set("Alice", "Violin", "Show 2", true));
        assert!(grid.person_active("Alice", 1));

        assert!(!grid.set("Alice", "Cello", "Show 2", true));
        assert!(!grid.set("Alice", "Violin", "Show 9", true));
    }
}
