//! Roster ingestion and schema detection.
//!
//! The roster arrives as a raw table from an external parser (spreadsheet,
//! form export). Ingestion classifies every column against a fixed set of
//! reserved names, expands multi-instrument cells into one resource per
//! instrument, and produces the lookup maps the compiler and validator need.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A raw roster table as delivered by an external parser.
///
/// `rows` are positional: cell `i` of a row belongs to `columns[i]`.
/// Short rows are padded with empty cells during ingestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTable {
    /// Column headers, in original order.
    pub columns: Vec<String>,
    /// Data rows, cells aligned to `columns`.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Creates an empty table with the given headers.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a data row.
    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Builder: appends a data row and returns self.
    pub fn with_row(mut self, cells: Vec<String>) -> Self {
        self.push_row(cells);
        self
    }

    /// Generates a blank roster skeleton for manual fill-in.
    ///
    /// `sections` lists (instrument, seat count) pairs; one placeholder row
    /// is produced per seat. Slot columns are named `Show 1..Show n` and all
    /// wish/preference cells start as `-` (unset).
    pub fn template(sections: &[(String, usize)], slot_count: usize) -> Self {
        let mut columns = vec![
            "Name".to_string(),
            "Instrument".to_string(),
            "Wish".to_string(),
        ];
        for i in 0..slot_count {
            columns.push(format!("Show {}", i + 1));
        }

        let mut table = Self::new(columns);
        for (instrument, seats) in sections {
            for seat in 0..*seats {
                let mut row = vec![
                    format!("Name {}", seat + 1),
                    instrument.clone(),
                    "-".to_string(),
                ];
                row.extend(std::iter::repeat("-".to_string()).take(slot_count));
                table.push_row(row);
            }
        }
        table
    }
}

/// Classification of a roster column.
///
/// Everything that is not a reserved column is a schedulable slot; slot
/// order follows column order and is preserved end-to-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Person name (required).
    Person,
    /// Instrument list (required). May hold several comma-separated entries.
    Instrument,
    /// Desired total number of slots (required column, optional value).
    Wish,
    /// Free-form tag, ignored by the planner.
    Label,
    /// Form-export timestamp, ignored.
    Timestamp,
    /// E-mail address, captured for the mailing list.
    Email,
    /// A schedulable performance slot.
    Slot,
}

impl ColumnKind {
    /// Classifies a column header.
    pub fn classify(name: &str) -> Self {
        match name.trim() {
            "Name" => Self::Person,
            "Instrument" => Self::Instrument,
            "Wish" => Self::Wish,
            "Label" => Self::Label,
            other if other.contains("Timestamp") => Self::Timestamp,
            other if other.to_lowercase().contains("mail") => Self::Email,
            _ => Self::Slot,
        }
    }
}

/// Fatal roster ingestion errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// One or more of the required columns (Name, Instrument, Wish) is absent.
    #[error("roster is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// One assignable unit: a (person, instrument) pair.
///
/// A multi-instrumentalist owns one resource per instrument. Resource IDs
/// are unique across the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique identifier, `"Person (Instrument)"`.
    pub id: String,
    /// Person name.
    pub person: String,
    /// Instrument name.
    pub instrument: String,
    /// Preference score per slot, aligned to the roster's slot order.
    /// `None` means the cell was empty or non-numeric.
    pub preferences: Vec<Option<i32>>,
}

impl Resource {
    /// Preference score for a slot (`None` if absent or out of range).
    pub fn preference(&self, slot_idx: usize) -> Option<i32> {
        self.preferences.get(slot_idx).copied().flatten()
    }
}

/// Normalized roster for one planning run.
///
/// Owns the resource list, the ordered slot list, and the person/instrument
/// lookup maps. The roster is immutable once built; solves and validations
/// borrow it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    /// Resources in expansion order.
    pub resources: Vec<Resource>,
    /// Slot names in original column order.
    pub slots: Vec<String>,
    persons: Vec<String>,
    instruments: Vec<String>,
    person_resources: HashMap<String, Vec<usize>>,
    instrument_resources: HashMap<String, Vec<usize>>,
    wishes: HashMap<String, u32>,
    emails: HashMap<String, String>,
}

impl Roster {
    /// Builds a roster from a raw table.
    ///
    /// - Rows with an empty person or instrument cell are dropped.
    /// - Comma-separated instrument cells are expanded into one resource per
    ///   instrument.
    /// - Duplicate (person, instrument) pairs keep the first occurrence.
    /// - Wish values are taken from a person's first row; only positive
    ///   integers constrain the solve.
    ///
    /// # Errors
    /// [`RosterError::MissingColumns`] when Name, Instrument, or Wish is
    /// absent from the header row.
    pub fn from_table(table: &RawTable) -> Result<Self, RosterError> {
        let mut person_col = None;
        let mut instrument_col = None;
        let mut wish_col = None;
        let mut email_col = None;
        let mut slot_cols: Vec<(usize, String)> = Vec::new();

        for (i, name) in table.columns.iter().enumerate() {
            match ColumnKind::classify(name) {
                ColumnKind::Person => person_col = person_col.or(Some(i)),
                ColumnKind::Instrument => instrument_col = instrument_col.or(Some(i)),
                ColumnKind::Wish => wish_col = wish_col.or(Some(i)),
                ColumnKind::Email => email_col = email_col.or(Some(i)),
                ColumnKind::Slot => slot_cols.push((i, name.trim().to_string())),
                ColumnKind::Label | ColumnKind::Timestamp => {}
            }
        }

        let mut missing = Vec::new();
        if person_col.is_none() {
            missing.push("Name".to_string());
        }
        if instrument_col.is_none() {
            missing.push("Instrument".to_string());
        }
        if wish_col.is_none() {
            missing.push("Wish".to_string());
        }
        if !missing.is_empty() {
            return Err(RosterError::MissingColumns(missing));
        }
        let (person_col, instrument_col, wish_col) =
            (person_col.unwrap(), instrument_col.unwrap(), wish_col.unwrap());

        let mut roster = Roster {
            slots: slot_cols.iter().map(|(_, n)| n.clone()).collect(),
            ..Roster::default()
        };
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut wish_seen: HashSet<String> = HashSet::new();

        for row in &table.rows {
            let cell = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or("");

            let person = cell(person_col);
            let instrument_cell = cell(instrument_col);
            if person.is_empty() || instrument_cell.is_empty() {
                log::debug!("dropping roster row with empty person or instrument");
                continue;
            }

            // First row per person wins, even when it holds no number.
            if wish_seen.insert(person.to_string()) {
                if let Ok(wish) = cell(wish_col).parse::<u32>() {
                    if wish > 0 {
                        roster.wishes.insert(person.to_string(), wish);
                    }
                }
            }
            if let Some(email_col) = email_col {
                let email = cell(email_col);
                if !email.is_empty() {
                    roster
                        .emails
                        .entry(person.to_string())
                        .or_insert_with(|| email.to_string());
                }
            }

            let preferences: Vec<Option<i32>> = slot_cols
                .iter()
                .map(|(i, _)| cell(*i).parse::<i32>().ok())
                .collect();

            for instrument in instrument_cell
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
            {
                let id = format!("{person} ({instrument})");
                if !seen_ids.insert(id.clone()) {
                    log::warn!("duplicate resource '{id}' ignored");
                    continue;
                }

                let idx = roster.resources.len();
                if !roster.persons.iter().any(|p| p == person) {
                    roster.persons.push(person.to_string());
                }
                if !roster.instruments.iter().any(|i| i == instrument) {
                    roster.instruments.push(instrument.to_string());
                }
                roster
                    .person_resources
                    .entry(person.to_string())
                    .or_default()
                    .push(idx);
                roster
                    .instrument_resources
                    .entry(instrument.to_string())
                    .or_default()
                    .push(idx);
                roster.resources.push(Resource {
                    id,
                    person: person.to_string(),
                    instrument: instrument.to_string(),
                    preferences: preferences.clone(),
                });
            }
        }

        Ok(roster)
    }

    /// People in first-seen order.
    pub fn persons(&self) -> &[String] {
        &self.persons
    }

    /// Instruments in first-seen order.
    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    /// Resource indices owned by a person (empty for unknown people).
    pub fn resources_for_person(&self, person: &str) -> &[usize] {
        self.person_resources
            .get(person)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resource indices for an instrument (empty for unknown instruments).
    pub fn resources_for_instrument(&self, instrument: &str) -> &[usize] {
        self.instrument_resources
            .get(instrument)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The person's wish count, if a positive integer was given.
    pub fn wish(&self, person: &str) -> Option<u32> {
        self.wishes.get(person).copied()
    }

    /// The person's e-mail address, if an email column was present.
    pub fn email(&self, person: &str) -> Option<&str> {
        self.emails.get(person).map(String::as_str)
    }

    /// Whether the person appears in the roster.
    pub fn has_person(&self, person: &str) -> bool {
        self.person_resources.contains_key(person)
    }

    /// Index of a slot by name.
    pub fn slot_index(&self, slot: &str) -> Option<usize> {
        self.slots.iter().position(|s| s == slot)
    }

    /// Number of resources.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
