//! Planning domain models.
//!
//! Core data types for one planning run: the normalized roster (people,
//! instruments, slots, preferences), the user-declared rule list, and the
//! assignment grid produced by a solve or edited by hand.

mod grid;
mod roster;
mod rule;

pub use grid::{PlanGrid, PlanRow};
pub use roster::{ColumnKind, RawTable, Resource, Roster, RosterError};
pub use rule::Rule;
