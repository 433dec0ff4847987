//! User-declared pairing and coverage rules.
//!
//! Rules accumulate in a caller-owned ordered list for the lifetime of a
//! planning session. Each rule is compiled into hard constraints
//! independently; a rule referencing people or slots absent from the
//! current roster is skipped, never fatal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pairing or coverage rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    /// The two people may never be scheduled in the same slot.
    Conflict { a: String, b: String },

    /// The two people are either both in a slot or both out of it,
    /// for every slot (exact per-slot equality, not mere co-occurrence).
    Together { a: String, b: String },

    /// The person plays in every slot (exactly one of their instruments).
    MustAll { person: String },

    /// The person plays in one specific slot.
    ForceShow { person: String, slot: String },

    /// The person plays at least `count` slots in total.
    MinShows { person: String, count: u32 },
}

impl Rule {
    /// Creates a conflict (never-together) rule.
    pub fn conflict(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::Conflict {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Creates an always-together rule.
    pub fn together(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::Together {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Creates an every-slot coverage rule.
    pub fn must_all(person: impl Into<String>) -> Self {
        Self::MustAll {
            person: person.into(),
        }
    }

    /// Creates a specific-slot coverage rule.
    pub fn force_show(person: impl Into<String>, slot: impl Into<String>) -> Self {
        Self::ForceShow {
            person: person.into(),
            slot: slot.into(),
        }
    }

    /// Creates a minimum-total-slots rule.
    pub fn min_shows(person: impl Into<String>, count: u32) -> Self {
        Self::MinShows {
            person: person.into(),
            count,
        }
    }

    /// People this rule refers to.
    pub fn people(&self) -> Vec<&str> {
        match self {
            Self::Conflict { a, b } | Self::Together { a, b } => vec![a, b],
            Self::MustAll { person }
            | Self::ForceShow { person, .. }
            | Self::MinShows { person, .. } => vec![person],
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { a, b } => write!(f, "{a} and {b} never together"),
            Self::Together { a, b } => write!(f, "{a} and {b} always together"),
            Self::MustAll { person } => write!(f, "{person} plays every show"),
            Self::ForceShow { person, slot } => write!(f, "{person} plays {slot}"),
            Self::MinShows { person, count } => {
                write!(f, "{person} plays at least {count} shows")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_rule() {
        let r = Rule::conflict("Alice", "Bob");
        match &r {
            Rule::Conflict { a, b } => {
                assert_eq!(a, "Alice");
                assert_eq!(b, "Bob");
            }
            _ => panic!("wrong variant"),
        }
        assert_eq!(r.people(), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_together_rule() {
        let r = Rule::together("Alice", "Bob");
        assert!(matches!(r, Rule::Together { .. }));
    }

    #[test]
    fn test_must_all_rule() {
        let r = Rule::must_all("Carol");
        assert_eq!(r.people(), vec!["Carol"]);
    }

    #[test]
    fn test_force_show_rule() {
        let r = Rule::force_show("Bob", "Show 2");
        match r {
            Rule::ForceShow { person, slot } => {
                assert_eq!(person, "Bob");
                assert_eq!(slot, "Show 2");
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_min_shows_rule() {
        let r = Rule::min_shows("Dave", 3);
        match r {
            Rule::MinShows { count, .. } => assert_eq!(count, 3),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Rule::force_show("Bob", "Show 2").to_string(),
            "Bob plays Show 2"
        );
        assert_eq!(
            Rule::conflict("A", "B").to_string(),
            "A and B never together"
        );
    }
}
