//! Opaque labels attached to memories.
//!
//! The engine only ever compares labels for equality (and orders them so
//! that iteration is deterministic). [`Label::color_index`] is the single
//! numeric projection, meant for display grouping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A ground-truth label: an integer class id or free text.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Label {
    Int(i64),
    Text(String),
}

impl Label {
    /// Integer projection for colour grouping.
    ///
    /// Integer labels map to themselves; text labels map only when they parse
    /// as an integer.
    pub fn color_index(&self) -> Option<i64> {
        match self {
            Label::Int(i) => Some(*i),
            Label::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(i) => write!(f, "{}", i),
            Label::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Int(value)
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Text(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Text(value)
    }
}
