//! Native values of the reference VM.

use std::fmt;

use arbor_types::Kind;

/// A value the VM can hold in a step slot.
///
/// Deliberately narrower than the tree's literal set: the VM has no string
/// representation, so `Str` trees are rejected at lowering rather than
/// carried here. Keeping the set `Copy` makes frames and memo tables cheap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Bool(bool),
}

impl Value {
    /// The kind of this value.
    #[must_use]
    pub const fn kind(self) -> Kind {
        match self {
            Value::Int(_) => Kind::Int,
            Value::Bool(_) => Kind::Bool,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{value}"),
            Value::Bool(value) => write!(f, "{value}"),
        }
    }
}
