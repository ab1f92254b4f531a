//! Literal values.

use std::fmt;

use arbor_types::Kind;

/// A literal constant carried by a tree node.
///
/// The variant fixes the kind, so a stored value can never disagree with
/// its declared kind.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum LitValue {
    /// 64-bit signed integer.
    Int(i64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Str(String),
}

impl LitValue {
    /// The literal's primitive kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            LitValue::Int(_) => Kind::Int,
            LitValue::Bool(_) => Kind::Bool,
            LitValue::Str(_) => Kind::Str,
        }
    }
}

impl fmt::Display for LitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LitValue::Int(value) => write!(f, "{value}"),
            LitValue::Bool(value) => write!(f, "{value}"),
            LitValue::Str(value) => write!(f, "{value:?}"),
        }
    }
}
