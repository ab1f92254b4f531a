//! Runtime values.

use std::fmt;

use arbor_ir::LitValue;
use arbor_types::Kind;

/// A concrete value produced by evaluation.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Value {
    /// 64-bit signed integer.
    Int(i64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Str(String),
}

impl Value {
    /// The value's primitive kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Value::Int(_) => Kind::Int,
            Value::Bool(_) => Kind::Bool,
            Value::Str(_) => Kind::Str,
        }
    }

    /// Type name for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.kind().name()
    }
}

impl From<LitValue> for Value {
    fn from(lit: LitValue) -> Self {
        match lit {
            LitValue::Int(value) => Value::Int(value),
            LitValue::Bool(value) => Value::Bool(value),
            LitValue::Str(value) => Value::Str(value),
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
            Value::Str(value) => write!(f, "{value}"),
        }
    }
}
