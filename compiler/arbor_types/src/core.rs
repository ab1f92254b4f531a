//! Core type definitions.
//!
//! Foundational kinds and types for arbor expression trees.

use std::fmt;

/// Primitive value kinds.
///
/// A closed set: every literal and every argument slot carries exactly one
/// of these. Backends advertise which kinds they can materialize.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Kind {
    /// 64-bit signed integer.
    Int,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Str,
}

impl Kind {
    /// Display name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Bool => "bool",
            Kind::Str => "str",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Concrete type representation.
///
/// A closed variant set: a value is either absent (`Void`), a primitive
/// (`Basic`), or a function from parameters to a result. Compound nodes
/// unify their children's types at construction, so every node carries a
/// fully-resolved `Type`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    /// No value.
    Void,
    /// A primitive value of the given kind.
    Basic(Kind),
    /// Function type: (params) -> result.
    Function {
        params: Vec<Type>,
        result: Box<Type>,
    },
}

impl Type {
    /// Shorthand constructor for a function type.
    #[must_use]
    pub fn function(params: Vec<Type>, result: Type) -> Self {
        Type::Function {
            params,
            result: Box::new(result),
        }
    }

    /// The primitive kind, if this is a `Basic` type.
    #[must_use]
    pub fn basic_kind(&self) -> Option<Kind> {
        match self {
            Type::Basic(kind) => Some(*kind),
            Type::Void | Type::Function { .. } => None,
        }
    }

    /// Whether this is the given primitive kind.
    #[must_use]
    pub fn is_basic(&self, kind: Kind) -> bool {
        matches!(self, Type::Basic(k) if *k == kind)
    }
}

impl From<Kind> for Type {
    fn from(kind: Kind) -> Self {
        Type::Basic(kind)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => f.write_str("void"),
            Type::Basic(kind) => write!(f, "{kind}"),
            Type::Function { params, result } => {
                f.write_str("(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {result}")
            }
        }
    }
}
