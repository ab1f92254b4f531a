//! Unification error types.

use std::fmt;

use crate::core::Type;

/// Error from type unification.
///
/// Construction-time checks surface these immediately; a tree that built
/// successfully never produces one at evaluation or lowering time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeError {
    /// Types could not be unified. Reports both operands.
    Mismatch {
        /// Left operand of the failed unification.
        left: Type,
        /// Right operand of the failed unification.
        right: Type,
    },

    /// Function types disagree on parameter count.
    ArityMismatch {
        /// Parameter count of the left operand.
        expected: usize,
        /// Parameter count of the right operand.
        found: usize,
    },
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::Mismatch { left, right } => {
                write!(f, "type mismatch: `{left}` does not unify with `{right}`")
            }
            TypeError::ArityMismatch { expected, found } => {
                let plural = if *expected == 1 { "" } else { "s" };
                write!(
                    f,
                    "function arity mismatch: expected {expected} parameter{plural}, found {found}"
                )
            }
        }
    }
}

impl std::error::Error for TypeError {}

/// Build a `Mismatch` error from borrowed operands.
#[must_use]
pub fn mismatch(left: &Type, right: &Type) -> TypeError {
    TypeError::Mismatch {
        left: left.clone(),
        right: right.clone(),
    }
}
