//! Error types for tree evaluation.
//!
//! Factory functions (e.g. `division_by_zero()`) are the public API for
//! constructing these; evaluation code never builds variants inline.

use std::fmt;

use arbor_ir::{BinOp, IrError};

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Runtime error raised while evaluating a tree.
///
/// A well-built tree running under honest bindings can only produce the
/// arithmetic and resolution variants; the mismatch variants mean the
/// caller bound an argument to a value of the wrong kind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EvalError {
    /// Argument index with no entry in the binding environment.
    UnboundArgument {
        /// The index that was referenced.
        index: usize,
    },

    /// Division by zero.
    DivisionByZero,

    /// Modulo by zero.
    ModuloByZero,

    /// Checked 64-bit arithmetic overflowed.
    IntegerOverflow {
        /// The overflowing operator.
        op: BinOp,
    },

    /// A value of the wrong kind reached a position with a fixed kind.
    TypeMismatch {
        /// The kind the position requires.
        expected: &'static str,
        /// The kind actually found.
        found: &'static str,
    },

    /// Binary operands of two different kinds.
    BinaryTypeMismatch {
        /// Left operand's kind.
        left: &'static str,
        /// Right operand's kind.
        right: &'static str,
    },

    /// Operator applied to a kind that does not support it.
    InvalidBinaryOp {
        /// The operand kind.
        type_name: &'static str,
        /// The rejected operator.
        op: BinOp,
    },

    /// Error surfaced while resolving a function definition.
    Definition(IrError),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnboundArgument { index } => {
                write!(f, "argument {index} is not bound")
            }
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::ModuloByZero => write!(f, "modulo by zero"),
            EvalError::IntegerOverflow { op } => {
                write!(f, "integer overflow in `{}`", op.as_symbol())
            }
            EvalError::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {expected}, got {found}")
            }
            EvalError::BinaryTypeMismatch { left, right } => {
                write!(f, "cannot apply binary operator to {left} and {right}")
            }
            EvalError::InvalidBinaryOp { type_name, op } => {
                write!(
                    f,
                    "operator `{}` is not defined for {type_name}",
                    op.as_symbol()
                )
            }
            EvalError::Definition(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<IrError> for EvalError {
    fn from(err: IrError) -> Self {
        EvalError::Definition(err)
    }
}

/// Unbound argument error.
#[cold]
pub fn unbound_argument(index: usize) -> EvalError {
    EvalError::UnboundArgument { index }
}

/// Division by zero error.
#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::DivisionByZero
}

/// Modulo by zero error.
#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::ModuloByZero
}

/// Integer overflow error.
#[cold]
pub fn integer_overflow(op: BinOp) -> EvalError {
    EvalError::IntegerOverflow { op }
}

/// Fixed-kind position received the wrong kind.
#[cold]
pub fn type_mismatch(expected: &'static str, found: &'static str) -> EvalError {
    EvalError::TypeMismatch { expected, found }
}

/// Binary operands of two different kinds.
#[cold]
pub fn binary_type_mismatch(left: &'static str, right: &'static str) -> EvalError {
    EvalError::BinaryTypeMismatch { left, right }
}

/// Operator not defined for the operand kind.
#[cold]
pub fn invalid_binary_op(type_name: &'static str, op: BinOp) -> EvalError {
    EvalError::InvalidBinaryOp { type_name, op }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_messages() {
        assert_eq!(
            unbound_argument(2).to_string(),
            "argument 2 is not bound"
        );
        assert_eq!(division_by_zero().to_string(), "division by zero");
        assert_eq!(
            integer_overflow(BinOp::Mul).to_string(),
            "integer overflow in `*`"
        );
        assert_eq!(
            type_mismatch("bool", "int").to_string(),
            "type mismatch: expected bool, got int"
        );
        assert_eq!(
            invalid_binary_op("str", BinOp::Sub).to_string(),
            "operator `-` is not defined for str"
        );
    }
}
