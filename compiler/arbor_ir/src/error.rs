//! Tree construction and resolution errors.

use std::fmt;

use arbor_types::{Type, TypeError};

use crate::module::FuncId;
use crate::ops::BinOp;

/// Error from tree construction or lazy-body resolution.
///
/// Construction is the single validation point: a node that fails to build
/// does not exist, so none of these surface later from a well-built tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IrError {
    /// Children failed to unify.
    Type(TypeError),

    /// Operator applied to a type that does not support it.
    InvalidOperand {
        /// The rejected operator.
        op: BinOp,
        /// The unified operand type.
        ty: Type,
    },

    /// Conditional whose condition is not boolean.
    NonBooleanCondition {
        /// The condition's actual type.
        found: Type,
    },

    /// Call argument count does not match the declared parameter count.
    ArityMismatch {
        /// Name of the called function.
        function: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        found: usize,
    },

    /// A lazy body's thunk forced its own resolution.
    CyclicDefinition {
        /// Name of the function whose resolution re-entered.
        function: String,
    },

    /// A function name registered twice in one module.
    DuplicateFunction {
        /// The colliding name.
        name: String,
    },

    /// Function id not minted by this module.
    UnknownFunction {
        /// The out-of-range id.
        id: FuncId,
    },

    /// Module exceeded the function id space.
    ModuleFull {
        /// Number of definitions already present.
        count: usize,
    },
}

impl fmt::Display for IrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrError::Type(err) => write!(f, "{err}"),
            IrError::InvalidOperand { op, ty } => {
                write!(f, "operator `{}` is not defined for `{ty}`", op.as_symbol())
            }
            IrError::NonBooleanCondition { found } => {
                write!(f, "condition must be `bool`, found `{found}`")
            }
            IrError::ArityMismatch {
                function,
                expected,
                found,
            } => {
                let plural = if *expected == 1 { "" } else { "s" };
                write!(
                    f,
                    "call to `{function}` expects {expected} argument{plural}, found {found}"
                )
            }
            IrError::CyclicDefinition { function } => {
                write!(
                    f,
                    "cyclic definition: resolving the body of `{function}` re-entered itself"
                )
            }
            IrError::DuplicateFunction { name } => {
                write!(f, "function `{name}` is already defined")
            }
            IrError::UnknownFunction { id } => {
                write!(f, "unknown function {id}")
            }
            IrError::ModuleFull { count } => {
                write!(
                    f,
                    "module is full: {count} definitions, max is {}",
                    u32::MAX
                )
            }
        }
    }
}

impl std::error::Error for IrError {}

impl From<TypeError> for IrError {
    fn from(err: TypeError) -> Self {
        IrError::Type(err)
    }
}
