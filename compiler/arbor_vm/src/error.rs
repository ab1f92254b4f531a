//! Errors of the reference VM, covering emission, compilation, and
//! execution.

use std::fmt;

use arbor_ir::BinOp;
use arbor_types::Kind;

/// Failure reported by the VM backend or by a compiled program.
///
/// Emission variants surface while a program is being built through the
/// backend interface; the arithmetic variants surface when compiled code
/// runs. A program the emission checks accepted cannot hit the mismatch
/// variants at run time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VmError {
    /// Kind the VM has no representation for.
    UnsupportedKind {
        /// The rejected kind.
        kind: Kind,
    },

    /// Literal of a kind the VM cannot materialize.
    UnsupportedLiteralKind {
        /// The literal's kind.
        kind: Kind,
    },

    /// Value-producing operation with no function body open.
    NoOpenBody,

    /// `compile` called while a function body is still open.
    UnclosedBody {
        /// Name of the open function.
        function: String,
    },

    /// A function name declared twice on one backend.
    FunctionRedefined {
        /// The colliding name.
        name: String,
    },

    /// Backend exceeded the function handle space.
    TooManyFunctions {
        /// Number of declarations already present.
        count: usize,
    },

    /// Function handle not minted by this backend.
    ForeignFunction,

    /// Value handle minted by a different function body.
    ForeignValue,

    /// Argument position beyond the enclosing function's declared
    /// parameters.
    UnboundArgument {
        /// The referenced position.
        index: usize,
        /// Declared parameter count.
        arity: usize,
    },

    /// A position with a fixed kind received a different one.
    KindMismatch {
        /// The kind the position requires.
        expected: Kind,
        /// The kind actually found.
        found: Kind,
    },

    /// Operator applied to a kind that does not support it.
    InvalidOperand {
        /// The rejected operator.
        op: BinOp,
        /// The operand kind.
        kind: Kind,
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

    /// No function with the requested name in the executable.
    FunctionNotFound {
        /// The requested name.
        name: String,
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
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmError::UnsupportedKind { kind } => {
                write!(f, "unsupported kind `{kind}`: the vm materializes only `int` and `bool`")
            }
            VmError::UnsupportedLiteralKind { kind } => {
                write!(f, "unsupported literal kind `{kind}`")
            }
            VmError::NoOpenBody => write!(f, "no function body is open"),
            VmError::UnclosedBody { function } => {
                write!(f, "cannot compile: the body of `{function}` is still open")
            }
            VmError::FunctionRedefined { name } => {
                write!(f, "function `{name}` is already declared")
            }
            VmError::TooManyFunctions { count } => {
                write!(
                    f,
                    "function table is full: {count} declarations, max is {}",
                    u32::MAX
                )
            }
            VmError::ForeignFunction => {
                write!(f, "function handle does not belong to this backend")
            }
            VmError::ForeignValue => {
                write!(f, "value handle does not belong to the open function body")
            }
            VmError::UnboundArgument { index, arity } => {
                let plural = if *arity == 1 { "" } else { "s" };
                write!(
                    f,
                    "argument {index} is out of range: the function declares {arity} parameter{plural}"
                )
            }
            VmError::KindMismatch { expected, found } => {
                write!(f, "kind mismatch: expected `{expected}`, found `{found}`")
            }
            VmError::InvalidOperand { op, kind } => {
                write!(f, "operator `{}` is not defined for `{kind}`", op.as_symbol())
            }
            VmError::ArityMismatch {
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
            VmError::FunctionNotFound { name } => {
                write!(f, "function not found: `{name}`")
            }
            VmError::DivisionByZero => write!(f, "division by zero"),
            VmError::ModuloByZero => write!(f, "modulo by zero"),
            VmError::IntegerOverflow { op } => {
                write!(f, "integer overflow in `{}`", op.as_symbol())
            }
        }
    }
}

impl std::error::Error for VmError {}

/// Kind mismatch error.
#[cold]
pub(crate) fn kind_mismatch(expected: Kind, found: Kind) -> VmError {
    VmError::KindMismatch { expected, found }
}

/// Unknown executable function name.
#[cold]
pub(crate) fn function_not_found(name: &str) -> VmError {
    VmError::FunctionNotFound {
        name: name.to_owned(),
    }
}

/// Division by zero error.
#[cold]
pub(crate) fn division_by_zero() -> VmError {
    VmError::DivisionByZero
}

/// Modulo by zero error.
#[cold]
pub(crate) fn modulo_by_zero() -> VmError {
    VmError::ModuloByZero
}

/// Integer overflow error.
#[cold]
pub(crate) fn integer_overflow(op: BinOp) -> VmError {
    VmError::IntegerOverflow { op }
}
