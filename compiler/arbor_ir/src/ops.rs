//! Binary operators.

use arbor_types::Kind;

/// Binary operators over two unified operands.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
}

impl BinOp {
    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            // Arithmetic
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            // Comparison
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
        }
    }

    /// Whether the result type is boolean rather than the operand type.
    pub const fn is_comparison(self) -> bool {
        matches!(self, Self::Eq | Self::Ne | Self::Lt | Self::Gt)
    }

    /// Whether operands of `kind` support this operator.
    ///
    /// Arithmetic and ordering are integer-only; equality is defined for
    /// every primitive kind.
    pub const fn admits(self, kind: Kind) -> bool {
        match self {
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod | Self::Lt | Self::Gt => {
                matches!(kind, Kind::Int)
            }
            Self::Eq | Self::Ne => true,
        }
    }
}
