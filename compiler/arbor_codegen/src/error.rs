//! Failures of the lowering pass.

use std::fmt;

use arbor_ir::IrError;
use arbor_types::Type;

/// An error raised while lowering a tree onto a backend.
///
/// `E` is the backend's own error type; backend failures are carried
/// through unmodified so the caller sees exactly what the backend said.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LowerError<E> {
    /// The backend rejected an emission.
    Backend(E),

    /// Resolving or inspecting a function definition failed.
    Definition(IrError),

    /// A function signature mentions a type the backend interface cannot
    /// express. Backends only materialize primitive kinds.
    UnsupportedType { ty: Type },
}

impl<E: fmt::Display> fmt::Display for LowerError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(inner) => write!(f, "backend error: {inner}"),
            Self::Definition(inner) => inner.fmt(f),
            Self::UnsupportedType { ty } => {
                write!(f, "cannot lower signature type `{ty}`: backends only handle primitive kinds")
            }
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for LowerError<E> {}

impl<E> From<IrError> for LowerError<E> {
    fn from(err: IrError) -> Self {
        Self::Definition(err)
    }
}
