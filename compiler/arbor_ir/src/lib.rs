//! Typed expression trees for arbor.
//!
//! A tree describes a small numeric function: literals, binary operators,
//! conditionals, argument placeholders, and calls to functions registered
//! in a [`Module`]. Every compound node unifies its children's types at
//! construction, so a tree that exists is well-typed.
//!
//! Recursion is the one subtlety. A call node only needs its callee's
//! *signature*, which the module knows from registration, so a function
//! body may call the function it belongs to before that body has been
//! built. [`Module::define_lazy`] exploits this: the body is produced by a
//! thunk invoked on first demand, with a `Resolving` marker catching the
//! degenerate case where the thunk forces its own body mid-resolution.
//!
//! The tree itself is passive data. Evaluation lives in `arbor_eval`;
//! translation to a code-generation backend lives in `arbor_codegen`.

mod error;
mod expr;
mod literal;
mod module;
mod ops;

pub use error::IrError;
pub use expr::{
    add, arg, boolean, div, eq, gt, if_else, int, lt, modulo, mul, ne, string, sub, Expr,
};
pub use literal::LitValue;
pub use module::{BodyThunk, FuncDef, FuncId, Module};
pub use ops::BinOp;
