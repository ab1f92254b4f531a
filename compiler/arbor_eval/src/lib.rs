//! Tree-walking interpreter for arbor expression trees.
//!
//! Evaluates a tree directly to a concrete [`Value`], without involving any
//! code-generation backend. Used for testing, validation, and as the
//! reference semantics that compiled execution must agree with.
//!
//! Evaluation is reentrant and side-effect-free on the tree: every call
//! gets its own [`Bindings`] environment, so recursion is just more calls.

mod environment;
mod errors;
mod interpreter;
mod operators;
mod value;

pub use environment::Bindings;
pub use errors::{
    binary_type_mismatch, division_by_zero, integer_overflow, invalid_binary_op, modulo_by_zero,
    type_mismatch, unbound_argument, EvalError, EvalResult,
};
pub use interpreter::run;
pub use operators::evaluate_binary;
pub use value::Value;
