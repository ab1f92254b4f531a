//! Lowering from arbor expression trees to pluggable backends.
//!
//! The [`Backend`] trait is the narrow waist between trees and code
//! generation: nine operations with opaque `Copy` handles for values,
//! types, and functions. [`Lowerer`] walks function bodies and replays
//! them against a backend, memoizing function handles so each function is
//! declared and emitted once no matter how many call sites reference it.
//!
//! A compiled artifact implements [`Executable`], which runs functions by
//! name on the backend's native values. What "compile" means is entirely
//! the backend's business; this crate never interprets a handle it is
//! given.

mod error;
mod lower;
mod traits;

pub use error::LowerError;
pub use lower::{lower_module, Lowerer};
pub use traits::{Backend, BackendTypes, Executable};
