//! Type system for arbor expression trees.
//!
//! A deliberately small closed set of types: `Void`, primitives (`Basic`),
//! and first-order function types. The one operation of interest is
//! structural [`unify`], which every compound tree node runs over its
//! children at construction time so type errors surface when a tree is
//! built, never when it is evaluated or lowered.

mod core;
mod error;
mod unify;

pub use core::{Kind, Type};
pub use error::{mismatch, TypeError};
pub use unify::unify;
