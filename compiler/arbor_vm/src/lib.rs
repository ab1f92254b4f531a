//! Reference backend for arbor: an in-process expression VM.
//!
//! Implements the `arbor_codegen` backend interface as a step-program VM:
//! emission builds a flat step DAG per function, `compile` seals it into a
//! [`VmExecutable`], and the executable runs functions by name on native
//! [`Value`]s. It exists so dual-mode execution is testable end to end —
//! a tree interpreted by `arbor_eval` and the same tree compiled here must
//! agree — without dragging in a native code generator.
//!
//! The VM materializes `int` and `bool` only. Trees containing string
//! literals lower everywhere else but are rejected here with
//! `UnsupportedLiteralKind`.
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=arbor_vm=debug`: per-function declaration and compile
//!   tracing. Example: `RUST_LOG=arbor_vm=debug cargo test`
//! - `RUST_LOG=arbor_vm=trace`: step-level tracing (very verbose).
//! - `RUST_LOG=arbor_codegen=trace`: follow the lowering pass instead.

// Step and function indices are u32 by construction; bodies and function
// tables never approach that bound.
#![allow(clippy::cast_possible_truncation)]

mod backend;
mod error;
mod exec;
mod value;

pub use backend::{FuncRef, ValueId, VmBackend, VmType};
pub use error::VmError;
pub use exec::VmExecutable;
pub use value::Value;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=arbor_vm=debug` or `RUST_LOG=arbor_vm=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
