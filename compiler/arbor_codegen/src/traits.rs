//! Backend abstraction for lowering expression trees.
//!
//! A backend is an emission surface: the lowering pass walks a tree and
//! calls these methods in order, and the backend accumulates whatever
//! representation it compiles to. Splitting the handle types
//! ([`BackendTypes`]) from the operations ([`Backend`]) keeps signatures
//! readable and lets helper code name the handles without dragging in the
//! full operation set.

use arbor_ir::{BinOp, LitValue};
use arbor_types::Kind;

/// Opaque handle types minted by a backend.
///
/// All handles are plain `Copy` tokens. The lowering pass stores and
/// replays them freely; only the backend that minted a handle can
/// interpret it.
pub trait BackendTypes {
    /// An emitted value, such as the result of an operator or a constant.
    type Value: Copy;

    /// A materialized primitive type.
    type Type: Copy;

    /// A declared function.
    type Function: Copy;
}

/// Operations a backend exposes to the lowering pass.
///
/// # Body discipline
///
/// Value-producing methods (`literal`, `binary_op`, `select`, `arg_ref`,
/// `call`) are only meaningful between an `enter_function` and its
/// matching `exit_function`. Bodies nest strictly LIFO: the lowering pass
/// may open an inner function mid-body (to declare a callee it has not
/// seen yet) and always closes the inner body before returning to the
/// outer one. Backends keep a stack of open bodies to support this.
pub trait Backend: BackendTypes {
    /// The executable artifact produced by [`compile`](Backend::compile).
    type Artifact;

    /// Backend-reported failure. Surfaced to the caller unmodified.
    type Error: std::error::Error + 'static;

    /// Returns the handle for a primitive kind.
    ///
    /// Handles are stable: the same kind maps to the same handle for the
    /// lifetime of the backend.
    fn type_handle(&mut self, kind: Kind) -> Result<Self::Type, Self::Error>;

    /// Materializes a constant in the current body.
    ///
    /// A backend that cannot represent the literal's kind reports its own
    /// error here; the lowering pass passes it through without rewording.
    fn literal(&mut self, value: &LitValue) -> Result<Self::Value, Self::Error>;

    /// Applies a binary operator to two emitted values.
    fn binary_op(
        &mut self,
        op: BinOp,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, Self::Error>;

    /// Emits a runtime branch over two already-lowered arms.
    ///
    /// Both arms exist in the emitted program; which one executes is
    /// decided when the compiled code runs, not here.
    fn select(
        &mut self,
        cond: Self::Value,
        then_value: Self::Value,
        else_value: Self::Value,
    ) -> Result<Self::Value, Self::Error>;

    /// References the current function's argument at `index`.
    fn arg_ref(&mut self, index: usize) -> Result<Self::Value, Self::Error>;

    /// Declares a function and opens its body for emission.
    ///
    /// The returned handle is valid immediately, before the body is
    /// closed, so a body may call its own function through it.
    fn enter_function(
        &mut self,
        name: &str,
        result: Self::Type,
        params: &[Self::Type],
    ) -> Result<Self::Function, Self::Error>;

    /// Closes the innermost open body, fixing `body` as its result.
    fn exit_function(&mut self, body: Self::Value) -> Result<(), Self::Error>;

    /// Invokes a declared function with already-emitted arguments.
    fn call(
        &mut self,
        func: Self::Function,
        args: &[Self::Value],
    ) -> Result<Self::Value, Self::Error>;

    /// Finalizes everything emitted so far into an executable artifact.
    ///
    /// Consuming the backend makes "emit after compile" unrepresentable.
    fn compile(self) -> Result<Self::Artifact, Self::Error>;
}

/// A compiled program that can run its functions by name.
pub trait Executable {
    /// The native value representation of the compiled program.
    type Value;

    /// Runtime failure.
    type Error: std::error::Error + 'static;

    /// Runs the function `name` with `args` and returns its result.
    fn run(&self, name: &str, args: &[Self::Value]) -> Result<Self::Value, Self::Error>;
}
