//! Emission surface of the reference VM.
//!
//! The backend checks its inputs as they arrive: operand kinds, argument
//! positions, call arity, and handle provenance are all validated while a
//! body is being emitted, so [`compile`](arbor_codegen::Backend::compile)
//! only has to confirm that every opened body was closed. A handle never
//! outlives its meaning: a [`ValueId`] is tied to the body that minted it
//! and is rejected anywhere else.

use rustc_hash::FxHashMap;

use arbor_codegen::{Backend, BackendTypes};
use arbor_ir::{BinOp, LitValue};
use arbor_types::Kind;

use crate::error::{kind_mismatch, VmError};
use crate::exec::{Code, CompiledFunction, Step, VmExecutable};
use crate::value::Value;

/// Handle to a step emitted into a function body.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ValueId {
    func: u32,
    step: u32,
}

/// Handle to a kind the VM can materialize.
///
/// Only mintable through `type_handle`, which refuses `Str`; a `VmType`
/// wrapping an unsupported kind cannot exist.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VmType(Kind);

/// Handle to a declared function.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FuncRef(u32);

/// A declared function while the backend is still emitting.
///
/// `code` is `None` between `enter_function` and `exit_function`.
struct VmFunction {
    name: String,
    params: Vec<Kind>,
    result: Kind,
    code: Option<Code>,
}

/// A body under construction.
struct Frame {
    func: u32,
    params: Vec<Kind>,
    steps: Vec<Step>,
    kinds: Vec<Kind>,
}

impl Frame {
    /// The kind of a previously emitted step, rejecting handles minted by
    /// a different body.
    fn kind_of(&self, value: ValueId) -> Result<Kind, VmError> {
        if value.func != self.func {
            return Err(VmError::ForeignValue);
        }
        Ok(self.kinds[value.step as usize])
    }

    fn push(&mut self, step: Step, kind: Kind) -> ValueId {
        let id = ValueId {
            func: self.func,
            step: self.steps.len() as u32,
        };
        self.steps.push(step);
        self.kinds.push(kind);
        id
    }
}

/// Reference backend: emits a step program per function and compiles to a
/// [`VmExecutable`].
#[derive(Default)]
pub struct VmBackend {
    funcs: Vec<VmFunction>,
    names: FxHashMap<String, u32>,
    open: Vec<Frame>,
}

impl VmBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn frame_mut(&mut self) -> Result<&mut Frame, VmError> {
        self.open.last_mut().ok_or(VmError::NoOpenBody)
    }
}

impl BackendTypes for VmBackend {
    type Value = ValueId;
    type Type = VmType;
    type Function = FuncRef;
}

impl Backend for VmBackend {
    type Artifact = VmExecutable;
    type Error = VmError;

    fn type_handle(&mut self, kind: Kind) -> Result<VmType, VmError> {
        match kind {
            Kind::Int | Kind::Bool => Ok(VmType(kind)),
            Kind::Str => Err(VmError::UnsupportedKind { kind }),
        }
    }

    fn literal(&mut self, value: &LitValue) -> Result<ValueId, VmError> {
        let value = match value {
            LitValue::Int(v) => Value::Int(*v),
            LitValue::Bool(v) => Value::Bool(*v),
            LitValue::Str(_) => {
                return Err(VmError::UnsupportedLiteralKind { kind: Kind::Str });
            }
        };
        let frame = self.frame_mut()?;
        Ok(frame.push(Step::Const(value), value.kind()))
    }

    fn binary_op(&mut self, op: BinOp, left: ValueId, right: ValueId) -> Result<ValueId, VmError> {
        let frame = self.frame_mut()?;
        let left_kind = frame.kind_of(left)?;
        let right_kind = frame.kind_of(right)?;
        if left_kind != right_kind {
            return Err(kind_mismatch(left_kind, right_kind));
        }
        if !op.admits(left_kind) {
            return Err(VmError::InvalidOperand {
                op,
                kind: left_kind,
            });
        }
        let kind = if op.is_comparison() {
            Kind::Bool
        } else {
            left_kind
        };
        Ok(frame.push(
            Step::Binary {
                op,
                left: left.step,
                right: right.step,
            },
            kind,
        ))
    }

    fn select(
        &mut self,
        cond: ValueId,
        then_value: ValueId,
        else_value: ValueId,
    ) -> Result<ValueId, VmError> {
        let frame = self.frame_mut()?;
        let cond_kind = frame.kind_of(cond)?;
        if cond_kind != Kind::Bool {
            return Err(kind_mismatch(Kind::Bool, cond_kind));
        }
        let then_kind = frame.kind_of(then_value)?;
        let else_kind = frame.kind_of(else_value)?;
        if then_kind != else_kind {
            return Err(kind_mismatch(then_kind, else_kind));
        }
        Ok(frame.push(
            Step::Select {
                cond: cond.step,
                then_step: then_value.step,
                else_step: else_value.step,
            },
            then_kind,
        ))
    }

    fn arg_ref(&mut self, index: usize) -> Result<ValueId, VmError> {
        let frame = self.frame_mut()?;
        let Some(&kind) = frame.params.get(index) else {
            return Err(VmError::UnboundArgument {
                index,
                arity: frame.params.len(),
            });
        };
        Ok(frame.push(Step::Arg(index), kind))
    }

    #[tracing::instrument(level = "debug", skip(self, result, params))]
    fn enter_function(
        &mut self,
        name: &str,
        result: VmType,
        params: &[VmType],
    ) -> Result<FuncRef, VmError> {
        if self.names.contains_key(name) {
            return Err(VmError::FunctionRedefined {
                name: name.to_owned(),
            });
        }
        let Ok(raw) = u32::try_from(self.funcs.len()) else {
            return Err(VmError::TooManyFunctions {
                count: self.funcs.len(),
            });
        };
        let params: Vec<Kind> = params.iter().map(|ty| ty.0).collect();
        self.funcs.push(VmFunction {
            name: name.to_owned(),
            params: params.clone(),
            result: result.0,
            code: None,
        });
        self.names.insert(name.to_owned(), raw);
        self.open.push(Frame {
            func: raw,
            params,
            steps: Vec::new(),
            kinds: Vec::new(),
        });
        Ok(FuncRef(raw))
    }

    fn exit_function(&mut self, body: ValueId) -> Result<(), VmError> {
        // Validate against the innermost frame before popping it, so a
        // rejected exit leaves the body open (and `compile` reports it).
        let frame = self.open.last().ok_or(VmError::NoOpenBody)?;
        let declared = self.funcs[frame.func as usize].result;
        let found = frame.kind_of(body)?;
        if found != declared {
            return Err(kind_mismatch(declared, found));
        }
        let Some(frame) = self.open.pop() else {
            return Err(VmError::NoOpenBody);
        };
        tracing::trace!(steps = frame.steps.len(), "closing function body");
        self.funcs[frame.func as usize].code = Some(Code {
            steps: frame.steps,
            root: body.step,
        });
        Ok(())
    }

    fn call(&mut self, func: FuncRef, args: &[ValueId]) -> Result<ValueId, VmError> {
        let Some(callee) = self.funcs.get(func.0 as usize) else {
            return Err(VmError::ForeignFunction);
        };
        if args.len() != callee.params.len() {
            return Err(VmError::ArityMismatch {
                function: callee.name.clone(),
                expected: callee.params.len(),
                found: args.len(),
            });
        }
        let params = callee.params.clone();
        let result = callee.result;

        let frame = self.frame_mut()?;
        let mut steps = Vec::with_capacity(args.len());
        for (&value, &param) in args.iter().zip(params.iter()) {
            let found = frame.kind_of(value)?;
            if found != param {
                return Err(kind_mismatch(param, found));
            }
            steps.push(value.step);
        }
        Ok(frame.push(Step::Call { func: func.0, args: steps }, result))
    }

    fn compile(self) -> Result<VmExecutable, VmError> {
        if let Some(frame) = self.open.last() {
            return Err(VmError::UnclosedBody {
                function: self.funcs[frame.func as usize].name.clone(),
            });
        }
        let VmBackend { funcs, names, open: _ } = self;
        let mut compiled = Vec::with_capacity(funcs.len());
        for func in funcs {
            let VmFunction {
                name,
                params,
                result,
                code,
            } = func;
            let Some(code) = code else {
                return Err(VmError::UnclosedBody { function: name });
            };
            compiled.push(CompiledFunction {
                name,
                params,
                result,
                code,
            });
        }
        tracing::debug!(functions = compiled.len(), "compiled vm program");
        Ok(VmExecutable::new(compiled, names))
    }
}
