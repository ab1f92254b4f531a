//! Compiled programs and their evaluation.
//!
//! A compiled function is a flat step DAG: every emitted operation became
//! one [`Step`], referencing earlier steps by index. Evaluation is lazy
//! with per-invocation memoization — a step runs at most once per call
//! frame, and a step nothing demands (the unselected arm of a `Select`)
//! never runs at all. That gives compiled code the same short-circuit
//! behavior the tree interpreter has, which is what lets recursive
//! programs terminate.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use arbor_codegen::Executable;
use arbor_ir::BinOp;
use arbor_types::Kind;

use crate::error::{
    division_by_zero, function_not_found, integer_overflow, kind_mismatch, modulo_by_zero,
    VmError,
};
use crate::value::Value;

/// One emitted operation. Operands are indices of earlier steps in the
/// same body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Const(Value),
    Arg(usize),
    Binary { op: BinOp, left: u32, right: u32 },
    Select { cond: u32, then_step: u32, else_step: u32 },
    Call { func: u32, args: Vec<u32> },
}

/// A closed function body: its steps plus the step holding the result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Code {
    pub(crate) steps: Vec<Step>,
    pub(crate) root: u32,
}

/// A fully compiled function.
#[derive(Debug)]
pub(crate) struct CompiledFunction {
    pub(crate) name: String,
    pub(crate) params: Vec<Kind>,
    /// Declared result kind; carried in the artifact but not consulted
    /// at run time, which re-checks only caller-supplied pieces.
    #[allow(dead_code)]
    pub(crate) result: Kind,
    pub(crate) code: Code,
}

/// A compiled program, produced by `VmBackend::compile`.
///
/// Every function it holds has a closed, validated body; running one
/// re-checks only the caller-supplied pieces (name, arity, argument
/// kinds).
#[derive(Debug)]
pub struct VmExecutable {
    funcs: Vec<CompiledFunction>,
    names: FxHashMap<String, u32>,
}

impl VmExecutable {
    pub(crate) fn new(funcs: Vec<CompiledFunction>, names: FxHashMap<String, u32>) -> Self {
        Self { funcs, names }
    }

    fn eval_function(&self, func: &CompiledFunction, args: &[Value]) -> Result<Value, VmError> {
        let mut memo: Vec<Option<Value>> = vec![None; func.code.steps.len()];
        self.eval_step(func, func.code.root, args, &mut memo)
    }

    fn eval_step(
        &self,
        func: &CompiledFunction,
        step: u32,
        args: &[Value],
        memo: &mut [Option<Value>],
    ) -> Result<Value, VmError> {
        let index = step as usize;
        if let Some(value) = memo[index] {
            return Ok(value);
        }
        let value = match &func.code.steps[index] {
            Step::Const(value) => *value,
            Step::Arg(position) => args[*position],
            Step::Binary { op, left, right } => {
                let lhs = self.eval_step(func, *left, args, memo)?;
                let rhs = self.eval_step(func, *right, args, memo)?;
                eval_binary(*op, lhs, rhs)?
            }
            Step::Select {
                cond,
                then_step,
                else_step,
            } => match self.eval_step(func, *cond, args, memo)? {
                Value::Bool(true) => self.eval_step(func, *then_step, args, memo)?,
                Value::Bool(false) => self.eval_step(func, *else_step, args, memo)?,
                Value::Int(_) => return Err(kind_mismatch(Kind::Bool, Kind::Int)),
            },
            Step::Call {
                func: callee,
                args: arg_steps,
            } => {
                let mut values: SmallVec<[Value; 8]> = SmallVec::with_capacity(arg_steps.len());
                for &arg_step in arg_steps {
                    values.push(self.eval_step(func, arg_step, args, memo)?);
                }
                let callee = &self.funcs[*callee as usize];
                tracing::trace!(function = %callee.name, "vm call");
                self.eval_function(callee, &values)?
            }
        };
        memo[index] = Some(value);
        Ok(value)
    }
}

impl Executable for VmExecutable {
    type Value = Value;
    type Error = VmError;

    #[tracing::instrument(level = "debug", skip(self, args))]
    fn run(&self, name: &str, args: &[Value]) -> Result<Value, VmError> {
        let Some(&index) = self.names.get(name) else {
            return Err(function_not_found(name));
        };
        let func = &self.funcs[index as usize];
        if args.len() != func.params.len() {
            return Err(VmError::ArityMismatch {
                function: func.name.clone(),
                expected: func.params.len(),
                found: args.len(),
            });
        }
        for (value, &param) in args.iter().zip(func.params.iter()) {
            if value.kind() != param {
                return Err(kind_mismatch(param, value.kind()));
            }
        }
        self.eval_function(func, args)
    }
}

fn eval_binary(op: BinOp, left: Value, right: Value) -> Result<Value, VmError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(op, a, b),
        (Value::Bool(a), Value::Bool(b)) => eval_bool_binary(op, a, b),
        (Value::Int(_), Value::Bool(_)) | (Value::Bool(_), Value::Int(_)) => {
            Err(kind_mismatch(left.kind(), right.kind()))
        }
    }
}

fn checked_arith(result: Option<i64>, op: BinOp) -> Result<Value, VmError> {
    match result {
        Some(value) => Ok(Value::Int(value)),
        None => Err(integer_overflow(op)),
    }
}

fn eval_int_binary(op: BinOp, a: i64, b: i64) -> Result<Value, VmError> {
    match op {
        BinOp::Add => checked_arith(a.checked_add(b), op),
        BinOp::Sub => checked_arith(a.checked_sub(b), op),
        BinOp::Mul => checked_arith(a.checked_mul(b), op),
        BinOp::Div => {
            if b == 0 {
                return Err(division_by_zero());
            }
            checked_arith(a.checked_div(b), op)
        }
        BinOp::Mod => {
            if b == 0 {
                return Err(modulo_by_zero());
            }
            checked_arith(a.checked_rem(b), op)
        }
        BinOp::Eq => Ok(Value::Bool(a == b)),
        BinOp::Ne => Ok(Value::Bool(a != b)),
        BinOp::Lt => Ok(Value::Bool(a < b)),
        BinOp::Gt => Ok(Value::Bool(a > b)),
    }
}

fn eval_bool_binary(op: BinOp, a: bool, b: bool) -> Result<Value, VmError> {
    match op {
        BinOp::Eq => Ok(Value::Bool(a == b)),
        BinOp::Ne => Ok(Value::Bool(a != b)),
        BinOp::Add
        | BinOp::Sub
        | BinOp::Mul
        | BinOp::Div
        | BinOp::Mod
        | BinOp::Lt
        | BinOp::Gt => Err(VmError::InvalidOperand {
            op,
            kind: Kind::Bool,
        }),
    }
}
