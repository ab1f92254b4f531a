//! Tree-walking interpreter.

use arbor_ir::{Expr, Module};
use smallvec::SmallVec;

use crate::environment::Bindings;
use crate::errors::{type_mismatch, unbound_argument, EvalResult};
use crate::operators::evaluate_binary;
use crate::value::Value;

/// Evaluate `node` under `bindings`, eagerly and structurally.
///
/// A conditional evaluates its condition first and then only the selected
/// arm; the unselected arm is never touched, which is what lets a recursive
/// function reach its base case instead of unfolding forever. A call
/// evaluates its arguments in the caller's environment, then runs the
/// callee's body under a fresh environment holding exactly those values, so
/// nested and recursive calls cannot clobber one another.
#[tracing::instrument(level = "trace", skip_all)]
pub fn run(module: &Module, node: &Expr, bindings: &Bindings) -> EvalResult {
    match node {
        Expr::Literal(value) => Ok(value.clone().into()),

        Expr::Binary {
            op, left, right, ..
        } => {
            let lhs = run(module, left, bindings)?;
            let rhs = run(module, right, bindings)?;
            evaluate_binary(&lhs, &rhs, *op)
        }

        Expr::If {
            cond,
            then_branch,
            else_branch,
            ..
        } => match run(module, cond, bindings)? {
            Value::Bool(true) => run(module, then_branch, bindings),
            Value::Bool(false) => run(module, else_branch, bindings),
            other => Err(type_mismatch("bool", other.type_name())),
        },

        Expr::Arg { index, .. } => bindings
            .get(*index)
            .cloned()
            .ok_or_else(|| unbound_argument(*index)),

        Expr::Call { func, args, .. } => {
            let body = module.resolve_body(*func)?;
            let mut values: SmallVec<[Value; 8]> = SmallVec::with_capacity(args.len());
            for value in args {
                values.push(run(module, value, bindings)?);
            }
            tracing::trace!(func = %func, argc = values.len(), "entering call");
            let frame = Bindings::of(values);
            run(module, &body, &frame)
        }
    }
}
