//! Function registry and lazy body resolution.
//!
//! Trees never embed function values directly: a call names its callee by
//! [`FuncId`] and the [`Module`] owns every definition. Because a call is
//! validated against the callee's declared signature alone, a function can
//! be called (including by itself) before its body exists; the body is
//! produced on first demand by the definition's thunk.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use arbor_types::{unify, Type};

use crate::error::IrError;
use crate::expr::{arg, Expr};

/// Identifier for a function registered in a [`Module`].
///
/// Ids are dense indices, only meaningful to the module that minted them.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub struct FuncId(u32);

impl FuncId {
    /// The raw index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FuncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn#{}", self.0)
    }
}

/// Thunk producing a lazy function's body on first demand.
///
/// Receives the owning module, the function's own id, and its pre-built
/// argument nodes, so the body it returns can contain calls to the function
/// itself (or to any other registered function).
pub type BodyThunk = Box<dyn FnOnce(&Module, FuncId, &[Expr]) -> Result<Expr, IrError>>;

/// Resolution state of a function body.
enum BodyState {
    /// Thunk not yet invoked.
    Unresolved(BodyThunk),
    /// Thunk currently running. Observing this state is a cycle.
    Resolving,
    /// Body produced, checked, and cached.
    Resolved(Rc<Expr>),
}

impl fmt::Debug for BodyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // The thunk is an opaque closure and cannot be formatted.
            BodyState::Unresolved(_) => f.write_str("Unresolved(..)"),
            BodyState::Resolving => f.write_str("Resolving"),
            BodyState::Resolved(body) => f.debug_tuple("Resolved").field(body).finish(),
        }
    }
}

/// A registered function: declared signature plus an eager or lazy body.
#[derive(Debug)]
pub struct FuncDef {
    name: String,
    params: Vec<Type>,
    result: Type,
    body: RefCell<BodyState>,
}

impl FuncDef {
    /// Function name, unique within its module.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter types.
    #[must_use]
    pub fn params(&self) -> &[Type] {
        &self.params
    }

    /// Declared result type.
    #[must_use]
    pub fn result(&self) -> &Type {
        &self.result
    }

    /// The function's own type.
    #[must_use]
    pub fn ty(&self) -> Type {
        Type::function(self.params.clone(), self.result.clone())
    }
}

/// Registry of the functions a tree can call.
#[derive(Default)]
pub struct Module {
    funcs: Vec<FuncDef>,
    names: FxHashMap<String, FuncId>,
}

impl Module {
    /// Create an empty module.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function with an eager, fully-built body.
    ///
    /// The result type is the body's own type.
    pub fn define(
        &mut self,
        name: &str,
        params: Vec<Type>,
        body: Expr,
    ) -> Result<FuncId, IrError> {
        let result = body.ty();
        self.insert(name, params, result, BodyState::Resolved(Rc::new(body)))
    }

    /// Register a function whose body is produced on first demand.
    ///
    /// The declared result type stands in for the body until it exists:
    /// calls built inside `thunk` validate against the declared signature,
    /// which is what lets a recursive function reference itself while its
    /// body is still being constructed.
    pub fn define_lazy<F>(
        &mut self,
        name: &str,
        params: Vec<Type>,
        result: Type,
        thunk: F,
    ) -> Result<FuncId, IrError>
    where
        F: FnOnce(&Module, FuncId, &[Expr]) -> Result<Expr, IrError> + 'static,
    {
        self.insert(name, params, result, BodyState::Unresolved(Box::new(thunk)))
    }

    fn insert(
        &mut self,
        name: &str,
        params: Vec<Type>,
        result: Type,
        body: BodyState,
    ) -> Result<FuncId, IrError> {
        if self.names.contains_key(name) {
            return Err(IrError::DuplicateFunction {
                name: name.to_owned(),
            });
        }
        let Ok(raw) = u32::try_from(self.funcs.len()) else {
            return Err(IrError::ModuleFull {
                count: self.funcs.len(),
            });
        };
        let id = FuncId(raw);
        self.funcs.push(FuncDef {
            name: name.to_owned(),
            params,
            result,
            body: RefCell::new(body),
        });
        self.names.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Look up a definition by id.
    pub fn get(&self, func: FuncId) -> Result<&FuncDef, IrError> {
        self.funcs
            .get(func.index())
            .ok_or(IrError::UnknownFunction { id: func })
    }

    /// Look up a function id by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<FuncId> {
        self.names.get(name).copied()
    }

    /// Iterate over all definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (FuncId, &FuncDef)> {
        self.funcs
            .iter()
            .enumerate()
            .map(|(i, def)| (FuncId(i as u32), def))
    }

    /// Build a call to a registered function.
    ///
    /// Validates the argument count against the declared parameter count
    /// and pairwise-unifies each argument's type with its parameter type.
    /// Only the signature is consulted, never the body.
    pub fn call(&self, func: FuncId, args: Vec<Expr>) -> Result<Expr, IrError> {
        let def = self.get(func)?;
        if args.len() != def.params.len() {
            return Err(IrError::ArityMismatch {
                function: def.name.clone(),
                expected: def.params.len(),
                found: args.len(),
            });
        }
        for (value, param) in args.iter().zip(def.params.iter()) {
            unify(&value.ty(), param)?;
        }
        Ok(Expr::Call {
            func,
            args,
            ty: def.result.clone(),
        })
    }

    /// The function's body, resolving a lazy thunk on first demand.
    ///
    /// Resolution transitions `Unresolved -> Resolving -> Resolved` and
    /// caches the produced body, which is also checked against the declared
    /// result type. Observing `Resolving` means the thunk forced its own
    /// body mid-resolution, which is a cycle (ordinary recursion goes
    /// through `call` and never lands here). A failed resolution stays in
    /// `Resolving`; the thunk is gone and the definition cannot be retried.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn resolve_body(&self, func: FuncId) -> Result<Rc<Expr>, IrError> {
        let def = self.get(func)?;

        // Take the state out so no borrow is held while the thunk runs;
        // the thunk is free to consult the module (and will observe
        // `Resolving` if it forces this same body again).
        let taken = std::mem::replace(&mut *def.body.borrow_mut(), BodyState::Resolving);
        match taken {
            BodyState::Resolved(body) => {
                *def.body.borrow_mut() = BodyState::Resolved(Rc::clone(&body));
                Ok(body)
            }
            BodyState::Resolving => Err(IrError::CyclicDefinition {
                function: def.name.clone(),
            }),
            BodyState::Unresolved(thunk) => {
                tracing::debug!(function = %def.name, "resolving lazy body");
                let params: Vec<Expr> = def
                    .params
                    .iter()
                    .cloned()
                    .enumerate()
                    .map(|(i, ty)| arg(i, ty))
                    .collect();
                let body = thunk(self, func, &params)?;
                unify(&body.ty(), &def.result)?;

                let body = Rc::new(body);
                *def.body.borrow_mut() = BodyState::Resolved(Rc::clone(&body));
                Ok(body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{add, boolean, gt, if_else, int, mul, sub};
    use arbor_types::{Kind, TypeError};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn int_ty() -> Type {
        Type::Basic(Kind::Int)
    }

    fn define_sum(module: &mut Module) -> FuncId {
        let body = add(arg(0, int_ty()), arg(1, int_ty())).unwrap();
        module
            .define("sum", vec![int_ty(), int_ty()], body)
            .unwrap()
    }

    #[test]
    fn define_derives_result_from_body() {
        let mut module = Module::new();
        let id = define_sum(&mut module);
        let def = module.get(id).unwrap();
        assert_eq!(def.name(), "sum");
        assert_eq!(def.result(), &int_ty());
        assert_eq!(
            def.ty(),
            Type::function(vec![int_ty(), int_ty()], int_ty())
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut module = Module::new();
        define_sum(&mut module);
        let err = module
            .define("sum", vec![int_ty()], int(0))
            .unwrap_err();
        assert_eq!(
            err,
            IrError::DuplicateFunction {
                name: "sum".to_owned(),
            }
        );
    }

    #[test]
    fn lookup_by_name() {
        let mut module = Module::new();
        let id = define_sum(&mut module);
        assert_eq!(module.lookup("sum"), Some(id));
        assert_eq!(module.lookup("missing"), None);
    }

    #[test]
    fn call_validates_arity() {
        let mut module = Module::new();
        let sum = define_sum(&mut module);
        let err = module.call(sum, vec![int(1)]).unwrap_err();
        assert_eq!(
            err,
            IrError::ArityMismatch {
                function: "sum".to_owned(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn call_validates_argument_types() {
        let mut module = Module::new();
        let sum = define_sum(&mut module);
        let err = module.call(sum, vec![int(1), boolean(true)]).unwrap_err();
        assert_eq!(
            err,
            IrError::Type(TypeError::Mismatch {
                left: Type::Basic(Kind::Bool),
                right: int_ty(),
            })
        );
    }

    #[test]
    fn call_node_carries_declared_result_type() {
        let mut module = Module::new();
        let sum = define_sum(&mut module);
        let node = module.call(sum, vec![int(2), int(3)]).unwrap();
        assert_eq!(node.ty(), int_ty());
    }

    #[test]
    fn foreign_id_is_rejected() {
        let mut big = Module::new();
        define_sum(&mut big);
        let second = big.define("sum2", vec![int_ty()], int(0)).unwrap();

        // An id minted by a larger module is out of range here.
        let mut small = Module::new();
        let only = define_sum(&mut small);
        assert!(small.get(only).is_ok());
        assert_eq!(
            small.get(second).unwrap_err(),
            IrError::UnknownFunction { id: second }
        );
    }

    #[test]
    fn lazy_thunk_runs_once_and_is_cached() {
        let mut module = Module::new();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let id = module
            .define_lazy("double", vec![int_ty()], int_ty(), move |_, _, args| {
                seen.set(seen.get() + 1);
                mul(args[0].clone(), int(2))
            })
            .unwrap();

        let first = module.resolve_body(id).unwrap();
        let second = module.resolve_body(id).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn lazy_body_checked_against_declared_result() {
        let mut module = Module::new();
        let id = module
            .define_lazy("lies", vec![], int_ty(), |_, _, _| Ok(boolean(true)))
            .unwrap();
        let err = module.resolve_body(id).unwrap_err();
        assert_eq!(
            err,
            IrError::Type(TypeError::Mismatch {
                left: Type::Basic(Kind::Bool),
                right: int_ty(),
            })
        );
    }

    #[test]
    fn self_resolution_is_a_cycle() {
        let mut module = Module::new();
        let id = module
            .define_lazy("ouroboros", vec![], int_ty(), |module, own_id, _| {
                // Forcing our own body mid-resolution must fail, not recurse.
                module.resolve_body(own_id).map(|body| (*body).clone())
            })
            .unwrap();
        let err = module.resolve_body(id).unwrap_err();
        assert_eq!(
            err,
            IrError::CyclicDefinition {
                function: "ouroboros".to_owned(),
            }
        );
    }

    #[test]
    fn recursive_call_inside_thunk_is_ordinary() {
        let mut module = Module::new();
        let id = module
            .define_lazy("factorial", vec![int_ty()], int_ty(), |module, own_id, args| {
                let n = args[0].clone();
                let recurse = module.call(own_id, vec![sub(n.clone(), int(1))?])?;
                if_else(gt(n.clone(), int(1))?, mul(n, recurse)?, int(1))
            })
            .unwrap();

        let body = module.resolve_body(id).unwrap();
        assert_eq!(body.ty(), int_ty());
    }
}
