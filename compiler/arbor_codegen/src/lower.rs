//! Lowering pass from expression trees to backend emissions.
//!
//! The pass walks each function body once and replays it against a
//! [`Backend`]. Function lowering is memoized on [`FuncId`]: the first
//! reference declares the function and emits its body, every later
//! reference reuses the cached handle. Declaring *before* emitting the
//! body is what makes recursion work: a self-call inside a body finds its
//! own function already in the cache and lowers to a plain call through
//! the handle instead of descending again.

use rustc_hash::FxHashMap;

use arbor_ir::{Expr, FuncId, Module};
use arbor_types::Type;

use crate::error::LowerError;
use crate::traits::Backend;

/// Lowers trees registered in one [`Module`] onto one backend.
///
/// Owns the backend for the duration of the pass; [`finish`](Self::finish)
/// hands it back once everything wanted is lowered.
pub struct Lowerer<'a, B: Backend> {
    module: &'a Module,
    backend: B,
    functions: FxHashMap<FuncId, B::Function>,
}

impl<'a, B: Backend> Lowerer<'a, B> {
    /// Creates a pass over `module` emitting into `backend`.
    pub fn new(module: &'a Module, backend: B) -> Self {
        Self {
            module,
            backend,
            functions: FxHashMap::default(),
        }
    }

    /// Lowers one function, returning its backend handle.
    ///
    /// Idempotent per function: a repeat lowers nothing and returns the
    /// handle minted the first time. The body is resolved before the
    /// function is declared, so a definition whose thunk fails leaves the
    /// backend untouched.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn lower_function(&mut self, func: FuncId) -> Result<B::Function, LowerError<B::Error>> {
        if let Some(&handle) = self.functions.get(&func) {
            return Ok(handle);
        }

        let def = self.module.get(func)?;
        let result = self.signature_type(def.result())?;
        let params = def
            .params()
            .iter()
            .map(|ty| self.signature_type(ty))
            .collect::<Result<Vec<_>, _>>()?;
        let body = self.module.resolve_body(func)?;

        tracing::debug!(function = %def.name(), "lowering function");
        let handle = self
            .backend
            .enter_function(def.name(), result, &params)
            .map_err(LowerError::Backend)?;
        // Cache the handle before touching the body so a self-call below
        // resolves to it instead of re-entering this function.
        self.functions.insert(func, handle);

        let value = self.lower_expr(&body)?;
        self.backend.exit_function(value).map_err(LowerError::Backend)?;
        Ok(handle)
    }

    /// Lowers every function registered in the module.
    pub fn lower_all(&mut self) -> Result<(), LowerError<B::Error>> {
        for (func, _) in self.module.iter() {
            self.lower_function(func)?;
        }
        Ok(())
    }

    /// Returns the backend with all emissions applied.
    #[must_use]
    pub fn finish(self) -> B {
        self.backend
    }

    fn signature_type(&mut self, ty: &Type) -> Result<B::Type, LowerError<B::Error>> {
        match ty.basic_kind() {
            Some(kind) => self.backend.type_handle(kind).map_err(LowerError::Backend),
            None => Err(LowerError::UnsupportedType { ty: ty.clone() }),
        }
    }

    fn lower_expr(&mut self, node: &Expr) -> Result<B::Value, LowerError<B::Error>> {
        match node {
            Expr::Literal(value) => self.backend.literal(value).map_err(LowerError::Backend),
            Expr::Binary {
                op, left, right, ..
            } => {
                let lhs = self.lower_expr(left)?;
                let rhs = self.lower_expr(right)?;
                self.backend
                    .binary_op(*op, lhs, rhs)
                    .map_err(LowerError::Backend)
            }
            Expr::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                // Both arms land in the emitted program; selection is a
                // runtime decision in compiled code.
                let cond = self.lower_expr(cond)?;
                let then_value = self.lower_expr(then_branch)?;
                let else_value = self.lower_expr(else_branch)?;
                self.backend
                    .select(cond, then_value, else_value)
                    .map_err(LowerError::Backend)
            }
            Expr::Arg { index, .. } => {
                self.backend.arg_ref(*index).map_err(LowerError::Backend)
            }
            Expr::Call { func, args, .. } => {
                // Callee first: declaring it may open and close a nested
                // body before any argument is emitted.
                let callee = self.lower_function(*func)?;
                let mut lowered = Vec::with_capacity(args.len());
                for value in args {
                    lowered.push(self.lower_expr(value)?);
                }
                self.backend
                    .call(callee, &lowered)
                    .map_err(LowerError::Backend)
            }
        }
    }
}

/// Lowers every function in `module` and returns the backend, ready to
/// compile.
pub fn lower_module<B: Backend>(
    module: &Module,
    backend: B,
) -> Result<B, LowerError<B::Error>> {
    let mut lowerer = Lowerer::new(module, backend);
    lowerer.lower_all()?;
    Ok(lowerer.finish())
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use pretty_assertions::assert_eq;

    use arbor_ir::{add, arg, boolean, eq, gt, if_else, int, mul, string, sub, BinOp, LitValue};
    use arbor_types::{Kind, Type};

    use super::*;
    use crate::traits::BackendTypes;

    /// What a recording backend saw, in emission order.
    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Event {
        Enter(String),
        Exit,
        Literal(String),
        Binary(BinOp),
        Select,
        ArgRef(usize),
        Call { callee: u32, argc: usize },
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum MockError {
        StringsUnsupported,
    }

    impl fmt::Display for MockError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::StringsUnsupported => f.write_str("string constants are not supported"),
            }
        }
    }

    impl std::error::Error for MockError {}

    /// Backend that records every emission and mints counter handles.
    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
        next_value: u32,
        next_func: u32,
    }

    impl Recorder {
        fn fresh_value(&mut self) -> u32 {
            self.next_value += 1;
            self.next_value
        }
    }

    impl BackendTypes for Recorder {
        type Value = u32;
        type Type = Kind;
        type Function = u32;
    }

    impl Backend for Recorder {
        type Artifact = Vec<Event>;
        type Error = MockError;

        fn type_handle(&mut self, kind: Kind) -> Result<Kind, MockError> {
            Ok(kind)
        }

        fn literal(&mut self, value: &LitValue) -> Result<u32, MockError> {
            if value.kind() == Kind::Str {
                return Err(MockError::StringsUnsupported);
            }
            self.events.push(Event::Literal(value.to_string()));
            Ok(self.fresh_value())
        }

        fn binary_op(&mut self, op: BinOp, _: u32, _: u32) -> Result<u32, MockError> {
            self.events.push(Event::Binary(op));
            Ok(self.fresh_value())
        }

        fn select(&mut self, _: u32, _: u32, _: u32) -> Result<u32, MockError> {
            self.events.push(Event::Select);
            Ok(self.fresh_value())
        }

        fn arg_ref(&mut self, index: usize) -> Result<u32, MockError> {
            self.events.push(Event::ArgRef(index));
            Ok(self.fresh_value())
        }

        fn enter_function(&mut self, name: &str, _: Kind, _: &[Kind]) -> Result<u32, MockError> {
            self.events.push(Event::Enter(name.to_owned()));
            self.next_func += 1;
            Ok(self.next_func)
        }

        fn exit_function(&mut self, _: u32) -> Result<(), MockError> {
            self.events.push(Event::Exit);
            Ok(())
        }

        fn call(&mut self, callee: u32, args: &[u32]) -> Result<u32, MockError> {
            self.events.push(Event::Call {
                callee,
                argc: args.len(),
            });
            Ok(self.fresh_value())
        }

        fn compile(self) -> Result<Vec<Event>, MockError> {
            Ok(self.events)
        }
    }

    fn int_ty() -> Type {
        Type::Basic(Kind::Int)
    }

    fn define_factorial(module: &mut Module) -> FuncId {
        module
            .define_lazy("factorial", vec![int_ty()], int_ty(), |module, own_id, args| {
                let n = args[0].clone();
                let recurse = module.call(own_id, vec![sub(n.clone(), int(1))?])?;
                if_else(gt(n.clone(), int(1))?, mul(n, recurse)?, int(1))
            })
            .unwrap()
    }

    fn enters_and_exits(events: &[Event]) -> Vec<Event> {
        events
            .iter()
            .filter(|event| matches!(event, Event::Enter(_) | Event::Exit))
            .cloned()
            .collect()
    }

    #[test]
    fn handle_is_registered_before_the_body() {
        let mut module = Module::new();
        let factorial = define_factorial(&mut module);

        let mut lowerer = Lowerer::new(&module, Recorder::default());
        lowerer.lower_function(factorial).unwrap();
        let events = lowerer.finish().compile().unwrap();

        // One declaration, opened before anything of the body; the
        // self-call goes through the cached handle instead of a second
        // declaration.
        assert_eq!(events[0], Event::Enter("factorial".to_owned()));
        assert_eq!(
            enters_and_exits(&events),
            vec![Event::Enter("factorial".to_owned()), Event::Exit]
        );
        assert!(events.contains(&Event::Call { callee: 1, argc: 1 }));
    }

    #[test]
    fn lowering_twice_reuses_the_handle() {
        let mut module = Module::new();
        let factorial = define_factorial(&mut module);

        let mut lowerer = Lowerer::new(&module, Recorder::default());
        let first = lowerer.lower_function(factorial).unwrap();
        let emitted = lowerer.backend.events.len();
        let second = lowerer.lower_function(factorial).unwrap();

        assert_eq!(first, second);
        assert_eq!(lowerer.backend.events.len(), emitted);
    }

    #[test]
    fn both_conditional_arms_are_emitted() {
        let mut module = Module::new();
        let body = if_else(gt(arg(0, int_ty()), int(0)).unwrap(), int(10), int(20)).unwrap();
        let sign = module.define("sign", vec![int_ty()], body).unwrap();

        let mut lowerer = Lowerer::new(&module, Recorder::default());
        lowerer.lower_function(sign).unwrap();
        let events = lowerer.finish().compile().unwrap();

        assert_eq!(
            events,
            vec![
                Event::Enter("sign".to_owned()),
                Event::ArgRef(0),
                Event::Literal("0".to_owned()),
                Event::Binary(BinOp::Gt),
                Event::Literal("10".to_owned()),
                Event::Literal("20".to_owned()),
                Event::Select,
                Event::Exit,
            ]
        );
    }

    #[test]
    fn callee_is_declared_before_call_arguments() {
        let mut module = Module::new();
        let double_body = mul(arg(0, int_ty()), int(2)).unwrap();
        let double = module.define("double", vec![int_ty()], double_body).unwrap();
        let call = module
            .call(double, vec![add(arg(0, int_ty()), int(1)).unwrap()])
            .unwrap();
        let wrap = module.define("wrap", vec![int_ty()], call).unwrap();

        let mut lowerer = Lowerer::new(&module, Recorder::default());
        lowerer.lower_function(wrap).unwrap();
        let events = lowerer.finish().compile().unwrap();

        // The callee's whole body nests inside the caller's, and only
        // then are the call's arguments emitted.
        assert_eq!(
            events,
            vec![
                Event::Enter("wrap".to_owned()),
                Event::Enter("double".to_owned()),
                Event::ArgRef(0),
                Event::Literal("2".to_owned()),
                Event::Binary(BinOp::Mul),
                Event::Exit,
                Event::ArgRef(0),
                Event::Literal("1".to_owned()),
                Event::Binary(BinOp::Add),
                Event::Call { callee: 2, argc: 1 },
                Event::Exit,
            ]
        );
    }

    #[test]
    fn mutually_recursive_bodies_nest_lifo() {
        let mut module = Module::new();
        // Each thunk looks its partner up at resolution time, when both
        // names are registered.
        module
            .define_lazy(
                "is_even",
                vec![int_ty()],
                Type::Basic(Kind::Bool),
                |module, _, args| {
                    let n = args[0].clone();
                    let odd = module.lookup("is_odd").unwrap();
                    let recurse = module.call(odd, vec![sub(n.clone(), int(1))?])?;
                    if_else(eq(n, int(0))?, boolean(true), recurse)
                },
            )
            .unwrap();
        module
            .define_lazy(
                "is_odd",
                vec![int_ty()],
                Type::Basic(Kind::Bool),
                |module, _, args| {
                    let n = args[0].clone();
                    let even = module.lookup("is_even").unwrap();
                    let recurse = module.call(even, vec![sub(n.clone(), int(1))?])?;
                    if_else(eq(n, int(0))?, boolean(false), recurse)
                },
            )
            .unwrap();

        let is_even = module.lookup("is_even").unwrap();
        let mut lowerer = Lowerer::new(&module, Recorder::default());
        lowerer.lower_function(is_even).unwrap();
        let events = lowerer.finish().compile().unwrap();

        // Each function is declared exactly once and the partner's body
        // closes before the outer one does.
        assert_eq!(
            enters_and_exits(&events),
            vec![
                Event::Enter("is_even".to_owned()),
                Event::Enter("is_odd".to_owned()),
                Event::Exit,
                Event::Exit,
            ]
        );
        let calls = events
            .iter()
            .filter(|event| matches!(event, Event::Call { .. }))
            .count();
        assert_eq!(calls, 2);
    }

    #[test]
    fn backend_literal_errors_pass_through() {
        let mut module = Module::new();
        let greet = module.define("greet", vec![], string("hi")).unwrap();

        let mut lowerer = Lowerer::new(&module, Recorder::default());
        let err = lowerer.lower_function(greet).unwrap_err();
        assert_eq!(err, LowerError::Backend(MockError::StringsUnsupported));
    }

    #[test]
    fn function_typed_parameters_are_rejected() {
        let mut module = Module::new();
        let higher = module
            .define("apply", vec![Type::function(vec![], int_ty())], int(1))
            .unwrap();

        let mut lowerer = Lowerer::new(&module, Recorder::default());
        let err = lowerer.lower_function(higher).unwrap_err();
        assert_eq!(
            err,
            LowerError::UnsupportedType {
                ty: Type::function(vec![], int_ty()),
            }
        );
    }

    #[test]
    fn lower_module_covers_every_function() {
        let mut module = Module::new();
        module.define("one", vec![], int(1)).unwrap();
        module.define("two", vec![], int(2)).unwrap();

        let backend = lower_module(&module, Recorder::default()).unwrap();
        let events = backend.compile().unwrap();
        assert_eq!(
            enters_and_exits(&events),
            vec![
                Event::Enter("one".to_owned()),
                Event::Exit,
                Event::Enter("two".to_owned()),
                Event::Exit,
            ]
        );
    }
}
