//! Expression nodes and their builder functions.
//!
//! Nodes form an immutable tree; every compound builder unifies its
//! children's types on the spot and caches the node's own result type, so
//! an ill-typed node can never be constructed. Construction happens through
//! the explicit builders (`add`, `eq`, `if_else`, ...) rather than operator
//! overloading, keeping operand typing visible at the call site.

use arbor_types::{unify, Kind, Type};

use crate::error::IrError;
use crate::literal::LitValue;
use crate::module::FuncId;
use crate::ops::BinOp;

/// A node in a typed expression tree.
///
/// The set is closed: the interpreter and the lowering pass both match
/// exhaustively, so adding a variant is a compile-time checklist of every
/// place that must handle it.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A constant.
    Literal(LitValue),

    /// Binary operation over two unified operands.
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        ty: Type,
    },

    /// Conditional: if cond then t else e. Only the selected arm is
    /// evaluated at run time; both arms are lowered at compile time.
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
        ty: Type,
    },

    /// Placeholder for the `index`-th positional parameter of the
    /// enclosing function. Carries no value; values are supplied per
    /// invocation through a call-local binding environment.
    Arg { index: usize, ty: Type },

    /// Invocation of a function registered in a module.
    Call {
        func: FuncId,
        args: Vec<Expr>,
        ty: Type,
    },
}

impl Expr {
    /// The node's result type, computed at construction.
    #[must_use]
    pub fn ty(&self) -> Type {
        match self {
            Expr::Literal(value) => Type::Basic(value.kind()),
            Expr::Binary { ty, .. }
            | Expr::If { ty, .. }
            | Expr::Arg { ty, .. }
            | Expr::Call { ty, .. } => ty.clone(),
        }
    }
}

/// Integer literal.
#[must_use]
pub fn int(value: i64) -> Expr {
    Expr::Literal(LitValue::Int(value))
}

/// Boolean literal.
#[must_use]
pub fn boolean(value: bool) -> Expr {
    Expr::Literal(LitValue::Bool(value))
}

/// String literal.
#[must_use]
pub fn string(value: impl Into<String>) -> Expr {
    Expr::Literal(LitValue::Str(value.into()))
}

/// Argument placeholder for the `index`-th parameter of the enclosing
/// function.
#[must_use]
pub fn arg(index: usize, ty: Type) -> Expr {
    Expr::Arg { index, ty }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Result<Expr, IrError> {
    let unified = unify(&left.ty(), &right.ty())?;
    match unified.basic_kind() {
        Some(kind) if op.admits(kind) => {}
        _ => return Err(IrError::InvalidOperand { op, ty: unified }),
    }
    let ty = if op.is_comparison() {
        Type::Basic(Kind::Bool)
    } else {
        unified
    };
    Ok(Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        ty,
    })
}

/// `left + right`.
pub fn add(left: Expr, right: Expr) -> Result<Expr, IrError> {
    binary(BinOp::Add, left, right)
}

/// `left - right`.
pub fn sub(left: Expr, right: Expr) -> Result<Expr, IrError> {
    binary(BinOp::Sub, left, right)
}

/// `left * right`.
pub fn mul(left: Expr, right: Expr) -> Result<Expr, IrError> {
    binary(BinOp::Mul, left, right)
}

/// `left / right` (integer division).
pub fn div(left: Expr, right: Expr) -> Result<Expr, IrError> {
    binary(BinOp::Div, left, right)
}

/// `left % right`.
pub fn modulo(left: Expr, right: Expr) -> Result<Expr, IrError> {
    binary(BinOp::Mod, left, right)
}

/// `left == right`.
pub fn eq(left: Expr, right: Expr) -> Result<Expr, IrError> {
    binary(BinOp::Eq, left, right)
}

/// `left != right`.
pub fn ne(left: Expr, right: Expr) -> Result<Expr, IrError> {
    binary(BinOp::Ne, left, right)
}

/// `left < right`.
pub fn lt(left: Expr, right: Expr) -> Result<Expr, IrError> {
    binary(BinOp::Lt, left, right)
}

/// `left > right`.
pub fn gt(left: Expr, right: Expr) -> Result<Expr, IrError> {
    binary(BinOp::Gt, left, right)
}

/// Conditional expression.
///
/// The condition must be boolean and the two arms must unify; the node's
/// type is the arms' unified type.
pub fn if_else(cond: Expr, then_branch: Expr, else_branch: Expr) -> Result<Expr, IrError> {
    let cond_ty = cond.ty();
    if !cond_ty.is_basic(Kind::Bool) {
        return Err(IrError::NonBooleanCondition { found: cond_ty });
    }
    let ty = unify(&then_branch.ty(), &else_branch.ty())?;
    Ok(Expr::If {
        cond: Box::new(cond),
        then_branch: Box::new(then_branch),
        else_branch: Box::new(else_branch),
        ty,
    })
}
