//! Binary operator implementations for the evaluator.
//!
//! Direct enum-based dispatch: the kind set is fixed, so pattern matching
//! keeps every combination exhaustively checked. All integer arithmetic is
//! checked; overflow and zero divisors are reported, never wrapped.

use arbor_ir::BinOp;

use crate::errors::{
    binary_type_mismatch, division_by_zero, integer_overflow, invalid_binary_op, modulo_by_zero,
    EvalResult,
};
use crate::value::Value;

/// Checked arithmetic result with overflow handling.
#[inline]
fn checked_arith(result: Option<i64>, op: BinOp) -> EvalResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op))
}

/// Evaluate a binary operation over two concrete values.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinOp) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Bool(a), Value::Bool(b)) => eval_bool_binary(*a, *b, op),
        (Value::Str(a), Value::Str(b)) => eval_str_binary(a, b, op),
        _ => Err(binary_type_mismatch(left.type_name(), right.type_name())),
    }
}

fn eval_int_binary(a: i64, b: i64, op: BinOp) -> EvalResult {
    match op {
        BinOp::Add => checked_arith(a.checked_add(b), op),
        BinOp::Sub => checked_arith(a.checked_sub(b), op),
        BinOp::Mul => checked_arith(a.checked_mul(b), op),
        BinOp::Div => {
            if b == 0 {
                Err(division_by_zero())
            } else {
                checked_arith(a.checked_div(b), op)
            }
        }
        BinOp::Mod => {
            if b == 0 {
                Err(modulo_by_zero())
            } else {
                checked_arith(a.checked_rem(b), op)
            }
        }
        BinOp::Eq => Ok(Value::Bool(a == b)),
        BinOp::Ne => Ok(Value::Bool(a != b)),
        BinOp::Lt => Ok(Value::Bool(a < b)),
        BinOp::Gt => Ok(Value::Bool(a > b)),
    }
}

fn eval_bool_binary(a: bool, b: bool, op: BinOp) -> EvalResult {
    match op {
        BinOp::Eq => Ok(Value::Bool(a == b)),
        BinOp::Ne => Ok(Value::Bool(a != b)),
        BinOp::Add
        | BinOp::Sub
        | BinOp::Mul
        | BinOp::Div
        | BinOp::Mod
        | BinOp::Lt
        | BinOp::Gt => Err(invalid_binary_op("bool", op)),
    }
}

fn eval_str_binary(a: &str, b: &str, op: BinOp) -> EvalResult {
    match op {
        BinOp::Eq => Ok(Value::Bool(a == b)),
        BinOp::Ne => Ok(Value::Bool(a != b)),
        BinOp::Add
        | BinOp::Sub
        | BinOp::Mul
        | BinOp::Div
        | BinOp::Mod
        | BinOp::Lt
        | BinOp::Gt => Err(invalid_binary_op("str", op)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EvalError;
    use pretty_assertions::assert_eq;

    fn int_op(a: i64, b: i64, op: BinOp) -> EvalResult {
        evaluate_binary(&Value::Int(a), &Value::Int(b), op)
    }

    #[test]
    fn integer_arithmetic() {
        assert_eq!(int_op(12, 13, BinOp::Add), Ok(Value::Int(25)));
        assert_eq!(int_op(3, 10, BinOp::Sub), Ok(Value::Int(-7)));
        assert_eq!(int_op(-4, 6, BinOp::Mul), Ok(Value::Int(-24)));
        assert_eq!(int_op(7, 2, BinOp::Div), Ok(Value::Int(3)));
        assert_eq!(int_op(7, 2, BinOp::Mod), Ok(Value::Int(1)));
    }

    #[test]
    fn integer_comparison() {
        assert_eq!(int_op(1, 2, BinOp::Eq), Ok(Value::Bool(false)));
        assert_eq!(int_op(-10, -10, BinOp::Eq), Ok(Value::Bool(true)));
        assert_eq!(int_op(1, 2, BinOp::Ne), Ok(Value::Bool(true)));
        assert_eq!(int_op(1, 2, BinOp::Lt), Ok(Value::Bool(true)));
        assert_eq!(int_op(1, 2, BinOp::Gt), Ok(Value::Bool(false)));
    }

    #[test]
    fn zero_divisors_are_errors() {
        assert_eq!(int_op(1, 0, BinOp::Div), Err(EvalError::DivisionByZero));
        assert_eq!(int_op(1, 0, BinOp::Mod), Err(EvalError::ModuloByZero));
    }

    #[test]
    fn overflow_is_an_error() {
        assert_eq!(
            int_op(i64::MAX, 1, BinOp::Add),
            Err(EvalError::IntegerOverflow { op: BinOp::Add })
        );
        assert_eq!(
            int_op(i64::MIN, -1, BinOp::Div),
            Err(EvalError::IntegerOverflow { op: BinOp::Div })
        );
    }

    #[test]
    fn boolean_equality_only() {
        assert_eq!(
            evaluate_binary(&Value::Bool(true), &Value::Bool(true), BinOp::Eq),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            evaluate_binary(&Value::Bool(true), &Value::Bool(false), BinOp::Add),
            Err(EvalError::InvalidBinaryOp {
                type_name: "bool",
                op: BinOp::Add,
            })
        );
    }

    #[test]
    fn string_equality_only() {
        let a = Value::Str("a".to_owned());
        let b = Value::Str("b".to_owned());
        assert_eq!(evaluate_binary(&a, &a, BinOp::Eq), Ok(Value::Bool(true)));
        assert_eq!(evaluate_binary(&a, &b, BinOp::Ne), Ok(Value::Bool(true)));
        assert_eq!(
            evaluate_binary(&a, &b, BinOp::Lt),
            Err(EvalError::InvalidBinaryOp {
                type_name: "str",
                op: BinOp::Lt,
            })
        );
    }

    #[test]
    fn mixed_kinds_are_rejected() {
        assert_eq!(
            evaluate_binary(&Value::Int(1), &Value::Bool(true), BinOp::Eq),
            Err(EvalError::BinaryTypeMismatch {
                left: "int",
                right: "bool",
            })
        );
    }
}
