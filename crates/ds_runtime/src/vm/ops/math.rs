//! Arithmetic, bitwise and unary operators.
//!
//! Every operator is an explicit match over operand kinds; anything not listed is a
//! type error naming the operator and both operand types.
use ds_ir::{BinOp, UnaryOp};
use ds_syntax::Error;

use crate::Value;
use crate::errors::messages::DIVISION_BY_ZERO;
use crate::vm::ops::compare;

/// Execute Op::Binary - dispatch on the operator.
pub(crate) fn op_binary(op: BinOp, l: &Value, r: &Value, ignore_div0: bool) -> Result<Value, Error> {
    match op {
        BinOp::Add => add(l, r),
        BinOp::Sub => numeric(op, l, r, i64::wrapping_sub, |a, b| a - b),
        BinOp::Mul => numeric(op, l, r, i64::wrapping_mul, |a, b| a * b),
        BinOp::Div => div(l, r, ignore_div0),
        BinOp::Mod => modulo(l, r, ignore_div0),
        BinOp::Pow => pow(l, r),
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => compare::op_order(op, l, r),
        BinOp::Eq => Ok(Value::bool(l.equals(r))),
        BinOp::Ne => Ok(Value::bool(!l.equals(r))),
        BinOp::BitAnd | BinOp::BitOr => bitwise(op, l, r),
        BinOp::NullCoalesce => Ok(match l {
            Value::Undefined | Value::None => r.clone(),
            other => other.clone(),
        }),
    }
}

fn type_error(op: BinOp, l: &Value, r: &Value) -> Error {
    Error::binary_type(op.name(), l.type_name(), r.type_name())
}

/// int op int stays int (wrapping); any float operand promotes.
fn numeric(
    op: BinOp,
    l: &Value,
    r: &Value,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, Error> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(int_op(*a, *b))),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            match (l.as_f64(), r.as_f64()) {
                (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
                _ => Err(type_error(op, l, r)),
            }
        }
        _ => Err(type_error(op, l, r)),
    }
}

fn add(l: &Value, r: &Value) -> Result<Value, Error> {
    match (l, r) {
        (Value::Str(a), Value::Str(b)) => {
            let mut s = String::with_capacity(a.len() + b.len());
            s.push_str(a);
            s.push_str(b);
            Ok(Value::str(&s))
        }
        _ => numeric(BinOp::Add, l, r, i64::wrapping_add, |a, b| a + b),
    }
}

fn div(l: &Value, r: &Value, ignore_div0: bool) -> Result<Value, Error> {
    let zero = match r {
        Value::Int(0) => true,
        Value::Float(f) => *f == 0.0,
        _ => false,
    };
    if zero && matches!(l, Value::Int(_) | Value::Float(_)) {
        if ignore_div0 {
            return Ok(l.clone());
        }
        return Err(Error::Range(DIVISION_BY_ZERO.to_string()));
    }
    numeric(BinOp::Div, l, r, i64::wrapping_div, |a, b| a / b)
}

/// Integers only; `2 % 3.1` is a type error.
fn modulo(l: &Value, r: &Value, ignore_div0: bool) -> Result<Value, Error> {
    match (l, r) {
        (Value::Int(_), Value::Int(0)) if ignore_div0 => Ok(l.clone()),
        (Value::Int(_), Value::Int(0)) => Err(Error::Range(DIVISION_BY_ZERO.to_string())),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_rem(*b))),
        _ => Err(type_error(BinOp::Mod, l, r)),
    }
}

/// int ** int goes through f64 and is cast back, saturating at the i64 range.
fn pow(l: &Value, r: &Value) -> Result<Value, Error> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int((*a as f64).powf(*b as f64) as i64)),
        _ => numeric(BinOp::Pow, l, r, |a, _| a, f64::powf),
    }
}

fn bitwise(op: BinOp, l: &Value, r: &Value) -> Result<Value, Error> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(if op == BinOp::BitAnd {
            a & b
        } else {
            a | b
        })),
        _ => Err(type_error(op, l, r)),
    }
}

/// Execute Op::Unary - negate, identity, logical not
pub(crate) fn op_unary(op: UnaryOp, v: &Value) -> Result<Value, Error> {
    match (op, v) {
        (UnaryOp::Not, v) => Ok(Value::bool(!v.truthy())),
        (UnaryOp::Neg, Value::Int(i)) => Ok(Value::Int(i.wrapping_neg())),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Pos, Value::Int(_) | Value::Float(_)) => Ok(v.clone()),
        _ => Err(Error::unary_type(op.name(), v.type_name())),
    }
}
