//! Ordering comparisons. Equality lives on `Value::equals` since it is total.
use std::cmp::Ordering;

use ds_ir::BinOp;
use ds_syntax::Error;

use crate::Value;

/// Execute Op::Binary for `< <= > >=` - numeric operands only, result 0/1.
pub(crate) fn op_order(op: BinOp, l: &Value, r: &Value) -> Result<Value, Error> {
    let ord = match (l, r) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        _ => match (l.as_f64(), r.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => return Err(Error::binary_type(op.name(), l.type_name(), r.type_name())),
        },
    };
    // NaN compares false everywhere
    let Some(ord) = ord else {
        return Ok(Value::bool(false));
    };
    let hit = match op {
        BinOp::Lt => ord == Ordering::Less,
        BinOp::Le => ord != Ordering::Greater,
        BinOp::Gt => ord == Ordering::Greater,
        BinOp::Ge => ord != Ordering::Less,
        _ => false,
    };
    Ok(Value::bool(hit))
}
