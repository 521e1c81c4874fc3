//! Array, range, dict and template-string construction.
use std::rc::Rc;

use ds_syntax::Error;

use crate::util::Appendable;
use crate::value::new_attrs;
use crate::Value;

/// Execute Op::MakeRange - inclusive `[lo..hi]`, counting down when `hi < lo`.
pub(crate) fn op_make_range(lo: &Value, hi: &Value) -> Result<Value, Error> {
    let (Value::Int(lo), Value::Int(hi)) = (lo, hi) else {
        return Err(Error::Type(format!(
            "range bounds must be int64, got {} and {}",
            lo.type_name(),
            hi.type_name()
        )));
    };
    let items: Vec<Value> = if lo <= hi {
        (*lo..=*hi).map(Value::Int).collect()
    } else {
        (*hi..=*lo).rev().map(Value::Int).collect()
    };
    Ok(Value::array(items))
}

/// Number of elements a range will hold, for charging against the budget first.
pub(crate) fn range_len(lo: &Value, hi: &Value) -> u64 {
    match (lo, hi) {
        (Value::Int(lo), Value::Int(hi)) => lo.abs_diff(*hi).saturating_add(1),
        _ => 0,
    }
}

/// Execute Op::MakeDict - `items` alternates key, value. Later keys win.
pub(crate) fn op_make_dict(items: Vec<Value>) -> Value {
    let mut map = new_attrs();
    let mut it = items.into_iter();
    while let (Some(k), Some(v)) = (it.next(), it.next()) {
        let key: Rc<str> = match k {
            Value::Str(s) => s,
            other => Rc::from(other.to_string()),
        };
        map.insert(key, v);
    }
    Value::dict(map)
}

/// Execute Op::StrJoin - concatenate display forms
pub(crate) fn op_str_join(parts: &[Value]) -> Value {
    let mut out = String::new();
    for p in parts {
        out.append_value(p);
    }
    Value::str(&out)
}
