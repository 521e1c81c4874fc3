//! Indexing, slicing and attribute access.
//!
//! Arrays and strings accept negative indices counted from the end; strings index by
//! character. Dicts and computed values answer missing keys with `undefined`.
use std::rc::Rc;

use ds_syntax::Error;

use crate::Value;
use crate::errors::messages::{INDEX_OUT_OF_RANGE, SLICE_NEEDS_ARRAY};

fn index_of(idx: &Value, len: usize) -> Result<usize, Error> {
    let Value::Int(i) = idx else {
        return Err(Error::Type(format!(
            "index must be int64, got {}",
            idx.type_name()
        )));
    };
    let len = len as i64;
    let at = if *i < 0 { i + len } else { *i };
    if at < 0 || at >= len {
        return Err(Error::Range(format!("{INDEX_OUT_OF_RANGE}: {i} (len {len})")));
    }
    Ok(at as usize)
}

fn key_of(key: &Value) -> Rc<str> {
    match key {
        Value::Str(s) => s.clone(),
        other => Rc::from(other.to_string()),
    }
}

/// Execute Op::GetIndex - `obj[idx]`
pub(crate) fn op_get_index(obj: &Value, idx: &Value) -> Result<Value, Error> {
    match obj {
        Value::Array(a) => {
            let a = a.borrow();
            Ok(a[index_of(idx, a.len())?].clone())
        }
        Value::Str(s) => {
            let n = s.chars().count();
            let at = index_of(idx, n)?;
            Ok(s.chars()
                .nth(at)
                .map(|c| Value::str(c.encode_utf8(&mut [0; 4])))
                .unwrap_or_default())
        }
        Value::Dict(d) => Ok(d.borrow().get(&*key_of(idx)).cloned().unwrap_or_default()),
        Value::Computed(c) => Ok(c
            .attrs
            .borrow()
            .get(&*key_of(idx))
            .cloned()
            .unwrap_or_default()),
        other => Err(Error::Type(format!("{} is not subscriptable", other.type_name()))),
    }
}

/// Execute Op::SetIndex - `obj[idx] = val`
pub(crate) fn op_set_index(obj: &Value, idx: &Value, val: Value) -> Result<(), Error> {
    match obj {
        Value::Array(a) => {
            let mut a = a.borrow_mut();
            let at = index_of(idx, a.len())?;
            a[at] = val;
            Ok(())
        }
        Value::Dict(d) => {
            d.borrow_mut().insert(key_of(idx), val);
            Ok(())
        }
        Value::Computed(c) => {
            c.attrs.borrow_mut().insert(key_of(idx), val);
            Ok(())
        }
        other => Err(Error::Type(format!(
            "{} does not support item assignment",
            other.type_name()
        ))),
    }
}

/// Clamp slice bounds against `len`; missing bounds are the ends.
fn bounds(lo: &Value, hi: &Value, len: usize) -> Result<(usize, usize), Error> {
    let n = len as i64;
    let clamp = |v: &Value, default: i64| -> Result<usize, Error> {
        let i = match v {
            Value::Undefined | Value::None => default,
            Value::Int(i) if *i < 0 => i + n,
            Value::Int(i) => *i,
            other => {
                return Err(Error::Type(format!(
                    "slice bound must be int64, got {}",
                    other.type_name()
                )));
            }
        };
        Ok(i.clamp(0, n) as usize)
    };
    let (lo, hi) = (clamp(lo, 0)?, clamp(hi, n)?);
    Ok((lo, hi.max(lo)))
}

/// Execute Op::GetSlice - `obj[lo:hi]`, always a copy
pub(crate) fn op_get_slice(obj: &Value, lo: &Value, hi: &Value) -> Result<Value, Error> {
    match obj {
        Value::Array(a) => {
            let a = a.borrow();
            let (lo, hi) = bounds(lo, hi, a.len())?;
            Ok(Value::array(a[lo..hi].to_vec()))
        }
        Value::Str(s) => {
            let (lo, hi) = bounds(lo, hi, s.chars().count())?;
            let out: String = s.chars().skip(lo).take(hi - lo).collect();
            Ok(Value::str(&out))
        }
        other => Err(Error::Type(format!("{} cannot be sliced", other.type_name()))),
    }
}

/// Execute Op::SetSlice - replace `obj[lo:hi]` with the elements of `val`
pub(crate) fn op_set_slice(obj: &Value, lo: &Value, hi: &Value, val: &Value) -> Result<(), Error> {
    let Value::Array(a) = obj else {
        return Err(Error::Type(format!(
            "{} does not support slice assignment",
            obj.type_name()
        )));
    };
    let Value::Array(src) = val else {
        return Err(Error::Type(SLICE_NEEDS_ARRAY.to_string()));
    };
    // `a[0:1] = a` must not hold two borrows of the same cell
    let items = src.borrow().clone();
    let mut a = a.borrow_mut();
    let (lo, hi) = bounds(lo, hi, a.len())?;
    a.splice(lo..hi, items);
    Ok(())
}

/// Execute Op::GetAttr - `obj.name`
pub(crate) fn op_get_attr(obj: &Value, name: &str) -> Result<Value, Error> {
    match obj {
        Value::Dict(d) => Ok(d.borrow().get(name).cloned().unwrap_or_default()),
        Value::Computed(c) => Ok(c.attrs.borrow().get(name).cloned().unwrap_or_default()),
        other => Err(Error::Type(format!(
            "{} has no attribute '{name}'",
            other.type_name()
        ))),
    }
}

/// Execute Op::SetAttr - `obj.name = val`
pub(crate) fn op_set_attr(obj: &Value, name: &str, val: Value) -> Result<(), Error> {
    match obj {
        Value::Dict(d) => {
            d.borrow_mut().insert(Rc::from(name), val);
            Ok(())
        }
        Value::Computed(c) => {
            c.attrs.borrow_mut().insert(Rc::from(name), val);
            Ok(())
        }
        other => Err(Error::Type(format!(
            "cannot set attribute '{name}' on {}",
            other.type_name()
        ))),
    }
}
