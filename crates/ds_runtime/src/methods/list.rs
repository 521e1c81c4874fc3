use ds_syntax::Error;

use super::{MethodKind, validate_arity};
use crate::Value;

pub(super) fn dispatch(
    recv: &Value,
    kind: MethodKind,
    method: &str,
    args: &[Value],
) -> Option<Result<Value, Error>> {
    let Value::Array(items) = recv else {
        return None;
    };
    let r = match kind {
        MethodKind::Len => validate_arity(method, args, 0)
            .map(|_| Value::Int(items.borrow().len() as i64)),
        MethodKind::Sum => validate_arity(method, args, 0).and_then(|_| sum(&items.borrow())),
        MethodKind::Pop => validate_arity(method, args, 0)
            .map(|_| items.borrow_mut().pop().unwrap_or_default()),
        MethodKind::Shift => validate_arity(method, args, 0).map(|_| {
            let mut items = items.borrow_mut();
            if items.is_empty() {
                Value::Undefined
            } else {
                items.remove(0)
            }
        }),
        MethodKind::Push => validate_arity(method, args, 1).map(|_| {
            items.borrow_mut().push(args[0].clone());
            recv.clone()
        }),
        MethodKind::KeepHigh => {
            validate_arity(method, args, 0).and_then(|_| extreme(&items.borrow(), true))
        }
        MethodKind::KeepLow => {
            validate_arity(method, args, 0).and_then(|_| extreme(&items.borrow(), false))
        }
        _ => return None,
    };
    Some(r)
}

/// Integer sum, or a float sum once any element is a float.
fn sum(items: &[Value]) -> Result<Value, Error> {
    let mut acc = Value::Int(0);
    for v in items {
        acc = match (&acc, v) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_add(*b)),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => Value::Float(x + y),
                _ => return Err(Error::binary_type("add", a.type_name(), b.type_name())),
            },
        };
    }
    Ok(acc)
}

/// Largest (or smallest) numeric element; the first one wins ties.
fn extreme(items: &[Value], high: bool) -> Result<Value, Error> {
    let mut best: Option<(f64, &Value)> = None;
    for v in items {
        let Some(x) = v.as_f64() else {
            return Err(Error::unary_type(if high { "kh" } else { "kl" }, v.type_name()));
        };
        let better = match best {
            None => true,
            Some((b, _)) if high => x > b,
            Some((b, _)) => x < b,
        };
        if better {
            best = Some((x, v));
        }
    }
    Ok(best.map(|(_, v)| v.clone()).unwrap_or_default())
}
