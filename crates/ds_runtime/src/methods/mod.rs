//! Methods on arrays, strings and dicts (`recv.name(args)`).
use ds_syntax::Error;

use crate::Value;

mod dict;
mod list;
mod string;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MethodKind {
    Len,
    Sum,
    Pop,
    Shift,
    Push,
    KeepHigh,
    KeepLow,
    Keys,
    Values,
    Unknown,
}

impl MethodKind {
    pub(crate) fn from_str(s: &str) -> Self {
        match s {
            "len" => Self::Len,
            "sum" => Self::Sum,
            "pop" => Self::Pop,
            "shift" => Self::Shift,
            "push" => Self::Push,
            "kh" => Self::KeepHigh,
            "kl" => Self::KeepLow,
            "keys" => Self::Keys,
            "values" => Self::Values,
            _ => Self::Unknown,
        }
    }
}

pub(crate) fn call_method(recv: &Value, method: &str, args: &[Value]) -> Result<Value, Error> {
    let kind = MethodKind::from_str(method);
    let found = match recv {
        Value::Array(_) => list::dispatch(recv, kind, method, args),
        Value::Str(_) => string::dispatch(recv, kind, method, args),
        Value::Dict(_) => dict::dispatch(recv, kind, method, args),
        _ => None,
    };
    found.unwrap_or_else(|| {
        Err(Error::Type(format!(
            "{} has no method '{method}'",
            recv.type_name()
        )))
    })
}

pub(super) fn validate_arity(method: &str, args: &[Value], expected: usize) -> Result<(), Error> {
    if args.len() != expected {
        return Err(Error::Arity {
            name: method.to_string(),
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}
