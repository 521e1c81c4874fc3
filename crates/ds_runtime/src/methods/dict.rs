use ds_syntax::Error;

use super::{MethodKind, validate_arity};
use crate::Value;

pub(super) fn dispatch(
    recv: &Value,
    kind: MethodKind,
    method: &str,
    args: &[Value],
) -> Option<Result<Value, Error>> {
    let Value::Dict(map) = recv else {
        return None;
    };
    let r = match kind {
        MethodKind::Len => {
            validate_arity(method, args, 0).map(|_| Value::Int(map.borrow().len() as i64))
        }
        MethodKind::Keys => validate_arity(method, args, 0).map(|_| {
            Value::array(map.borrow().keys().map(|k| Value::Str(k.clone())).collect())
        }),
        MethodKind::Values => validate_arity(method, args, 0)
            .map(|_| Value::array(map.borrow().values().cloned().collect())),
        _ => return None,
    };
    Some(r)
}
