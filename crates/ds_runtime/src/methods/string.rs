use ds_syntax::Error;

use super::{MethodKind, validate_arity};
use crate::Value;

pub(super) fn dispatch(
    recv: &Value,
    kind: MethodKind,
    method: &str,
    args: &[Value],
) -> Option<Result<Value, Error>> {
    let Value::Str(s) = recv else {
        return None;
    };
    match kind {
        MethodKind::Len => Some(
            validate_arity(method, args, 0).map(|_| Value::Int(s.chars().count() as i64)),
        ),
        _ => None,
    }
}
