//! Builtin functions visible as global names.
use std::fmt;

use ds_syntax::Error;
use phf::phf_map;

use crate::Value;

pub type BuiltinFn = fn(&[Value]) -> Result<Value, Error>;

pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<builtin {}/{}>", self.name, self.arity)
    }
}

static BUILTINS: phf::Map<&'static str, Builtin> = phf_map! {
    "abs" => Builtin { name: "abs", arity: 1, func: builtin_abs },
    "ceil" => Builtin { name: "ceil", arity: 1, func: builtin_ceil },
    "floor" => Builtin { name: "floor", arity: 1, func: builtin_floor },
    "round" => Builtin { name: "round", arity: 1, func: builtin_round },
    "int" => Builtin { name: "int", arity: 1, func: builtin_int },
    "float" => Builtin { name: "float", arity: 1, func: builtin_float },
    "str" => Builtin { name: "str", arity: 1, func: builtin_str },
    "len" => Builtin { name: "len", arity: 1, func: builtin_len },
    "typeof" => Builtin { name: "typeof", arity: 1, func: builtin_typeof },
};

pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.get(name)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.keys().copied()
}

fn builtin_abs(args: &[Value]) -> Result<Value, Error> {
    match &args[0] {
        Value::Int(i) => Ok(Value::Int(i.wrapping_abs())),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(Error::unary_type("abs", other.type_name())),
    }
}

fn rounding(name: &str, v: &Value, f: fn(f64) -> f64) -> Result<Value, Error> {
    match v {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Float(x) => Ok(Value::Int(f(*x) as i64)),
        other => Err(Error::unary_type(name, other.type_name())),
    }
}

fn builtin_ceil(args: &[Value]) -> Result<Value, Error> {
    rounding("ceil", &args[0], f64::ceil)
}

fn builtin_floor(args: &[Value]) -> Result<Value, Error> {
    rounding("floor", &args[0], f64::floor)
}

fn builtin_round(args: &[Value]) -> Result<Value, Error> {
    rounding("round", &args[0], f64::round)
}

fn builtin_int(args: &[Value]) -> Result<Value, Error> {
    match &args[0] {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Float(f) => Ok(Value::Int(*f as i64)),
        Value::Str(s) => {
            let t = s.trim();
            t.parse::<i64>()
                .ok()
                .or_else(|| t.parse::<f64>().ok().map(|f| f as i64))
                .map(Value::Int)
                .ok_or_else(|| Error::Type(format!("cannot convert '{s}' to int64")))
        }
        other => Err(Error::unary_type("int", other.type_name())),
    }
}

fn builtin_float(args: &[Value]) -> Result<Value, Error> {
    match &args[0] {
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| Error::Type(format!("cannot convert '{s}' to float64"))),
        other => Err(Error::unary_type("float", other.type_name())),
    }
}

fn builtin_str(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::str(&args[0].to_string()))
}

fn builtin_len(args: &[Value]) -> Result<Value, Error> {
    let n = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::Array(a) => a.borrow().len(),
        Value::Dict(d) => d.borrow().len(),
        other => return Err(Error::unary_type("len", other.type_name())),
    };
    Ok(Value::Int(n as i64))
}

fn builtin_typeof(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::str(args[0].type_name()))
}
