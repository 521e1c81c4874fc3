//! Runtime values.
//!
//! Containers are shared by reference (`Rc<RefCell<..>>`): assigning an array to a second
//! name aliases it, while slicing copies. Strings are immutable `Rc<str>`.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::RandomState;
use ds_ir::FuncProto;
use indexmap::IndexMap;

use crate::builtins::Builtin;
use crate::util::Appendable;

/// Insertion-ordered attribute map used for dicts, scopes and computed-value attributes.
pub type AttrMap = IndexMap<Rc<str>, Value, RandomState>;

pub fn fast_hasher() -> RandomState {
    RandomState::with_seeds(0, 0, 0, 0)
}

pub fn new_attrs() -> AttrMap {
    AttrMap::with_hasher(fast_hasher())
}

/// Nesting depth after which printing and structural equality give up.
pub(crate) const MAX_DEPTH: usize = 32;

/// A formula stored by `&name = expr`, re-evaluated on every load with `attrs` as `this`.
#[derive(Debug)]
pub struct Computed {
    pub expr: Rc<str>,
    pub attrs: Rc<RefCell<AttrMap>>,
}

#[derive(Clone, Debug, Default)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Array(Rc<RefCell<Vec<Value>>>),
    Dict(Rc<RefCell<AttrMap>>),
    Computed(Rc<Computed>),
    Function(Rc<FuncProto>),
    Native(&'static Builtin),
    #[default]
    Undefined,
    None,
}

impl Value {
    pub fn int(i: i64) -> Self {
        Value::Int(i)
    }

    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    pub fn bool(b: bool) -> Self {
        Value::Int(b as i64)
    }

    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn dict(map: AttrMap) -> Self {
        Value::Dict(Rc::new(RefCell::new(map)))
    }

    pub fn dict_from<'k>(pairs: impl IntoIterator<Item = (&'k str, Value)>) -> Self {
        let mut map = new_attrs();
        for (k, v) in pairs {
            map.insert(Rc::from(k), v);
        }
        Value::dict(map)
    }

    pub fn computed(expr: &str) -> Self {
        Value::Computed(Rc::new(Computed {
            expr: Rc::from(expr),
            attrs: Rc::new(RefCell::new(new_attrs())),
        }))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int64",
            Value::Float(_) => "float64",
            Value::Str(_) => "str",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
            Value::Computed(_) => "computed",
            Value::Function(_) | Value::Native(_) => "function",
            Value::Undefined => "undefined",
            Value::None => "none",
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Array(a) => !a.borrow().is_empty(),
            Value::Dict(d) => !d.borrow().is_empty(),
            Value::Function(_) | Value::Native(_) => true,
            Value::Computed(_) | Value::Undefined | Value::None => false,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view, promoting integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Identity first, then payload; int and float compare numerically.
    pub fn equals(&self, other: &Value) -> bool {
        self.equals_at(other, 0)
    }

    fn equals_at(&self, other: &Value, depth: usize) -> bool {
        if depth > MAX_DEPTH {
            return false;
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals_at(y, depth + 1))
            }
            (Value::Dict(a), Value::Dict(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.equals_at(w, depth + 1)))
            }
            (Value::Computed(a), Value::Computed(b)) => Rc::ptr_eq(a, b) || a.expr == b.expr,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.name == b.name,
            (Value::Undefined, Value::Undefined) | (Value::None, Value::None) => true,
            _ => false,
        }
    }

    /// Like `to_string`, but strings are quoted.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        out.append_repr(self, 0);
        out
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        out.append_value(self);
        f.write_str(&out)
    }
}
