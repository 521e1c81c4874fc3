use crate::value::{MAX_DEPTH, Value};

/// String building for value display and trace rendering.
pub trait Appendable {
    fn append_str(&mut self, s: &str);
    fn append_i64(&mut self, i: i64);
    fn append_f64(&mut self, f: f64);
    /// Display form: strings unquoted.
    fn append_value(&mut self, v: &Value);
    /// Nested form: strings quoted.
    fn append_repr(&mut self, v: &Value, depth: usize);
}

impl Appendable for String {
    fn append_str(&mut self, s: &str) {
        self.push_str(s);
    }

    fn append_i64(&mut self, i: i64) {
        let mut buf = itoa::Buffer::new();
        self.push_str(buf.format(i));
    }

    fn append_f64(&mut self, f: f64) {
        use std::fmt::Write;
        write!(self, "{f:.2}").ok();
    }

    fn append_value(&mut self, v: &Value) {
        match v {
            Value::Str(s) => self.push_str(s),
            other => self.append_repr(other, 0),
        }
    }

    fn append_repr(&mut self, v: &Value, depth: usize) {
        if depth > MAX_DEPTH {
            self.push_str("...");
            return;
        }
        match v {
            Value::Int(i) => self.append_i64(*i),
            Value::Float(f) => self.append_f64(*f),
            Value::Str(s) => {
                self.push('\'');
                self.push_str(s);
                self.push('\'');
            }
            Value::Array(items) => {
                self.push('[');
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        self.push_str(", ");
                    }
                    self.append_repr(item, depth + 1);
                }
                self.push(']');
            }
            Value::Dict(map) => {
                self.push('{');
                for (i, (k, item)) in map.borrow().iter().enumerate() {
                    if i > 0 {
                        self.push_str(", ");
                    }
                    self.push('\'');
                    self.push_str(k);
                    self.push_str("': ");
                    self.append_repr(item, depth + 1);
                }
                self.push('}');
            }
            Value::Computed(c) => {
                self.push_str("&(");
                self.push_str(&c.expr);
                self.push(')');
            }
            Value::Function(f) => {
                self.push_str("function ");
                self.push_str(&f.name);
            }
            Value::Native(b) => {
                self.push_str("function ");
                self.push_str(b.name);
            }
            Value::Undefined => self.push_str("undefined"),
            Value::None => self.push_str("null"),
        }
    }
}
