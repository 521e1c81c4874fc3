//! Name resolution and assignment.
//!
//! Loads consult, in order: the scope hooks, the running frame's locals, the context
//! globals, then the builtins. A name found nowhere reads as `undefined`.
use std::rc::Rc;

use ds_syntax::{Error, Span};

use crate::Value;
use crate::builtins;
use crate::vm::Vm;

/// Reserved name for the attribute scope of the running frame.
const THIS: &str = "this";

impl Vm<'_> {
    fn resolve(&mut self, name: &str) -> Result<Value, Error> {
        let locals = self.frame()?.locals.clone();
        if name == THIS {
            let attrs = locals.unwrap_or_else(|| self.ctx.globals.clone());
            return Ok(Value::Dict(attrs));
        }
        if self.ctx.flags.disable_load_varname {
            return Err(Error::LoadDisabled(name.to_string()));
        }
        if let Some(v) = self.ctx.hooks.as_mut().and_then(|h| h.load(name)) {
            return Ok(v);
        }
        if let Some(locals) = locals {
            let found = locals.borrow().get(name).cloned();
            if let Some(v) = found {
                return Ok(v);
            }
        }
        if let Some(v) = self.ctx.globals.borrow().get(name) {
            return Ok(v.clone());
        }
        Ok(builtins::lookup(name).map_or(Value::Undefined, Value::Native))
    }

    /// Execute Op::LoadName - computed values are evaluated in a new frame.
    pub(crate) fn op_load_name(&mut self, name: &str, span: Option<Span>) -> Result<(), Error> {
        match self.resolve(name)? {
            Value::Computed(c) => {
                let span = self.trace_span(span);
                self.enter_computed(c, span)
            }
            v => {
                self.record(span, &v, None);
                self.push(v);
                Ok(())
            }
        }
    }

    /// Execute Op::LoadRaw - `&name`, no evaluation
    pub(crate) fn op_load_raw(&mut self, name: &str) -> Result<(), Error> {
        let v = self.resolve(name)?;
        self.push(v);
        Ok(())
    }

    /// Execute Op::StoreName - hooks first, then frame locals or globals.
    pub(crate) fn op_store_name(&mut self, name: Rc<str>, v: Value) {
        if self.ctx.hooks.as_mut().is_some_and(|h| h.store(&name, &v)) {
            return;
        }
        let locals = self.frames.last().and_then(|f| f.locals.clone());
        match locals {
            Some(l) => l.borrow_mut().insert(name, v),
            None => self.ctx.globals.borrow_mut().insert(name, v),
        };
    }
}
