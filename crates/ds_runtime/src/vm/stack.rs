//! Operand stack and constant-pool helpers.
use std::rc::Rc;

use ds_ir::FuncProto;
use ds_syntax::Error;

use super::Vm;
use super::frame::Frame;
use crate::Value;
use crate::errors::messages::{BAD_CONSTANT, NO_FRAME, STACK_UNDERFLOW};

// broken bytecode, not an exhausted limit
fn stack_underflow() -> Error {
    Error::Range(STACK_UNDERFLOW.to_string())
}

fn no_frame() -> Error {
    Error::Range(NO_FRAME.to_string())
}

impl Vm<'_> {
    #[inline]
    pub(crate) fn push(&mut self, v: Value) {
        self.stack.push(v);
    }

    /// Pop, never below the running frame's base.
    #[inline]
    pub(crate) fn pop(&mut self) -> Result<Value, Error> {
        let base = self.frames.last().map_or(0, |f| f.base);
        if self.stack.len() <= base {
            return Err(stack_underflow());
        }
        self.stack.pop().ok_or_else(stack_underflow)
    }

    /// The top `n` values, bottom first.
    pub(crate) fn pop_n(&mut self, n: usize) -> Result<Vec<Value>, Error> {
        let base = self.frames.last().map_or(0, |f| f.base);
        if self.stack.len() < base + n {
            return Err(stack_underflow());
        }
        let at = self.stack.len() - n;
        Ok(self.stack.split_off(at))
    }

    pub(crate) fn peek(&self) -> Result<&Value, Error> {
        self.stack.last().ok_or_else(stack_underflow)
    }

    pub(crate) fn frame(&self) -> Result<&Frame, Error> {
        self.frames.last().ok_or_else(no_frame)
    }

    pub(crate) fn frame_mut(&mut self) -> Result<&mut Frame, Error> {
        self.frames.last_mut().ok_or_else(no_frame)
    }

    pub(crate) fn const_str(&self, idx: u32) -> Result<Rc<str>, Error> {
        self.frame()?
            .code
            .chunk()
            .str_at(idx)
            .cloned()
            .ok_or_else(|| Error::Range(format!("{BAD_CONSTANT}: #{idx}")))
    }

    pub(crate) fn const_func(&self, idx: u32) -> Result<Rc<FuncProto>, Error> {
        self.frame()?
            .code
            .chunk()
            .func_at(idx)
            .cloned()
            .ok_or_else(|| Error::Range(format!("{BAD_CONSTANT}: #{idx}")))
    }

    /// Pop an int64 operand; `what` names it in the type error.
    pub(crate) fn pop_int(&mut self, what: &str) -> Result<i64, Error> {
        match self.pop()? {
            Value::Int(i) => Ok(i),
            other => Err(Error::Type(format!(
                "{what} must be int64, got {}",
                other.type_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use ds_syntax::ErrorKind;

    use super::Vm;
    use crate::Context;

    #[test]
    fn internal_faults_are_not_budget_errors() {
        let mut ctx = Context::new();
        let mut vm = Vm::new(&mut ctx, 1);
        assert_eq!(vm.pop().unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(vm.pop_n(2).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(vm.peek().unwrap_err().kind(), ErrorKind::Range);
        let e = vm.frame().unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Range);
        assert_eq!(e.to_string(), "no active call frame");
        assert_eq!(vm.const_str(0).unwrap_err().kind(), ErrorKind::Range);
    }
}
