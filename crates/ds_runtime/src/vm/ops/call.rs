//! Calls, returns and computed-value evaluation.
use std::cell::RefCell;
use std::rc::Rc;

use ds_parser::{CompileOptions, compile};
use ds_syntax::{Error, Span};

use crate::Value;
use crate::methods;
use crate::value::{Computed, new_attrs};
use crate::vm::Vm;
use crate::vm::frame::{Code, FrameKind};

impl Vm<'_> {
    /// Execute Op::Call - user functions get a frame, builtins run inline.
    pub(crate) fn op_call(&mut self, callee: Value, args: Vec<Value>) -> Result<(), Error> {
        match callee {
            Value::Function(f) => {
                if args.len() != f.params.len() {
                    return Err(Error::Arity {
                        name: f.name.clone(),
                        expected: f.params.len(),
                        actual: args.len(),
                    });
                }
                let mut locals = new_attrs();
                for (p, a) in f.params.iter().zip(args) {
                    locals.insert(Rc::from(p.as_str()), a);
                }
                self.push_frame(
                    Code::Func(f),
                    Some(Rc::new(RefCell::new(locals))),
                    FrameKind::Call,
                )
            }
            Value::Native(b) => {
                if args.len() != b.arity {
                    return Err(Error::Arity {
                        name: b.name.to_string(),
                        expected: b.arity,
                        actual: args.len(),
                    });
                }
                let v = (b.func)(&args)?;
                self.push(v);
                Ok(())
            }
            other => Err(Error::Type(format!("{} is not callable", other.type_name()))),
        }
    }

    /// Execute Op::CallMethod
    pub(crate) fn op_call_method(
        &mut self,
        recv: &Value,
        name: &str,
        args: &[Value],
    ) -> Result<(), Error> {
        let v = methods::call_method(recv, name, args)?;
        self.push(v);
        Ok(())
    }

    /// Compile the formula and evaluate it with its attributes as `this`.
    pub(crate) fn enter_computed(&mut self, c: Rc<Computed>, span: Option<Span>) -> Result<(), Error> {
        let opts = CompileOptions {
            max_code_len: self.ctx.limits.max_code_len,
            max_nesting: self.ctx.limits.max_nesting,
            origin: 0,
        };
        let compiled = compile(&c.expr, &mut self.ctx.flags, opts)?;
        self.push_frame(
            Code::Chunk(Rc::new(compiled.chunk)),
            Some(c.attrs.clone()),
            FrameKind::Computed { span },
        )
    }

    /// Pop the running frame. `Some` means the main frame finished the run.
    pub(crate) fn leave_frame(&mut self) -> Result<Option<Value>, Error> {
        let Some(frame) = self.frames.pop() else {
            return Ok(Some(Value::Undefined));
        };
        self.stack.truncate(frame.base);
        self.rolls.truncate(frame.roll_base);
        match frame.kind {
            FrameKind::Main => Ok(Some(frame.ret)),
            FrameKind::Call => {
                self.push(frame.ret);
                Ok(None)
            }
            FrameKind::Computed { span } => {
                if let Some(span) = span {
                    self.traces.record(span, &frame.ret, None);
                }
                self.push(frame.ret);
                Ok(None)
            }
        }
    }
}
