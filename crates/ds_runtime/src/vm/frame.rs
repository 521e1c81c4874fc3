//! Call frames.
use std::cell::RefCell;
use std::rc::Rc;

use ds_ir::{Chunk, FuncProto};
use ds_syntax::Span;

use crate::value::AttrMap;
use crate::Value;

/// Code a frame executes: the program itself or a function body kept alive by its proto.
#[derive(Debug)]
pub(crate) enum Code {
    Chunk(Rc<Chunk>),
    Func(Rc<FuncProto>),
}

impl Code {
    pub(crate) fn chunk(&self) -> &Chunk {
        match self {
            Code::Chunk(c) => c,
            Code::Func(f) => &f.chunk,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameKind {
    /// Top-level program; returning ends the run.
    Main,
    /// User function; the result is pushed for the caller.
    Call,
    /// Computed-value evaluation; `span` is the caller's load site, if traced.
    Computed { span: Option<Span> },
}

#[derive(Debug)]
pub(crate) struct Frame {
    pub(crate) code: Code,
    pub(crate) ip: usize,
    /// `None` means names resolve straight to the globals.
    pub(crate) locals: Option<Rc<RefCell<AttrMap>>>,
    /// Operand stack height at entry.
    pub(crate) base: usize,
    /// Roll stack height at entry.
    pub(crate) roll_base: usize,
    pub(crate) ret: Value,
    pub(crate) kind: FrameKind,
}

impl Frame {
    pub(crate) fn new(
        code: Code,
        locals: Option<Rc<RefCell<AttrMap>>>,
        base: usize,
        roll_base: usize,
        kind: FrameKind,
    ) -> Self {
        Self {
            code,
            ip: 0,
            locals,
            base,
            roll_base,
            ret: Value::Undefined,
            kind,
        }
    }
}
