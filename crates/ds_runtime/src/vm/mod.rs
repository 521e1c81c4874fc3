//! Bytecode virtual machine.
//!
//! One `Vm` executes one run of a `Context`. Function calls and computed-value loads
//! push frames onto an explicit stack instead of recursing, so nesting depth is bounded
//! by `Limits::max_frames` rather than the host stack.

mod dispatch;
mod frame;
pub(crate) mod ops;
mod stack;
pub(crate) mod trace;

use std::cell::RefCell;
use std::rc::Rc;

use ds_ir::Chunk;
use ds_syntax::{Error, Span};

use crate::Context;
use crate::Value;
use crate::errors::messages::{FRAME_LIMIT, OP_LIMIT};
use crate::value::AttrMap;
use frame::{Code, Frame, FrameKind};
use ops::dice::RollCtx;
use trace::TraceLog;

pub(crate) struct Vm<'c> {
    pub(crate) ctx: &'c mut Context,
    pub(crate) stack: Vec<Value>,
    pub(crate) frames: Vec<Frame>,
    pub(crate) rolls: Vec<RollCtx>,
    pub(crate) traces: TraceLog,
    /// Chunks compiled from this run's source carry this origin; only they are traced.
    origin: u64,
}

impl<'c> Vm<'c> {
    pub(crate) fn new(ctx: &'c mut Context, origin: u64) -> Self {
        Self {
            ctx,
            stack: Vec::with_capacity(64),
            frames: Vec::with_capacity(8),
            rolls: Vec::new(),
            traces: TraceLog::default(),
            origin,
        }
    }

    pub(crate) fn into_traces(self) -> TraceLog {
        self.traces
    }

    /// Count `n` units of work against the run's budget.
    pub(crate) fn charge(&mut self, n: u64) -> Result<(), Error> {
        let count = self.ctx.num_op_count.saturating_add(n);
        self.ctx.num_op_count = count;
        if count > self.ctx.limits.max_ops {
            return Err(Error::ResourceExhausted(format!(
                "{OP_LIMIT}: more than {} operations",
                self.ctx.limits.max_ops
            )));
        }
        Ok(())
    }

    pub(crate) fn push_frame(
        &mut self,
        code: Code,
        locals: Option<Rc<RefCell<AttrMap>>>,
        kind: FrameKind,
    ) -> Result<(), Error> {
        if self.frames.len() >= self.ctx.limits.max_frames {
            return Err(Error::ResourceExhausted(format!(
                "{FRAME_LIMIT}: more than {} frames",
                self.ctx.limits.max_frames
            )));
        }
        let frame = Frame::new(code, locals, self.stack.len(), self.rolls.len(), kind);
        self.frames.push(frame);
        Ok(())
    }

    /// Whether spans in the running chunk point into this run's source.
    pub(crate) fn traced(&self) -> bool {
        self.frames
            .last()
            .is_some_and(|f| f.code.chunk().origin == self.origin)
    }

    /// Drop `span` unless the running chunk is traced.
    pub(crate) fn trace_span(&self, span: Option<Span>) -> Option<Span> {
        span.filter(|_| self.traced())
    }

    pub(crate) fn record(&mut self, span: Option<Span>, value: &Value, breakdown: Option<String>) {
        if let Some(span) = self.trace_span(span) {
            self.traces.record(span, value, breakdown);
        }
    }

    /// Run `chunk` as the main frame until it returns.
    pub(crate) fn execute(&mut self, chunk: Rc<Chunk>) -> Result<Value, Error> {
        self.push_frame(Code::Chunk(chunk), None, FrameKind::Main)?;
        self.run_loop()
    }
}
