//! Execution context: the host-facing entry point.
//!
//! A `Context` owns everything that survives between runs (globals, flags, limits,
//! hooks, the dice source). Each `run` compiles the source, executes it on a fresh
//! `Vm` and records the outcome on the context.
use std::cell::{Ref, RefCell};
use std::rc::Rc;

use ds_ir::{Chunk, Flags};
use ds_parser::{CompileOptions, compile};
use ds_syntax::Error;
use tracing::debug;

use crate::config::Limits;
use crate::scope::ScopeHooks;
use crate::util::{Capabilities, DiceRng};
use crate::value::{AttrMap, new_attrs};
use crate::vm::Vm;
use crate::Value;

pub struct Context {
    pub flags: Flags,
    pub limits: Limits,
    /// Result of the last successful run.
    pub ret: Value,
    /// Source text left over after the last run stopped parsing.
    pub rest_input: String,
    /// Source text the last run compiled.
    pub matched: String,
    /// `matched` with every traced roll and name load expanded.
    pub detail: String,
    /// Budget spent by the last run.
    pub num_op_count: u64,
    pub error: Option<Error>,
    pub(crate) globals: Rc<RefCell<AttrMap>>,
    pub(crate) hooks: Option<Box<dyn ScopeHooks>>,
    pub(crate) caps: Capabilities,
    program: Option<Rc<Chunk>>,
    runs: u64,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Self {
            flags: Flags::default(),
            limits: Limits::default(),
            ret: Value::Undefined,
            rest_input: String::new(),
            matched: String::new(),
            detail: String::new(),
            num_op_count: 0,
            error: None,
            globals: Rc::new(RefCell::new(new_attrs())),
            hooks: None,
            caps: Capabilities::default(),
            program: None,
            runs: 0,
        }
    }

    pub fn set_hooks(&mut self, hooks: Box<dyn ScopeHooks>) {
        self.hooks = Some(hooks);
    }

    pub fn clear_hooks(&mut self) {
        self.hooks = None;
    }

    pub fn set_rng(&mut self, rng: Box<dyn DiceRng>) {
        self.caps.rng = rng;
    }

    pub fn store_attr(&mut self, name: &str, value: Value) {
        self.globals.borrow_mut().insert(Rc::from(name), value);
    }

    pub fn load_attr(&self, name: &str) -> Option<Value> {
        self.globals.borrow().get(name).cloned()
    }

    /// The global attribute map, in insertion order.
    pub fn attrs(&self) -> Ref<'_, AttrMap> {
        self.globals.borrow()
    }

    /// Disassembly of the last compiled program.
    pub fn asm_text(&self) -> String {
        self.program
            .as_ref()
            .map(|c| c.asm_text())
            .unwrap_or_default()
    }

    fn reset(&mut self) {
        self.ret = Value::Undefined;
        self.rest_input.clear();
        self.matched.clear();
        self.detail.clear();
        self.num_op_count = 0;
        self.error = None;
        self.program = None;
    }

    fn fail(&mut self, e: Error) -> Result<Value, Error> {
        debug!(kind = ?e.kind(), ops = self.num_op_count, "run failed: {e}");
        self.error = Some(e.clone());
        Err(e)
    }

    /// Compile and execute `src`.
    ///
    /// Parsing stops at the first text that does not form a statement; that text is left
    /// in `rest_input`. Globals and flags persist across runs, including failed ones.
    pub fn run(&mut self, src: &str) -> Result<Value, Error> {
        self.reset();
        self.runs += 1;
        let origin = self.runs;
        let opts = CompileOptions {
            max_code_len: self.limits.max_code_len,
            max_nesting: self.limits.max_nesting,
            origin,
        };
        let compiled = match compile(src, &mut self.flags, opts) {
            Ok(c) => c,
            Err(e) => {
                self.rest_input = src.to_string();
                return self.fail(e);
            }
        };
        let consumed = compiled.consumed.min(src.len());
        self.matched = src.get(..consumed).unwrap_or(src).to_string();
        self.rest_input = src.get(consumed..).unwrap_or("").to_string();

        let chunk = Rc::new(compiled.chunk);
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!("program:\n{}", chunk.asm_text());
        }
        self.program = Some(chunk.clone());

        let mut vm = Vm::new(self, origin);
        let result = vm.execute(chunk);
        let traces = vm.into_traces();
        match result {
            Ok(v) => {
                self.detail = if traces.is_empty() {
                    self.matched.clone()
                } else {
                    traces.render(&self.matched)
                };
                debug!(
                    matched = self.matched.len(),
                    ops = self.num_op_count,
                    "run ok: {v}"
                );
                self.ret = v.clone();
                Ok(v)
            }
            Err(e) => self.fail(e),
        }
    }
}
