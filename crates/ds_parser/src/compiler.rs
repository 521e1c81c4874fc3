//! Compiler state, cursor helpers and the top-level statement loop.
//!
//! The cursor is a byte offset into the source. Tokens are pulled on demand with
//! `peek`, which rescans from the cursor, so saving and restoring `pos` is all a
//! lookahead needs. `end` narrows the visible input while compiling the expression
//! inside a string interpolation.
use ds_ir::{Chunk, Flags, Op};
use ds_lexer::{Lexer, parse_directive};
use ds_syntax::{Error, Token, TokenKind};
use tracing::{debug, warn};

/// Instruction capacity of a single chunk.
pub const MAX_CODE_LEN: usize = 8192;
/// Nesting depth of expressions and blocks; bounds the compiler's recursion.
pub const MAX_NESTING: u32 = 200;

#[derive(Clone, Copy, Debug)]
pub struct CompileOptions {
    pub max_code_len: usize,
    pub max_nesting: u32,
    /// Tag stamped on every emitted chunk; the VM only traces chunks whose origin
    /// matches the run being rendered.
    pub origin: u64,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_code_len: MAX_CODE_LEN,
            max_nesting: MAX_NESTING,
            origin: 0,
        }
    }
}

/// Compilation output.
#[derive(Debug)]
pub struct Compiled {
    pub chunk: Chunk,
    /// Byte offset where compilation stopped; `src[consumed..]` is the rest input.
    pub consumed: usize,
    pub statements: usize,
}

/// Compile `src`. Directive comments update `flags` as they are met.
pub fn compile(src: &str, flags: &mut Flags, opts: CompileOptions) -> Result<Compiled, Error> {
    let mut c = Compiler::new(src, flags, opts);
    let statements = c.program()?;
    debug!(
        statements,
        consumed = c.consumed,
        ops = c.chunk.ops.len(),
        "compiled"
    );
    Ok(Compiled {
        chunk: c.chunk,
        consumed: c.consumed,
        statements,
    })
}

pub(crate) struct LoopCtx {
    pub(crate) start: usize,
    pub(crate) breaks: Vec<usize>,
}

/// Rewind point: cursor plus code and constant lengths.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Mark {
    pos: usize,
    ops: usize,
    consts: usize,
}

pub struct Compiler<'a, 'f> {
    pub(crate) src: &'a str,
    pub(crate) pos: usize,
    pub(crate) end: usize,
    pub(crate) chunk: Chunk,
    pub(crate) loops: Vec<LoopCtx>,
    pub(crate) flags: &'f mut Flags,
    pub(crate) opts: CompileOptions,
    /// Nesting depth of contexts where `a:b` is not an identifier.
    pub(crate) colon_off: u32,
    pub(crate) depth: u32,
    pub(crate) consumed: usize,
}

impl<'a, 'f> Compiler<'a, 'f> {
    pub fn new(src: &'a str, flags: &'f mut Flags, opts: CompileOptions) -> Self {
        Self {
            src,
            pos: 0,
            end: src.len(),
            chunk: Chunk::new(opts.origin),
            loops: Vec::new(),
            flags,
            opts,
            colon_off: 0,
            depth: 0,
            consumed: 0,
        }
    }

    /// Compile statements until the input ends or the next statement does not parse.
    /// Returns the number of statements compiled.
    pub fn program(&mut self) -> Result<usize, Error> {
        let mut count = 0usize;
        let mut directives = 0usize;
        let mut separated = true;
        let mut failure = None;
        loop {
            loop {
                let t = self.peek();
                match t.kind {
                    TokenKind::Newline | TokenKind::Semicolon => {}
                    TokenKind::Directive => {
                        self.directive(t);
                        directives += 1;
                    }
                    _ => break,
                }
                self.pos = t.span.end;
                separated = true;
            }
            let t = self.peek();
            self.consumed = t.span.start;
            if t.kind == TokenKind::Eof || !separated {
                break;
            }
            let mark = self.mark();
            match self.statement() {
                Ok(block) => {
                    count += 1;
                    separated = block;
                }
                Err(e @ Error::ResourceExhausted(_)) => return Err(e),
                Err(e) => {
                    debug!(error = %e, at = self.consumed, "statement rejected");
                    self.rewind(mark);
                    failure = Some(e);
                    break;
                }
            }
        }
        if count == 0 && directives == 0 {
            return Err(failure.unwrap_or_else(|| {
                Error::parse(self.rest_at(self.consumed), "expected a statement")
            }));
        }
        Ok(count)
    }

    pub(crate) fn directive(&mut self, tok: Token) {
        let Some((name, value)) = parse_directive(tok.text(self.src)) else {
            return;
        };
        match self.flags.apply_directive(name, value) {
            Ok(()) => debug!(name, value, "directive applied"),
            Err(msg) => warn!("{msg}"),
        }
    }

    // ---- cursor ----

    fn lexer(&self) -> Lexer<'a> {
        Lexer::new(self.src.get(..self.end).unwrap_or(self.src))
    }

    pub(crate) fn peek(&self) -> Token {
        self.lexer().scan(self.pos, self.colon_off == 0)
    }

    pub(crate) fn peek_after(&self, tok: Token) -> Token {
        self.lexer().scan(tok.span.end, self.colon_off == 0)
    }

    pub(crate) fn bump(&mut self) -> Token {
        let t = self.peek();
        self.pos = t.span.end;
        t
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        let t = self.peek();
        if t.kind == kind {
            self.pos = t.span.end;
            return true;
        }
        false
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, Error> {
        let t = self.peek();
        if t.kind == kind {
            self.pos = t.span.end;
            return Ok(t);
        }
        Err(self.unexpected(t, what))
    }

    pub(crate) fn unexpected(&self, t: Token, what: &str) -> Error {
        if let TokenKind::Invalid(fault) = t.kind {
            return Error::lex(t.span.start, fault.message());
        }
        Error::parse(self.rest_at(t.span.start), format!("expected {what}"))
    }

    /// Skip newline tokens. Directives are applied on the way.
    pub(crate) fn skip_newlines(&mut self) {
        loop {
            let t = self.peek();
            match t.kind {
                TokenKind::Newline => {}
                TokenKind::Directive => self.directive(t),
                _ => return,
            }
            self.pos = t.span.end;
        }
    }

    pub(crate) fn rest_at(&self, pos: usize) -> &'a str {
        self.src.get(pos..self.end).unwrap_or("")
    }

    pub(crate) fn rest(&self) -> &'a str {
        self.rest_at(self.pos)
    }

    /// Character directly under the cursor, no trivia skipped.
    pub(crate) fn cur_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn char_at_offset(&self, off: usize) -> Option<char> {
        self.rest().get(off..).and_then(|s| s.chars().next())
    }

    /// Consume a run of ASCII digits under the cursor.
    pub(crate) fn eat_digits(&mut self) -> Result<i64, Error> {
        let rest = self.rest();
        let len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let start = self.pos;
        self.pos += len;
        rest[..len]
            .parse::<i64>()
            .map_err(|_| Error::lex(start, "integer literal out of range"))
    }

    pub(crate) fn with_colon_off<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.colon_off += 1;
        let r = f(self);
        self.colon_off -= 1;
        r
    }

    /// Run `f` one nesting level deeper.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        if self.depth >= self.opts.max_nesting {
            return Err(Error::ResourceExhausted(format!(
                "nesting deeper than {} levels",
                self.opts.max_nesting
            )));
        }
        self.depth += 1;
        let r = f(self);
        self.depth -= 1;
        r
    }

    pub(crate) fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            ops: self.chunk.ops.len(),
            consts: self.chunk.constants.len(),
        }
    }

    pub(crate) fn rewind(&mut self, m: Mark) {
        self.pos = m.pos;
        self.rewind_code(m);
    }

    /// Drop code emitted since `m` but keep the cursor.
    pub(crate) fn rewind_code(&mut self, m: Mark) {
        self.chunk.ops.truncate(m.ops);
        self.chunk.constants.truncate(m.consts);
    }

    // ---- emission ----

    pub(crate) fn emit(&mut self, op: Op) -> Result<usize, Error> {
        if self.chunk.ops.len() >= self.opts.max_code_len {
            return Err(Error::ResourceExhausted(format!(
                "instruction buffer overflow: more than {} instructions",
                self.opts.max_code_len
            )));
        }
        self.chunk.ops.push(op);
        Ok(self.chunk.ops.len() - 1)
    }

    pub(crate) fn here(&self) -> usize {
        self.chunk.ops.len()
    }

    pub(crate) fn patch_jump(&mut self, pos: usize, target: usize) {
        if let Some(Op::Jump(t) | Op::JumpIfTrue(t) | Op::JumpIfFalse(t)) =
            self.chunk.ops.get_mut(pos)
        {
            *t = target;
        }
    }

    pub(crate) fn patch_here(&mut self, pos: usize) {
        let here = self.here();
        self.patch_jump(pos, here);
    }

    pub(crate) fn push_str(&mut self, s: &str) -> Result<(), Error> {
        let idx = self.chunk.add_str(s);
        self.emit(Op::PushStr(idx))?;
        Ok(())
    }
}
