use ds_ir::{Chunk, FuncProto, Op};
use ds_syntax::{Error, TokenKind};

use crate::compiler::{Compiler, LoopCtx};

impl<'a, 'f> Compiler<'a, 'f> {
    /// Compile one statement. Returns true when it ended with a block, which lets
    /// the next statement follow without a separator.
    pub(crate) fn statement(&mut self) -> Result<bool, Error> {
        let t = self.peek();
        match t.kind {
            TokenKind::If => {
                self.bump();
                self.if_stmt()?;
                Ok(true)
            }
            TokenKind::While => {
                self.bump();
                self.while_stmt()?;
                Ok(true)
            }
            TokenKind::Func => {
                self.bump();
                self.func_stmt()?;
                Ok(true)
            }
            TokenKind::Return => {
                self.bump();
                self.return_stmt()?;
                Ok(false)
            }
            TokenKind::Break => {
                self.bump();
                if self.loops.is_empty() {
                    return Err(Error::parse(self.rest_at(t.span.start), "break outside of a loop"));
                }
                let j = self.emit(Op::Jump(0))?;
                if let Some(lp) = self.loops.last_mut() {
                    lp.breaks.push(j);
                }
                Ok(false)
            }
            TokenKind::Continue => {
                self.bump();
                let Some(start) = self.loops.last().map(|lp| lp.start) else {
                    return Err(Error::parse(
                        self.rest_at(t.span.start),
                        "continue outside of a loop",
                    ));
                };
                self.emit(Op::Jump(start))?;
                Ok(false)
            }
            TokenKind::Else => Err(Error::parse(self.rest_at(t.span.start), "'else' without 'if'")),
            _ => {
                self.expr()?;
                self.emit(Op::SetRet)?;
                Ok(false)
            }
        }
    }

    /// `{ stmt* }`
    pub(crate) fn block(&mut self) -> Result<(), Error> {
        self.nested(|c| c.block_inner())
    }

    fn block_inner(&mut self) -> Result<(), Error> {
        self.skip_newlines();
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut separated = true;
        loop {
            loop {
                let t = self.peek();
                match t.kind {
                    TokenKind::Newline | TokenKind::Semicolon => {}
                    TokenKind::Directive => self.directive(t),
                    _ => break,
                }
                self.pos = t.span.end;
                separated = true;
            }
            if self.eat(TokenKind::RBrace) {
                return Ok(());
            }
            if !separated {
                let t = self.peek();
                return Err(self.unexpected(t, "'}' or a statement separator"));
            }
            separated = self.statement()?;
        }
    }

    fn if_stmt(&mut self) -> Result<(), Error> {
        self.expr_no_comma()?;
        let skip = self.emit(Op::JumpIfFalse(0))?;
        self.block()?;

        // `else` may sit on a following line
        let save = self.pos;
        while self.eat(TokenKind::Newline) {}
        if !self.eat(TokenKind::Else) {
            self.pos = save;
            self.patch_here(skip);
            return Ok(());
        }
        let exit = self.emit(Op::Jump(0))?;
        self.patch_here(skip);
        if self.eat(TokenKind::If) {
            self.nested(|c| c.if_stmt())?;
        } else {
            self.block()?;
        }
        self.patch_here(exit);
        Ok(())
    }

    fn while_stmt(&mut self) -> Result<(), Error> {
        let start = self.here();
        self.expr_no_comma()?;
        let exit = self.emit(Op::JumpIfFalse(0))?;
        self.loops.push(LoopCtx {
            start,
            breaks: Vec::new(),
        });
        let body = self.block();
        let lp = self.loops.pop();
        body?;
        self.emit(Op::Jump(start))?;
        self.patch_here(exit);
        for b in lp.map(|lp| lp.breaks).unwrap_or_default() {
            self.patch_here(b);
        }
        Ok(())
    }

    /// `func name(params) { body }` binds a function value to `name`.
    fn func_stmt(&mut self) -> Result<(), Error> {
        let name_tok = self.expect(TokenKind::Ident, "function name")?;
        let name = name_tok.text(self.src).to_string();
        self.expect(TokenKind::LParen, "'('")?;
        let mut params: Vec<String> = Vec::new();
        self.skip_newlines();
        if !self.eat(TokenKind::RParen) {
            loop {
                let p = self.expect(TokenKind::Ident, "parameter name")?;
                let p = p.text(self.src);
                if params.iter().any(|q| q == p) {
                    return Err(Error::parse(self.rest(), format!("duplicate parameter '{p}'")));
                }
                params.push(p.to_string());
                self.skip_newlines();
                if self.eat(TokenKind::Comma) {
                    self.skip_newlines();
                    continue;
                }
                self.expect(TokenKind::RParen, "')'")?;
                break;
            }
        }

        // The body gets a chunk of its own; loop context does not cross into it.
        let outer = std::mem::replace(&mut self.chunk, Chunk::new(self.opts.origin));
        let outer_loops = std::mem::take(&mut self.loops);
        let body = self.block().and_then(|_| self.emit(Op::Return));
        let chunk = std::mem::replace(&mut self.chunk, outer);
        self.loops = outer_loops;
        body?;

        let idx = self.chunk.add_func(FuncProto {
            name: name.clone(),
            params,
            chunk,
        });
        self.emit(Op::MakeFunction(idx))?;
        let slot = self.chunk.add_str(&name);
        self.emit(Op::StoreName(slot))?;
        self.emit(Op::Pop)?;
        Ok(())
    }

    fn return_stmt(&mut self) -> Result<(), Error> {
        match self.peek().kind {
            TokenKind::Newline
            | TokenKind::Semicolon
            | TokenKind::Directive
            | TokenKind::RBrace
            | TokenKind::Eof => {
                self.emit(Op::PushUndefined)?;
            }
            _ => self.expr()?,
        }
        self.emit(Op::SetRet)?;
        self.emit(Op::Return)?;
        Ok(())
    }
}
