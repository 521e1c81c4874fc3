use ds_ir::{BinOp, Op, UnaryOp};
use ds_syntax::{Error, Quote, Span, Token, TokenKind, is_ident_start};

use crate::compiler::Compiler;

/// What the last postfix operand was; decides which dice suffixes may follow it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Operand {
    Number,
    Paren,
    Array,
    Dice,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Infix {
    And,
    Or,
    Bin(BinOp),
}

/// (left bp, right bp, operator). Right-associative operators bind tighter on the left.
fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8, Infix)> {
    let r = match kind {
        TokenKind::QuestionQuestion => (1, 2, Infix::Bin(BinOp::NullCoalesce)),
        TokenKind::PipePipe => (3, 4, Infix::Or),
        TokenKind::AmpAmp => (5, 6, Infix::And),
        TokenKind::Pipe => (7, 8, Infix::Bin(BinOp::BitOr)),
        TokenKind::Amp => (9, 10, Infix::Bin(BinOp::BitAnd)),
        TokenKind::EqEq => (11, 12, Infix::Bin(BinOp::Eq)),
        TokenKind::Ne => (11, 12, Infix::Bin(BinOp::Ne)),
        TokenKind::Lt => (13, 14, Infix::Bin(BinOp::Lt)),
        TokenKind::Le => (13, 14, Infix::Bin(BinOp::Le)),
        TokenKind::Gt => (13, 14, Infix::Bin(BinOp::Gt)),
        TokenKind::Ge => (13, 14, Infix::Bin(BinOp::Ge)),
        TokenKind::Plus => (15, 16, Infix::Bin(BinOp::Add)),
        TokenKind::Minus => (15, 16, Infix::Bin(BinOp::Sub)),
        TokenKind::Star => (17, 18, Infix::Bin(BinOp::Mul)),
        TokenKind::Slash => (17, 18, Infix::Bin(BinOp::Div)),
        TokenKind::Percent => (17, 18, Infix::Bin(BinOp::Mod)),
        TokenKind::StarStar | TokenKind::Caret => (20, 19, Infix::Bin(BinOp::Pow)),
        _ => return None,
    };
    Some(r)
}

impl<'a, 'f> Compiler<'a, 'f> {
    /// Statement-level expression: assignment, with comma-chained ternaries allowed.
    pub(crate) fn expr(&mut self) -> Result<(), Error> {
        self.assignment(true)
    }

    pub(crate) fn expr_no_comma(&mut self) -> Result<(), Error> {
        self.assignment(false)
    }

    fn assignment(&mut self, allow_comma: bool) -> Result<(), Error> {
        self.nested(|c| c.assignment_inner(allow_comma))
    }

    fn assignment_inner(&mut self, allow_comma: bool) -> Result<(), Error> {
        let t = self.peek();
        match t.kind {
            TokenKind::Ident => {
                let next = self.peek_after(t);
                if next.kind == TokenKind::Eq {
                    self.pos = next.span.end;
                    self.skip_newlines();
                    self.assignment(allow_comma)?;
                    let slot = self.chunk.add_str(t.text(self.src));
                    self.emit(Op::StoreName(slot))?;
                    return Ok(());
                }
            }
            TokenKind::Amp => return self.computed(allow_comma),
            _ => {}
        }

        let plain = self.ternary(allow_comma)?;
        if !self.at(TokenKind::Eq) {
            return Ok(());
        }
        let setter = match self.chunk.ops.last() {
            Some(Op::GetIndex) if plain => Op::SetIndex,
            Some(Op::GetSlice) if plain => Op::SetSlice,
            Some(Op::GetAttr(k)) if plain => Op::SetAttr(*k),
            _ => return Err(Error::parse(self.rest(), "invalid assignment target")),
        };
        self.chunk.ops.pop();
        self.bump();
        self.skip_newlines();
        self.assignment(allow_comma)?;
        self.emit(setter)?;
        Ok(())
    }

    /// `&name`, `&name = formula`, `&name.attr` and `&name.attr = value`.
    pub(crate) fn computed(&mut self, allow_comma: bool) -> Result<(), Error> {
        self.expect(TokenKind::Amp, "'&'")?;
        let name = self.expect(TokenKind::Ident, "name after '&'")?;
        let slot = self.chunk.add_str(name.text(self.src));

        if self.cur_char() == Some('.') && self.char_at_offset(1).is_some_and(is_ident_start) {
            self.pos += 1;
            let key = self.expect(TokenKind::Ident, "attribute name")?;
            let key = self.chunk.add_str(key.text(self.src));
            self.emit(Op::LoadRaw(slot))?;
            if self.eat(TokenKind::Eq) {
                self.skip_newlines();
                self.assignment(allow_comma)?;
                self.emit(Op::SetAttr(key))?;
            } else {
                self.emit(Op::GetAttr(key))?;
            }
            return Ok(());
        }

        if !self.eat(TokenKind::Eq) {
            self.emit(Op::LoadRaw(slot))?;
            return Ok(());
        }

        // The formula is compiled once to validate it, then stored as source text.
        self.skip_newlines();
        let start = self.peek().span.start;
        let mark = self.mark();
        self.assignment(allow_comma)?;
        let src = self.src;
        let text = src.get(start..self.pos).unwrap_or("").trim_end();
        self.rewind_code(mark);
        let formula = self.chunk.add_str(text);
        self.emit(Op::PushComputed(formula))?;
        self.emit(Op::StoreName(slot))?;
        Ok(())
    }

    /// `cond ? a : b`, or the comma chain `c1 ? v1, c2 ? v2, default`.
    /// Returns false when a conditional was compiled.
    fn ternary(&mut self, allow_comma: bool) -> Result<bool, Error> {
        self.binary(0)?;
        if !self.at(TokenKind::Question) {
            return Ok(true);
        }
        let mut exits = Vec::new();
        loop {
            self.bump();
            self.skip_newlines();
            let skip = self.emit(Op::JumpIfFalse(0))?;
            self.with_colon_off(|c| c.binary(0))?;
            exits.push(self.emit(Op::Jump(0))?);
            self.patch_here(skip);
            if self.eat(TokenKind::Colon) {
                self.skip_newlines();
                self.nested(|c| c.ternary(allow_comma))?;
                break;
            }
            if allow_comma && self.eat(TokenKind::Comma) {
                self.skip_newlines();
                self.binary(0)?;
                if self.at(TokenKind::Question) {
                    continue;
                }
                break;
            }
            self.emit(Op::PushUndefined)?;
            break;
        }
        for j in exits {
            self.patch_here(j);
        }
        Ok(false)
    }

    fn binary(&mut self, min_bp: u8) -> Result<(), Error> {
        self.unary()?;
        loop {
            let t = self.peek();
            let Some((l_bp, r_bp, op)) = infix_binding_power(t.kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.pos = t.span.end;
            self.skip_newlines();
            match op {
                Infix::And | Infix::Or => {
                    // short-circuit keeps the deciding operand as the result
                    self.emit(Op::Dup)?;
                    let j = if op == Infix::And {
                        self.emit(Op::JumpIfFalse(0))?
                    } else {
                        self.emit(Op::JumpIfTrue(0))?
                    };
                    self.emit(Op::Pop)?;
                    self.nested(|c| c.binary(r_bp))?;
                    self.patch_here(j);
                }
                Infix::Bin(b) => {
                    self.nested(|c| c.binary(r_bp))?;
                    self.emit(Op::Binary(b))?;
                }
            }
        }
        Ok(())
    }

    fn unary(&mut self) -> Result<(), Error> {
        self.nested(|c| c.unary_inner())
    }

    fn unary_inner(&mut self) -> Result<(), Error> {
        let t = self.peek();
        let op = match t.kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.postfix(),
        };
        self.pos = t.span.end;
        self.unary()?;
        self.emit(Op::Unary(op))?;
        Ok(())
    }

    /// Primary followed by adjacent suffixes: dice, `[..]`, `.name`, `(args)`.
    fn postfix(&mut self) -> Result<(), Error> {
        let start = self.peek().span.start;
        let mut kind = self.primary()?;
        loop {
            if let Some(next) = self.dice_suffix(kind, start)? {
                kind = next;
                continue;
            }
            match self.cur_char() {
                Some('[') => {
                    self.pos += 1;
                    self.index()?;
                }
                Some('(') => {
                    self.pos += 1;
                    let argc = self.args()?;
                    self.emit(Op::Call(argc))?;
                }
                Some('.') if self.char_at_offset(1).is_some_and(is_ident_start) => {
                    self.pos += 1;
                    let name = self.expect(TokenKind::Ident, "attribute name")?;
                    let idx = self.chunk.add_str(name.text(self.src));
                    if self.cur_char() == Some('(') {
                        self.pos += 1;
                        let argc = self.args()?;
                        self.emit(Op::CallMethod(idx, argc))?;
                    } else {
                        self.emit(Op::GetAttr(idx))?;
                    }
                }
                _ => break,
            }
            kind = Operand::Other;
        }
        Ok(())
    }

    /// True when an adjacent suffix makes the preceding name a callee or container.
    fn continues_postfix(&self) -> bool {
        match self.cur_char() {
            Some('(' | '[') => true,
            Some('.') => self.char_at_offset(1).is_some_and(is_ident_start),
            _ => false,
        }
    }

    /// After `[`: index `a[i]` or slice `a[lo:hi]`, either bound optional.
    fn index(&mut self) -> Result<(), Error> {
        self.with_colon_off(|c| {
            c.skip_newlines();
            let has_lo = !c.at(TokenKind::Colon);
            if has_lo {
                c.expr_no_comma()?;
                c.skip_newlines();
            }
            if !c.eat(TokenKind::Colon) {
                c.expect(TokenKind::RBracket, "']'")?;
                c.emit(Op::GetIndex)?;
                return Ok(());
            }
            if !has_lo {
                c.emit(Op::PushUndefined)?;
            }
            c.skip_newlines();
            if c.at(TokenKind::RBracket) || c.at(TokenKind::Colon) {
                c.emit(Op::PushUndefined)?;
            } else {
                c.expr_no_comma()?;
                c.skip_newlines();
            }
            if c.at(TokenKind::Colon) {
                return Err(Error::parse(c.rest(), "slice step is not supported"));
            }
            c.expect(TokenKind::RBracket, "']'")?;
            c.emit(Op::GetSlice)?;
            Ok(())
        })
    }

    /// After `(`: comma-separated arguments up to `)`.
    fn args(&mut self) -> Result<usize, Error> {
        let mut n = 0;
        self.skip_newlines();
        if self.eat(TokenKind::RParen) {
            return Ok(0);
        }
        loop {
            self.expr_no_comma()?;
            n += 1;
            self.skip_newlines();
            if self.eat(TokenKind::Comma) {
                self.skip_newlines();
                continue;
            }
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(n);
        }
    }

    fn primary(&mut self) -> Result<Operand, Error> {
        let t = self.peek();
        match t.kind {
            TokenKind::Int => {
                self.pos = t.span.end;
                let v = t
                    .text(self.src)
                    .parse::<i64>()
                    .map_err(|_| Error::lex(t.span.start, "integer literal out of range"))?;
                self.emit(Op::PushInt(v))?;
                Ok(Operand::Number)
            }
            TokenKind::Float => {
                self.pos = t.span.end;
                let v = t
                    .text(self.src)
                    .parse::<f64>()
                    .map_err(|_| Error::lex(t.span.start, "malformed float literal"))?;
                self.emit(Op::PushFloat(v))?;
                Ok(Operand::Number)
            }
            TokenKind::Str(q) => {
                self.string(t, q)?;
                Ok(Operand::Other)
            }
            TokenKind::LParen => {
                self.pos = t.span.end;
                self.skip_newlines();
                self.expr()?;
                self.skip_newlines();
                self.expect(TokenKind::RParen, "')'")?;
                Ok(Operand::Paren)
            }
            TokenKind::LBracket => {
                self.pos = t.span.end;
                self.array()?;
                Ok(Operand::Array)
            }
            TokenKind::LBrace => {
                self.pos = t.span.end;
                self.dict()?;
                Ok(Operand::Other)
            }
            TokenKind::Amp => {
                self.computed(false)?;
                Ok(Operand::Other)
            }
            TokenKind::Ident => self.name_or_dice(t),
            _ => Err(self.unexpected(t, "an expression")),
        }
    }

    fn name_or_dice(&mut self, t: Token) -> Result<Operand, Error> {
        if let Some(kind) = self.letter_dice(t)? {
            return Ok(kind);
        }
        self.pos = t.span.end;
        let name = t.text(self.src);
        let idx = self.chunk.add_str(name);
        let span = if name == "this" || self.continues_postfix() {
            None
        } else {
            Some(t.span)
        };
        self.emit(Op::LoadName(idx, span))?;
        Ok(Operand::Other)
    }

    /// After `[`: array literal or `[lo..hi]` range.
    fn array(&mut self) -> Result<(), Error> {
        self.with_colon_off(|c| {
            c.skip_newlines();
            if c.eat(TokenKind::RBracket) {
                c.emit(Op::MakeArray(0))?;
                return Ok(());
            }
            c.expr_no_comma()?;
            c.skip_newlines();
            if c.eat(TokenKind::DotDot) {
                c.skip_newlines();
                c.expr_no_comma()?;
                c.skip_newlines();
                c.expect(TokenKind::RBracket, "']'")?;
                c.emit(Op::MakeRange)?;
                return Ok(());
            }
            let mut n = 1;
            while c.eat(TokenKind::Comma) {
                c.skip_newlines();
                if c.at(TokenKind::RBracket) {
                    break;
                }
                c.expr_no_comma()?;
                n += 1;
                c.skip_newlines();
            }
            c.expect(TokenKind::RBracket, "']'")?;
            c.emit(Op::MakeArray(n))?;
            Ok(())
        })
    }

    /// After `{`: dict literal. A bare name before `:` is a string key.
    fn dict(&mut self) -> Result<(), Error> {
        self.with_colon_off(|c| {
            let mut n = 0;
            loop {
                c.skip_newlines();
                if c.eat(TokenKind::RBrace) {
                    break;
                }
                let t = c.peek();
                let bare = (t.kind == TokenKind::Ident || t.kind.is_keyword())
                    && c.peek_after(t).kind == TokenKind::Colon;
                if bare {
                    c.pos = t.span.end;
                    c.push_str(t.text(c.src))?;
                } else {
                    c.expr_no_comma()?;
                }
                c.skip_newlines();
                c.expect(TokenKind::Colon, "':'")?;
                c.skip_newlines();
                c.expr_no_comma()?;
                n += 1;
                c.skip_newlines();
                if c.eat(TokenKind::Comma) {
                    continue;
                }
                c.expect(TokenKind::RBrace, "'}'")?;
                break;
            }
            c.emit(Op::MakeDict(n))?;
            Ok(())
        })
    }

    fn string(&mut self, t: Token, q: Quote) -> Result<(), Error> {
        self.pos = t.span.end;
        let delim = q.delimiter().len_utf8();
        let body = Span::new(t.span.start + delim, t.span.end.saturating_sub(delim));
        if !q.interpolates() {
            let text = ds_syntax::unescape(body.text(self.src));
            return self.push_str(&text);
        }
        self.interpolated(body, q.escapes())
    }
}
