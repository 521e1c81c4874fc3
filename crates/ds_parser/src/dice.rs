//! Dice notation.
//!
//! Dice are read character by character straight after their operand, so `2d6` and
//! `(1+1)d(3*2)kh` must be written without spaces. Every roll ends with an instruction
//! carrying the source span used by the execution trace.
use ds_ir::{Op, Select};
use ds_syntax::{Error, Span, Token, TokenKind, is_ident_continue};

use crate::compiler::Compiler;
use crate::expr::Operand;

/// Checked in order, so two-letter forms win over `k`.
const SELECTORS: [(&str, Select); 6] = [
    ("kh", Select::KeepHigh),
    ("kl", Select::KeepLow),
    ("dh", Select::DropHigh),
    ("dl", Select::DropLow),
    ("k", Select::KeepHigh),
    ("q", Select::KeepLow),
];

/// Side count for WoD and double-cross pools when `m` is absent.
const POOL_SIDES: i64 = 10;
/// WoD success threshold when `k` is absent.
const WOD_SUCCESS: i64 = 8;

impl<'a, 'f> Compiler<'a, 'f> {
    /// Dice suffix glued to the operand just compiled. `start` is where that
    /// operand began, so the traced span covers the count as well.
    pub(crate) fn dice_suffix(
        &mut self,
        kind: Operand,
        start: usize,
    ) -> Result<Option<Operand>, Error> {
        let Some(c) = self.cur_char() else {
            return Ok(None);
        };
        let counted = matches!(kind, Operand::Number | Operand::Paren);
        match c {
            'd' | 'D' if counted || kind == Operand::Dice => {
                self.pos += 1;
                self.emit(Op::DiceInit)?;
                self.emit(Op::DiceSetTimes)?;
                self.dice_body(start)?;
                Ok(Some(Operand::Dice))
            }
            'a' if counted && self.flags.enable_dice_wod && self.operand_follows(1) => {
                self.pos += 1;
                self.wod_body(start)?;
                Ok(Some(Operand::Other))
            }
            'c' if counted && self.flags.enable_dice_double_cross && self.operand_follows(1) => {
                self.pos += 1;
                self.double_cross_body(start)?;
                Ok(Some(Operand::Other))
            }
            _ if kind == Operand::Array && self.at_selector() => {
                self.emit(Op::DiceInit)?;
                self.emit(Op::DiceSetPool)?;
                self.dice_modifiers()?;
                self.emit(Op::DiceRoll(Some(Span::new(start, self.pos))))?;
                Ok(Some(Operand::Dice))
            }
            _ => Ok(None),
        }
    }

    /// Dice that start with a letter (`d20`, `b2`, `f`, `a10`, `c8`). Falls back to a
    /// plain name when an identifier character follows the notation.
    pub(crate) fn letter_dice(&mut self, t: Token) -> Result<Option<Operand>, Error> {
        let word = t.text(self.src);
        let Some(first) = word.chars().next() else {
            return Ok(None);
        };
        let digit_next = word[first.len_utf8()..].starts_with(|c: char| c.is_ascii_digit());
        let candidate = match first {
            'd' | 'D' => true,
            'b' | 'p' => self.flags.enable_dice_coc,
            'f' => self.flags.enable_dice_fate,
            'a' => self.flags.enable_dice_wod && digit_next,
            'c' => self.flags.enable_dice_double_cross && digit_next,
            _ => false,
        };
        if !candidate || t.kind != TokenKind::Ident {
            return Ok(None);
        }

        let mark = self.mark();
        let start = t.span.start;
        self.pos = start + first.len_utf8();
        let kind = match first {
            'd' | 'D' => {
                self.emit(Op::DiceInit)?;
                self.dice_body(start)?;
                Operand::Dice
            }
            'b' | 'p' => {
                if !self.dice_operand()? {
                    self.emit(Op::PushInt(1))?;
                }
                let span = Span::new(start, self.pos);
                self.emit(Op::DiceCoc(first == 'p', Some(span)))?;
                Operand::Other
            }
            'f' => {
                self.emit(Op::DiceFate(Some(Span::new(start, self.pos))))?;
                Operand::Other
            }
            'a' => {
                self.emit(Op::PushInt(1))?;
                self.wod_body(start)?;
                Operand::Other
            }
            _ => {
                self.emit(Op::PushInt(1))?;
                self.double_cross_body(start)?;
                Operand::Other
            }
        };
        if self.cur_char().is_some_and(is_ident_continue) {
            self.rewind(mark);
            return Ok(None);
        }
        Ok(Some(kind))
    }

    /// Sides, modifiers and the roll itself. Times (if any) is already set.
    fn dice_body(&mut self, start: usize) -> Result<(), Error> {
        if self.dice_operand()? {
            self.emit(Op::DiceSetSides)?;
        }
        self.dice_modifiers()?;
        self.emit(Op::DiceRoll(Some(Span::new(start, self.pos))))?;
        Ok(())
    }

    fn dice_modifiers(&mut self) -> Result<(), Error> {
        loop {
            let rest = self.rest();
            if let Some(&(tag, sel)) = SELECTORS.iter().find(|(tag, _)| rest.starts_with(tag)) {
                self.pos += tag.len();
                if !self.dice_operand()? {
                    self.emit(Op::PushInt(1))?;
                }
                self.emit(Op::DiceSelect(sel))?;
                continue;
            }
            if rest.starts_with("min") && self.operand_follows(3) {
                self.pos += 3;
                self.dice_operand()?;
                self.emit(Op::DiceSetMin)?;
                continue;
            }
            if rest.starts_with("max") && self.operand_follows(3) {
                self.pos += 3;
                self.dice_operand()?;
                self.emit(Op::DiceSetMax)?;
                continue;
            }
            // advantage / disadvantage: two dice, keep one
            let advantage = if rest.starts_with("优势") {
                Select::KeepHigh
            } else if rest.starts_with("劣势") {
                Select::KeepLow
            } else {
                return Ok(());
            };
            self.pos += "优势".len();
            self.emit(Op::PushInt(2))?;
            self.emit(Op::DiceSetTimes)?;
            self.emit(Op::PushInt(1))?;
            self.emit(Op::DiceSelect(advantage))?;
        }
    }

    /// `a<add-line>[m<sides>][k<success>]`; the pool size is already on the stack.
    fn wod_body(&mut self, start: usize) -> Result<(), Error> {
        if !self.dice_operand()? {
            return Err(Error::parse(self.rest(), "expected add-line after 'a'"));
        }
        self.optional_param('m', POOL_SIDES)?;
        self.optional_param('k', WOD_SUCCESS)?;
        self.emit(Op::DiceWod(Some(Span::new(start, self.pos))))?;
        Ok(())
    }

    /// `c<crit>[m<sides>]`; the pool size is already on the stack.
    fn double_cross_body(&mut self, start: usize) -> Result<(), Error> {
        if !self.dice_operand()? {
            return Err(Error::parse(self.rest(), "expected critical value after 'c'"));
        }
        self.optional_param('m', POOL_SIDES)?;
        self.emit(Op::DiceDoubleCross(Some(Span::new(start, self.pos))))?;
        Ok(())
    }

    fn optional_param(&mut self, tag: char, default: i64) -> Result<(), Error> {
        if self.cur_char() == Some(tag) && self.operand_follows(1) {
            self.pos += 1;
            self.dice_operand()?;
        } else {
            self.emit(Op::PushInt(default))?;
        }
        Ok(())
    }

    /// Digits or a parenthesised expression right at the cursor.
    fn dice_operand(&mut self) -> Result<bool, Error> {
        match self.cur_char() {
            Some(c) if c.is_ascii_digit() => {
                let v = self.eat_digits()?;
                self.emit(Op::PushInt(v))?;
                Ok(true)
            }
            Some('(') => {
                self.pos += 1;
                self.skip_newlines();
                self.expr()?;
                self.skip_newlines();
                self.expect(TokenKind::RParen, "')'")?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn operand_follows(&self, off: usize) -> bool {
        self.char_at_offset(off)
            .is_some_and(|c| c.is_ascii_digit() || c == '(')
    }

    fn at_selector(&self) -> bool {
        let rest = self.rest();
        SELECTORS.iter().any(|(tag, _)| rest.starts_with(tag))
    }
}
