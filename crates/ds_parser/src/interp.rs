use ds_ir::Op;
use ds_syntax::{Error, InterpolationPiece, Span, TokenKind, split_interpolation};

use crate::compiler::Compiler;

impl<'a, 'f> Compiler<'a, 'f> {
    /// Template literal body: text pieces become constants, `{expr}` pieces are
    /// compiled in place, and `StrJoin` concatenates their string forms.
    pub(crate) fn interpolated(&mut self, body: Span, escapes: bool) -> Result<(), Error> {
        let pieces = split_interpolation(self.src, body.start, body.end, escapes)?;
        match pieces.as_slice() {
            [] => return self.push_str(""),
            [InterpolationPiece::Text(s)] => return self.push_str(s),
            _ => {}
        }
        let n = pieces.len();
        for piece in pieces {
            match piece {
                InterpolationPiece::Text(s) => self.push_str(&s)?,
                InterpolationPiece::Expr(span) => self.embedded(span)?,
            }
        }
        self.emit(Op::StrJoin(n))?;
        Ok(())
    }

    /// Compile the expression at `span` with the input narrowed to it.
    fn embedded(&mut self, span: Span) -> Result<(), Error> {
        let (pos, end) = (self.pos, self.end);
        self.pos = span.start;
        self.end = span.end;
        let r = self.embedded_expr();
        self.pos = pos;
        self.end = end;
        r
    }

    fn embedded_expr(&mut self) -> Result<(), Error> {
        self.skip_newlines();
        if self.at(TokenKind::Eof) {
            return self.push_str("");
        }
        self.expr()?;
        self.skip_newlines();
        let t = self.peek();
        if t.kind != TokenKind::Eof {
            return Err(self.unexpected(t, "end of interpolation"));
        }
        Ok(())
    }
}
