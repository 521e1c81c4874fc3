//! Token definitions.
//!
//! Tokens are produced one at a time by the lexer on behalf of the compiler, so they
//! carry only a kind and a span; literal payloads are sliced out of the source on demand.
use crate::Span;

/// String literal flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quote {
    /// `"..."`
    Double,
    /// `'...'`
    Single,
    /// `` `...` `` with `{expr}` interpolation.
    Backtick,
    /// `\x1e...\x1e`: interpolation, no escapes.
    Raw,
}

impl Quote {
    pub fn delimiter(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
            Quote::Backtick => '`',
            Quote::Raw => '\x1e',
        }
    }

    pub fn interpolates(self) -> bool {
        matches!(self, Quote::Backtick | Quote::Raw)
    }

    pub fn escapes(self) -> bool {
        !matches!(self, Quote::Raw)
    }
}

/// Malformed input found while scanning a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexFault {
    UnterminatedString,
    UnknownChar,
}

impl LexFault {
    pub fn message(self) -> &'static str {
        match self {
            LexFault::UnterminatedString => "unterminated string literal",
            LexFault::UnknownChar => "unexpected character",
        }
    }
}

/// Token kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Newline (statement separator).
    Newline,
    /// `// #Name value` directive line.
    Directive,

    Ident,
    Int,
    Float,
    Str(Quote),

    While,
    If,
    Else,
    Continue,
    Break,
    Func,
    Return,

    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    Dot,
    DotDot,
    Question,
    /// `??`
    QuestionQuestion,

    Plus,
    Minus,
    Star,
    /// `**`
    StarStar,
    Slash,
    Percent,
    Caret,
    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    Bang,

    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `!=`
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    Invalid(LexFault),
    Eof,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::While
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::Continue
                | TokenKind::Break
                | TokenKind::Func
                | TokenKind::Return
        )
    }

    /// Tokens that end a statement without being part of it.
    pub fn is_separator(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Semicolon | TokenKind::Directive)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }

    pub fn text(self, src: &str) -> &str {
        self.span.text(src)
    }
}
