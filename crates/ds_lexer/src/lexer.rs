//! Lexer implementation.
//!
//! The compiler pulls tokens one at a time by byte position, so `scan` is a pure
//! function of `(input, pos)`: re-scanning the same position always yields the same
//! token. Dice notation is not tokenized here; the compiler reads it character by
//! character from the same input.
//!
//! Related: `ds_syntax::{Token, TokenKind}`.
use crate::keywords::KEYWORDS;
use ds_syntax::{LexFault, Quote, Token, TokenKind, is_ident_continue, is_ident_start, is_inline_space};

/// DiceScript lexer.
#[derive(Clone, Copy, Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
}

impl<'a> Lexer<'a> {
    /// Create a new lexer.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
        }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Scan every token from the start; mostly useful for tooling and tests.
    pub fn tokenize(&self) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(self.bytes.len() / 2 + 1);
        let mut pos = 0;
        loop {
            let tok = self.scan(pos, true);
            tokens.push(tok);
            if tok.kind == TokenKind::Eof || tok.span.end <= pos && tok.span.is_empty() {
                break;
            }
            pos = tok.span.end;
        }
        tokens
    }

    /// Skip inline whitespace and plain `//` comments. Stops at newlines and at
    /// directive comments.
    pub fn skip_trivia(&self, mut i: usize) -> usize {
        loop {
            match self.char_at(i) {
                Some(c) if is_inline_space(c) => i += c.len_utf8(),
                Some('/') if self.starts_with(i, "//") => {
                    if self.is_directive(i) {
                        return i;
                    }
                    i = self.line_end(i);
                }
                _ => return i,
            }
        }
    }

    /// Produce the token starting at (or after trivia following) `pos`.
    ///
    /// `colon_ident` allows identifiers such as `a:b`; the compiler turns it off where a
    /// colon is itself significant (slices, dict literals, ternary branches).
    pub fn scan(&self, pos: usize, colon_ident: bool) -> Token {
        let start = self.skip_trivia(pos.min(self.bytes.len()));
        let Some(c) = self.char_at(start) else {
            return Token::new(TokenKind::Eof, start, start);
        };
        let one = |kind| Token::new(kind, start, start + 1);
        let two = |kind| Token::new(kind, start, start + 2);
        let next = self.char_at(start + c.len_utf8());

        match c {
            '\n' => one(TokenKind::Newline),
            '/' if self.starts_with(start, "//") => {
                Token::new(TokenKind::Directive, start, self.line_end(start))
            }
            '0'..='9' => self.lex_number(start),
            '.' if next.is_some_and(|n| n.is_ascii_digit()) => self.lex_number(start),
            '"' => self.lex_string(start, Quote::Double),
            '\'' => self.lex_string(start, Quote::Single),
            '`' => self.lex_string(start, Quote::Backtick),
            '\x1e' => self.lex_string(start, Quote::Raw),
            '(' => one(TokenKind::LParen),
            ')' => one(TokenKind::RParen),
            '[' => one(TokenKind::LBracket),
            ']' => one(TokenKind::RBracket),
            '{' => one(TokenKind::LBrace),
            '}' => one(TokenKind::RBrace),
            ',' => one(TokenKind::Comma),
            ';' => one(TokenKind::Semicolon),
            ':' => one(TokenKind::Colon),
            '.' if next == Some('.') => two(TokenKind::DotDot),
            '.' => one(TokenKind::Dot),
            '?' if next == Some('?') => two(TokenKind::QuestionQuestion),
            '?' => one(TokenKind::Question),
            '+' => one(TokenKind::Plus),
            '-' => one(TokenKind::Minus),
            '*' if next == Some('*') => two(TokenKind::StarStar),
            '*' => one(TokenKind::Star),
            '/' => one(TokenKind::Slash),
            '%' => one(TokenKind::Percent),
            '^' => one(TokenKind::Caret),
            '&' if next == Some('&') => two(TokenKind::AmpAmp),
            '&' => one(TokenKind::Amp),
            '|' if next == Some('|') => two(TokenKind::PipePipe),
            '|' => one(TokenKind::Pipe),
            '!' if next == Some('=') => two(TokenKind::Ne),
            '!' => one(TokenKind::Bang),
            '=' if next == Some('=') => two(TokenKind::EqEq),
            '=' => one(TokenKind::Eq),
            '<' if next == Some('=') => two(TokenKind::Le),
            '<' => one(TokenKind::Lt),
            '>' if next == Some('=') => two(TokenKind::Ge),
            '>' => one(TokenKind::Gt),
            ch if is_ident_start(ch) => self.lex_ident_or_keyword(start, colon_ident),
            other => Token::new(
                TokenKind::Invalid(LexFault::UnknownChar),
                start,
                start + other.len_utf8(),
            ),
        }
    }

    fn lex_number(&self, start: usize) -> Token {
        let mut i = start;
        while self.byte_at(i).is_some_and(|b| b.is_ascii_digit()) {
            i += 1;
        }
        let mut kind = TokenKind::Int;
        // `1..4` is a range, not `1.` followed by `.4`
        if self.byte_at(i) == Some(b'.') && self.byte_at(i + 1).is_some_and(|b| b.is_ascii_digit())
        {
            kind = TokenKind::Float;
            i += 1;
            while self.byte_at(i).is_some_and(|b| b.is_ascii_digit()) {
                i += 1;
            }
        }
        Token::new(kind, start, i)
    }

    fn lex_string(&self, start: usize, quote: Quote) -> Token {
        let delim = quote.delimiter();
        let mut i = start + 1;
        while let Some(c) = self.char_at(i) {
            if c == '\\' && quote.escapes() {
                i += 1;
                if let Some(esc) = self.char_at(i) {
                    i += esc.len_utf8();
                }
                continue;
            }
            i += c.len_utf8();
            if c == delim {
                return Token::new(TokenKind::Str(quote), start, i);
            }
        }
        Token::new(TokenKind::Invalid(LexFault::UnterminatedString), start, i)
    }

    fn lex_ident_or_keyword(&self, start: usize, colon_ident: bool) -> Token {
        let mut i = start;
        while let Some(c) = self.char_at(i) {
            if is_ident_continue(c) {
                i += c.len_utf8();
            } else if c == ':'
                && colon_ident
                && self.char_at(i + 1).is_some_and(is_ident_start)
            {
                i += 1;
            } else {
                break;
            }
        }
        let word = &self.input[start..i];
        let kind = KEYWORDS.get(word).copied().unwrap_or(TokenKind::Ident);
        Token::new(kind, start, i)
    }

    /// `//` followed by optional spaces and `#`.
    fn is_directive(&self, i: usize) -> bool {
        self.input
            .get(i + 2..)
            .map(|rest| rest.trim_start_matches([' ', '\t']).starts_with('#'))
            .unwrap_or(false)
    }

    fn line_end(&self, mut i: usize) -> usize {
        while let Some(c) = self.char_at(i) {
            if c == '\n' {
                break;
            }
            i += c.len_utf8();
        }
        i
    }

    fn starts_with(&self, i: usize, s: &str) -> bool {
        self.bytes.get(i..).is_some_and(|rest| rest.starts_with(s.as_bytes()))
    }

    fn byte_at(&self, i: usize) -> Option<u8> {
        self.bytes.get(i).copied()
    }

    pub fn char_at(&self, i: usize) -> Option<char> {
        self.input.get(i..).and_then(|rest| rest.chars().next())
    }
}

/// Split a directive line (`// #Name value`) into its name and value.
pub fn parse_directive(line: &str) -> Option<(&str, &str)> {
    let body = line.strip_prefix("//")?.trim_start().strip_prefix('#')?;
    let body = body.trim();
    let (name, value) = match body.find(char::is_whitespace) {
        Some(at) => (&body[..at], body[at..].trim()),
        None => (body, ""),
    };
    if name.is_empty() {
        return None;
    }
    Some((name, value))
}
