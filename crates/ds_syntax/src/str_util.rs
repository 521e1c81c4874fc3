use crate::{Error, Span};

/// Resolve backslash escapes. Unknown escapes are kept verbatim.
pub fn unescape(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            res.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => res.push('\n'),
            Some('r') => res.push('\r'),
            Some('f') => res.push('\u{0c}'),
            Some('t') => res.push('\t'),
            Some(q @ ('\\' | '"' | '\'' | '`' | '{' | '}')) => res.push(q),
            Some(next) => {
                res.push('\\');
                res.push(next);
            }
            None => res.push('\\'),
        }
    }
    res
}

/// One segment of an interpolated string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InterpolationPiece {
    Text(String),
    /// Absolute span of the embedded expression source.
    Expr(Span),
}

/// Split the body of an interpolating literal (`src[start..end]`, delimiters excluded)
/// into text and `{expr}` / `{% expr %}` pieces.
pub fn split_interpolation(
    src: &str,
    start: usize,
    end: usize,
    escapes: bool,
) -> Result<Vec<InterpolationPiece>, Error> {
    let body = src.get(start..end).unwrap_or("");
    let mut pieces = Vec::new();
    let mut raw = String::new();
    let mut iter = body.char_indices().peekable();

    let flush = |raw: &mut String, pieces: &mut Vec<InterpolationPiece>| {
        if !raw.is_empty() {
            let text = if escapes { unescape(raw) } else { raw.clone() };
            pieces.push(InterpolationPiece::Text(text));
            raw.clear();
        }
    };

    while let Some((off, c)) = iter.next() {
        if c == '\\' && escapes {
            raw.push(c);
            if let Some((_, next)) = iter.next() {
                raw.push(next);
            }
            continue;
        }
        if c != '{' {
            raw.push(c);
            continue;
        }
        flush(&mut raw, &mut pieces);
        let open = start + off;
        if let Some(&(_, '%')) = iter.peek() {
            iter.next();
            let inner_start = open + 2;
            let Some(rel) = body[off + 2..].find("%}") else {
                return Err(Error::lex(open, "unterminated `{%` interpolation"));
            };
            let inner_end = inner_start + rel;
            pieces.push(InterpolationPiece::Expr(Span::new(inner_start, inner_end)));
            while iter.peek().is_some_and(|&(o, _)| start + o < inner_end + 2) {
                iter.next();
            }
            continue;
        }
        let mut depth = 1usize;
        let mut quote: Option<char> = None;
        let mut close = None;
        while let Some((o, ch)) = iter.next() {
            if let Some(q) = quote {
                if ch == '\\' {
                    iter.next();
                } else if ch == q {
                    quote = None;
                }
                continue;
            }
            match ch {
                '"' | '\'' => quote = Some(ch),
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(start + o);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(close) = close else {
            return Err(Error::lex(open, "unterminated `{` interpolation"));
        };
        pieces.push(InterpolationPiece::Expr(Span::new(open + 1, close)));
    }
    flush(&mut raw, &mut pieces);
    Ok(pieces)
}
