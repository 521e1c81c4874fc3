pub fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

pub fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Whitespace that does not end a statement.
pub fn is_inline_space(c: char) -> bool {
    c != '\n' && c.is_whitespace()
}
