use ds_syntax::TokenKind;
use phf::phf_map;

/// Reserved words. A keyword followed by an identifier character is lexed as part of a
/// longer identifier (`while123`), which maximal munch handles before this lookup.
pub(crate) static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "while" => TokenKind::While,
    "if" => TokenKind::If,
    "else" => TokenKind::Else,
    "continue" => TokenKind::Continue,
    "break" => TokenKind::Break,
    "func" => TokenKind::Func,
    "return" => TokenKind::Return,
};

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains_key(word)
}
