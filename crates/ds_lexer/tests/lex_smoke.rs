use ds_lexer::{Lexer, parse_directive};
use ds_syntax::{LexFault, Quote, TokenKind};

fn kinds(src: &str) -> Vec<TokenKind> {
    Lexer::new(src).tokenize().into_iter().map(|t| t.kind).collect()
}

#[test]
fn lex_smoke_arithmetic() {
    assert_eq!(
        kinds("1 + 2.5 ** x"),
        vec![
            TokenKind::Int,
            TokenKind::Plus,
            TokenKind::Float,
            TokenKind::StarStar,
            TokenKind::Ident,
            TokenKind::Eof
        ]
    );
}

#[test]
fn keywords_need_a_word_boundary() {
    assert_eq!(kinds("while")[0], TokenKind::While);
    assert_eq!(kinds("while123")[0], TokenKind::Ident);
    assert_eq!(kinds("if_x")[0], TokenKind::Ident);
    assert_eq!(kinds("return;")[..2], [TokenKind::Return, TokenKind::Semicolon]);
}

#[test]
fn quote_styles() {
    assert_eq!(kinds("'a'")[0], TokenKind::Str(Quote::Single));
    assert_eq!(kinds("\"a\"")[0], TokenKind::Str(Quote::Double));
    assert_eq!(kinds("`a{1}`")[0], TokenKind::Str(Quote::Backtick));
    assert_eq!(kinds("\x1ea\\n\x1e")[0], TokenKind::Str(Quote::Raw));
    assert_eq!(
        kinds("'abc")[0],
        TokenKind::Invalid(LexFault::UnterminatedString)
    );
}

#[test]
fn unicode_identifiers() {
    let src = "力量 = 50";
    let toks = Lexer::new(src).tokenize();
    assert_eq!(toks[0].kind, TokenKind::Ident);
    assert_eq!(toks[0].text(src), "力量");
    assert_eq!(toks[1].kind, TokenKind::Eq);
}

#[test]
fn colon_identifiers_are_positional() {
    let src = "a:b";
    let lx = Lexer::new(src);
    assert_eq!(lx.scan(0, true).text(src), "a:b");
    let t = lx.scan(0, false);
    assert_eq!(t.text(src), "a");
    assert_eq!(lx.scan(t.span.end, false).kind, TokenKind::Colon);
}

#[test]
fn comments_are_skipped_and_directives_kept() {
    assert_eq!(
        kinds("1 // note\n2"),
        vec![TokenKind::Int, TokenKind::Newline, TokenKind::Int, TokenKind::Eof]
    );
    assert_eq!(kinds("// #DiceMaxMode true\n1")[0], TokenKind::Directive);
}

#[test]
fn rescanning_is_pure() {
    let src = "x = 3d6kh2 + 'a'";
    let lx = Lexer::new(src);
    for pos in 0..src.len() {
        assert_eq!(lx.scan(pos, true), lx.scan(pos, true));
    }
}

#[test]
fn directive_lines() {
    assert_eq!(
        parse_directive("// #EnableDiceWoD true"),
        Some(("EnableDiceWoD", "true"))
    );
    assert_eq!(parse_directive("//#DiceMinMode"), Some(("DiceMinMode", "")));
    assert_eq!(parse_directive("// plain comment"), None);
    assert_eq!(parse_directive("// #"), None);
}
