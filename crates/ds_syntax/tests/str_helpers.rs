use ds_syntax::{Error, ErrorKind, InterpolationPiece, Span, split_interpolation, unescape};

#[test]
fn escapes() {
    assert_eq!(unescape(r"a\nb\tc"), "a\nb\tc");
    assert_eq!(unescape(r"\\ \' \{"), "\\ ' {");
    assert_eq!(unescape(r"\q"), r"\q");
    assert_eq!(unescape("tail\\"), "tail\\");
}

#[test]
fn interpolation_pieces() {
    let src = "`a{x + 1}b{% y %}`";
    let pieces = split_interpolation(src, 1, src.len() - 1, true).unwrap();
    assert_eq!(
        pieces,
        vec![
            InterpolationPiece::Text("a".into()),
            InterpolationPiece::Expr(Span::new(3, 8)),
            InterpolationPiece::Text("b".into()),
            InterpolationPiece::Expr(Span::new(12, 15)),
        ]
    );
    assert_eq!(Span::new(3, 8).text(src), "x + 1");
}

#[test]
fn braces_inside_embedded_strings() {
    let src = "{'}'}";
    let pieces = split_interpolation(src, 0, src.len(), true).unwrap();
    assert_eq!(pieces, vec![InterpolationPiece::Expr(Span::new(1, 4))]);
}

#[test]
fn unterminated_interpolation_is_a_lex_error() {
    let e = split_interpolation("{1", 0, 2, true).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Lex);
    assert!(split_interpolation("{% 1", 0, 4, true).is_err());
}

#[test]
fn error_rendering() {
    let e = Error::parse("   )) and more text that goes on", "unexpected ')'");
    assert_eq!(
        e.to_string(),
        "parse error near ')) and more text that go': unexpected ')'"
    );
    assert_eq!(
        Error::binary_type("mod", "int64", "float64").to_string(),
        "unsupported operand types for mod: int64, float64"
    );
}

#[test]
fn span_helpers() {
    let outer = Span::new(0, 7);
    assert!(outer.contains(Span::new(3, 6)));
    assert!(!Span::new(3, 6).contains(outer));
    assert_eq!(Span::new(2, 9).text("abc"), "");
}
