use ds_lexer::Lexer;
use ds_syntax::TokenKind;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

fn any_script_like() -> impl Strategy<Value = String> {
    let ascii =
        proptest::collection::vec(any::<char>().prop_filter("ascii", |c| c.is_ascii()), 0..40)
            .prop_map(|v| v.into_iter().collect::<String>());
    let unicode = proptest::collection::vec(any::<char>(), 0..20)
        .prop_map(|v| v.into_iter().collect::<String>());
    let sym = "3d6kh2 d20优势 ,;()[]{}?:.. // #DiceMaxMode \"\\ \n ` {1} ` \x1e '中文' while if else func return ?? ** ^ && ||"
        .to_string();
    (ascii, unicode, any::<bool>()).prop_map(move |(a, b, f)| {
        let mut s = String::new();
        s.push_str(&a);
        if f {
            s.push_str(&sym);
        }
        s.push_str(&b);
        s.chars().take(200).collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 16, max_shrink_iters: 200, .. ProptestConfig::default()
    })]
    #[ignore]
    #[test]
    fn lex_random_input_should_not_panic(s in any_script_like()) {
        let tokens = Lexer::new(&s).tokenize();
        assert!(matches!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof)));
        for t in &tokens {
            assert!(t.span.start <= t.span.end && t.span.end <= s.len());
            assert!(s.is_char_boundary(t.span.start) && s.is_char_boundary(t.span.end));
        }
    }
}
