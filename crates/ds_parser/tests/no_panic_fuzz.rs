use ds_parser::{CompileOptions, Flags, compile};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "1", "2.5", "x", "d", "3d6", "kh", "kl2", "dh", "min", "max4", "(", ")", "[", "]",
        "{", "}", "..", ":", "?", ",", ";", "\n", "+", "-", "*", "**", "/", "%", "==", "&&",
        "||", "??", "=", "&", ".", "if", "else", "while", "func f(a)", "return", "break",
        "'s'", "`{x}`", "优势", "b", "f", "2a10", "3c8", " ",
    ])
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 16, max_shrink_iters: 200, .. ProptestConfig::default()
    })]
    #[ignore]
    #[test]
    fn compile_random_fragments_should_not_panic(parts in proptest::collection::vec(fragment(), 0..30)) {
        let src: String = parts.concat();
        let mut flags = Flags {
            enable_dice_wod: true,
            enable_dice_coc: true,
            enable_dice_fate: true,
            enable_dice_double_cross: true,
            ..Flags::default()
        };
        if let Ok(c) = compile(&src, &mut flags, CompileOptions::default()) {
            assert!(c.consumed <= src.len());
            assert!(src.is_char_boundary(c.consumed));
        }
    }
}
