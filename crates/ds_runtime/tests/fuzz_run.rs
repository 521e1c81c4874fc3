use ds_runtime::{Context, StdDiceRng, Value};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "1", "0", "-", "2.5", "x", "d", "3d6", "kh", "dl2", "min", "max4", "(", ")", "[", "]",
        "{", "}", "..", ":", "?", ",", ";", "\n", "+", "*", "**", "/", "%", "==", "&&", "||",
        "??", "=", "&", ".", "if", "else", "while", "func f(a)", "return", "break", "'s'",
        "`{x}`", "优势", "b", "p2", "f", "2a10", "3c8", " ", "this", "x.sum()", "[1..9]",
    ])
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 16, max_shrink_iters: 200, .. ProptestConfig::default()
    })]
    #[ignore]
    #[test]
    fn run_random_fragments_should_not_panic(parts in proptest::collection::vec(fragment(), 0..30), seed in any::<u64>()) {
        let src: String = parts.concat();
        let mut ctx = Context::new();
        ctx.set_rng(Box::new(StdDiceRng::seeded(seed)));
        ctx.flags.enable_dice_wod = true;
        ctx.flags.enable_dice_coc = true;
        ctx.flags.enable_dice_fate = true;
        ctx.flags.enable_dice_double_cross = true;
        let _ = ctx.run(&src);
        // the context stays usable after whatever happened
        prop_assert!(matches!(ctx.run("1 + 1"), Ok(Value::Int(2))));
    }
}
