use ds_runtime::{Context, StdDiceRng, Value};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use regex::Regex;

fn seeded(seed: u64) -> Context {
    let mut ctx = Context::new();
    ctx.set_rng(Box::new(StdDiceRng::seeded(seed)));
    ctx
}

fn as_int(v: &Value) -> i64 {
    match v {
        Value::Int(i) => *i,
        other => panic!("expected int64, got {other:?}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 16, max_shrink_iters: 200, .. ProptestConfig::default()
    })]

    #[test]
    fn sums_stay_in_range(n in 1i64..20, s in 1i64..100, seed in any::<u64>()) {
        let mut ctx = seeded(seed);
        let total = as_int(&ctx.run(&format!("{n}d{s}")).unwrap());
        prop_assert!(total >= n && total <= n * s);
        if n > 1 {
            let faces = ctx.detail.rsplit('=').next().unwrap_or("").trim_end_matches(']');
            let sum: i64 = faces.split('+').map(|f| f.parse::<i64>().unwrap()).sum();
            prop_assert_eq!(sum, total);
        }
    }

    #[test]
    fn keep_highest_is_the_maximum(n in 2i64..10, seed in any::<u64>()) {
        let re = Regex::new(r"=\{(\d+) \| ([\d ]+)\}\]$").unwrap();
        let mut ctx = seeded(seed);
        let total = as_int(&ctx.run(&format!("{n}d1000kh")).unwrap());
        let Some(caps) = re.captures(&ctx.detail) else {
            // every face equal: no keep notation
            prop_assert_eq!(&ctx.detail, &format!("{total}[{n}d1000kh={total}]"));
            return Ok(());
        };
        let kept: i64 = caps[1].parse().unwrap();
        prop_assert_eq!(kept, total);
        for d in caps[2].split(' ') {
            prop_assert!(d.parse::<i64>().unwrap() <= kept);
        }
    }

    #[test]
    fn keep_lowest_is_the_minimum(n in 2i64..10, seed in any::<u64>()) {
        let mut ctx = seeded(seed);
        let total = as_int(&ctx.run(&format!("{n}d1000kl")).unwrap());
        let Some(dropped) = ctx.detail.split(" | ").nth(1) else {
            prop_assert_eq!(&ctx.detail, &format!("{total}[{n}d1000kl={total}]"));
            return Ok(());
        };
        for d in dropped.trim_end_matches("}]").split(' ') {
            prop_assert!(d.parse::<i64>().unwrap() >= total);
        }
    }

    #[test]
    fn nesting_never_leaks_into_the_next_run(depth in 1usize..6, seed in any::<u64>()) {
        let mut ctx = seeded(seed);
        let mut src = "1d1".to_string();
        for _ in 0..depth {
            src = format!("({src})d1");
        }
        prop_assert_eq!(as_int(&ctx.run(&src).unwrap()), 1);
        prop_assert_eq!(as_int(&ctx.run("2 + 2").unwrap()), 4);
    }
}
