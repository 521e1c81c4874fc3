mod common;

use common::{ctx_with, eval, eval_err, int};
use ds_runtime::{Context, ErrorKind, Value};
use regex::Regex;

#[test]
fn plain_rolls() {
    let mut ctx = ctx_with(&[3, 5, 1]);
    assert_eq!(int(&ctx.run("3d6").unwrap()), 9);
    assert_eq!(ctx.detail, "9[3d6=9=3+5+1]");
    assert_eq!(int(&eval("10d1d1")), 10);
    assert_eq!(int(&eval("4d1k5")), 4);
}

#[test]
fn default_sides_and_count() {
    let mut ctx = Context::new();
    ctx.flags.dice_max_mode = true;
    assert_eq!(int(&ctx.run("d").unwrap()), 100);
    assert_eq!(int(&ctx.run("2d").unwrap()), 200);
    ctx.run("// #DefaultDiceSideNum 20\n0").unwrap();
    assert_eq!(int(&ctx.run("d").unwrap()), 20);
    ctx.flags.dice_max_mode = false;
    ctx.flags.dice_min_mode = true;
    assert_eq!(int(&ctx.run("5d20").unwrap()), 5);
}

#[test]
fn keep_and_drop() {
    let mut ctx = ctx_with(&[3, 5, 1]);
    assert_eq!(int(&ctx.run("3d6kh").unwrap()), 5);
    assert_eq!(ctx.detail, "5[3d6kh=5={5 | 3 1}]");

    let mut ctx = ctx_with(&[3, 5, 1]);
    assert_eq!(int(&ctx.run("3d6dl1").unwrap()), 8);
    assert_eq!(ctx.detail, "8[3d6dl1=8={3 5 | 1}]");

    let mut ctx = ctx_with(&[3, 5, 1]);
    assert_eq!(int(&ctx.run("3d6kl2").unwrap()), 4);

    let mut ctx = ctx_with(&[4, 4, 2]);
    ctx.run("3d6k").unwrap();
    assert_eq!(ctx.detail, "4[3d6k=4={4 | 4 2}]");
}

#[test]
fn equal_faces_show_no_keep_notation() {
    let mut ctx = Context::new();
    for src in ["4d1kh1", "4d1q", "3d1dl1"] {
        ctx.run(src).unwrap();
        assert!(!ctx.detail.contains('|'), "{}", ctx.detail);
    }
    assert_eq!(ctx.detail, "2[3d1dl1=2=1+1]");

    let mut ctx = ctx_with(&[4, 4, 4]);
    assert_eq!(int(&ctx.run("3d6kh").unwrap()), 4);
    assert_eq!(ctx.detail, "4[3d6kh=4]");
}

#[test]
fn advantage_and_disadvantage() {
    let mut ctx = ctx_with(&[4, 17]);
    assert_eq!(int(&ctx.run("d20优势").unwrap()), 17);
    let mut ctx = ctx_with(&[4, 17]);
    assert_eq!(int(&ctx.run("d20劣势").unwrap()), 4);
}

#[test]
fn min_and_max_clamp() {
    assert_eq!(int(&eval("d20min30max1")), 30);
    let mut ctx = ctx_with(&[2]);
    assert_eq!(int(&ctx.run("d20min5").unwrap()), 5);
    assert_eq!(ctx.detail, "5[d20min5=5=2 min 5]");
    let mut ctx = ctx_with(&[18]);
    assert_eq!(int(&ctx.run("d20max10").unwrap()), 10);
}

#[test]
fn array_pools() {
    assert_eq!(int(&eval("[1,3,2]kh")), 3);
    assert_eq!(int(&eval("[1,3,2]kl")), 1);
    assert_eq!(int(&eval("[1,3,2]dh")), 3);
    assert!(matches!(eval("[1.2,2,3]kh"), Value::Float(f) if f == 3.0));
    assert_eq!(eval_err("['a', 1]kh").kind(), ErrorKind::Type);
}

#[test]
fn bad_dice_parameters() {
    assert_eq!(eval_err("(-1)d5").kind(), ErrorKind::Range);
    assert_eq!(eval_err("('xxx')d5").kind(), ErrorKind::Type);
    assert_eq!(eval_err("3d(-10)").kind(), ErrorKind::Range);
    assert_eq!(eval_err("3d('xx')").kind(), ErrorKind::Type);
    assert_eq!(eval_err("3d0").kind(), ErrorKind::Range);
    assert_eq!(eval_err("3d6k0").kind(), ErrorKind::Range);
    assert_eq!(eval_err("30001d20").kind(), ErrorKind::ResourceExhausted);
}

#[test]
fn nested_rolls_stay_balanced() {
    let re = Regex::new(r"^(\d+)\[2d\(3d1\)=(\d+)=(\d+)\+(\d+),3d1=3=1\+1\+1\]$").unwrap();
    let mut ctx = Context::new();
    for _ in 0..20 {
        ctx.run("2d(3d1)").unwrap();
        let caps = re.captures(&ctx.detail).unwrap_or_else(|| panic!("{}", ctx.detail));
        let total: i64 = caps[1].parse().unwrap();
        let a: i64 = caps[3].parse().unwrap();
        let b: i64 = caps[4].parse().unwrap();
        assert_eq!(total, a + b);
        assert!((1..=3).contains(&a) && (1..=3).contains(&b));
    }
    assert_eq!(int(&ctx.run("(2d(1d(1d1)))d1").unwrap()), 2);
    assert_eq!(int(&ctx.run("1 + 1").unwrap()), 2);
    ctx.run("(1d1000kl)d1").unwrap();
    assert!(!ctx.detail.contains('|'), "{}", ctx.detail);
}

#[test]
fn dropped_dice_are_listed_after_kept() {
    let re = Regex::new(r"^(\d+)\[3d1000dh1=(\d+)=\{(\d+) (\d+) \| (\d+)\}\]$").unwrap();
    let mut ctx = Context::new();
    for _ in 0..20 {
        ctx.run("3d1000dh1").unwrap();
        let caps = re.captures(&ctx.detail).unwrap_or_else(|| panic!("{}", ctx.detail));
        let n = |i: usize| caps[i].parse::<i64>().unwrap();
        assert_eq!(n(1), n(3) + n(4));
        assert!(n(5) >= n(3) && n(5) >= n(4));
    }
}

#[test]
fn world_of_darkness_pools() {
    let mut ctx = ctx_with(&[10, 3, 8, 2, 10, 3]);
    ctx.flags.enable_dice_wod = true;
    assert_eq!(int(&ctx.run("4a10").unwrap()), 3);
    assert_eq!(ctx.detail, "3[4a10=3={10 3 8 2}{10}{3}]");

    let mut ctx = Context::new();
    ctx.flags.enable_dice_wod = true;
    ctx.run("2a10x").unwrap();
    assert_eq!(ctx.rest_input, "x");
    ctx.run("2a10 x").unwrap();
    assert_eq!(ctx.rest_input, "x");
    assert_eq!(ctx.run("2a1").unwrap_err().kind(), ErrorKind::Range);
    assert_eq!(ctx.run("0a10").unwrap_err().kind(), ErrorKind::Range);
    ctx.flags.dice_max_mode = true;
    assert_eq!(ctx.run("2a10").unwrap_err().kind(), ErrorKind::ResourceExhausted);
}

#[test]
fn double_cross_pools() {
    let mut ctx = ctx_with(&[10, 4]);
    ctx.flags.enable_dice_double_cross = true;
    assert_eq!(int(&ctx.run("2c10").unwrap()), 24);

    let mut ctx = Context::new();
    ctx.flags.enable_dice_double_cross = true;
    ctx.flags.dice_max_mode = true;
    assert_eq!(int(&ctx.run("3c11").unwrap()), 10);
    assert_eq!(ctx.run("1c1").unwrap_err().kind(), ErrorKind::Range);
    ctx.run("1c5d").ok();
    assert_eq!(ctx.rest_input, "d");
}

#[test]
fn call_of_cthulhu_dice() {
    let mut ctx = ctx_with(&[5, 3, 7]);
    ctx.flags.enable_dice_coc = true;
    assert_eq!(int(&ctx.run("b1").unwrap()), 24);
    let mut ctx = ctx_with(&[5, 3, 7]);
    ctx.flags.enable_dice_coc = true;
    assert_eq!(int(&ctx.run("p1").unwrap()), 64);
    let mut ctx = ctx_with(&[1]);
    ctx.flags.enable_dice_coc = true;
    assert_eq!(int(&ctx.run("b").unwrap()), 100);
    assert!(ctx.run("bX").unwrap().is_undefined());
    assert_eq!(ctx.rest_input, "");
}

#[test]
fn fate_dice() {
    let mut ctx = ctx_with(&[1, 2, 3, 3]);
    ctx.flags.enable_dice_fate = true;
    assert_eq!(int(&ctx.run("f").unwrap()), 1);
    assert_eq!(ctx.detail, "1[f=1=- 0 + +]");
    assert!(ctx.run("f1").unwrap().is_undefined());
}

#[test]
fn letter_led_words_are_names_when_systems_are_off() {
    let mut ctx = Context::new();
    assert!(ctx.run("a10x").unwrap().is_undefined());
    assert_eq!(ctx.rest_input, "");
    assert!(ctx.run("pX").unwrap().is_undefined());
}
