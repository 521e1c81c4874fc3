mod common;

use common::{ctx_with, int};
use ds_runtime::Context;

#[test]
fn variable_loads_are_expanded() {
    let mut ctx = Context::new();
    ctx.run("a = 1;a   ").unwrap();
    assert_eq!(ctx.detail, "a = 1;1[a=1]   ");
}

#[test]
fn untraced_runs_echo_the_source() {
    let mut ctx = Context::new();
    ctx.run("1 + 2").unwrap();
    assert_eq!(ctx.detail, "1 + 2");
}

#[test]
fn rest_input_is_not_part_of_the_detail() {
    let mut ctx = ctx_with(&[2, 2]);
    ctx.run("2d6 rest").unwrap();
    assert_eq!(ctx.detail, "4[2d6=4=2+2] ");
    assert_eq!(ctx.rest_input, "rest");
}

#[test]
fn repeated_spans_keep_the_last_value() {
    let mut ctx = ctx_with(&[1, 2, 3]);
    ctx.run("i = 0; s = 0; while i < 3 { s = s + d6; i = i + 1 }; s")
        .unwrap();
    assert_eq!(int(&ctx.ret), 6);
    assert!(ctx.detail.contains("3[d6=3]"), "{}", ctx.detail);
}

#[test]
fn computed_loads_show_their_result() {
    let mut ctx = Context::new();
    ctx.run("&hp = 2 * 3").unwrap();
    ctx.run("hp + 1").unwrap();
    assert_eq!(ctx.detail, "6[hp=6] + 1");
}

#[test]
fn failed_runs_leave_no_detail() {
    let mut ctx = Context::new();
    assert!(ctx.run("3d0").is_err());
    assert!(ctx.detail.is_empty());
    assert_eq!(ctx.matched, "3d0");
}
