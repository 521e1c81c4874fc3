use ds_parser::{CompileOptions, Flags, Op, compile};
use ds_syntax::ErrorKind;

fn compile_default(src: &str) -> Result<ds_parser::Compiled, ds_syntax::Error> {
    let mut flags = Flags::default();
    compile(src, &mut flags, CompileOptions::default())
}

fn rest(src: &str) -> &str {
    let c = compile_default(src).unwrap();
    &src[c.consumed..]
}

#[test]
fn stops_at_first_unparsed_text() {
    assert_eq!(rest("3d1 k2"), "k2");
    assert_eq!(rest("1 + 2"), "");
    assert_eq!(rest("if true {} elseif 1{}"), "1{}");
    assert_eq!(rest("if 1 {} 1 2 3 4 5"), "2 3 4 5");
    assert_eq!(rest("i = 0 if 1 { i = 3 }"), "if 1 { i = 3 }");
}

#[test]
fn statements_are_counted() {
    assert_eq!(compile_default("a = 1; b = 2\nc = 3").unwrap().statements, 3);
    assert_eq!(compile_default("a = 1;;;\n\n b = 2").unwrap().statements, 2);
}

#[test]
fn empty_program_is_an_error() {
    assert!(compile_default("").is_err());
    assert!(compile_default("// only a comment").is_err());
    let e = compile_default(")").unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Parse);
}

#[test]
fn directives_update_flags() {
    let mut flags = Flags::default();
    let c = compile(
        "// #EnableDiceWoD true\n// #DefaultDiceSideNum 20\n1",
        &mut flags,
        CompileOptions::default(),
    )
    .unwrap();
    assert_eq!(c.statements, 1);
    assert!(flags.enable_dice_wod);
    assert_eq!(flags.default_dice_sides, 20);
}

#[test]
fn directive_only_program_succeeds() {
    let mut flags = Flags::default();
    compile("// #DiceMaxMode", &mut flags, CompileOptions::default()).unwrap();
    assert!(flags.dice_max_mode);
}

#[test]
fn grammar_errors() {
    for src in ["break", "continue", "a[1:2:3]", "func f(a, a) { 1 }", "else { 1 }"] {
        let e = compile_default(src).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Parse, "{src}: {e}");
        assert!(e.to_string().starts_with("parse error near"), "{e}");
    }
}

#[test]
fn instruction_ceiling_is_enforced() {
    let src = (0..100).map(|_| "1").collect::<Vec<_>>().join("+");
    let mut flags = Flags::default();
    let opts = CompileOptions {
        max_code_len: 16,
        ..CompileOptions::default()
    };
    let e = compile(&src, &mut flags, opts).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::ResourceExhausted);
    assert!(compile_default(&src).is_ok());
}

#[test]
fn deep_nesting_is_rejected() {
    let deep = 10_000;
    let cases = [
        format!("{}1{}", "(".repeat(deep), ")".repeat(deep)),
        format!("{}1{}", "[".repeat(deep), "]".repeat(deep)),
        format!("{}1", "-".repeat(deep)),
        format!("{}1", "!".repeat(deep)),
        format!("{}1", "a = ".repeat(deep)),
        format!("{}1", "2 ** ".repeat(deep)),
        format!("{}2", "0 ? 1 : ".repeat(deep)),
        format!("{}1{}", "if 1 { ".repeat(deep), " }".repeat(deep)),
        format!("if 0 {{}}{}", " else if 0 {}".repeat(deep)),
    ];
    for src in &cases {
        let e = compile_default(src).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::ResourceExhausted, "{}", &src[..20]);
    }
}

#[test]
fn moderate_nesting_compiles() {
    let src = format!("{}1{}", "(".repeat(40), ")".repeat(40));
    assert_eq!(compile_default(&src).unwrap().consumed, src.len());
    assert!(compile_default(&format!("{}1", "-".repeat(60))).is_ok());
    assert!(compile_default("[[[[1]]]][0][0][0][0]").is_ok());
}

#[test]
fn nesting_limit_is_configurable() {
    let src = format!("{}1{}", "(".repeat(10), ")".repeat(10));
    let mut flags = Flags::default();
    let opts = CompileOptions {
        max_nesting: 8,
        ..CompileOptions::default()
    };
    let e = compile(&src, &mut flags, opts).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::ResourceExhausted);
    assert!(e.to_string().contains("nesting"), "{e}");
}

#[test]
fn dice_rolls_carry_spans() {
    let src = "2d(3d1)";
    let c = compile_default(src).unwrap();
    let spans: Vec<_> = c
        .chunk
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::DiceRoll(Some(span)) => Some(span.text(src)),
            _ => None,
        })
        .collect();
    assert_eq!(spans, ["3d1", "2d(3d1)"]);
}

#[test]
fn letter_led_dice_fall_back_to_names() {
    let mut flags = Flags {
        enable_dice_coc: true,
        enable_dice_fate: true,
        ..Flags::default()
    };
    for src in ["bX", "pX", "f1", "d20abc"] {
        let c = compile(src, &mut flags, CompileOptions::default()).unwrap();
        assert!(
            c.chunk.ops.iter().any(|op| matches!(op, Op::LoadName(..))),
            "{src}"
        );
        assert_eq!(c.consumed, src.len(), "{src}");
    }
}

#[test]
fn function_bodies_get_their_own_chunk() {
    let c = compile_default("func add(a, b) { return a + b }").unwrap();
    let proto = c
        .chunk
        .constants
        .iter()
        .find_map(|k| match k {
            ds_parser::Constant::Func(f) => Some(f.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(proto.name, "add");
    assert_eq!(proto.params, ["a", "b"]);
    assert!(proto.chunk.ops.contains(&Op::Return));
}

#[test]
fn disassembly_names_every_op() {
    let c = compile_default("a = [1..3]; b = {x: 1}; a[0:1] = [9]; `v={a}`; 4d6kh3max20").unwrap();
    let asm = c.chunk.asm_text();
    assert!(asm.starts_with("== main =="));
    for line in asm.lines().skip(1) {
        let op = line.split_whitespace().nth(1).unwrap_or("");
        assert!(!op.is_empty(), "{line}");
    }
    assert!(asm.contains("dice.kh"));
    assert!(asm.contains("slice.set"));
}
