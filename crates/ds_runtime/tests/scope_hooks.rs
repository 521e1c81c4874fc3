mod common;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use common::int;
use ds_runtime::{Context, ScopeHooks, Value};

/// A character sheet the host owns; the context only sees it through the hooks.
#[derive(Default)]
struct Sheet {
    attrs: Rc<RefCell<HashMap<String, Value>>>,
}

impl ScopeHooks for Sheet {
    fn load(&mut self, name: &str) -> Option<Value> {
        self.attrs.borrow().get(name).cloned()
    }

    fn store(&mut self, name: &str, value: &Value) -> bool {
        let mut attrs = self.attrs.borrow_mut();
        if !attrs.contains_key(name) {
            return false;
        }
        attrs.insert(name.to_string(), value.clone());
        true
    }
}

fn sheet_ctx() -> (Context, Rc<RefCell<HashMap<String, Value>>>) {
    let attrs = Rc::new(RefCell::new(HashMap::new()));
    attrs.borrow_mut().insert("力量".to_string(), Value::Int(50));
    attrs.borrow_mut().insert("hp".to_string(), Value::Int(10));
    let mut ctx = Context::new();
    ctx.set_hooks(Box::new(Sheet {
        attrs: attrs.clone(),
    }));
    (ctx, attrs)
}

#[test]
fn hooks_answer_loads_first() {
    let (mut ctx, _) = sheet_ctx();
    ctx.store_attr("力量", Value::Int(1));
    assert_eq!(int(&ctx.run("力量 + 1").unwrap()), 51);
    assert!(ctx.run("敏捷").unwrap().is_undefined());
}

#[test]
fn hooks_may_take_or_decline_stores() {
    let (mut ctx, attrs) = sheet_ctx();
    ctx.run("hp = hp - 3; tmp = 7").unwrap();
    assert_eq!(attrs.borrow().get("hp"), Some(&Value::Int(7)));
    assert_eq!(ctx.load_attr("hp"), None);
    assert_eq!(ctx.load_attr("tmp"), Some(Value::Int(7)));
    assert!(!attrs.borrow().contains_key("tmp"));
}

#[test]
fn hook_values_are_traced() {
    let (mut ctx, _) = sheet_ctx();
    ctx.run("力量/2").unwrap();
    assert_eq!(ctx.detail, "50[力量=50]/2");
}

#[test]
fn clearing_hooks_falls_back_to_globals() {
    let (mut ctx, _) = sheet_ctx();
    ctx.store_attr("力量", Value::Int(3));
    ctx.clear_hooks();
    assert_eq!(int(&ctx.run("力量").unwrap()), 3);
}

#[test]
fn function_scopes_are_fresh() {
    let mut ctx = Context::new();
    ctx.run("x = 1; func f(a) { x = a; this.a }").unwrap();
    assert_eq!(int(&ctx.run("f(9)").unwrap()), 9);
    assert_eq!(int(&ctx.run("x").unwrap()), 1);
    assert!(ctx.run("a").unwrap().is_undefined());
}

#[test]
fn this_at_top_level_is_the_globals() {
    let mut ctx = Context::new();
    ctx.run("this.z = 4").unwrap();
    assert_eq!(ctx.load_attr("z"), Some(Value::Int(4)));
    let names: Vec<String> = ctx.attrs().keys().map(|k| k.to_string()).collect();
    assert_eq!(names, ["z"]);
}
