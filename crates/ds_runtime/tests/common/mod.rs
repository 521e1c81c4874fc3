#![allow(dead_code)]

use ds_runtime::{Context, DiceRng, Value};

/// Replays `faces` in order, cycling; each face is folded into `1..=sides`.
pub struct SeqRng {
    faces: Vec<i64>,
    at: usize,
}

impl SeqRng {
    pub fn new(faces: &[i64]) -> Self {
        Self {
            faces: faces.to_vec(),
            at: 0,
        }
    }
}

impl DiceRng for SeqRng {
    fn roll(&mut self, sides: i64) -> i64 {
        let f = self.faces[self.at % self.faces.len()];
        self.at += 1;
        (f - 1).rem_euclid(sides.max(1)) + 1
    }
}

pub fn ctx_with(faces: &[i64]) -> Context {
    let mut ctx = Context::new();
    ctx.set_rng(Box::new(SeqRng::new(faces)));
    ctx
}

pub fn eval(src: &str) -> Value {
    let mut ctx = Context::new();
    ctx.run(src)
        .unwrap_or_else(|e| panic!("{src:?} failed: {e}"))
}

pub fn eval_err(src: &str) -> ds_runtime::Error {
    let mut ctx = Context::new();
    match ctx.run(src) {
        Ok(v) => panic!("{src:?} should fail, got {v}"),
        Err(e) => e,
    }
}

pub fn int(v: &Value) -> i64 {
    match v {
        Value::Int(i) => *i,
        other => panic!("expected int64, got {other:?}"),
    }
}
