//! Instruction set and compiled chunks.
//!
//! A `Chunk` is a flat instruction vector plus its literal pool. Function bodies are
//! compiled into their own chunks and stored in the pool as `Constant::Func`.

use std::fmt;
use std::rc::Rc;

use ds_syntax::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
    BitAnd,
    BitOr,
    NullCoalesce,
}

impl BinOp {
    /// Name used in type errors.
    pub fn name(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::Div => "div",
            BinOp::Mod => "mod",
            BinOp::Pow => "pow",
            BinOp::Lt => "lt",
            BinOp::Le => "le",
            BinOp::Eq => "eq",
            BinOp::Ne => "ne",
            BinOp::Ge => "ge",
            BinOp::Gt => "gt",
            BinOp::BitAnd => "bitand",
            BinOp::BitOr => "bitor",
            BinOp::NullCoalesce => "nullish",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
}

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Pos => "pos",
            UnaryOp::Not => "not",
        }
    }
}

/// Keep/drop selection applied by `DiceRoll`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Select {
    KeepHigh,
    KeepLow,
    DropHigh,
    DropLow,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Op {
    PushInt(i64),
    PushFloat(f64),
    PushStr(u32), // Index into constant pool (Str)
    PushUndefined,
    PushNone,
    PushComputed(u32), // Index into constant pool (Str, formula text)
    MakeFunction(u32), // Index into constant pool (Func)
    Pop,
    Dup,
    /// Pop into the frame's result register.
    SetRet,
    /// Leave the frame with its result register.
    Return,

    Binary(BinOp),
    Unary(UnaryOp),

    Jump(usize),
    JumpIfTrue(usize),
    JumpIfFalse(usize),

    /// Name load; a span marks the load for the execution trace.
    LoadName(u32, Option<Span>),
    /// Name load that hands back computed values unevaluated (`&name`).
    LoadRaw(u32),
    StoreName(u32),

    MakeArray(usize),
    MakeRange,
    MakeDict(usize), // key/value pairs
    StrJoin(usize),

    GetIndex,
    SetIndex,
    GetSlice,
    SetSlice,
    GetAttr(u32),
    SetAttr(u32),

    Call(usize),
    CallMethod(u32, usize),

    DiceInit,
    DiceSetTimes,
    DiceSetSides,
    DiceSetPool,
    DiceSelect(Select),
    DiceSetMin,
    DiceSetMax,
    DiceRoll(Option<Span>),
    DiceWod(Option<Span>),
    DiceDoubleCross(Option<Span>),
    DiceCoc(bool, Option<Span>), // penalty?
    DiceFate(Option<Span>),
}

impl Op {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::PushInt(_) => "push.int",
            Op::PushFloat(_) => "push.float",
            Op::PushStr(_) => "push.str",
            Op::PushUndefined => "push.undefined",
            Op::PushNone => "push.none",
            Op::PushComputed(_) => "push.computed",
            Op::MakeFunction(_) => "make.func",
            Op::Pop => "pop",
            Op::Dup => "dup",
            Op::SetRet => "set.ret",
            Op::Return => "ret",
            Op::Binary(op) => op.name(),
            Op::Unary(op) => op.name(),
            Op::Jump(_) => "jmp",
            Op::JumpIfTrue(_) => "jmp.true",
            Op::JumpIfFalse(_) => "jmp.false",
            Op::LoadName(..) => "load",
            Op::LoadRaw(_) => "load.raw",
            Op::StoreName(_) => "store",
            Op::MakeArray(_) => "make.array",
            Op::MakeRange => "make.range",
            Op::MakeDict(_) => "make.dict",
            Op::StrJoin(_) => "str.join",
            Op::GetIndex => "item.get",
            Op::SetIndex => "item.set",
            Op::GetSlice => "slice.get",
            Op::SetSlice => "slice.set",
            Op::GetAttr(_) => "attr.get",
            Op::SetAttr(_) => "attr.set",
            Op::Call(_) => "call",
            Op::CallMethod(..) => "call.method",
            Op::DiceInit => "dice.init",
            Op::DiceSetTimes => "dice.times",
            Op::DiceSetSides => "dice.sides",
            Op::DiceSetPool => "dice.pool",
            Op::DiceSelect(Select::KeepHigh) => "dice.kh",
            Op::DiceSelect(Select::KeepLow) => "dice.kl",
            Op::DiceSelect(Select::DropHigh) => "dice.dh",
            Op::DiceSelect(Select::DropLow) => "dice.dl",
            Op::DiceSetMin => "dice.min",
            Op::DiceSetMax => "dice.max",
            Op::DiceRoll(_) => "dice.roll",
            Op::DiceWod(_) => "dice.wod",
            Op::DiceDoubleCross(_) => "dice.dx",
            Op::DiceCoc(false, _) => "dice.coc.bonus",
            Op::DiceCoc(true, _) => "dice.coc.penalty",
            Op::DiceFate(_) => "dice.fate",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.mnemonic();
        match self {
            Op::PushInt(v) => write!(f, "{m} {v}"),
            Op::PushFloat(v) => write!(f, "{m} {v}"),
            Op::PushStr(i)
            | Op::PushComputed(i)
            | Op::MakeFunction(i)
            | Op::LoadRaw(i)
            | Op::StoreName(i)
            | Op::GetAttr(i)
            | Op::SetAttr(i) => write!(f, "{m} #{i}"),
            Op::LoadName(i, _) => write!(f, "{m} #{i}"),
            Op::Jump(t) | Op::JumpIfTrue(t) | Op::JumpIfFalse(t) => write!(f, "{m} -> {t}"),
            Op::MakeArray(n) | Op::MakeDict(n) | Op::StrJoin(n) | Op::Call(n) => {
                write!(f, "{m} {n}")
            }
            Op::CallMethod(i, n) => write!(f, "{m} #{i} {n}"),
            _ => f.write_str(m),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FuncProto {
    pub name: String,
    pub params: Vec<String>,
    pub chunk: Chunk,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Str(Rc<str>),
    Func(Rc<FuncProto>),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chunk {
    pub ops: Vec<Op>,
    pub constants: Vec<Constant>,
    /// Identifies the source text this chunk's spans point into; 0 means untraced.
    pub origin: u64,
}

impl Chunk {
    pub fn new(origin: u64) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// Intern a string literal or name.
    pub fn add_str(&mut self, s: &str) -> u32 {
        let found = self
            .constants
            .iter()
            .position(|c| matches!(c, Constant::Str(x) if &**x == s));
        if let Some(pos) = found {
            return pos as u32;
        }
        self.constants.push(Constant::Str(Rc::from(s)));
        (self.constants.len() - 1) as u32
    }

    pub fn add_func(&mut self, proto: FuncProto) -> u32 {
        self.constants.push(Constant::Func(Rc::new(proto)));
        (self.constants.len() - 1) as u32
    }

    pub fn str_at(&self, idx: u32) -> Option<&Rc<str>> {
        match self.constants.get(idx as usize) {
            Some(Constant::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn func_at(&self, idx: u32) -> Option<&Rc<FuncProto>> {
        match self.constants.get(idx as usize) {
            Some(Constant::Func(f)) => Some(f),
            _ => None,
        }
    }

    /// Human-readable listing, nested function bodies included.
    pub fn asm_text(&self) -> String {
        let mut out = String::new();
        self.write_asm(&mut out, "main");
        out
    }

    fn write_asm(&self, out: &mut String, title: &str) {
        use std::fmt::Write as _;
        let _ = writeln!(out, "== {title} ==");
        for (ip, op) in self.ops.iter().enumerate() {
            let _ = write!(out, "{ip:04} {op}");
            let named = match op {
                Op::PushStr(i)
                | Op::PushComputed(i)
                | Op::LoadName(i, _)
                | Op::LoadRaw(i)
                | Op::StoreName(i)
                | Op::GetAttr(i)
                | Op::SetAttr(i)
                | Op::CallMethod(i, _) => self.str_at(*i),
                _ => None,
            };
            if let Some(s) = named {
                let _ = write!(out, "  ; {s:?}");
            }
            out.push('\n');
        }
        for c in &self.constants {
            if let Constant::Func(f) = c {
                f.chunk.write_asm(out, &format!("func {}", f.name));
            }
        }
    }
}
