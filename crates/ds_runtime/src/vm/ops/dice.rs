//! The dice sub-machine.
//!
//! `DiceInit` opens a roll context on the roll stack, the setter instructions fill it in
//! and `DiceRoll` closes it, pushing the total. Contexts nest, so `2d(1d4)` rolls the
//! inner dice to decide the outer side count. The special pools (WoD, double-cross, CoC,
//! Fate) take their parameters straight from the operand stack.
use ds_ir::Select;
use ds_syntax::{Error, Span};
use smallvec::SmallVec;

use crate::Value;
use crate::errors::messages::NO_OPEN_ROLL;
use crate::util::Appendable;
use crate::vm::Vm;

/// Faces rolled for one `CoC` or `Fate` throw.
const COC_SIDES: i64 = 10;
const FATE_DICE: usize = 4;

type Faces = SmallVec<[Value; 8]>;

/// One open `XdY` roll.
#[derive(Debug, Default)]
pub(crate) struct RollCtx {
    times: Option<i64>,
    sides: Option<i64>,
    /// Array operand of `[a, b, c]kh`; replaces rolling.
    pool: Option<Vec<Value>>,
    select: Option<(Select, i64)>,
    min: Option<i64>,
    max: Option<i64>,
}

impl Vm<'_> {
    fn open_roll(&mut self) -> Result<&mut RollCtx, Error> {
        let base = self.frame()?.roll_base;
        if self.rolls.len() <= base {
            return Err(Error::Range(NO_OPEN_ROLL.to_string()));
        }
        self.rolls
            .last_mut()
            .ok_or_else(|| Error::Range(NO_OPEN_ROLL.to_string()))
    }

    /// A single die, honouring the min/max modes.
    fn face(&mut self, sides: i64) -> i64 {
        let flags = &self.ctx.flags;
        if flags.dice_min_mode {
            1
        } else if flags.dice_max_mode {
            sides
        } else {
            self.ctx.caps.rng.roll(sides)
        }
    }

    /// `n` dice, charged against the budget before any is rolled.
    fn throw(&mut self, n: i64, sides: i64) -> Result<Vec<i64>, Error> {
        self.charge(n.max(0) as u64)?;
        Ok((0..n).map(|_| self.face(sides)).collect())
    }

    /// Execute Op::DiceInit
    pub(crate) fn op_dice_init(&mut self) {
        self.rolls.push(RollCtx::default());
    }

    /// Execute Op::DiceSetTimes
    pub(crate) fn op_dice_set_times(&mut self) -> Result<(), Error> {
        let n = self.pop_int("dice count")?;
        if n < 0 {
            return Err(Error::Range(format!("dice count must not be negative, got {n}")));
        }
        self.open_roll()?.times = Some(n);
        Ok(())
    }

    /// Execute Op::DiceSetSides
    pub(crate) fn op_dice_set_sides(&mut self) -> Result<(), Error> {
        let n = self.pop_int("dice sides")?;
        if n <= 0 {
            return Err(Error::Range(format!("dice sides must be positive, got {n}")));
        }
        self.open_roll()?.sides = Some(n);
        Ok(())
    }

    /// Execute Op::DiceSetPool
    pub(crate) fn op_dice_set_pool(&mut self) -> Result<(), Error> {
        let items = match self.pop()? {
            Value::Array(a) => a.borrow().clone(),
            other => {
                return Err(Error::Type(format!(
                    "dice pool must be an array, got {}",
                    other.type_name()
                )));
            }
        };
        if let Some(bad) = items.iter().find(|v| v.as_f64().is_none()) {
            return Err(Error::Type(format!(
                "dice pool elements must be numbers, got {}",
                bad.type_name()
            )));
        }
        self.open_roll()?.pool = Some(items);
        Ok(())
    }

    /// Execute Op::DiceSelect - keep/drop highest/lowest `n`
    pub(crate) fn op_dice_select(&mut self, sel: Select) -> Result<(), Error> {
        let n = self.pop_int("keep/drop count")?;
        if n <= 0 {
            return Err(Error::Range(format!("keep/drop count must be positive, got {n}")));
        }
        self.open_roll()?.select = Some((sel, n));
        Ok(())
    }

    /// Execute Op::DiceSetMin / Op::DiceSetMax
    pub(crate) fn op_dice_set_bound(&mut self, upper: bool) -> Result<(), Error> {
        let n = self.pop_int(if upper { "dice max" } else { "dice min" })?;
        let roll = self.open_roll()?;
        if upper {
            roll.max = Some(n);
        } else {
            roll.min = Some(n);
        }
        Ok(())
    }

    /// Execute Op::DiceRoll - close the open roll and push its total.
    pub(crate) fn op_dice_roll(&mut self, span: Option<Span>) -> Result<(), Error> {
        self.open_roll()?;
        let Some(ctx) = self.rolls.pop() else {
            return Err(Error::Range(NO_OPEN_ROLL.to_string()));
        };
        let faces: Faces = match ctx.pool {
            Some(pool) => pool.into_iter().collect(),
            None => {
                let sides = ctx.sides.unwrap_or_else(|| self.ctx.flags.dice_sides());
                let times = ctx.times.unwrap_or(1);
                self.throw(times, sides)?.into_iter().map(Value::Int).collect()
            }
        };
        let kept = keep_mask(&faces, ctx.select);
        let raw = sum_kept(&faces, &kept);

        // with every face equal, kept and dropped dice cannot be told apart
        let mixed = faces
            .first()
            .is_some_and(|first| faces.iter().any(|f| !f.equals(first)));
        let mut breakdown = String::new();
        if mixed && kept.iter().any(|k| !k) {
            breakdown.push('{');
            append_faces(&mut breakdown, &faces, &kept, true, " ");
            breakdown.push_str(" | ");
            append_faces(&mut breakdown, &faces, &kept, false, " ");
            breakdown.push('}');
        } else if kept.iter().filter(|k| **k).count() > 1 {
            append_faces(&mut breakdown, &faces, &kept, true, "+");
        }

        let mut total = raw.clone();
        // max applies before min, so `min` wins when they cross
        if let Some(m) = ctx.max {
            let next = clamp(&total, m, true);
            if !next.equals(&total) {
                tag_clamp(&mut breakdown, &raw, "max", m);
            }
            total = next;
        }
        if let Some(m) = ctx.min {
            let next = clamp(&total, m, false);
            if !next.equals(&total) {
                tag_clamp(&mut breakdown, &raw, "min", m);
            }
            total = next;
        }

        self.record(span, &total, (!breakdown.is_empty()).then_some(breakdown));
        self.push(total);
        Ok(())
    }

    /// Execute Op::DiceWod - World of Darkness success pool.
    ///
    /// Every die at or above the add-line joins the next round; the result counts dice at
    /// or above the success threshold across all rounds.
    pub(crate) fn op_dice_wod(&mut self, span: Option<Span>) -> Result<(), Error> {
        let success = self.pop_int("success threshold")?;
        let sides = self.pop_int("dice sides")?;
        let add_line = self.pop_int("add-line")?;
        let count = self.pop_int("dice count")?;
        if add_line < 2 {
            return Err(Error::Range(format!("add-line must be at least 2, got {add_line}")));
        }
        if sides < 1 {
            return Err(Error::Range(format!("dice sides must be positive, got {sides}")));
        }
        if success < 1 {
            return Err(Error::Range(format!(
                "success threshold must be positive, got {success}"
            )));
        }
        self.check_pool(count)?;

        let mut successes: i64 = 0;
        let mut pool = count;
        let mut breakdown = String::new();
        while pool > 0 {
            let faces = self.throw(pool, sides)?;
            successes += faces.iter().filter(|&&f| f >= success).count() as i64;
            pool = faces.iter().filter(|&&f| f >= add_line).count() as i64;
            append_round(&mut breakdown, &faces);
        }
        let total = Value::Int(successes);
        self.record(span, &total, Some(breakdown));
        self.push(total);
        Ok(())
    }

    /// Execute Op::DiceDoubleCross - re-roll criticals, ten per extra round.
    pub(crate) fn op_dice_double_cross(&mut self, span: Option<Span>) -> Result<(), Error> {
        let sides = self.pop_int("dice sides")?;
        let crit = self.pop_int("critical value")?;
        let count = self.pop_int("dice count")?;
        if crit < 2 {
            return Err(Error::Range(format!("critical value must be at least 2, got {crit}")));
        }
        if sides < 1 {
            return Err(Error::Range(format!("dice sides must be positive, got {sides}")));
        }
        self.check_pool(count)?;

        let mut rounds: i64 = 0;
        let mut last_max = 0;
        let mut pool = count;
        let mut breakdown = String::new();
        while pool > 0 {
            rounds += 1;
            let faces = self.throw(pool, sides)?;
            last_max = faces.iter().copied().max().unwrap_or(0);
            pool = faces.iter().filter(|&&f| f >= crit).count() as i64;
            append_round(&mut breakdown, &faces);
        }
        let total = Value::Int(rounds.saturating_sub(1).saturating_mul(10).saturating_add(last_max));
        self.record(span, &total, Some(breakdown));
        self.push(total);
        Ok(())
    }

    /// Execute Op::DiceCoc - d100 with bonus (`b`) or penalty (`p`) tens dice.
    pub(crate) fn op_dice_coc(&mut self, penalty: bool, span: Option<Span>) -> Result<(), Error> {
        let extra = self.pop_int("bonus/penalty dice count")?;
        if extra < 0 || extra > self.ctx.limits.max_dice_pool {
            return Err(Error::Range(format!(
                "bonus/penalty dice count must be within 0..={}, got {extra}",
                self.ctx.limits.max_dice_pool
            )));
        }
        let units = self.throw(1, COC_SIDES)?[0] - 1;
        let tens: Vec<i64> = self
            .throw(extra + 1, COC_SIDES)?
            .into_iter()
            .map(|f| f - 1)
            .collect();
        let pick = if penalty {
            tens.iter().copied().max()
        } else {
            tens.iter().copied().min()
        }
        .unwrap_or(0);
        let mut n = pick * 10 + units;
        if n == 0 {
            n = 100;
        }

        let mut breakdown = String::new();
        breakdown.append_str(if penalty { "penalty " } else { "bonus " });
        breakdown.push('[');
        for (i, t) in tens.iter().enumerate() {
            if i > 0 {
                breakdown.push(' ');
            }
            breakdown.append_i64(*t);
        }
        breakdown.push_str("] units ");
        breakdown.append_i64(units);

        let total = Value::Int(n);
        self.record(span, &total, Some(breakdown));
        self.push(total);
        Ok(())
    }

    /// Execute Op::DiceFate - four dice of -1/0/+1.
    pub(crate) fn op_dice_fate(&mut self, span: Option<Span>) -> Result<(), Error> {
        let faces = self.throw(FATE_DICE as i64, 3)?;
        let mut sum = 0;
        let mut breakdown = String::with_capacity(FATE_DICE * 2);
        for (i, f) in faces.iter().enumerate() {
            let v = f - 2;
            sum += v;
            if i > 0 {
                breakdown.push(' ');
            }
            breakdown.push(match v {
                -1 => '-',
                0 => '0',
                _ => '+',
            });
        }
        let total = Value::Int(sum);
        self.record(span, &total, Some(breakdown));
        self.push(total);
        Ok(())
    }

    fn check_pool(&self, count: i64) -> Result<(), Error> {
        let max = self.ctx.limits.max_dice_pool;
        if !(1..=max).contains(&count) {
            return Err(Error::Range(format!(
                "dice count must be within 1..={max}, got {count}"
            )));
        }
        Ok(())
    }
}

/// Which faces survive the selection. Ties go to the earlier die.
fn keep_mask(faces: &[Value], select: Option<(Select, i64)>) -> SmallVec<[bool; 8]> {
    let mut kept: SmallVec<[bool; 8]> = SmallVec::from_elem(true, faces.len());
    let Some((sel, n)) = select else {
        return kept;
    };
    let n = usize::try_from(n).unwrap_or(usize::MAX).min(faces.len());
    let key = |i: usize| faces[i].as_f64().unwrap_or(0.0);
    let mut order: SmallVec<[usize; 8]> = (0..faces.len()).collect();
    // sort_by is stable
    match sel {
        Select::KeepHigh | Select::DropHigh => order.sort_by(|&a, &b| key(b).total_cmp(&key(a))),
        Select::KeepLow | Select::DropLow => order.sort_by(|&a, &b| key(a).total_cmp(&key(b))),
    }
    match sel {
        Select::KeepHigh | Select::KeepLow => {
            kept.iter_mut().for_each(|k| *k = false);
            for &i in &order[..n] {
                kept[i] = true;
            }
        }
        Select::DropHigh | Select::DropLow => {
            for &i in &order[..n] {
                kept[i] = false;
            }
        }
    }
    kept
}

/// Integer sum unless any face is a float.
fn sum_kept(faces: &[Value], kept: &[bool]) -> Value {
    let chosen = faces.iter().zip(kept).filter(|(_, k)| **k).map(|(f, _)| f);
    if faces.iter().any(|f| matches!(f, Value::Float(_))) {
        Value::Float(chosen.filter_map(Value::as_f64).sum())
    } else {
        Value::Int(
            chosen
                .filter_map(Value::as_int)
                .fold(0i64, i64::wrapping_add),
        )
    }
}

fn clamp(v: &Value, bound: i64, upper: bool) -> Value {
    match v {
        Value::Int(i) if upper => Value::Int((*i).min(bound)),
        Value::Int(i) => Value::Int((*i).max(bound)),
        Value::Float(f) if upper => Value::Float(f.min(bound as f64)),
        Value::Float(f) => Value::Float(f.max(bound as f64)),
        other => other.clone(),
    }
}

fn tag_clamp(out: &mut String, raw: &Value, tag: &str, bound: i64) {
    if out.is_empty() {
        out.append_value(raw);
    }
    out.push(' ');
    out.push_str(tag);
    out.push(' ');
    out.append_i64(bound);
}

/// Faces whose mask entry equals `want`, in roll order.
fn append_faces(out: &mut String, faces: &[Value], kept: &[bool], want: bool, sep: &str) {
    let mut first = true;
    for (f, &k) in faces.iter().zip(kept) {
        if k != want {
            continue;
        }
        if !first {
            out.push_str(sep);
        }
        first = false;
        out.append_value(f);
    }
}

fn append_round(out: &mut String, faces: &[i64]) {
    out.push('{');
    for (i, f) in faces.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.append_i64(*f);
    }
    out.push('}');
}
