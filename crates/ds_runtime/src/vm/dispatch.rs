//! The instruction loop.
use ds_ir::Op;
use ds_syntax::Error;
use tracing::trace;

use super::Vm;
use super::ops::{access, collection, math};
use crate::Value;

impl Vm<'_> {
    pub(crate) fn run_loop(&mut self) -> Result<Value, Error> {
        loop {
            let Some(frame) = self.frames.last_mut() else {
                return Ok(Value::Undefined);
            };
            // Falling off the end of a chunk is an implicit return.
            let Some(&op) = frame.code.chunk().ops.get(frame.ip) else {
                if let Some(v) = self.leave_frame()? {
                    return Ok(v);
                }
                continue;
            };
            frame.ip += 1;
            self.charge(1)?;
            if self.ctx.flags.print_bytecode {
                trace!(depth = self.frames.len(), stack = self.stack.len(), "{op}");
            }
            if let Some(v) = self.step(op)? {
                return Ok(v);
            }
        }
    }

    /// Execute one instruction. `Some` carries the main frame's result.
    fn step(&mut self, op: Op) -> Result<Option<Value>, Error> {
        match op {
            Op::PushInt(i) => self.push(Value::Int(i)),
            Op::PushFloat(f) => self.push(Value::Float(f)),
            Op::PushStr(idx) => {
                let s = self.const_str(idx)?;
                self.push(Value::Str(s));
            }
            Op::PushUndefined => self.push(Value::Undefined),
            Op::PushNone => self.push(Value::None),
            Op::PushComputed(idx) => {
                let expr = self.const_str(idx)?;
                self.push(Value::computed(&expr));
            }
            Op::MakeFunction(idx) => {
                let f = self.const_func(idx)?;
                self.push(Value::Function(f));
            }
            Op::Pop => {
                self.pop()?;
            }
            Op::Dup => {
                let v = self.peek()?.clone();
                self.push(v);
            }
            Op::SetRet => {
                let v = self.pop()?;
                let frame = self.frame_mut()?;
                frame.ret = v;
                debug_assert_eq!(self.rolls.len(), self.frame()?.roll_base);
            }
            Op::Return => return self.leave_frame(),

            Op::Binary(b) => {
                let r = self.pop()?;
                let l = self.pop()?;
                let v = math::op_binary(b, &l, &r, self.ctx.flags.ignore_div0)?;
                self.push(v);
            }
            Op::Unary(u) => {
                let v = self.pop()?;
                self.push(math::op_unary(u, &v)?);
            }

            Op::Jump(t) => self.frame_mut()?.ip = t,
            Op::JumpIfTrue(t) => {
                if self.pop()?.truthy() {
                    self.frame_mut()?.ip = t;
                }
            }
            Op::JumpIfFalse(t) => {
                if !self.pop()?.truthy() {
                    self.frame_mut()?.ip = t;
                }
            }

            Op::LoadName(idx, span) => {
                let name = self.const_str(idx)?;
                self.op_load_name(&name, span)?;
            }
            Op::LoadRaw(idx) => {
                let name = self.const_str(idx)?;
                self.op_load_raw(&name)?;
            }
            Op::StoreName(idx) => {
                let name = self.const_str(idx)?;
                let v = self.peek()?.clone();
                self.op_store_name(name, v);
            }

            Op::MakeArray(n) => {
                let items = self.pop_n(n)?;
                self.push(Value::array(items));
            }
            Op::MakeRange => {
                let hi = self.pop()?;
                let lo = self.pop()?;
                self.charge(collection::range_len(&lo, &hi))?;
                self.push(collection::op_make_range(&lo, &hi)?);
            }
            Op::MakeDict(n) => {
                let items = self.pop_n(n * 2)?;
                self.push(collection::op_make_dict(items));
            }
            Op::StrJoin(n) => {
                let parts = self.pop_n(n)?;
                self.push(collection::op_str_join(&parts));
            }

            Op::GetIndex => {
                let idx = self.pop()?;
                let obj = self.pop()?;
                self.push(access::op_get_index(&obj, &idx)?);
            }
            Op::SetIndex => {
                let val = self.pop()?;
                let idx = self.pop()?;
                let obj = self.pop()?;
                access::op_set_index(&obj, &idx, val.clone())?;
                self.push(val);
            }
            Op::GetSlice => {
                let hi = self.pop()?;
                let lo = self.pop()?;
                let obj = self.pop()?;
                self.push(access::op_get_slice(&obj, &lo, &hi)?);
            }
            Op::SetSlice => {
                let val = self.pop()?;
                let hi = self.pop()?;
                let lo = self.pop()?;
                let obj = self.pop()?;
                access::op_set_slice(&obj, &lo, &hi, &val)?;
                self.push(val);
            }
            Op::GetAttr(idx) => {
                let name = self.const_str(idx)?;
                let obj = self.pop()?;
                self.push(access::op_get_attr(&obj, &name)?);
            }
            Op::SetAttr(idx) => {
                let name = self.const_str(idx)?;
                let val = self.pop()?;
                let obj = self.pop()?;
                access::op_set_attr(&obj, &name, val.clone())?;
                self.push(val);
            }

            Op::Call(argc) => {
                let args = self.pop_n(argc)?;
                let callee = self.pop()?;
                self.op_call(callee, args)?;
            }
            Op::CallMethod(idx, argc) => {
                let name = self.const_str(idx)?;
                let args = self.pop_n(argc)?;
                let recv = self.pop()?;
                self.op_call_method(&recv, &name, &args)?;
            }

            Op::DiceInit => self.op_dice_init(),
            Op::DiceSetTimes => self.op_dice_set_times()?,
            Op::DiceSetSides => self.op_dice_set_sides()?,
            Op::DiceSetPool => self.op_dice_set_pool()?,
            Op::DiceSelect(sel) => self.op_dice_select(sel)?,
            Op::DiceSetMin => self.op_dice_set_bound(false)?,
            Op::DiceSetMax => self.op_dice_set_bound(true)?,
            Op::DiceRoll(span) => self.op_dice_roll(span)?,
            Op::DiceWod(span) => self.op_dice_wod(span)?,
            Op::DiceDoubleCross(span) => self.op_dice_double_cross(span)?,
            Op::DiceCoc(penalty, span) => self.op_dice_coc(penalty, span)?,
            Op::DiceFate(span) => self.op_dice_fate(span)?,
        }
        Ok(None)
    }
}
