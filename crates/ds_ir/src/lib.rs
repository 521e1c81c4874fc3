//!
//!
mod bytecode;
mod flags;

pub use bytecode::{BinOp, Chunk, Constant, FuncProto, Op, Select, UnaryOp};
pub use flags::{DEFAULT_DICE_SIDES, Flags};
