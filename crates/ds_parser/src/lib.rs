//! Single-pass compiler from DiceScript source to `ds_ir` bytecode.
//!
//! There is no syntax tree: statements and expressions emit instructions as they are
//! recognised, and backtracking rewinds both the cursor and the emitted code.
mod compiler;
mod dice;
mod expr;
mod interp;
mod stmt;

pub use compiler::{CompileOptions, Compiled, Compiler, MAX_CODE_LEN, MAX_NESTING, compile};
pub use ds_ir::*;
