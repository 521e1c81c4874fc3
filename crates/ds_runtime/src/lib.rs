//! ds_runtime: values, the bytecode VM and the host-facing `Context`.
//!
//! ```ignore
//! let mut ctx = Context::new();
//! ctx.run("a = 3d6 + 2")?;
//! println!("{} -> {}", ctx.detail, ctx.ret);
//! ```
pub mod builtins;
pub mod config;
mod context;
pub mod errors;
mod methods;
mod scope;
pub mod util;
mod value;
mod vm;

pub use config::Limits;
pub use context::Context;
pub use ds_ir::Flags;
pub use ds_syntax::{Error, ErrorKind};
pub use scope::ScopeHooks;
pub use util::{DiceRng, StdDiceRng};
pub use value::{AttrMap, Computed, Value, fast_hasher, new_attrs};
