//! ds_lexer: position-driven lexer crate.
//!
//! Entry points: `Lexer::new(input).scan(pos, colon_ident)` and `parse_directive`.
mod keywords;
mod lexer;

pub use keywords::is_keyword;
pub use lexer::{Lexer, parse_directive};
