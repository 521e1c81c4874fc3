//! ds_syntax: spans, tokens, identifier classes, string helpers and the error type
//! shared by every stage of the pipeline.
mod error;
mod span;
mod str_util;
mod token;
mod util;

pub use error::{Error, ErrorKind};
pub use span::Span;
pub use str_util::{InterpolationPiece, split_interpolation, unescape};
pub use token::{LexFault, Quote, Token, TokenKind};
pub use util::{is_ident_continue, is_ident_start, is_inline_space};
