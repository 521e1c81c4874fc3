//! Error taxonomy shared by the compiler and the VM.
//!
//! Every failure of a run is one of these values; nothing in the engine aborts the host
//! process on malformed input.

use thiserror::Error;

/// How much of the remaining input a parse error quotes.
const NEAR_CHARS: usize = 24;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed literal or token.
    #[error("lex error at byte {pos}: {message}")]
    Lex { pos: usize, message: String },

    /// Grammar violation; `near` quotes the offending remaining input.
    #[error("parse error near '{near}': {message}")]
    Parse { near: String, message: String },

    /// Operator or operand type mismatch.
    #[error("{0}")]
    Type(String),

    /// Function called with the wrong number of arguments.
    #[error("function '{name}' takes {expected} arguments but {actual} were given")]
    Arity {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Index, slice or dice parameter out of range; division by zero.
    #[error("{0}")]
    Range(String),

    /// Operation budget, code buffer or frame depth exceeded.
    #[error("{0}")]
    ResourceExhausted(String),

    /// Name load attempted while variable loading is disabled.
    #[error("loading variable '{0}' is disabled")]
    LoadDisabled(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lex,
    Parse,
    Type,
    Arity,
    Range,
    ResourceExhausted,
    UndefinedNameAccessDenied,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lex { .. } => ErrorKind::Lex,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::Type(_) => ErrorKind::Type,
            Error::Arity { .. } => ErrorKind::Arity,
            Error::Range(_) => ErrorKind::Range,
            Error::ResourceExhausted(_) => ErrorKind::ResourceExhausted,
            Error::LoadDisabled(_) => ErrorKind::UndefinedNameAccessDenied,
        }
    }

    pub fn lex(pos: usize, message: impl Into<String>) -> Self {
        Error::Lex {
            pos,
            message: message.into(),
        }
    }

    /// Parse error quoting the start of `rest`.
    pub fn parse(rest: &str, message: impl Into<String>) -> Self {
        let near: String = rest.trim_start().chars().take(NEAR_CHARS).collect();
        Error::Parse {
            near,
            message: message.into(),
        }
    }

    pub fn binary_type(op: &str, left: &str, right: &str) -> Self {
        Error::Type(format!("unsupported operand types for {op}: {left}, {right}"))
    }

    pub fn unary_type(op: &str, operand: &str) -> Self {
        Error::Type(format!("unsupported operand type for {op}: {operand}"))
    }
}
