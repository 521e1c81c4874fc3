//! Common error message constants used throughout the runtime.

pub mod messages {
    pub const DIVISION_BY_ZERO: &str = "division by zero";
    pub const INDEX_OUT_OF_RANGE: &str = "index out of range";
    pub const OP_LIMIT: &str = "operation limit exceeded";
    pub const FRAME_LIMIT: &str = "call depth limit exceeded";
    pub const STACK_UNDERFLOW: &str = "operand stack underflow";
    pub const NO_FRAME: &str = "no active call frame";
    pub const NO_OPEN_ROLL: &str = "dice instruction without an open roll";
    pub const BAD_CONSTANT: &str = "constant index out of range";
    pub const SLICE_NEEDS_ARRAY: &str = "slice assignment needs an array value";
}
