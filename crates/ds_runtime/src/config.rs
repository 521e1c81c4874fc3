//! Per-context resource limits.

/// Hard ceilings applied to every run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Executed instructions per run; each rolled die and range element costs one more.
    pub max_ops: u64,
    /// Instructions per compiled chunk.
    pub max_code_len: usize,
    /// Nesting depth of brackets, unary chains, assignments and blocks in source text.
    pub max_nesting: u32,
    /// Nested function and computed-value frames.
    pub max_frames: usize,
    /// Dice in one success-counting pool (WoD, double-cross).
    pub max_dice_pool: i64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_ops: 30000,
            max_code_len: ds_parser::MAX_CODE_LEN,
            max_nesting: ds_parser::MAX_NESTING,
            max_frames: 512,
            max_dice_pool: 20000,
        }
    }
}
