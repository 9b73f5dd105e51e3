//! Exit codes for the `clausetree` binary. Part of the public contract.

pub const SUCCESS: i32 = 0;
pub const VALIDATION_FAILED: i32 = 1; // Response rejected by the pipeline
pub const CONFIG_ERROR: i32 = 2; // Bad arguments, config or unreadable input
pub const GENERATION_FAILED: i32 = 3; // Text generator failed
