//! Exit code constants for the CLI application.

/// Success exit code (standard Unix convention).
pub const SUCCESS: i32 = 0;

/// Any failure: bad arguments, configuration, I/O or a rejected engine call.
pub const ERROR: i32 = 2;
