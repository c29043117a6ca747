//! Exit code constants for the lockranger CLI.
//!
//! - 0: Success (quit command or end of input)
//! - 1: User error (invalid configuration)
//! - 2: Open failure (data file or command file)
//! - 3: Lock failure (the locking primitive failed unexpectedly)
//! - 4: I/O failure (reading commands, writing output or the event log)
//!
//! Argument errors are reported by clap, which exits with its own usage code.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: unreadable or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// The data file or the command file could not be opened.
pub const OPEN_FAILURE: i32 = 2;

/// The platform lock primitive failed in a way the session cannot recover from.
pub const LOCK_FAILURE: i32 = 3;

/// Reading the command stream or writing output failed.
pub const IO_FAILURE: i32 = 4;
