//! Command-line grammar for the lock session.
//!
//! One command per line, whitespace separated:
//!
//! ```text
//! <OP> <OFFSET> <LENGTH>
//! Q
//! ```
//!
//! `OP` is `X` (exclusive), `S` (shared), `T` (test, where the platform can
//! query locks) or `U` (unlock), in either case. Offsets and lengths are
//! non-negative byte counts from the start of the file.

mod parser;


pub use parser::{Command, CommandParser, ParseError};
