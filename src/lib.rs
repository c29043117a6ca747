//! Lockranger: interactive and batch driver for advisory byte-range locks.
//!
//! A session opens one data file and reads lock commands (`X`, `S`, `T`,
//! `U`, `Q`) from a terminal or a command file, applying each to a byte
//! range of the file through the platform's advisory record locks.
//!
//! ```no_run
//! use lockranger::config::Config;
//! use lockranger::locks::LockHandle;
//! use lockranger::session::Session;
//! use std::io;
//!
//! let handle = LockHandle::open("data.dat")?;
//! let mut session = Session::new(
//!     handle,
//!     Config::default(),
//!     io::stdin().lock(),
//!     io::stdout(),
//!     io::stderr(),
//! );
//! session.run()?;
//! # Ok::<(), lockranger::error::RangerError>(())
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod locks;
pub mod session;
pub mod startup;

#[cfg(test)]
mod test_support;
