//! Advisory byte-range locking for lockranger.
//!
//! # Layers
//!
//! - [`RegionLock`]: the platform primitive. `fcntl(2)` record locks on
//!   unix ([`FcntlLock`]), `LockFileEx`/`UnlockFile` on Windows
//!   (`WindowsLock`). [`PlatformLock`] names the one selected at build time.
//! - [`apply`] / [`perform_lock_action`]: the stateless engine that turns a
//!   [`LockRequest`] into primitive calls and a [`LockResult`].
//! - [`LockHandle`]: the open data file the primitive is bound to.
//!
//! # Ownership
//!
//! Locks are owned by the process, not by a handle or a request. The
//! engine keeps no lock table, so overlapping requests from the same
//! process never wait on each other; the kernel merges or converts them.
//! The only way to observe lock state is a test query, which reports
//! locks held by *other* processes.

mod engine;
mod handle;
mod primitive;
mod types;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;


// Re-export public API
pub use engine::{apply, perform_lock_action};
pub use handle::LockHandle;
pub use primitive::{RegionLock, supported_operations};
pub use types::{
    ByteRange, FailureReason, HeldLockKind, LockHolder, LockRequest, LockResult, OperationKind,
    Outcome,
};

#[cfg(unix)]
pub use unix::FcntlLock;
#[cfg(windows)]
pub use windows::WindowsLock;

/// The region-lock primitive for the platform being built.
#[cfg(unix)]
pub type PlatformLock<'a> = FcntlLock<'a>;

/// The region-lock primitive for the platform being built.
#[cfg(windows)]
pub type PlatformLock<'a> = WindowsLock<'a>;
