//! The platform region-lock abstraction.

use super::types::{ByteRange, LockHolder, OperationKind};
use std::io;

/// Advisory byte-range locking on one open file.
///
/// Implementations are thin translations onto a native API. They keep no
/// state of their own: locks belong to the process at the OS level, so a
/// second request from the same process on an overlapping range is merged
/// or replaced by the kernel rather than refused.
pub trait RegionLock {
    /// Block until an exclusive lock on `range` is granted.
    fn acquire_exclusive(&self, range: ByteRange) -> io::Result<()>;

    /// Block until a shared lock on `range` is granted.
    fn acquire_shared(&self, range: ByteRange) -> io::Result<()>;

    /// Release whatever this process holds on `range`. Releasing an
    /// unlocked range succeeds.
    fn release(&self, range: ByteRange) -> io::Result<()>;

    /// Whether [`RegionLock::test`] is backed by a native query.
    fn supports_test(&self) -> bool {
        false
    }

    /// Report a lock held by another process that conflicts with an
    /// exclusive lock on `range`, without acquiring anything.
    fn test(&self, _range: ByteRange) -> io::Result<Option<LockHolder>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "lock test is not available on this platform",
        ))
    }
}

/// Operations the given primitive can carry out, in presentation order.
pub fn supported_operations(lock: &dyn RegionLock) -> Vec<OperationKind> {
    OperationKind::ALL
        .into_iter()
        .filter(|op| *op != OperationKind::Test || lock.supports_test())
        .collect()
}
