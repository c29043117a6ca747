//! Translation of lock requests onto a [`RegionLock`].

use super::primitive::RegionLock;
use super::types::{FailureReason, LockRequest, LockResult, OperationKind};
use std::io;

/// Execute one request against the primitive and report the outcome.
///
/// Exclusive and shared requests block inside the primitive until granted.
/// Nothing is retried: every failure is classified and handed back.
pub fn apply<L: RegionLock + ?Sized>(lock: &L, request: &LockRequest) -> LockResult {
    let range = request.range;
    let attempt = match request.operation {
        OperationKind::Exclusive => lock.acquire_exclusive(range).map(|()| None),
        OperationKind::Shared => lock.acquire_shared(range).map(|()| None),
        OperationKind::Unlock => lock.release(range).map(|()| None),
        OperationKind::Test => {
            if !lock.supports_test() {
                return LockResult::failure(FailureReason::Unsupported(OperationKind::Test));
            }
            lock.test(range)
        }
    };

    match attempt {
        Ok(Some(holder)) => LockResult::held_by(holder),
        Ok(None) => LockResult::success(),
        Err(err) => {
            log::warn!("{} on {} failed: {}", request.operation.label(), range, err);
            LockResult::failure(classify(&err))
        }
    }
}

/// Execute a raw command symbol, rejecting anything outside `X`, `S`, `T`
/// and `U` without touching the primitive.
pub fn perform_lock_action<L: RegionLock + ?Sized>(
    lock: &L,
    symbol: char,
    offset: u64,
    length: u64,
) -> LockResult {
    match OperationKind::from_symbol(symbol) {
        Some(operation) => apply(lock, &LockRequest::new(operation, offset, length)),
        None => LockResult::failure(FailureReason::UnknownOperation(symbol)),
    }
}

/// Sort a primitive failure into a well-defined negative result or a
/// platform failure. A missing capability is decided in [`apply`] before
/// the primitive runs, so `ENOSYS` and friends from a real call are
/// platform failures.
pub(crate) fn classify(err: &io::Error) -> FailureReason {
    #[cfg(unix)]
    match err.raw_os_error() {
        Some(libc::EDEADLK) => return FailureReason::Deadlock,
        Some(libc::EOVERFLOW) => return FailureReason::InvalidRange(err.to_string()),
        _ => {}
    }

    match err.kind() {
        io::ErrorKind::Interrupted => FailureReason::Interrupted,
        io::ErrorKind::InvalidInput => FailureReason::InvalidRange(err.to_string()),
        _ => FailureReason::Platform {
            code: err.raw_os_error(),
            message: err.to_string(),
        },
    }
}
