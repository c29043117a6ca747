//! Windows byte-range locks via `LockFileEx` and `UnlockFile`.
//!
//! Windows has no non-destructive query, so this primitive does not
//! support the test operation.

use super::primitive::RegionLock;
use super::types::ByteRange;
use std::fs::File;
use std::io;
use std::os::windows::io::AsRawHandle;
use winapi::shared::minwindef::DWORD;
use winapi::shared::winerror::ERROR_NOT_LOCKED;
use winapi::um::fileapi::{LockFileEx, UnlockFile};
use winapi::um::minwinbase::{LOCKFILE_EXCLUSIVE_LOCK, OVERLAPPED};
use winapi::um::winnt::HANDLE;

/// Region locks on a synchronous file handle.
#[derive(Debug, Clone, Copy)]
pub struct WindowsLock<'a> {
    file: &'a File,
}

impl<'a> WindowsLock<'a> {
    pub fn new(file: &'a File) -> Self {
        Self { file }
    }

    fn handle(&self) -> HANDLE {
        self.file.as_raw_handle() as HANDLE
    }

    fn lock(&self, flags: DWORD, range: ByteRange) -> io::Result<()> {
        let (offset_low, offset_high) = split(range.offset);
        let (len_low, len_high) = split(range.length);

        // SAFETY: OVERLAPPED is plain old data; only the offset is used
        // for a synchronous handle.
        let mut overlapped: OVERLAPPED = unsafe { std::mem::zeroed() };
        unsafe {
            let s = overlapped.u.s_mut();
            s.Offset = offset_low;
            s.OffsetHigh = offset_high;
        }

        log::debug!("LockFileEx flags={} {}", flags, range);
        // SAFETY: the handle is valid for the borrow of `self.file`.
        let ok = unsafe { LockFileEx(self.handle(), flags, 0, len_low, len_high, &mut overlapped) };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl RegionLock for WindowsLock<'_> {
    fn acquire_exclusive(&self, range: ByteRange) -> io::Result<()> {
        self.lock(LOCKFILE_EXCLUSIVE_LOCK, range)
    }

    fn acquire_shared(&self, range: ByteRange) -> io::Result<()> {
        // Shared is the absence of the exclusive flag.
        self.lock(0, range)
    }

    fn release(&self, range: ByteRange) -> io::Result<()> {
        let (offset_low, offset_high) = split(range.offset);
        let (len_low, len_high) = split(range.length);

        log::debug!("UnlockFile {}", range);
        // SAFETY: the handle is valid for the borrow of `self.file`.
        let ok = unsafe { UnlockFile(self.handle(), offset_low, offset_high, len_low, len_high) };
        if ok == 0 {
            let err = io::Error::last_os_error();
            // Releasing a range that is not locked is not an error here.
            if err.raw_os_error() == Some(ERROR_NOT_LOCKED as i32) {
                return Ok(());
            }
            return Err(err);
        }
        Ok(())
    }
}

fn split(value: u64) -> (DWORD, DWORD) {
    (value as DWORD, (value >> 32) as DWORD)
}
