//! POSIX record locks via `fcntl(2)`.

use super::primitive::RegionLock;
use super::types::{ByteRange, HeldLockKind, LockHolder};
use libc::{c_int, c_short, off_t};
use std::fs::File;
use std::io;
use std::os::unix::io::AsRawFd;

/// Region locks on a file through `F_SETLKW`, `F_SETLK` and `F_GETLK`.
#[derive(Debug, Clone, Copy)]
pub struct FcntlLock<'a> {
    file: &'a File,
}

impl<'a> FcntlLock<'a> {
    pub fn new(file: &'a File) -> Self {
        Self { file }
    }

    fn fcntl(&self, cmd: c_int, fl: &mut libc::flock) -> io::Result<()> {
        let fd = self.file.as_raw_fd();
        // SAFETY: `fd` stays open for the borrow of `self.file` and `fl`
        // points to a fully initialised flock.
        let rc = unsafe { libc::fcntl(fd, cmd, fl as *mut libc::flock) };
        if rc == -1 {
            let err = io::Error::last_os_error();
            log::debug!("fcntl(fd={}, cmd={}) failed: {}", fd, cmd, err);
            return Err(err);
        }
        Ok(())
    }

    fn set(&self, cmd: c_int, l_type: c_int, range: ByteRange) -> io::Result<()> {
        let mut fl = flock_for(l_type, range)?;
        log::debug!(
            "fcntl cmd={} type={} start={} len={}",
            cmd,
            l_type,
            fl.l_start,
            fl.l_len
        );
        self.fcntl(cmd, &mut fl)
    }
}

impl RegionLock for FcntlLock<'_> {
    fn acquire_exclusive(&self, range: ByteRange) -> io::Result<()> {
        self.set(libc::F_SETLKW, libc::F_WRLCK as c_int, range)
    }

    fn acquire_shared(&self, range: ByteRange) -> io::Result<()> {
        self.set(libc::F_SETLKW, libc::F_RDLCK as c_int, range)
    }

    fn release(&self, range: ByteRange) -> io::Result<()> {
        self.set(libc::F_SETLK, libc::F_UNLCK as c_int, range)
    }

    fn supports_test(&self) -> bool {
        true
    }

    fn test(&self, range: ByteRange) -> io::Result<Option<LockHolder>> {
        // Probe with a write lock so both read and write holders conflict.
        let mut fl = flock_for(libc::F_WRLCK as c_int, range)?;
        self.fcntl(libc::F_GETLK, &mut fl)?;

        let kind = if fl.l_type == libc::F_WRLCK as c_short {
            HeldLockKind::Exclusive
        } else if fl.l_type == libc::F_RDLCK as c_short {
            HeldLockKind::Shared
        } else {
            return Ok(None);
        };

        Ok(Some(LockHolder {
            pid: fl.l_pid as i32,
            kind,
            range: ByteRange::new(fl.l_start.max(0) as u64, fl.l_len.max(0) as u64),
        }))
    }
}

fn to_off_t(value: u64, what: &str) -> io::Result<off_t> {
    off_t::try_from(value).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} {} exceeds the largest file offset", what, value),
        )
    })
}

fn flock_for(l_type: c_int, range: ByteRange) -> io::Result<libc::flock> {
    let start = to_off_t(range.offset, "offset")?;
    let len = to_off_t(range.length, "length")?;

    // SAFETY: flock is plain old data and all-zero is valid on every unix;
    // zeroing covers the platform-specific extra fields.
    let mut fl: libc::flock = unsafe { std::mem::zeroed() };
    fl.l_type = l_type as c_short;
    fl.l_whence = libc::SEEK_SET as c_short;
    fl.l_start = start;
    fl.l_len = len;
    Ok(fl)
}
