//! The open data file that all lock requests act on.

use super::PlatformLock;
use super::primitive::RegionLock;
use super::types::{ByteRange, LockHolder};
use crate::error::{RangerError, Result};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// An open, read/write handle on the data file.
///
/// The session owns the handle for its whole lifetime; the file is closed
/// exactly once, when the handle is dropped. Closing any descriptor of the
/// file drops every POSIX record lock this process holds on it.
#[derive(Debug)]
pub struct LockHandle {
    file: File,
    path: PathBuf,
}

impl LockHandle {
    /// Open an existing file for reading and writing. The file is never
    /// created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                RangerError::OpenError(format!("Failed opening '{}' : {}", path.display(), e))
            })?;

        log::info!("opened data file '{}'", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The platform primitive bound to this handle.
    pub fn region_lock(&self) -> PlatformLock<'_> {
        PlatformLock::new(&self.file)
    }
}

impl RegionLock for LockHandle {
    fn acquire_exclusive(&self, range: ByteRange) -> io::Result<()> {
        self.region_lock().acquire_exclusive(range)
    }

    fn acquire_shared(&self, range: ByteRange) -> io::Result<()> {
        self.region_lock().acquire_shared(range)
    }

    fn release(&self, range: ByteRange) -> io::Result<()> {
        self.region_lock().release(range)
    }

    fn supports_test(&self) -> bool {
        self.region_lock().supports_test()
    }

    fn test(&self, range: ByteRange) -> io::Result<Option<LockHolder>> {
        self.region_lock().test(range)
    }
}
