//! Advisory file locking for a store directory.
//!
//! Every operation that touches the data directory runs inside a
//! [`LockGuard`]. The lock is exclusive, whole-file and blocking; it keeps
//! cooperating processes from interleaving, nothing more. A lock that fails to
//! behave is reported through [`Diagnostics`] and the operation goes ahead.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::diagnostics::{Diagnostics, LockAnomaly, LockPhase};
use crate::error::InitError;

/// A blocking, exclusive, process-level lock.
pub trait AdvisoryLock: Send {
  /// Blocks until the lock is held.
  fn acquire(&mut self) -> io::Result<()>;

  fn release(&mut self) -> io::Result<()>;

  /// Location reported in diagnostics.
  fn path(&self) -> &Path;
}

/// The `lock` file in a store directory, used purely as a locking token.
///
/// The file is created if missing and never truncated, read or written.
#[derive(Debug)]
pub struct LockFile {
  file: File,
  path: PathBuf,
}

impl LockFile {
  pub fn open(path: impl Into<PathBuf>) -> Result<Self, InitError> {
    let path = path.into();
    let file = OpenOptions::new()
      .read(true)
      .write(true)
      .create(true)
      .truncate(false)
      .open(&path)
      .map_err(|source| InitError::OpenLock {
        path: path.clone(),
        source,
      })?;

    Ok(LockFile { file, path })
  }
}

impl AdvisoryLock for LockFile {
  fn acquire(&mut self) -> io::Result<()> {
    lock_exclusive(&self.file)
  }

  fn release(&mut self) -> io::Result<()> {
    unlock(&self.file)
  }

  fn path(&self) -> &Path {
    &self.path
  }
}

/// Holds the lock for the duration of one store operation.
///
/// Dropping the guard releases the lock, whether the operation succeeded or
/// not.
pub(crate) struct LockGuard<'a> {
  lock: &'a mut dyn AdvisoryLock,
  diagnostics: &'a dyn Diagnostics,
  held: bool,
}

impl<'a> LockGuard<'a> {
  pub(crate) fn acquire(lock: &'a mut dyn AdvisoryLock, diagnostics: &'a dyn Diagnostics) -> Self {
    trace!(lock = %lock.path().display(), "acquiring store lock");

    let held = match lock.acquire() {
      Ok(()) => true,
      Err(err) => {
        diagnostics.lock_anomaly(&LockAnomaly {
          phase: LockPhase::Acquire,
          lock_path: lock.path().to_path_buf(),
          reason: err.to_string(),
        });
        false
      }
    };

    LockGuard {
      lock,
      diagnostics,
      held,
    }
  }
}

impl Drop for LockGuard<'_> {
  fn drop(&mut self) {
    let reason = if self.held {
      match self.lock.release() {
        Ok(()) => {
          trace!(lock = %self.lock.path().display(), "released store lock");
          return;
        }
        Err(err) => err.to_string(),
      }
    } else {
      "lock was never acquired".to_string()
    };

    self.diagnostics.lock_anomaly(&LockAnomaly {
      phase: LockPhase::Release,
      lock_path: self.lock.path().to_path_buf(),
      reason,
    });
  }
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> io::Result<()> {
  use rustix::fs::{FlockOperation, flock};
  use std::os::unix::io::AsFd;

  flock(file.as_fd(), FlockOperation::LockExclusive).map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))
}

#[cfg(unix)]
fn unlock(file: &File) -> io::Result<()> {
  use rustix::fs::{FlockOperation, flock};
  use std::os::unix::io::AsFd;

  flock(file.as_fd(), FlockOperation::Unlock).map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))
}

#[cfg(windows)]
fn lock_exclusive(file: &File) -> io::Result<()> {
  use std::os::windows::io::AsRawHandle;
  use windows_sys::Win32::Foundation::HANDLE;
  use windows_sys::Win32::Storage::FileSystem::{LOCKFILE_EXCLUSIVE_LOCK, LockFileEx};

  let handle = file.as_raw_handle() as HANDLE;

  // SAFETY: OVERLAPPED is a plain data struct that is valid when zero-initialized.
  // LockFileEx is safe to call with a valid file handle and zeroed OVERLAPPED.
  let result = unsafe {
    let mut overlapped = std::mem::zeroed();
    LockFileEx(handle, LOCKFILE_EXCLUSIVE_LOCK, 0, 1, 0, &mut overlapped)
  };

  if result == 0 {
    Err(io::Error::last_os_error())
  } else {
    Ok(())
  }
}

#[cfg(windows)]
fn unlock(file: &File) -> io::Result<()> {
  use std::os::windows::io::AsRawHandle;
  use windows_sys::Win32::Foundation::HANDLE;
  use windows_sys::Win32::Storage::FileSystem::UnlockFile;

  let handle = file.as_raw_handle() as HANDLE;

  // SAFETY: the handle is owned by `file` and stays valid for this call.
  let result = unsafe { UnlockFile(handle, 0, 0, 1, 0) };

  if result == 0 {
    Err(io::Error::last_os_error())
  } else {
    Ok(())
  }
}

/// A lock whose acquire and release can be made to fail.
#[cfg(test)]
pub(crate) struct FlakyLock {
  pub fail_acquire: bool,
  pub fail_release: bool,
  pub acquired: usize,
  pub released: usize,
  path: PathBuf,
}

#[cfg(test)]
impl FlakyLock {
  pub(crate) fn new(fail_acquire: bool, fail_release: bool) -> Self {
    FlakyLock {
      fail_acquire,
      fail_release,
      acquired: 0,
      released: 0,
      path: PathBuf::from("flaky.lock"),
    }
  }
}

#[cfg(test)]
impl AdvisoryLock for FlakyLock {
  fn acquire(&mut self) -> io::Result<()> {
    if self.fail_acquire {
      return Err(io::Error::other("lock not supported"));
    }
    self.acquired += 1;
    Ok(())
  }

  fn release(&mut self) -> io::Result<()> {
    if self.fail_release {
      return Err(io::Error::other("lock invalidated"));
    }
    self.released += 1;
    Ok(())
  }

  fn path(&self) -> &Path {
    &self.path
  }
}
