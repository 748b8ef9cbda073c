//! Filesystem helpers for the store directory.
//!
//! Each helper maps `std::fs` failures onto the store's error types.
//!
//! Symlinks in the data directory are followed: a link to a regular file is an
//! entry, a dangling link or a link to a directory is not.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::Builder;
use tracing::{debug, warn};

use crate::codec::Codec;
use crate::consts::STAGING_PREFIX;
use crate::error::{CodecError, InitError, Result, StoreError};

/// Creates `path` (and parents) if needed and checks it is a writable directory.
pub(crate) fn ensure_dir(path: &Path) -> Result<(), InitError> {
  fs::create_dir_all(path).map_err(|source| InitError::CreateDir {
    path: path.to_path_buf(),
    source,
  })?;

  let metadata = fs::metadata(path).map_err(|source| InitError::CreateDir {
    path: path.to_path_buf(),
    source,
  })?;

  if !metadata.is_dir() {
    return Err(InitError::NotADirectory(path.to_path_buf()));
  }

  if !is_writable(path, &metadata) {
    return Err(InitError::NotWritable(path.to_path_buf()));
  }

  Ok(())
}

/// Whether this process may create files in `path`, not just whether a write
/// bit is set.
#[cfg(unix)]
fn is_writable(path: &Path, _metadata: &fs::Metadata) -> bool {
  use rustix::fs::{Access, access};

  access(path, Access::WRITE_OK).is_ok()
}

#[cfg(not(unix))]
fn is_writable(_path: &Path, metadata: &fs::Metadata) -> bool {
  !metadata.permissions().readonly()
}

/// Names of the regular files directly inside `dir`.
pub(crate) fn list_file_names(dir: &Path) -> Result<Vec<String>> {
  let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;

  let mut names = Vec::new();
  for entry in entries {
    let entry = entry.map_err(|e| StoreError::io(dir, e))?;
    let file_type = entry.file_type().map_err(|e| StoreError::io(entry.path(), e))?;
    let is_file = if file_type.is_symlink() {
      fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false)
    } else {
      file_type.is_file()
    };
    if !is_file {
      debug!(path = %entry.path().display(), "skipping non-file in data directory");
      continue;
    }

    match entry.file_name().into_string() {
      Ok(name) => names.push(name),
      Err(raw) => warn!(name = ?raw, "skipping entry with non UTF-8 file name"),
    }
  }

  Ok(names)
}

/// Deletes a file. A file that is already gone counts as deleted; one that
/// survives the attempt does not.
pub(crate) fn delete_file(path: &Path) -> Result<()> {
  match fs::remove_file(path) {
    Ok(()) => {}
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(source) => {
      return Err(StoreError::Delete {
        path: path.to_path_buf(),
        source,
      });
    }
  }

  if path.exists() {
    return Err(StoreError::Delete {
      path: path.to_path_buf(),
      source: io::Error::other("file still exists after delete"),
    });
  }

  Ok(())
}

/// Removes staging files left in `dir` by a writer that died before renaming
/// them. Must run under the store lock, while no `put` is in flight.
pub(crate) fn remove_stale_staging(dir: &Path) -> Result<usize> {
  let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;

  let mut removed = 0;
  for entry in entries {
    let entry = entry.map_err(|e| StoreError::io(dir, e))?;
    let is_staging = entry
      .file_name()
      .to_str()
      .is_some_and(|name| name.starts_with(STAGING_PREFIX));
    if !is_staging {
      continue;
    }

    let path = entry.path();
    warn!(path = %path.display(), "removing stale staging file");
    delete_file(&path)?;
    removed += 1;
  }

  Ok(removed)
}

pub(crate) fn delete_dir_all(path: &Path) -> Result<()> {
  match fs::remove_dir_all(path) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(source) => Err(StoreError::Delete {
      path: path.to_path_buf(),
      source,
    }),
  }
}

/// Encodes `value` into a temp file under `staging` and renames it over
/// `target`.
///
/// `staging` must be on the same filesystem as `target`. If encoding fails the
/// temp file is discarded and `target` is untouched.
pub(crate) fn write_entry<V, C>(staging: &Path, target: &Path, key: &str, codec: &C, value: &V) -> Result<()>
where
  C: Codec<V>,
{
  let mut builder = Builder::new();
  builder.prefix(STAGING_PREFIX);
  // Entries get the same umask-governed mode as any other new file.
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    builder.permissions(fs::Permissions::from_mode(0o666));
  }
  let mut tmp = builder.tempfile_in(staging).map_err(|e| StoreError::io(staging, e))?;

  {
    let mut writer = BufWriter::new(tmp.as_file_mut());
    codec.encode(value, &mut writer).map_err(|source| StoreError::Encode {
      key: key.to_string(),
      source,
    })?;
    writer.flush().map_err(|e| StoreError::Encode {
      key: key.to_string(),
      source: CodecError::Io(e),
    })?;
  }

  tmp.persist(target).map_err(|e| StoreError::io(target, e.error))?;
  Ok(())
}

/// Decodes the file at `path`. Returns `None` if the file does not exist.
pub(crate) fn read_entry<V, C>(path: &Path, key: &str, codec: &C) -> Result<Option<V>>
where
  C: Codec<V>,
{
  let file = match File::open(path) {
    Ok(file) => file,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
    Err(e) => return Err(StoreError::io(path, e)),
  };

  let mut reader = BufReader::new(file);
  codec
    .decode(&mut reader)
    .map(Some)
    .map_err(|source| StoreError::Decode {
      key: key.to_string(),
      source,
    })
}
