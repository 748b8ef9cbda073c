//! The directory-backed store.
//!
//! # Layout
//!
//! ```text
//! <dir>/
//! ├── lock          # locking token, never read
//! └── data/
//!     ├── <key-1>   # one file per entry, content is the encoded value
//!     └── <key-2>
//! ```
//!
//! There is no manifest: the listing of `data/` is the index. It is scanned
//! once, on the first operation after opening, and kept current by the
//! store's own mutations from then on.
//!
//! A `DirStore` is not meant to be shared between threads, and two stores in
//! one process must not point at the same directory. Separate processes may
//! share a directory; each operation holds the directory's advisory lock for
//! its duration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cache::IndexCache;
use crate::codec::{Codec, JsonCodec};
use crate::consts::{DATA_DIRNAME, LOCK_FILENAME};
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::entries::{Entries, Keys};
use crate::error::{InitError, Result, StoreError};
use crate::fsops;
use crate::lock::{AdvisoryLock, LockFile, LockGuard};
use crate::options::StoreOptions;

pub struct DirStore<V, C = JsonCodec> {
  dir: PathBuf,
  data_dir: PathBuf,
  /// `None` once closed.
  lock: Option<Box<dyn AdvisoryLock>>,
  diagnostics: Arc<dyn Diagnostics>,
  codec: C,
  cache: IndexCache<V>,
  inited: bool,
}

impl<V> DirStore<V, JsonCodec>
where
  V: Serialize + DeserializeOwned,
{
  /// Opens a JSON store at `dir`, creating it if needed. Options are read from
  /// the environment.
  pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
    Self::open_with(dir, StoreOptions::from_env(), JsonCodec::new())
  }

  /// Opens a JSON store and writes `entries` into it.
  pub fn open_with_entries<I, K>(dir: impl AsRef<Path>, entries: I) -> Result<Self>
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
  {
    let mut store = Self::open(dir)?;
    store.put_all(entries)?;
    Ok(store)
  }
}

impl<V, C> DirStore<V, C>
where
  C: Codec<V>,
{
  pub fn open_with(dir: impl AsRef<Path>, options: StoreOptions, codec: C) -> Result<Self> {
    Self::open_with_diagnostics(dir, options, codec, Arc::new(TracingDiagnostics))
  }

  /// Like [`open_with`](Self::open_with), reporting lock anomalies to
  /// `diagnostics` instead of the log.
  pub fn open_with_diagnostics(
    dir: impl AsRef<Path>,
    options: StoreOptions,
    codec: C,
    diagnostics: Arc<dyn Diagnostics>,
  ) -> Result<Self> {
    let requested = dir.as_ref();
    fsops::ensure_dir(requested)?;
    let dir = dunce::canonicalize(requested).map_err(|source| InitError::CreateDir {
      path: requested.to_path_buf(),
      source,
    })?;

    let mut lock = LockFile::open(dir.join(LOCK_FILENAME))?;
    let data_dir = dir.join(DATA_DIRNAME);
    {
      let _guard = LockGuard::acquire(&mut lock, diagnostics.as_ref());
      fsops::ensure_dir(&data_dir)?;
      fsops::remove_stale_staging(&dir)?;
    }

    debug!(dir = %dir.display(), cache_capacity = options.cache_capacity, "opened store");

    Ok(DirStore {
      dir,
      data_dir,
      lock: Some(Box::new(lock)),
      diagnostics,
      codec,
      cache: IndexCache::new(options.cache_capacity),
      inited: false,
    })
  }

  /// Scans the data directory the first time it is needed.
  fn init(&mut self) -> Result<()> {
    if self.inited {
      return Ok(());
    }

    let lock = self.lock.as_mut().ok_or_else(|| StoreError::Closed(self.dir.clone()))?;
    let names = {
      let _guard = LockGuard::acquire(&mut **lock, self.diagnostics.as_ref());
      fsops::list_file_names(&self.data_dir)?
    };

    for name in names {
      self.cache.insert_placeholder(name);
    }
    self.inited = true;

    debug!(dir = %self.dir.display(), keys = self.cache.len(), "indexed store");
    Ok(())
  }

  /// The value for `key`, decoded from disk if it is not cached.
  pub fn get(&mut self, key: &str) -> Result<Option<Arc<V>>> {
    self.init()?;

    if let Some(value) = self.cache.live(key) {
      return Ok(Some(value));
    }
    if !self.cache.contains(key) {
      return Ok(None);
    }

    let path = self.data_dir.join(key);
    let lock = self.lock.as_mut().ok_or_else(|| StoreError::Closed(self.dir.clone()))?;
    let decoded = {
      let _guard = LockGuard::acquire(&mut **lock, self.diagnostics.as_ref());
      fsops::read_entry(&path, key, &self.codec)?
    };

    match decoded {
      Some(value) => {
        let value = Arc::new(value);
        self.cache.store(key, Arc::clone(&value));
        Ok(Some(value))
      }
      None => {
        debug!(key = %key, "entry vanished from disk, dropping stale key");
        self.cache.remove(key);
        Ok(None)
      }
    }
  }

  /// Writes `value` under `key`, replacing any existing entry.
  ///
  /// Returns the previous value only if it was still cached. A previous value
  /// that had been evicted is not read back from disk, so `None` does not prove
  /// the key was new.
  pub fn put(&mut self, key: &str, value: V) -> Result<Option<Arc<V>>> {
    validate_key(key)?;
    self.init()?;

    let previous = self.cache.peek(key);
    let target = self.data_dir.join(key);
    let lock = self.lock.as_mut().ok_or_else(|| StoreError::Closed(self.dir.clone()))?;
    {
      let _guard = LockGuard::acquire(&mut **lock, self.diagnostics.as_ref());
      fsops::write_entry(&self.dir, &target, key, &self.codec, &value)?;
    }

    self.cache.store(key, Arc::new(value));
    debug!(key = %key, replaced = previous.is_some(), "put entry");
    Ok(previous)
  }

  /// Puts every pair in order, stopping at the first failure.
  pub fn put_all<I, K>(&mut self, entries: I) -> Result<()>
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
  {
    for (key, value) in entries {
      self.put(key.as_ref(), value)?;
    }
    Ok(())
  }

  /// Deletes the entry for `key` and returns its value.
  ///
  /// An entry whose value is not cached is decoded before the file is
  /// deleted, so an existing key always yields its value. If decoding fails
  /// nothing is deleted; use [`delete`](Self::delete) for entries that cannot
  /// be decoded.
  pub fn remove(&mut self, key: &str) -> Result<Option<Arc<V>>> {
    validate_key(key)?;
    self.init()?;

    let path = self.data_dir.join(key);
    let known = self.cache.contains(key);
    let cached = self.cache.peek(key);
    let lock = self.lock.as_mut().ok_or_else(|| StoreError::Closed(self.dir.clone()))?;
    let removed = {
      let _guard = LockGuard::acquire(&mut **lock, self.diagnostics.as_ref());
      let removed = match cached {
        Some(value) => Some(value),
        None if known => fsops::read_entry(&path, key, &self.codec)?.map(Arc::new),
        None => None,
      };
      fsops::delete_file(&path)?;
      removed
    };

    self.cache.remove(key);
    debug!(key = %key, found = removed.is_some(), "removed entry");
    Ok(removed)
  }

  /// Deletes the entry for `key` without decoding it. Returns whether the key
  /// was known.
  pub fn delete(&mut self, key: &str) -> Result<bool> {
    validate_key(key)?;
    self.init()?;

    let path = self.data_dir.join(key);
    let lock = self.lock.as_mut().ok_or_else(|| StoreError::Closed(self.dir.clone()))?;
    {
      let _guard = LockGuard::acquire(&mut **lock, self.diagnostics.as_ref());
      fsops::delete_file(&path)?;
    }

    let known = self.cache.contains(key);
    self.cache.remove(key);
    debug!(key = %key, known, "deleted entry");
    Ok(known)
  }

  /// Deletes every entry. The data directory is removed and recreated empty.
  pub fn clear(&mut self) -> Result<()> {
    self.init()?;

    let lock = self.lock.as_mut().ok_or_else(|| StoreError::Closed(self.dir.clone()))?;
    let result = {
      let _guard = LockGuard::acquire(&mut **lock, self.diagnostics.as_ref());
      let result = fsops::delete_dir_all(&self.data_dir);
      self.cache.clear();
      result.and_then(|()| fsops::ensure_dir(&self.data_dir).map_err(StoreError::from))
    };

    if result.is_err() {
      // Part of the directory may survive; rescan on next use.
      self.inited = false;
    }
    debug!(dir = %self.dir.display(), ok = result.is_ok(), "cleared store");
    result
  }

  pub fn keys(&mut self) -> Result<Keys<'_>> {
    self.init()?;
    Ok(Keys::new(self.cache.keys()))
  }

  pub fn len(&mut self) -> Result<usize> {
    self.init()?;
    Ok(self.cache.len())
  }

  pub fn is_empty(&mut self) -> Result<bool> {
    Ok(self.len()? == 0)
  }

  pub fn contains_key(&mut self, key: &str) -> Result<bool> {
    self.init()?;
    Ok(self.cache.contains(key))
  }

  /// Iterates over all entries, decoding values as they are reached.
  pub fn entries(&mut self) -> Result<Entries<'_, V, C>> {
    self.init()?;
    let keys = self.cache.keys().cloned().collect();
    Ok(Entries::new(self, keys))
  }

  /// Forgets everything cached and rescans the data directory, picking up
  /// entries written by other processes.
  pub fn refresh(&mut self) -> Result<()> {
    if self.is_closed() {
      return Err(StoreError::Closed(self.dir.clone()));
    }
    self.cache.clear();
    self.inited = false;
    self.init()
  }

  /// Drops the cached value for `key`; the next read decodes it again.
  pub fn evict(&mut self, key: &str) -> bool {
    self.cache.evict(key)
  }

  pub fn evict_all(&mut self) {
    self.cache.evict_all();
  }

  /// Number of decoded values currently held in memory.
  pub fn cached_len(&self) -> usize {
    self.cache.cached_len()
  }

  /// Releases the lock file. Every later operation fails with
  /// [`StoreError::Closed`]. Closing twice is harmless.
  pub fn close(&mut self) {
    if self.lock.take().is_some() {
      debug!(dir = %self.dir.display(), "closed store");
    }
    self.inited = false;
    self.cache.clear();
  }

  pub fn is_closed(&self) -> bool {
    self.lock.is_none()
  }

  /// The store directory, canonicalized.
  pub fn path(&self) -> &Path {
    &self.dir
  }

  pub fn data_dir(&self) -> &Path {
    &self.data_dir
  }

  #[cfg(test)]
  pub(crate) fn replace_lock(&mut self, lock: Box<dyn AdvisoryLock>) {
    self.lock = Some(lock);
  }
}

impl<V, C> fmt::Display for DirStore<V, C> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "DirStore[{}]", self.dir.display())
  }
}

impl<V, C> fmt::Debug for DirStore<V, C> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DirStore")
      .field("dir", &self.dir)
      .field("closed", &self.lock.is_none())
      .field("inited", &self.inited)
      .field("keys", &self.cache.len())
      .field("cached", &self.cache.cached_len())
      .finish()
  }
}

/// Keys become file names, so they must name a single path component.
fn validate_key(key: &str) -> Result<()> {
  let invalid = key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\', '\0']);
  if invalid {
    return Err(StoreError::InvalidKey(key.to_string()));
  }
  Ok(())
}
