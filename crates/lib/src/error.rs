//! Error types for store operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while opening a store. Opening is all-or-nothing: any of these
/// leaves no usable handle behind.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("cannot create directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("{0} exists but is not a directory")]
  NotADirectory(PathBuf),

  #[error("directory {0} is not writable")]
  NotWritable(PathBuf),

  #[error("cannot open lock file {path}: {source}")]
  OpenLock {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Failures raised by a [`Codec`](crate::codec::Codec).
#[derive(Debug, Error)]
pub enum CodecError {
  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io: {0}")]
  Io(#[from] io::Error),

  #[error("{0}")]
  Other(Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("failed to initialize store: {0}")]
  Init(#[from] InitError),

  #[error("store {0} is already closed")]
  Closed(PathBuf),

  #[error("cannot delete entry {path}: {source}")]
  Delete {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to encode entry '{key}': {source}")]
  Encode {
    key: String,
    #[source]
    source: CodecError,
  },

  #[error("failed to decode entry '{key}': {source}")]
  Decode {
    key: String,
    #[source]
    source: CodecError,
  },

  #[error("invalid key '{0}': keys must be plain file names")]
  InvalidKey(String),

  #[error("no current entry: advance the iterator first")]
  NoCurrentEntry,

  #[error("io error on {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl StoreError {
  pub fn is_init(&self) -> bool {
    matches!(self, StoreError::Init(_))
  }

  pub fn is_closed(&self) -> bool {
    matches!(self, StoreError::Closed(_))
  }

  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    StoreError::Io {
      path: path.into(),
      source,
    }
  }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
