//! Store configuration.

use tracing::warn;

use crate::consts::{CACHE_CAPACITY_ENV, DEFAULT_CACHE_CAPACITY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
  /// Maximum number of decoded values kept in memory. Keys are always kept.
  pub cache_capacity: usize,
}

impl Default for StoreOptions {
  fn default() -> Self {
    StoreOptions {
      cache_capacity: DEFAULT_CACHE_CAPACITY,
    }
  }
}

impl StoreOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cache_capacity(mut self, capacity: usize) -> Self {
    self.cache_capacity = capacity;
    self
  }

  /// Defaults, overridden by `DIRMAP_CACHE_CAPACITY` when it holds a valid
  /// number.
  pub fn from_env() -> Self {
    let mut options = Self::default();

    if let Ok(raw) = std::env::var(CACHE_CAPACITY_ENV) {
      match raw.trim().parse::<usize>() {
        Ok(capacity) => options.cache_capacity = capacity,
        Err(e) => warn!(var = CACHE_CAPACITY_ENV, value = %raw, error = %e, "ignoring invalid cache capacity"),
      }
    }

    options
  }
}
