//! In-memory index of a store's keys and recently used values.
//!
//! The key set is authoritative once loaded: it mirrors the data directory as
//! it was scanned, and is kept current by the store's own mutations. Decoded
//! values are held separately in a bounded LRU, so a key can be known without
//! its value being resident. A missing value just means the next read goes to
//! disk.

use std::collections::BTreeSet;
use std::collections::btree_set;
use std::sync::Arc;

use hashlink::LruCache;

pub struct IndexCache<V> {
  keys: BTreeSet<String>,
  values: LruCache<String, Arc<V>>,
}

impl<V> IndexCache<V> {
  /// `capacity` bounds the number of live values; 0 disables value caching.
  pub fn new(capacity: usize) -> Self {
    IndexCache {
      keys: BTreeSet::new(),
      values: LruCache::new(capacity),
    }
  }

  /// Records a key whose value has not been loaded.
  pub fn insert_placeholder(&mut self, key: String) {
    self.keys.insert(key);
  }

  /// The live value for `key`, marking it most recently used.
  pub fn live(&mut self, key: &str) -> Option<Arc<V>> {
    self.values.get(key).cloned()
  }

  /// The live value for `key` without touching recency.
  pub fn peek(&self, key: &str) -> Option<Arc<V>> {
    self.values.peek(key).cloned()
  }

  /// Records `key` with a live value, evicting the least recently used value
  /// if the cache is full.
  pub fn store(&mut self, key: &str, value: Arc<V>) {
    if !self.keys.contains(key) {
      self.keys.insert(key.to_string());
    }
    if self.values.capacity() > 0 {
      self.values.insert(key.to_string(), value);
    }
  }

  /// Forgets `key` entirely, returning its live value if there was one.
  pub fn remove(&mut self, key: &str) -> Option<Arc<V>> {
    self.keys.remove(key);
    self.values.remove(key)
  }

  /// Drops the live value for `key` but keeps the key.
  pub fn evict(&mut self, key: &str) -> bool {
    self.values.remove(key).is_some()
  }

  pub fn evict_all(&mut self) {
    self.values.clear();
  }

  pub fn clear(&mut self) {
    self.keys.clear();
    self.values.clear();
  }

  pub fn contains(&self, key: &str) -> bool {
    self.keys.contains(key)
  }

  pub fn len(&self) -> usize {
    self.keys.len()
  }

  pub fn is_empty(&self) -> bool {
    self.keys.is_empty()
  }

  /// Keys in ascending order.
  pub fn keys(&self) -> btree_set::Iter<'_, String> {
    self.keys.iter()
  }

  pub fn capacity(&self) -> usize {
    self.values.capacity()
  }

  /// Number of values currently resident.
  pub fn cached_len(&self) -> usize {
    self.values.len()
  }
}
