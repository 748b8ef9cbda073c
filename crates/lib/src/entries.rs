//! Iteration over a store.

use std::collections::btree_set;
use std::iter::FusedIterator;
use std::sync::Arc;

use crate::codec::{Codec, JsonCodec};
use crate::error::{Result, StoreError};
use crate::store::DirStore;

/// Keys of a store in ascending order.
pub struct Keys<'a> {
  inner: btree_set::Iter<'a, String>,
}

impl<'a> Keys<'a> {
  pub(crate) fn new(inner: btree_set::Iter<'a, String>) -> Self {
    Keys { inner }
  }
}

impl<'a> Iterator for Keys<'a> {
  type Item = &'a str;

  fn next(&mut self) -> Option<Self::Item> {
    self.inner.next().map(String::as_str)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    self.inner.size_hint()
  }
}

impl ExactSizeIterator for Keys<'_> {}

impl FusedIterator for Keys<'_> {}

/// Walks every entry of a store, decoding each value when it is reached.
///
/// The iterator holds the store mutably, so the store cannot change under it
/// except through [`remove_current`](Self::remove_current),
/// [`delete_current`](Self::delete_current) and
/// [`replace_current`](Self::replace_current). Keys are visited in ascending
/// order. An entry that disappears from disk before it is reached is skipped.
pub struct Entries<'a, V, C = JsonCodec> {
  store: &'a mut DirStore<V, C>,
  keys: std::vec::IntoIter<String>,
  current: Option<String>,
}

impl<'a, V, C> Entries<'a, V, C>
where
  C: Codec<V>,
{
  pub(crate) fn new(store: &'a mut DirStore<V, C>, keys: Vec<String>) -> Self {
    Entries {
      store,
      keys: keys.into_iter(),
      current: None,
    }
  }

  /// Key of the entry last returned by `next`.
  pub fn current_key(&self) -> Option<&str> {
    self.current.as_deref()
  }

  /// Removes the entry last returned by `next`, with the same effect as
  /// [`DirStore::remove`].
  pub fn remove_current(&mut self) -> Result<Option<Arc<V>>> {
    let key = self.current.take().ok_or(StoreError::NoCurrentEntry)?;
    self.store.remove(&key)
  }

  /// Removes the entry last returned by `next` without decoding it. Useful
  /// when `next` yielded a decode error.
  pub fn delete_current(&mut self) -> Result<bool> {
    let key = self.current.take().ok_or(StoreError::NoCurrentEntry)?;
    self.store.delete(&key)
  }

  /// Overwrites the value of the entry last returned by `next`.
  pub fn replace_current(&mut self, value: V) -> Result<Option<Arc<V>>> {
    let key = self.current.as_deref().ok_or(StoreError::NoCurrentEntry)?;
    self.store.put(key, value)
  }
}

impl<V, C> Iterator for Entries<'_, V, C>
where
  C: Codec<V>,
{
  type Item = Result<(String, Arc<V>)>;

  fn next(&mut self) -> Option<Self::Item> {
    for key in self.keys.by_ref() {
      match self.store.get(&key) {
        Ok(Some(value)) => {
          self.current = Some(key.clone());
          return Some(Ok((key, value)));
        }
        Ok(None) => continue,
        Err(e) => {
          self.current = Some(key);
          return Some(Err(e));
        }
      }
    }
    self.current = None;
    None
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (0, self.keys.size_hint().1)
  }
}
