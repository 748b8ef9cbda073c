//! Shared helpers for store integration tests.

use std::path::{Path, PathBuf};

use dirmap_lib::{DirStore, JsonCodec, StoreOptions};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
  pub name: String,
  pub age: u32,
}

pub fn person(name: &str, age: u32) -> Person {
  Person {
    name: name.to_string(),
    age,
  }
}

pub fn open_at(path: &Path) -> DirStore<Person> {
  DirStore::open_with(path, StoreOptions::default(), JsonCodec::new()).unwrap()
}

/// A temp directory that outlives the stores opened on it.
pub struct TestDir {
  pub temp: TempDir,
}

impl TestDir {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn store_path(&self) -> PathBuf {
    self.temp.path().join("store")
  }

  pub fn open(&self) -> DirStore<Person> {
    open_at(&self.store_path())
  }

  /// File names in `<store>/data`, sorted.
  pub fn data_files(&self) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(self.store_path().join("data"))
      .unwrap()
      .map(|e| e.unwrap().file_name().into_string().unwrap())
      .collect();
    names.sort();
    names
  }
}
