//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the store.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Store path (isolated per test).
  pub fn store_path(&self) -> PathBuf {
    let p = self.temp.path().join("store");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Path of the file backing `key`.
  pub fn entry_path(&self, key: &str) -> PathBuf {
    self.store_path().join("data").join(key)
  }

  /// Get a pre-configured Command for the dirmap binary.
  ///
  /// Sets `DIRMAP_DIR` to the isolated store and clears `RUST_LOG` so log
  /// output does not leak into assertions.
  pub fn dirmap_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("dirmap");
    cmd.env("DIRMAP_DIR", self.store_path());
    cmd.env_remove("RUST_LOG");
    cmd
  }

  /// Runs `put` and asserts success.
  pub fn put(&self, key: &str, json: &str) {
    self.dirmap_cmd().args(["put", key, json]).assert().success();
  }
}
