mod clear;
mod get;
mod info;
mod list;
mod put;
mod remove;

use std::path::Path;

use anyhow::{Context, Result};
use dirmap_lib::DirStore;
use serde_json::Value;

pub use clear::cmd_clear;
pub use get::cmd_get;
pub use info::cmd_info;
pub use list::{cmd_dump, cmd_keys, cmd_size};
pub use put::cmd_put;
pub use remove::{cmd_delete, cmd_remove};

/// Stores opened by the CLI hold arbitrary JSON documents.
pub type JsonStore = DirStore<Value>;

pub fn open_store(dir: &Path) -> Result<JsonStore> {
  DirStore::open(dir).with_context(|| format!("Failed to open store at {}", dir.display()))
}
