use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use crate::cmd::open_store;
use crate::output::{OutputFormat, print_json, print_success};

pub fn cmd_clear(dir: &Path, output: OutputFormat) -> Result<()> {
  let mut store = open_store(dir)?;
  let count = store.len().context("Failed to count entries")?;
  store.clear().context("Failed to clear store")?;

  if output.is_json() {
    print_json(&json!({ "cleared": count }))
  } else {
    print_success(&format!("Cleared {} entries", count));
    Ok(())
  }
}
