use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use crate::cmd::open_store;
use crate::output::{OutputFormat, print_json, print_stat, print_success, print_warning};

pub fn cmd_remove(dir: &Path, key: &str, output: OutputFormat) -> Result<()> {
  let mut store = open_store(dir)?;
  let removed = store
    .remove(key)
    .with_context(|| format!("Failed to remove '{}' (use `delete` for unreadable entries)", key))?;

  if output.is_json() {
    return print_json(&json!({ "key": key, "removed": removed.as_deref() }));
  }

  match removed {
    Some(value) => {
      print_success(&format!("Removed '{}'", key));
      print_stat("Value", &value.to_string());
    }
    None => print_warning(&format!("No entry for key '{}'", key)),
  }
  Ok(())
}

pub fn cmd_delete(dir: &Path, key: &str, output: OutputFormat) -> Result<()> {
  let mut store = open_store(dir)?;
  let known = store
    .delete(key)
    .with_context(|| format!("Failed to delete '{}'", key))?;

  if output.is_json() {
    print_json(&json!({ "key": key, "deleted": known }))
  } else {
    if known {
      print_success(&format!("Deleted '{}'", key));
    } else {
      print_warning(&format!("No entry for key '{}'", key));
    }
    Ok(())
  }
}
