use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tracing::warn;

use crate::cmd::open_store;
use crate::output::{OutputFormat, print_json, print_stat, print_success};

pub fn cmd_put(dir: &Path, key: &str, raw: &str, output: OutputFormat) -> Result<()> {
  let value: Value = serde_json::from_str(raw).with_context(|| format!("Value for '{}' is not valid JSON", key))?;

  let mut store = open_store(dir)?;

  // A fresh process has nothing cached, so load the old value to report it.
  if let Err(e) = store.get(key) {
    warn!(key = %key, error = %e, "existing value could not be read");
  }

  let previous = store
    .put(key, value)
    .with_context(|| format!("Failed to store '{}'", key))?;

  if output.is_json() {
    print_json(&json!({
      "key": key,
      "replaced": previous.is_some(),
      "previous": previous.as_deref(),
    }))?;
  } else {
    print_success(&format!("Stored '{}'", key));
    if let Some(previous) = previous {
      print_stat("Previous", &previous.to_string());
    }
  }

  Ok(())
}
