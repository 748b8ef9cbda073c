use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::json;

use crate::cmd::open_store;
use crate::output::{OutputFormat, print_json};

pub fn cmd_get(dir: &Path, key: &str, output: OutputFormat) -> Result<()> {
  let mut store = open_store(dir)?;

  let Some(value) = store.get(key).with_context(|| format!("Failed to read '{}'", key))? else {
    bail!("No entry for key '{}'", key);
  };

  if output.is_json() {
    print_json(&json!({ "key": key, "value": &*value }))
  } else {
    print_json(&*value)
  }
}
