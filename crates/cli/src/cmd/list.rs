use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, json};

use crate::cmd::open_store;
use crate::output::{OutputFormat, print_json};

pub fn cmd_keys(dir: &Path, output: OutputFormat) -> Result<()> {
  let mut store = open_store(dir)?;
  let keys: Vec<&str> = store.keys().context("Failed to list keys")?.collect();

  if output.is_json() {
    print_json(&keys)
  } else {
    for key in keys {
      println!("{}", key);
    }
    Ok(())
  }
}

pub fn cmd_size(dir: &Path, output: OutputFormat) -> Result<()> {
  let mut store = open_store(dir)?;
  let size = store.len().context("Failed to count entries")?;

  if output.is_json() {
    print_json(&json!({ "size": size }))
  } else {
    println!("{}", size);
    Ok(())
  }
}

pub fn cmd_dump(dir: &Path, output: OutputFormat) -> Result<()> {
  let mut store = open_store(dir)?;
  let mut all = Map::new();

  for entry in store.entries().context("Failed to list entries")? {
    let (key, value) = entry.context("Failed to read entry")?;
    if output.is_json() {
      all.insert(key, (*value).clone());
    } else {
      println!("{}\t{}", key, value);
    }
  }

  if output.is_json() {
    print_json(&all)?;
  }
  Ok(())
}
