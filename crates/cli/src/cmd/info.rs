use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use dirmap_lib::consts::LOCK_FILENAME;

use crate::cmd::open_store;
use crate::output::{OutputFormat, format_bytes, print_info, print_json, print_stat};

#[derive(Debug, Serialize)]
struct StoreInfo {
  path: PathBuf,
  data_dir: PathBuf,
  lock_file: PathBuf,
  entries: usize,
  bytes: u64,
}

/// Sums entry file sizes. Entries deleted by another process since the key
/// scan are skipped.
fn entry_bytes<I, K>(data_dir: &Path, keys: I) -> Result<u64>
where
  I: IntoIterator<Item = K>,
  K: AsRef<Path>,
{
  let mut bytes = 0;
  for key in keys {
    let path = data_dir.join(key);
    match fs::metadata(&path) {
      Ok(metadata) => bytes += metadata.len(),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "entry vanished before stat");
      }
      Err(e) => return Err(e).with_context(|| format!("Failed to stat {}", path.display())),
    }
  }
  Ok(bytes)
}

pub fn cmd_info(dir: &Path, output: OutputFormat) -> Result<()> {
  let mut store = open_store(dir)?;
  let entries = store.len().context("Failed to count entries")?;

  let data_dir = store.data_dir().to_path_buf();
  let bytes = entry_bytes(&data_dir, store.keys()?)?;

  let info = StoreInfo {
    path: store.path().to_path_buf(),
    data_dir,
    lock_file: store.path().join(LOCK_FILENAME),
    entries,
    bytes,
  };

  if output.is_json() {
    print_json(&info)
  } else {
    print_info(&format!("Store {}", info.path.display()));
    print_stat("Data", &info.data_dir.display().to_string());
    print_stat("Lock", &info.lock_file.display().to_string());
    print_stat("Entries", &info.entries.to_string());
    print_stat("Size", &format_bytes(info.bytes));
    Ok(())
  }
}
