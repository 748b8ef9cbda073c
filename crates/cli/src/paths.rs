//! Default store location.

use std::path::PathBuf;

const APP_NAME: &str = "dirmap";

/// Platform data directory for the default store, if one can be determined.
#[cfg(windows)]
pub fn default_store_dir() -> Option<PathBuf> {
  std::env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(APP_NAME))
}

/// Platform data directory for the default store, if one can be determined.
#[cfg(not(windows))]
pub fn default_store_dir() -> Option<PathBuf> {
  let data_home = match std::env::var_os("XDG_DATA_HOME") {
    Some(dir) if !dir.is_empty() => PathBuf::from(dir),
    _ => PathBuf::from(std::env::var_os("HOME")?).join(".local").join("share"),
  };
  Some(data_home.join(APP_NAME))
}
