mod cmd;
mod output;
mod paths;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{cmd_clear, cmd_delete, cmd_dump, cmd_get, cmd_info, cmd_keys, cmd_put, cmd_remove, cmd_size};
use crate::output::{OutputFormat, print_error};
use crate::paths::default_store_dir;

/// dirmap - inspect and edit a directory-backed key-value store
#[derive(Parser)]
#[command(name = "dirmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Store directory (default: platform data directory)
  #[arg(short, long, global = true, env = "DIRMAP_DIR")]
  dir: Option<PathBuf>,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the value stored under a key
  Get { key: String },

  /// Store a JSON value under a key
  Put {
    key: String,
    /// Value as JSON, e.g. '{"name":"Alice"}' or '"plain text"'
    value: String,
  },

  /// Remove an entry and print its value
  Remove { key: String },

  /// Remove an entry without reading it
  Delete { key: String },

  /// List all keys
  Keys,

  /// Print the number of entries
  Size,

  /// Print every entry
  Dump,

  /// Remove all entries
  Clear,

  /// Show store location and usage
  Info,
}

fn init_logging(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  let dir = cli
    .dir
    .or_else(default_store_dir)
    .context("Cannot determine a store directory; pass --dir or set DIRMAP_DIR")?;
  let output = cli.output;

  match cli.command {
    Commands::Get { key } => cmd_get(&dir, &key, output),
    Commands::Put { key, value } => cmd_put(&dir, &key, &value, output),
    Commands::Remove { key } => cmd_remove(&dir, &key, output),
    Commands::Delete { key } => cmd_delete(&dir, &key, output),
    Commands::Keys => cmd_keys(&dir, output),
    Commands::Size => cmd_size(&dir, output),
    Commands::Dump => cmd_dump(&dir, output),
    Commands::Clear => cmd_clear(&dir, output),
    Commands::Info => cmd_info(&dir, output),
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
