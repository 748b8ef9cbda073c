//! dirmap-lib: a key-value store backed by a directory.
//!
//! Each key is a file in `<dir>/data`, each value is that file's content as
//! encoded by a [`Codec`] (JSON by default). Reads go through a bounded cache
//! of decoded values; the key set is loaded lazily on first use. Every
//! operation that touches the directory holds an advisory lock on
//! `<dir>/lock`, so several processes can share one store.
//!
//! ```no_run
//! use dirmap_lib::DirStore;
//!
//! # fn main() -> dirmap_lib::Result<()> {
//! let mut store: DirStore<Vec<u32>> = DirStore::open("/tmp/primes")?;
//! store.put("small", vec![2, 3, 5, 7])?;
//! assert_eq!(store.get("small")?.as_deref(), Some(&vec![2, 3, 5, 7]));
//! store.close();
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod codec;
pub mod consts;
pub mod diagnostics;
pub mod entries;
pub mod error;
mod fsops;
pub mod lock;
pub mod options;
pub mod store;

pub use codec::{Codec, JsonCodec};
pub use diagnostics::{Diagnostics, LockAnomaly, LockPhase, RecordingDiagnostics, TracingDiagnostics};
pub use entries::{Entries, Keys};
pub use error::{CodecError, InitError, Result, StoreError};
pub use options::StoreOptions;
pub use store::DirStore;
