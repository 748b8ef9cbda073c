//! Names and defaults shared across the crate.

/// Name of the lock token file inside the store directory.
pub const LOCK_FILENAME: &str = "lock";

/// Name of the subdirectory holding one file per entry.
pub const DATA_DIRNAME: &str = "data";

/// Number of decoded values kept live by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Overrides the cache capacity when options are read from the environment.
pub const CACHE_CAPACITY_ENV: &str = "DIRMAP_CACHE_CAPACITY";

/// Prefix of the staging files `put` writes next to the lock before renaming
/// them into `data/`.
pub const STAGING_PREFIX: &str = ".dirmap-staging-";
