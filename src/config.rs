//! Configuration for a [`Store`][crate::Store].

use std::path::{Path, PathBuf};

use crate::level_generator::DEFAULT_MAX_LEVEL;

/// Default location of the snapshot file, relative to the working directory.
pub const DEFAULT_SNAPSHOT_PATH: &str = "store/dumpfile";

/// Settings used when opening a [`Store`][crate::Store].
///
/// # Examples
///
/// ```
/// use skipkv::Config;
///
/// let config = Config::new().max_level(6).snapshot_path("/tmp/kv/dumpfile");
/// assert_eq!(config.get_max_level(), 6);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Highest level any node may reach. Fixed once the store is opened.
    max_level: usize,
    /// Where [`Store::dump`][crate::Store::dump] writes and
    /// [`Store::load`][crate::Store::load] reads.
    snapshot_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_level: DEFAULT_MAX_LEVEL,
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
        }
    }
}

impl Config {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the highest level any node may reach.
    ///
    /// Choose it large enough for the expected collection size: with `n`
    /// entries, about `log2(n)` levels keep searches logarithmic.
    #[must_use]
    pub fn max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    /// Sets the snapshot file location.
    #[must_use]
    pub fn snapshot_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.snapshot_path = path.into();
        self
    }

    /// The configured maximum level.
    pub fn get_max_level(&self) -> usize {
        self.max_level
    }

    /// The configured snapshot file location.
    pub fn get_snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }
}
