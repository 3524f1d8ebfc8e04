//! A skiplist shared between threads.

use std::{
    borrow::Borrow,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use parking_lot::RwLock;

use crate::{
    config::Config,
    error::Result,
    level_generator::{CoinFlip, LevelGenerator},
    skiplist::SkipList,
    snapshot::LoadReport,
};

// ////////////////////////////////////////////////////////////////////////////
// Store
// ////////////////////////////////////////////////////////////////////////////

/// A [`SkipList`] guarded by its own reader-writer lock, plus the location of
/// its snapshot file.
///
/// Inserts and deletes take the lock exclusively for the whole traversal and
/// splice, so at most one mutation runs at a time. Searches and size queries
/// take it shared, so they never observe a half-linked node. Each store owns
/// its lock; separate stores never contend.
///
/// # Examples
///
/// ```
/// use skipkv::{Config, Store};
///
/// let store = Store::open(Config::new().max_level(6))?;
/// assert!(store.insert(9, "e".to_owned()));
/// assert_eq!(store.search(&9).as_deref(), Some("e"));
/// assert_eq!(store.search(&18), None);
/// # Ok::<(), skipkv::Error>(())
/// ```
pub struct Store<K, V, G = CoinFlip> {
    list: RwLock<SkipList<K, V, G>>,
    snapshot_path: PathBuf,
}

impl<K: Ord, V> Store<K, V> {
    /// Opens an empty store with the given configuration.
    ///
    /// The snapshot file is not read; call [`load`][Store::load] for that.
    ///
    /// # Errors
    ///
    /// Fails if the configured maximum level is out of range.
    pub fn open(config: Config) -> Result<Self> {
        let list = SkipList::new(config.get_max_level())?;
        log::debug!(
            "Opened store, max level = {}, snapshot = {}",
            config.get_max_level(),
            config.get_snapshot_path().display()
        );
        Ok(Store {
            list: RwLock::new(list),
            snapshot_path: config.get_snapshot_path().to_path_buf(),
        })
    }

    /// Opens an empty store with the given maximum level and the default
    /// snapshot location.
    ///
    /// # Errors
    ///
    /// Fails if `max_level` is out of range.
    pub fn new(max_level: usize) -> Result<Self> {
        Self::open(Config::new().max_level(max_level))
    }
}

impl<K, V, G> Store<K, V, G>
where
    K: Ord,
    G: LevelGenerator,
{
    /// Opens an empty store drawing node levels from `level_generator`.
    pub fn with_level_generator<P: Into<PathBuf>>(level_generator: G, snapshot_path: P) -> Self {
        Store {
            list: RwLock::new(SkipList::with_level_generator(level_generator)),
            snapshot_path: snapshot_path.into(),
        }
    }

    /// Inserts the pair unless the key is already present.
    ///
    /// Returns `false`, and leaves the stored value untouched, for a
    /// duplicate key.
    pub fn insert(&self, key: K, value: V) -> bool
    where
        K: fmt::Debug,
    {
        let label = log::log_enabled!(log::Level::Debug).then(|| format!("{key:?}"));
        let inserted = self.list.write().insert(key, value);
        if let Some(label) = label {
            if inserted {
                log::debug!("Inserted key: {label}");
            } else {
                log::debug!("Rejected key: {label}, already exists");
            }
        }
        inserted
    }

    /// Returns a copy of the value stored under `key`.
    pub fn search<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + fmt::Debug + ?Sized,
        V: Clone,
    {
        let found = self.list.read().search(key).cloned();
        if found.is_some() {
            log::debug!("Found key: {key:?}");
        } else {
            log::debug!("Not found key: {key:?}");
        }
        found
    }

    /// Returns `true` if the store holds an entry for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.list.read().contains_key(key)
    }

    /// Removes the entry stored under `key`.
    ///
    /// Returns `false` if there was none.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + fmt::Debug + ?Sized,
    {
        let deleted = self.list.write().delete(key);
        if deleted {
            log::debug!("Deleted key: {key:?}");
        } else {
            log::debug!("Nothing to delete for key: {key:?}");
        }
        deleted
    }

    /// Merges the snapshot file into the store.
    ///
    /// # Errors
    ///
    /// Fails if the snapshot file cannot be opened or read.
    pub fn load(&self) -> Result<LoadReport>
    where
        K: FromStr,
        V: FromStr,
    {
        Ok(self.list.write().load_file(&self.snapshot_path)?)
    }
}

impl<K, V, G> Store<K, V, G> {
    /// Number of entries.
    pub fn size(&self) -> usize {
        self.list.read().len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.list.read().is_empty()
    }

    /// Highest level currently populated by an entry.
    pub fn height(&self) -> usize {
        self.list.read().height()
    }

    /// Where [`dump`][Store::dump] and [`load`][Store::load] go.
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Runs `f` against the skiplist while holding the shared lock.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipkv::Store;
    ///
    /// let store = Store::new(6)?;
    /// store.insert(2, 'b');
    /// store.insert(1, 'a');
    ///
    /// let keys: Vec<i32> = store.read(|list| list.keys().copied().collect());
    /// assert_eq!(keys, vec![1, 2]);
    /// # Ok::<(), skipkv::Error>(())
    /// ```
    pub fn read<R>(&self, f: impl FnOnce(&SkipList<K, V, G>) -> R) -> R {
        f(&self.list.read())
    }

    /// Consumes the store, returning the skiplist.
    pub fn into_inner(self) -> SkipList<K, V, G> {
        self.list.into_inner()
    }
}

impl<K, V, G> Store<K, V, G>
where
    K: fmt::Display,
    V: fmt::Display,
{
    /// Renders every populated level, highest first, as `[key:value]`
    /// entries.
    pub fn display(&self) -> String {
        self.list.read().to_string()
    }

    /// Writes the store to its snapshot file, returning the number of
    /// records written.
    ///
    /// # Errors
    ///
    /// Fails if the snapshot file cannot be created or written.
    pub fn dump(&self) -> Result<usize> {
        Ok(self.list.read().dump_file(&self.snapshot_path)?)
    }
}

impl<K, V, G> fmt::Debug for Store<K, V, G>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("list", &*self.list.read())
            .field("snapshot_path", &self.snapshot_path)
            .finish()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////
