//! An in-memory ordered key-value engine built on a skiplist, with plain-text
//! snapshots.
//!
//! A skiplist is a way of storing elements in such a way that elements can be
//! efficiently accessed, inserted and removed, all in `O(log(n))` on average.
//!
//! Conceptually, a skiplist resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! where each node `[x]` has references to nodes further down the list,
//! allowing the algorithm to effectively skip ahead. Every lookup starts at
//! the head on the highest populated level, moves right while the next key is
//! smaller than the target, and drops a level whenever it cannot.
//!
//! [`SkipList`] is the single-threaded engine. [`Store`] wraps one behind a
//! reader-writer lock so it can be shared between threads, and knows where its
//! snapshot file lives.
//!
//! ```
//! use skipkv::{Config, Store};
//!
//! let dir = tempfile::tempdir()?;
//! let store = Store::open(Config::new().max_level(6).snapshot_path(dir.path().join("dumpfile")))?;
//!
//! for (key, value) in [(1, "a"), (3, "b"), (7, "c")] {
//!     assert!(store.insert(key, value.to_owned()));
//! }
//! assert!(!store.insert(7, "again".to_owned()));
//! assert!(store.delete(&3));
//! assert_eq!(store.dump()?, 2);
//!
//! let restored: Store<u32, String> =
//!     Store::open(Config::new().max_level(6).snapshot_path(dir.path().join("dumpfile")))?;
//! restored.load()?;
//! assert_eq!(restored.search(&7).as_deref(), Some("c"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The key type only needs a total order (`Ord`); values are opaque and are
//! never compared. Inserting a key that is already present is rejected rather
//! than treated as an update.
//!
//! The crate reports through the [`log`](https://docs.rs/log) facade and never
//! installs a logger itself.

mod config;
mod error;
pub mod level_generator;
mod node;
mod skiplist;
mod snapshot;
mod store;

pub use config::{Config, DEFAULT_SNAPSHOT_PATH};
pub use error::{Error, Result};
pub use skiplist::{Iter, Keys, SkipList, Values};
pub use snapshot::{DELIMITER, LoadReport, SnapshotError};
pub use store::Store;
