//! Crate-level error type.

use thiserror::Error;

use crate::{level_generator::LevelGeneratorError, snapshot::SnapshotError};

/// Any failure surfaced by a [`Store`][crate::Store].
///
/// Duplicate keys and missing keys are ordinary outcomes, reported through
/// `bool` and `Option` returns rather than through this type.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The configured level generator could not be built.
    #[error(transparent)]
    LevelGenerator(#[from] LevelGeneratorError),
    /// A snapshot could not be written or read.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Result alias for fallible [`Store`][crate::Store] operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
