//! Skiplists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level $n > 0$ will contain a random subset of the nodes on level `n - 1`.
//!
//! The engine defaults to [`CoinFlip`], which promotes a node one level at a
//! time for as long as a fair coin keeps landing heads. A [`Geometric`]
//! generator with a tunable promotion probability is available for callers
//! who want sparser or denser upper levels.
//!
//! It is very unlikely that this will need to be changed as the default should
//! suffice, but if need be custom level generators can be implemented.

pub mod coin_flip;
pub mod geometric;

use thiserror::Error;

pub use coin_flip::CoinFlip;
pub use geometric::Geometric;

/// Maximum level used when none is configured.
///
/// Sixteen levels keep the expected search cost logarithmic for collections
/// up to tens of thousands of entries.
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// Highest `max_level` accepted by the bundled generators.
///
/// A skiplist with 64 levels comfortably indexes more entries than can be
/// addressed in memory, so anything above this is a configuration mistake.
pub const MAX_LEVEL_LIMIT: usize = 63;

// ////////////////////////////////////////////////////////////////////////////
// Level Generator
// ////////////////////////////////////////////////////////////////////////////

/// Upon the insertion of a new node in the list, the node is replicated to high
/// levels with a certain probability as determined by a [`LevelGenerator`].
pub trait LevelGenerator {
    /// The highest level this generator will ever produce.
    ///
    /// The skiplist sizes its head sentinel to `max_level + 1` links.
    #[must_use]
    fn max_level(&self) -> usize;

    /// Generate a random level for a new node in the range `[0, max_level]`.
    ///
    /// This function should _never_ return a level greater than
    /// [`max_level`][LevelGenerator::max_level].
    #[must_use]
    fn level(&mut self) -> usize;
}

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating one of the bundled level generators.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum LevelGeneratorError {
    /// The maximum level must not exceed [`MAX_LEVEL_LIMIT`].
    #[error("max level must be at most {MAX_LEVEL_LIMIT}.")]
    MaxLevelTooLarge,
    /// The probability `$p$` must be in the range `$(0, 1)$`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// Reject a `max_level` above [`MAX_LEVEL_LIMIT`].
pub(crate) fn check_max_level(max_level: usize) -> Result<(), LevelGeneratorError> {
    if max_level > MAX_LEVEL_LIMIT {
        return Err(LevelGeneratorError::MaxLevelTooLarge);
    }
    Ok(())
}
