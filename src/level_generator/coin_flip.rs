//! Coin-flip level generator.

use rand::prelude::*;

use crate::level_generator::{
    DEFAULT_MAX_LEVEL, LevelGenerator, LevelGeneratorError, check_max_level,
};

/// The default level generator.
///
/// Every draw starts at level 1 and climbs one level for each consecutive
/// fair coin flip landing heads, stopping at the first tails. The result is
/// capped at `max_level`, so for `$k < m$` the chance of drawing level `$k$`
/// halves with each step up.
///
/// Level 0 is only ever produced when `max_level` is itself 0.
#[derive(Debug)]
pub struct CoinFlip {
    /// The highest level that can be produced.
    max_level: usize,
    /// The random number generator.
    rng: SmallRng,
}

impl CoinFlip {
    /// Create a new coin-flip level generator capped at `max_level`.
    ///
    /// # Errors
    ///
    /// `max_level` must not exceed
    /// [`MAX_LEVEL_LIMIT`][crate::level_generator::MAX_LEVEL_LIMIT].
    #[inline]
    pub fn new(max_level: usize) -> Result<Self, LevelGeneratorError> {
        check_max_level(max_level)?;
        Ok(CoinFlip {
            max_level,
            rng: SmallRng::from_rng(&mut rand::rng()),
        })
    }

    /// Same as [`CoinFlip::new`], but the draws are reproducible for a given
    /// `seed`.
    ///
    /// # Errors
    ///
    /// See [`CoinFlip::new`].
    #[inline]
    pub fn seeded(max_level: usize, seed: u64) -> Result<Self, LevelGeneratorError> {
        check_max_level(max_level)?;
        Ok(CoinFlip {
            max_level,
            rng: SmallRng::seed_from_u64(seed),
        })
    }
}

impl Default for CoinFlip {
    /// A generator capped at [`DEFAULT_MAX_LEVEL`].
    #[inline]
    fn default() -> Self {
        CoinFlip {
            max_level: DEFAULT_MAX_LEVEL,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl LevelGenerator for CoinFlip {
    #[inline]
    fn max_level(&self) -> usize {
        self.max_level
    }

    #[inline]
    fn level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.random_bool(0.5) {
            level += 1;
        }
        let level = level.min(self.max_level);
        log::trace!("Drew level {level} (coin flip)");
        level
    }
}
