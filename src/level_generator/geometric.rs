//! Geometric level generator.

use rand::prelude::*;

use crate::level_generator::{LevelGenerator, LevelGeneratorError, check_max_level};

/// A level generator using a geometric distribution.
///
/// This distribution assumes that if a node is present at some level `$n$`,
/// then the probability that it is present at level `$n+1$` is some constant
/// `$p \in (0, 1)$`. This produces a geometric distribution, albeit truncated
/// at the maximum level allowed.
#[derive(Debug)]
pub struct Geometric {
    /// The highest level that can be produced.
    max_level: usize,
    /// The probability that a node is present in the next level.
    p: f64,
    /// `$p^{m+1}$`, the probability mass cut off by truncating at `max_level`.
    ///
    /// Cached as it is needed for every draw.
    tail: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// Create a new geometric level generator producing levels in
    /// `[0, max_level]`, with `p` as the probability that a given node is
    /// present in the next level.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1, and `max_level` must not exceed
    /// [`MAX_LEVEL_LIMIT`][crate::level_generator::MAX_LEVEL_LIMIT].
    #[inline]
    pub fn new(max_level: usize, p: f64) -> Result<Self, LevelGeneratorError> {
        Self::with_rng(max_level, p, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Same as [`Geometric::new`], but the draws are reproducible for a given
    /// `seed`.
    ///
    /// # Errors
    ///
    /// See [`Geometric::new`].
    #[inline]
    pub fn seeded(max_level: usize, p: f64, seed: u64) -> Result<Self, LevelGeneratorError> {
        Self::with_rng(max_level, p, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(max_level: usize, p: f64, rng: SmallRng) -> Result<Self, LevelGeneratorError> {
        check_max_level(max_level)?;
        if !(0.0 < p && p < 1.0) {
            return Err(LevelGeneratorError::InvalidProbability);
        }
        // `check_max_level` bounds `max_level + 1` well within `i32`.
        let exponent =
            i32::try_from(max_level + 1).map_err(|_err| LevelGeneratorError::MaxLevelTooLarge)?;
        Ok(Geometric {
            max_level,
            p,
            tail: p.powi(exponent),
            rng,
        })
    }
}

impl LevelGenerator for Geometric {
    #[inline]
    fn max_level(&self) -> usize {
        self.max_level
    }

    /// Generate a level for a new node using a geometric distribution.
    ///
    /// This function generate a random level in the range `$[0, m]$` by
    /// sampling from a uniform distribution and inverting the cumulative
    /// distribution function (CDF) of the truncated geometric distribution.
    ///
    /// The CDF of the truncated geometric distribution is
    ///
    /// ```math
    /// \text{CDF}(n) = \frac{1 - p^{n+1}}{1 - p^{m+1}}
    /// ```
    ///
    /// where `$m$` is the maximum level. Inverting it for `$n$` gives:
    ///
    /// ```math
    /// n = \left\lfloor \log_p\left(1 - (1 - p^{m+1}) \cdot u\right) \right\rfloor
    /// ```
    ///
    /// where `$u \in [0, 1)$` is a uniformly distributed random variate.
    #[inline]
    #[expect(clippy::float_arithmetic, reason = "Computing inverse CDF")]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "The inverse CDF lies in [0, m + 1) so the cast is safe"
    )]
    #[expect(clippy::as_conversions, reason = "No other way to do this")]
    fn level(&mut self) -> usize {
        let u = self.rng.random::<f64>();
        let x = 1.0 - (1.0 - self.tail) * u;
        let level = (x.ln() / self.p.ln()).floor() as usize;
        let level = level.min(self.max_level);
        log::trace!("Drew level {level} (geometric, p = {})", self.p);
        level
    }
}
