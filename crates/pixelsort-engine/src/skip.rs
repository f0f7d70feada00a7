use rand::Rng;

use crate::error::PixelSortError;

/// Decides whether a row is left untouched.
///
/// The policy is consulted exactly once per row, before any region is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipPolicy {
    /// Skip every row whose index is a multiple of the interval.
    ///
    /// An interval of 0 never skips, an interval of 1 skips every row.
    Periodic(usize),

    /// Skip each row independently with the given probability.
    ///
    /// A uniform sample `u` in [0, 1) is drawn and the row is skipped when
    /// `u <= p`.
    Probabilistic(f64),
}

impl Default for SkipPolicy {
    fn default() -> Self {
        SkipPolicy::Periodic(0)
    }
}

impl SkipPolicy {
    /// A policy that never skips.
    pub fn never() -> Self {
        SkipPolicy::Periodic(0)
    }

    /// Build a periodic policy from an untyped interval.
    pub fn periodic(interval: i64) -> Result<Self, PixelSortError> {
        usize::try_from(interval)
            .map(SkipPolicy::Periodic)
            .map_err(|_| PixelSortError::NegativeSkipInterval(interval))
    }

    /// Build a probabilistic policy, `probability` must be in [0, 1].
    pub fn probabilistic(probability: f64) -> Result<Self, PixelSortError> {
        let policy = SkipPolicy::Probabilistic(probability);
        policy.validate()?;
        Ok(policy)
    }

    /// Check the policy parameters.
    pub fn validate(&self) -> Result<(), PixelSortError> {
        match *self {
            SkipPolicy::Periodic(_) => Ok(()),
            SkipPolicy::Probabilistic(p) if (0.0..=1.0).contains(&p) => Ok(()),
            SkipPolicy::Probabilistic(p) => Err(PixelSortError::InvalidSkipProbability(p)),
        }
    }

    /// Whether the row at `row_index` is skipped.
    ///
    /// The probabilistic policy draws one sample from `rng`, the periodic
    /// policy draws nothing.
    pub fn should_skip<R: Rng>(&self, row_index: usize, rng: &mut R) -> bool {
        match *self {
            SkipPolicy::Periodic(0) => false,
            SkipPolicy::Periodic(interval) => row_index % interval == 0,
            SkipPolicy::Probabilistic(p) => rng.random::<f64>() <= p,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn periodic_skip() {
        let mut rng = StdRng::seed_from_u64(0);
        let policy = SkipPolicy::Periodic(3);
        let skipped: Vec<usize> = (0..10)
            .filter(|&i| policy.should_skip(i, &mut rng))
            .collect();
        assert_eq!(skipped, vec![0, 3, 6, 9]);
    }

    #[test]
    fn periodic_zero_never_skips() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!((0..100).all(|i| !SkipPolicy::never().should_skip(i, &mut rng)));
    }

    #[test]
    fn periodic_one_skips_all() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!((0..100).all(|i| SkipPolicy::Periodic(1).should_skip(i, &mut rng)));
    }

    #[test]
    fn probabilistic_extremes() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!((0..1000).all(|i| SkipPolicy::Probabilistic(1.0).should_skip(i, &mut rng)));
        // a sample of exactly 0.0 would still skip, which has negligible odds
        let skipped = (0..1000)
            .filter(|&i| SkipPolicy::Probabilistic(0.0).should_skip(i, &mut rng))
            .count();
        assert_eq!(skipped, 0);
    }

    #[test]
    fn probabilistic_rate() {
        let mut rng = StdRng::seed_from_u64(7);
        let policy = SkipPolicy::Probabilistic(0.25);
        let skipped = (0..10_000)
            .filter(|&i| policy.should_skip(i, &mut rng))
            .count();
        assert!((2000..3000).contains(&skipped), "skipped {skipped}");
    }

    #[test]
    fn constructors_validate() {
        assert_eq!(SkipPolicy::periodic(4), Ok(SkipPolicy::Periodic(4)));
        assert_eq!(
            SkipPolicy::periodic(-1),
            Err(PixelSortError::NegativeSkipInterval(-1))
        );
        assert_eq!(
            SkipPolicy::probabilistic(1.5),
            Err(PixelSortError::InvalidSkipProbability(1.5))
        );
        assert_eq!(
            SkipPolicy::probabilistic(1.0),
            Ok(SkipPolicy::Probabilistic(1.0))
        );
        assert!(SkipPolicy::probabilistic(f64::NAN).is_err());
    }
}
