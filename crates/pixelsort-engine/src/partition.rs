use std::ops::Range;

use rand::Rng;

use crate::{boundary::ActiveSpan, error::PixelSortError};

/// Default lower bound of a region, as a fraction of the active span.
pub const DEFAULT_REGION_MIN: f64 = 0.1;

/// Default upper bound of a region, as a fraction of the active span.
pub const DEFAULT_REGION_MAX: f64 = 0.3;

/// How an active span is split into regions that are sorted independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Partitioning {
    /// The whole span is a single region.
    Whole,

    /// Consecutive regions whose lengths are drawn uniformly from
    /// `[ceil(L * min), ceil(L * max)]`, `L` being the span length.
    ///
    /// Both bounds are fractions in (0, 1] with `min <= max`.
    Random {
        /// Lower length bound.
        min: f64,
        /// Upper length bound.
        max: f64,
    },
}

impl Default for Partitioning {
    fn default() -> Self {
        Partitioning::Random {
            min: DEFAULT_REGION_MIN,
            max: DEFAULT_REGION_MAX,
        }
    }
}

impl Partitioning {
    /// Build a random partitioning, validating its bounds.
    pub fn random(min: f64, max: f64) -> Result<Self, PixelSortError> {
        let partitioning = Partitioning::Random { min, max };
        partitioning.validate()?;
        Ok(partitioning)
    }

    /// Check the region bounds.
    pub fn validate(&self) -> Result<(), PixelSortError> {
        let Partitioning::Random { min, max } = *self else {
            return Ok(());
        };
        for bound in [min, max] {
            if !(bound > 0.0 && bound <= 1.0) {
                return Err(PixelSortError::RegionBoundOutOfRange(bound));
            }
        }
        if min > max {
            return Err(PixelSortError::InvertedRegionBounds { min, max });
        }
        Ok(())
    }

    /// Split `span` into consecutive regions.
    ///
    /// The regions are yielded left to right, they are non-empty, do not
    /// overlap and cover the span exactly. The last region is truncated at the
    /// end of the span.
    ///
    /// # Example
    ///
    /// ```
    /// use pixelsort_engine::{ActiveSpan, Partitioning};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let span = ActiveSpan { start: 2, end: 12 };
    ///
    /// let regions: Vec<_> = Partitioning::Whole.regions(span, &mut rng).collect();
    /// assert_eq!(regions, vec![2..12]);
    ///
    /// let total: usize = Partitioning::default()
    ///     .regions(span, &mut rng)
    ///     .map(|r| r.len())
    ///     .sum();
    /// assert_eq!(total, 10);
    /// ```
    pub fn regions<'a, R: Rng>(&self, span: ActiveSpan, rng: &'a mut R) -> Regions<'a, R> {
        let bounds = match *self {
            Partitioning::Whole => None,
            Partitioning::Random { min, max } => {
                let len = span.len() as f64;
                let lo = ((len * min).ceil() as usize).max(1);
                let hi = ((len * max).ceil() as usize).max(lo);
                Some((lo, hi))
            }
        };

        Regions {
            position: span.start,
            end: span.end,
            bounds,
            rng,
        }
    }
}

/// Iterator over the regions of an active span, see [`Partitioning::regions`].
pub struct Regions<'a, R> {
    position: usize,
    end: usize,
    bounds: Option<(usize, usize)>,
    rng: &'a mut R,
}

impl<R: Rng> Iterator for Regions<'_, R> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.end {
            return None;
        }

        let remaining = self.end - self.position;
        let len = match self.bounds {
            None => remaining,
            Some((lo, hi)) => self.rng.random_range(lo..=hi).min(remaining),
        };

        let region = self.position..self.position + len;
        self.position = region.end;
        Some(region)
    }
}
