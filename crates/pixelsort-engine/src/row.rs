use rand::Rng;

use crate::{
    boundary::{find_active_span, ActiveSpan},
    config::PixelSortConfig,
    error::PixelSortError,
    partition::Partitioning,
    skip::SkipPolicy,
    sort::sort_region,
};

/// What happened to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// The skip policy left the row untouched.
    Skipped,
    /// The row has no opaque pixel.
    Transparent,
    /// The active span was sorted.
    Sorted {
        /// The active span of the row.
        span: ActiveSpan,
        /// Number of regions the span was split into.
        regions: usize,
    },
}

/// Sorts single rows of pixels.
///
/// The processor is generic over the pixel type, pixels are only moved
/// around and compared through a key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowProcessor {
    skip: SkipPolicy,
    partitioning: Partitioning,
    flipped: bool,
}

impl RowProcessor {
    /// Create a processor.
    pub fn new(skip: SkipPolicy, partitioning: Partitioning, flipped: bool) -> Self {
        Self {
            skip,
            partitioning,
            flipped,
        }
    }

    /// Create a processor from the row related parameters of `config`.
    pub fn from_config(config: &PixelSortConfig) -> Self {
        Self::new(config.skip, config.partitioning, config.flipped)
    }

    /// Process one row.
    ///
    /// `dst` receives a copy of `src` in which every region of the active span
    /// is sorted by `key`. Pixels outside the span stay in place, so do all
    /// pixels of a skipped or transparent row.
    ///
    /// The skip policy draws from `rng` first, the partitioning after.
    ///
    /// # Arguments
    ///
    /// * `row_index` - Index of the row in the image.
    /// * `src` - The input pixels.
    /// * `mask` - One opacity value per pixel, nonzero is opaque.
    /// * `dst` - The output pixels, same length as `src`.
    /// * `key` - Extracts the sort key of a pixel.
    /// * `rng` - The generator of this row.
    ///
    /// # Errors
    ///
    /// Returns [`PixelSortError::RowLengthMismatch`] when `mask` or `dst` do
    /// not have the length of `src`, and
    /// [`PixelSortError::RegionCoverageMismatch`] if the regions do not tile
    /// the active span.
    ///
    /// # Example
    ///
    /// ```
    /// use pixelsort_engine::{Partitioning, RowOutcome, RowProcessor, SkipPolicy};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let processor = RowProcessor::new(SkipPolicy::never(), Partitioning::Whole, false);
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let mut dst = [0u8; 6];
    ///
    /// let outcome = processor
    ///     .process(0, &[9, 5, 3, 1, 4, 0], &[0, 1, 1, 1, 1, 0], &mut dst, |&p| p, &mut rng)
    ///     .unwrap();
    ///
    /// assert_eq!(dst, [9, 1, 3, 4, 5, 0]);
    /// assert!(matches!(outcome, RowOutcome::Sorted { regions: 1, .. }));
    /// ```
    pub fn process<P, K, F, R>(
        &self,
        row_index: usize,
        src: &[P],
        mask: &[u8],
        dst: &mut [P],
        key: F,
        rng: &mut R,
    ) -> Result<RowOutcome, PixelSortError>
    where
        P: Copy,
        K: Ord,
        F: Fn(&P) -> K,
        R: Rng,
    {
        for len in [mask.len(), dst.len()] {
            if len != src.len() {
                return Err(PixelSortError::RowLengthMismatch {
                    row: row_index,
                    expected: src.len(),
                    actual: len,
                });
            }
        }

        dst.copy_from_slice(src);

        if self.skip.should_skip(row_index, rng) {
            return Ok(RowOutcome::Skipped);
        }

        let Some(span) = find_active_span(mask) else {
            return Ok(RowOutcome::Transparent);
        };

        let mut covered = 0;
        let mut regions = 0;
        for region in self.partitioning.regions(span, rng) {
            covered += region.len();
            regions += 1;
            sort_region(&mut dst[region], &key, self.flipped);
        }

        if covered != span.len() {
            return Err(PixelSortError::RegionCoverageMismatch {
                row: row_index,
                covered,
                span: span.len(),
            });
        }

        Ok(RowOutcome::Sorted { span, regions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn whole(flipped: bool) -> RowProcessor {
        RowProcessor::new(SkipPolicy::never(), Partitioning::Whole, flipped)
    }

    #[test]
    fn sorts_opaque_row() -> Result<(), PixelSortError> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut dst = [0u8; 4];
        let outcome = whole(false).process(0, &[3, 1, 4, 2], &[255; 4], &mut dst, |&p| p, &mut rng)?;
        assert_eq!(dst, [1, 2, 3, 4]);
        assert_eq!(
            outcome,
            RowOutcome::Sorted {
                span: ActiveSpan { start: 0, end: 4 },
                regions: 1
            }
        );
        Ok(())
    }

    #[test]
    fn sorts_flipped() -> Result<(), PixelSortError> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut dst = [0u8; 4];
        whole(true).process(0, &[3, 1, 4, 2], &[1; 4], &mut dst, |&p| p, &mut rng)?;
        assert_eq!(dst, [4, 3, 2, 1]);
        Ok(())
    }

    #[test]
    fn keeps_pixels_outside_span() -> Result<(), PixelSortError> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut dst = [0u8; 6];
        whole(false).process(
            0,
            &[50, 40, 30, 20, 10, 5],
            &[0, 0, 1, 1, 1, 0],
            &mut dst,
            |&p| p,
            &mut rng,
        )?;
        assert_eq!(dst, [50, 40, 10, 20, 30, 5]);
        Ok(())
    }

    #[test]
    fn transparent_pixels_inside_span_are_sorted() -> Result<(), PixelSortError> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut dst = [0u8; 4];
        whole(false).process(0, &[9, 8, 7, 6], &[1, 0, 0, 1], &mut dst, |&p| p, &mut rng)?;
        assert_eq!(dst, [6, 7, 8, 9]);
        Ok(())
    }

    #[test]
    fn transparent_row_is_copied() -> Result<(), PixelSortError> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut dst = [0u8; 3];
        let outcome = whole(false).process(0, &[3, 2, 1], &[0; 3], &mut dst, |&p| p, &mut rng)?;
        assert_eq!(outcome, RowOutcome::Transparent);
        assert_eq!(dst, [3, 2, 1]);
        Ok(())
    }

    #[test]
    fn skipped_row_is_copied() -> Result<(), PixelSortError> {
        let mut rng = StdRng::seed_from_u64(0);
        let processor = RowProcessor::new(SkipPolicy::Periodic(2), Partitioning::Whole, false);

        let mut dst = [0u8; 3];
        let outcome = processor.process(4, &[3, 2, 1], &[1; 3], &mut dst, |&p| p, &mut rng)?;
        assert_eq!(outcome, RowOutcome::Skipped);
        assert_eq!(dst, [3, 2, 1]);

        let outcome = processor.process(5, &[3, 2, 1], &[1; 3], &mut dst, |&p| p, &mut rng)?;
        assert!(matches!(outcome, RowOutcome::Sorted { .. }));
        assert_eq!(dst, [1, 2, 3]);
        Ok(())
    }

    #[test]
    fn random_regions_are_each_sorted() -> Result<(), PixelSortError> {
        let processor = RowProcessor::new(
            SkipPolicy::never(),
            Partitioning::random(0.1, 0.3)?,
            false,
        );
        let src: Vec<u8> = (0..100).rev().collect();
        let mut dst = vec![0u8; 100];

        let mut rng = StdRng::seed_from_u64(11);
        processor.process(0, &src, &[1; 100], &mut dst, |&p| p, &mut rng)?;

        // replay the same draws to recover the region boundaries
        let mut replay = StdRng::seed_from_u64(11);
        let regions: Vec<_> = Partitioning::random(0.1, 0.3)?
            .regions(ActiveSpan { start: 0, end: 100 }, &mut replay)
            .collect();
        assert!(regions.len() > 1);
        for region in regions {
            assert!(dst[region].windows(2).all(|w| w[0] <= w[1]));
        }

        let mut sorted = dst.clone();
        sorted.sort();
        assert_eq!(sorted, (0..100).collect::<Vec<u8>>());
        Ok(())
    }

    #[test]
    fn rejects_length_mismatch() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut dst = [0u8; 3];
        let res = whole(false).process(7, &[1, 2, 3], &[1, 1], &mut dst, |&p| p, &mut rng);
        assert_eq!(
            res,
            Err(PixelSortError::RowLengthMismatch {
                row: 7,
                expected: 3,
                actual: 2
            })
        );

        let mut short = [0u8; 2];
        let res = whole(false).process(1, &[1, 2, 3], &[1; 3], &mut short, |&p| p, &mut rng);
        assert!(res.is_err_and(|e| e.is_invariant_violation()));
    }
}
