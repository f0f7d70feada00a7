use rayon::prelude::*;
use thiserror::Error;

use pixelsort_image::Image;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be positive.
    #[error("row stride must be > 0, got {0}")]
    InvalidRowStride(usize),

    /// Input and output row counts do not match.
    #[error("source and destination must have the same number of rows")]
    SizeMismatch,
}

/// Controls how row-wise operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Check that the strategy can be executed.
    pub fn validate(&self) -> Result<(), ParallelError> {
        match self {
            ExecutionStrategy::Fixed(0) => Err(ParallelError::InvalidThreadCount(0)),
            _ => Ok(()),
        }
    }
}

/// Apply a function to each pixel in the image in parallel.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
{
    let cols = src.cols().max(1);
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each value of two images in parallel.
pub fn par_iter_rows_val_two<T1, T2, T3, const C: usize>(
    src1: &Image<T1, C>,
    src2: &Image<T2, C>,
    dst: &mut Image<T3, C>,
    f: impl Fn(&T1, &T2, &mut T3) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
    T3: Clone + Send + Sync,
{
    let stride = C * src1.cols().max(1);
    src1.as_slice()
        .par_chunks_exact(stride)
        .zip(src2.as_slice().par_chunks_exact(stride))
        .zip(dst.as_slice_mut().par_chunks_exact_mut(stride))
        .for_each(|((src1_chunk, src2_chunk), dst_chunk)| {
            src1_chunk
                .iter()
                .zip(src2_chunk.iter())
                .zip(dst_chunk.iter_mut())
                .for_each(|((src1_val, src2_val), dst_val)| {
                    f(src1_val, src2_val, dst_val);
                });
        });
}

/// Run a fallible operation on every (source row, destination row) pair.
///
/// The operation receives the row index so that callers can derive
/// per-row state, e.g. a random generator, independently of the schedule.
/// The first error returned by any row is propagated.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `src` - The source values, `src_stride` values per row.
/// * `dst` - The destination values, `dst_stride` values per row.
/// * `op` - The operation to perform on each row.
pub fn execute_rows<T, U, E, F>(
    strategy: ExecutionStrategy,
    src: &[T],
    src_stride: usize,
    dst: &mut [U],
    dst_stride: usize,
    op: F,
) -> Result<(), E>
where
    T: Sync,
    U: Send,
    E: Send + From<ParallelError>,
    F: Fn(usize, &[T], &mut [U]) -> Result<(), E> + Sync + Send,
{
    if src_stride == 0 {
        return Err(ParallelError::InvalidRowStride(src_stride).into());
    }
    if dst_stride == 0 {
        return Err(ParallelError::InvalidRowStride(dst_stride).into());
    }
    if src.len() / src_stride != dst.len() / dst_stride {
        return Err(ParallelError::SizeMismatch.into());
    }

    let run_parallel = |src: &[T], dst: &mut [U]| {
        src.par_chunks_exact(src_stride)
            .zip(dst.par_chunks_exact_mut(dst_stride))
            .enumerate()
            .try_for_each(|(i, (src_row, dst_row))| op(i, src_row, dst_row))
    };

    match strategy {
        ExecutionStrategy::Serial => src
            .chunks_exact(src_stride)
            .zip(dst.chunks_exact_mut(dst_stride))
            .enumerate()
            .try_for_each(|(i, (src_row, dst_row))| op(i, src_row, dst_row)),
        ExecutionStrategy::ParallelRows => run_parallel(src, dst),
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n).into());
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| run_parallel(src, dst))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double_rows(strategy: ExecutionStrategy) -> Result<Vec<i32>, ParallelError> {
        let src = vec![1, 2, 3, 4, 5, 6];
        let mut dst = vec![0; 6];
        execute_rows(strategy, &src, 2, &mut dst, 2, |i, s, d| {
            for (s, d) in s.iter().zip(d.iter_mut()) {
                *d = *s * 2 + i as i32;
            }
            Ok::<(), ParallelError>(())
        })?;
        Ok(dst)
    }

    #[test]
    fn test_execute_serial() -> Result<(), ParallelError> {
        assert_eq!(
            double_rows(ExecutionStrategy::Serial)?,
            vec![2, 4, 7, 9, 12, 14]
        );
        Ok(())
    }

    #[test]
    fn test_execute_parallel_rows() -> Result<(), ParallelError> {
        assert_eq!(
            double_rows(ExecutionStrategy::ParallelRows)?,
            vec![2, 4, 7, 9, 12, 14]
        );
        Ok(())
    }

    #[test]
    fn test_execute_fixed_success() -> Result<(), ParallelError> {
        assert_eq!(
            double_rows(ExecutionStrategy::Fixed(2))?,
            vec![2, 4, 7, 9, 12, 14]
        );
        Ok(())
    }

    #[test]
    fn test_execute_fixed_error() {
        let res = double_rows(ExecutionStrategy::Fixed(0));
        assert_eq!(res, Err(ParallelError::InvalidThreadCount(0)));
        assert!(ExecutionStrategy::Fixed(0).validate().is_err());
        assert!(ExecutionStrategy::Serial.validate().is_ok());
    }

    #[test]
    fn test_execute_invalid_stride() {
        let src = vec![1];
        let mut dst = vec![0];
        let res = execute_rows(ExecutionStrategy::Serial, &src, 0, &mut dst, 1, |_, _, _| {
            Ok::<(), ParallelError>(())
        });
        assert_eq!(res, Err(ParallelError::InvalidRowStride(0)));
    }

    #[test]
    fn test_execute_size_mismatch() {
        let src = vec![1, 2, 3, 4];
        let mut dst = vec![0; 2];
        let res = execute_rows(ExecutionStrategy::Serial, &src, 2, &mut dst, 2, |_, _, _| {
            Ok::<(), ParallelError>(())
        });
        assert_eq!(res, Err(ParallelError::SizeMismatch));
    }

    #[test]
    fn test_execute_propagates_row_error() {
        let src = vec![0u8; 4];
        let mut dst = vec![0u8; 4];
        let res = execute_rows(ExecutionStrategy::ParallelRows, &src, 1, &mut dst, 1, |i, _, _| {
            if i == 2 {
                Err(ParallelError::BuildError("row 2".to_string()))
            } else {
                Ok(())
            }
        });
        assert_eq!(res, Err(ParallelError::BuildError("row 2".to_string())));
    }
}
