use pixelsort_image::{Image, ImageError};
use rayon::prelude::*;

// Mirror an out-of-range index without repeating the edge sample (`gfedcb|abcdefgh|gfedcba`).
fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let len = len as isize;
    let mut i = index;
    while i < 0 || i >= len {
        i = if i < 0 { -i } else { 2 * len - 2 - i };
    }
    i as usize
}

/// Apply a separable filter to an image.
///
/// The horizontal kernel is applied first, then the vertical kernel. Borders
/// are handled by reflection without repeating the edge sample.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel, odd length.
/// * `kernel_y` - The vertical kernel, odd length.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn separable_filter<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    for kernel in [kernel_x, kernel_y] {
        if kernel.len() % 2 == 0 {
            return Err(ImageError::InvalidKernelSize(kernel.len()));
        }
    }

    let (cols, rows) = (src.cols(), src.rows());
    if cols == 0 || rows == 0 {
        return Ok(());
    }

    let half_x = (kernel_x.len() / 2) as isize;
    let half_y = (kernel_y.len() / 2) as isize;
    let stride = cols * C;

    // horizontal pass
    let mut temp = vec![0f32; src.as_slice().len()];
    temp.par_chunks_exact_mut(stride)
        .zip(src.as_slice().par_chunks_exact(stride))
        .for_each(|(temp_row, src_row)| {
            for x in 0..cols {
                for c in 0..C {
                    let mut acc = 0.0;
                    for (k, &w) in kernel_x.iter().enumerate() {
                        let xx = reflect_101(x as isize + k as isize - half_x, cols);
                        acc += src_row[xx * C + c] * w;
                    }
                    temp_row[x * C + c] = acc;
                }
            }
        });

    // vertical pass
    dst.as_slice_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            for (i, out) in dst_row.iter_mut().enumerate() {
                let mut acc = 0.0;
                for (k, &w) in kernel_y.iter().enumerate() {
                    let yy = reflect_101(y as isize + k as isize - half_y, rows);
                    acc += temp[yy * stride + i] * w;
                }
                *out = acc;
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelsort_image::ImageSize;

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(3, 1), 0);
        assert_eq!(reflect_101(2, 5), 2);
    }

    #[test]
    fn test_separable_filter_identity() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        let src = Image::<f32, 1>::new(size, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;
        separable_filter(&src, &mut dst, &[0.0, 1.0, 0.0], &[1.0])?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn test_separable_filter_box() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 1,
        };
        let src = Image::<f32, 1>::new(size, vec![0.0, 3.0, 0.0])?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;
        let k = [1.0 / 3.0; 3];
        separable_filter(&src, &mut dst, &k, &[1.0])?;
        // reflected borders see the center sample twice
        let expected = [2.0, 1.0, 2.0];
        for (a, b) in dst.as_slice().iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
        Ok(())
    }

    #[test]
    fn test_separable_filter_even_kernel() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_size_val([2, 2].into(), 0.0)?;
        let mut dst = src.clone();
        assert_eq!(
            separable_filter(&src, &mut dst, &[0.5, 0.5], &[1.0]),
            Err(ImageError::InvalidKernelSize(2))
        );
        Ok(())
    }
}
