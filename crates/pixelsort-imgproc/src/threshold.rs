use num_traits::Zero;
use std::cmp::PartialOrd;

use pixelsort_image::{Image, ImageError};

use crate::{histogram::compute_histogram, parallel};

/// Apply a binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The maximum value to use when the input value is greater than the threshold.
///
/// # Example
///
/// ```
/// use pixelsort_image::{Image, ImageSize};
/// use pixelsort_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary(&image, &mut thresholded, 100, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // run the thresholding operation in parallel
    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        for (s, d) in src_pixel.iter().zip(dst_pixel.iter_mut()) {
            *d = if *s > threshold { max_value } else { T::zero() };
        }
    });

    Ok(())
}

/// Compute the Otsu threshold of a grayscale image.
///
/// Returns the level that maximizes the between-class variance of the
/// intensity histogram. Pixels strictly greater than the level belong to the
/// foreground class.
///
/// # Example
///
/// ```
/// use pixelsort_image::{Image, ImageSize};
/// use pixelsort_imgproc::threshold::otsu_threshold;
///
/// let data = vec![10u8, 12, 11, 200, 210, 205];
/// let image = Image::<_, 1>::new(ImageSize { width: 3, height: 2 }, data).unwrap();
///
/// let level = otsu_threshold(&image).unwrap();
/// assert!((12..200).contains(&level));
/// ```
pub fn otsu_threshold(src: &Image<u8, 1>) -> Result<u8, ImageError> {
    let mut hist = vec![0usize; 256];
    compute_histogram(src, &mut hist, 256)?;

    let total = src.as_slice().len() as f64;
    if total == 0.0 {
        return Ok(0);
    }

    let sum_all = hist
        .iter()
        .enumerate()
        .map(|(i, &n)| i as f64 * n as f64)
        .sum::<f64>();

    let mut best_level = 0u8;
    let mut best_variance = -1.0f64;
    let mut weight_bg = 0.0f64;
    let mut sum_bg = 0.0f64;

    for (level, &count) in hist.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            // single intensity: everything falls in the background class
            if best_variance < 0.0 {
                best_level = level as u8;
            }
            break;
        }
        sum_bg += level as f64 * count as f64;

        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let variance = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    Ok(best_level)
}

/// Binarize a grayscale image with its Otsu threshold.
///
/// Returns the level that was used.
pub fn threshold_otsu(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    max_value: u8,
) -> Result<u8, ImageError> {
    let level = otsu_threshold(src)?;
    threshold_binary(src, dst, level, max_value)?;
    Ok(level)
}

#[cfg(test)]
mod tests {
    use pixelsort_image::{Image, ImageError, ImageSize};

    #[test]
    fn threshold_binary() -> Result<(), ImageError> {
        let data = vec![100u8, 200, 50, 150, 200, 250];
        let data_expected = [0u8, 255, 0, 255, 255, 255];
        let image = Image::<_, 3>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            data,
        )?;

        let mut thresholded = Image::<_, 3>::from_size_val(image.size(), 0)?;

        super::threshold_binary(&image, &mut thresholded, 100, 255)?;
        assert_eq!(thresholded.as_slice(), &data_expected);

        Ok(())
    }

    #[test]
    fn threshold_otsu_bimodal() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 4,
                height: 2,
            },
            vec![
                20, 22, 21, 23,
                180, 182, 181, 183,
            ],
        )?;
        let mut bin = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        let level = super::threshold_otsu(&image, &mut bin, 255)?;
        assert!((23..180).contains(&level));
        assert_eq!(bin.as_slice(), &[0, 0, 0, 0, 255, 255, 255, 255]);

        Ok(())
    }

    #[test]
    fn threshold_otsu_constant() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([3, 3].into(), 77)?;
        let mut bin = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::threshold_otsu(&image, &mut bin, 255)?;
        assert!(bin.as_slice().iter().all(|&v| v == 0));

        Ok(())
    }
}
