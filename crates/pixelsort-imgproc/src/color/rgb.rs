use crate::parallel;
use pixelsort_image::{Image, ImageError};

/// Convert an RGBA image to RGB image by dropping the alpha channel.
///
/// # Arguments
///
/// * `src` - The input RGBA image.
/// * `dst` - The output RGB image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use pixelsort_image::{Image, ImageSize};
/// use pixelsort_imgproc::color::rgb_from_rgba;
///
/// let src = Image::<u8, 4>::new(ImageSize { width: 2, height: 1 }, vec![
///     0, 1, 2, 255, // (0, 0)
///     3, 4, 5, 0,   // (0, 1)
/// ]).unwrap();
///
/// let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0).unwrap();
///
/// rgb_from_rgba(&src, &mut dst).unwrap();
/// assert_eq!(dst.as_slice(), &[0, 1, 2, 3, 4, 5]);
/// ```
pub fn rgb_from_rgba(src: &Image<u8, 4>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel.copy_from_slice(&src_pixel[..3]);
    });

    Ok(())
}

/// Extract the alpha channel of an RGBA image as a single channel mask.
///
/// Precondition: the input and output images must have the same size.
pub fn alpha_from_rgba(src: &Image<u8, 4>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = src_pixel[3];
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use pixelsort_image::{Image, ImageError, ImageSize};

    #[test]
    fn alpha_from_rgba() -> Result<(), ImageError> {
        let src = Image::<u8, 4>::new(
            ImageSize {
                width: 3,
                height: 1,
            },
            vec![1, 2, 3, 0, 4, 5, 6, 128, 7, 8, 9, 255],
        )?;
        let mut alpha = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        super::alpha_from_rgba(&src, &mut alpha)?;
        assert_eq!(alpha.as_slice(), &[0, 128, 255]);

        let mut rgb = Image::<u8, 3>::from_size_val(src.size(), 0)?;
        super::rgb_from_rgba(&src, &mut rgb)?;
        assert_eq!(rgb.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);

        Ok(())
    }
}
