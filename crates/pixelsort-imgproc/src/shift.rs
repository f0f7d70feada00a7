use pixelsort_image::{Image, ImageError};

use crate::blend::{blend_images, BlendMode};

/// Shift one channel of an RGB image horizontally and blend the result with
/// the original.
///
/// The channel is translated by `round(change_percent * width)` pixels, to the
/// left for negative values. Samples shifted in from outside the image are 0.
///
/// # Arguments
///
/// * `src` - The input RGB image.
/// * `change_percent` - The shift as a fraction of the image width.
/// * `channel` - The channel index to shift, 0 to 2.
/// * `mode` - How the shifted image is blended over the original.
///
/// # Errors
///
/// Returns an error if the channel index is out of bounds.
///
/// # Example
///
/// ```
/// use pixelsort_image::{Image, ImageSize};
/// use pixelsort_imgproc::{blend::BlendMode, shift::channel_shift};
///
/// let image = Image::<u8, 3>::new(
///     ImageSize { width: 2, height: 1 },
///     vec![10, 20, 30, 40, 50, 60],
/// ).unwrap();
///
/// let shifted = channel_shift(&image, -0.5, 0, BlendMode::None).unwrap();
/// assert_eq!(shifted.as_slice(), &[40, 20, 30, 0, 50, 60]);
/// ```
pub fn channel_shift(
    src: &Image<u8, 3>,
    change_percent: f32,
    channel: usize,
    mode: BlendMode,
) -> Result<Image<u8, 3>, ImageError> {
    if channel >= 3 {
        return Err(ImageError::ChannelIndexOutOfBounds(channel, 3));
    }

    let width = src.width() as isize;
    let offset = (change_percent * src.width() as f32).round() as isize;

    let mut shifted = src.clone();
    for (src_row, dst_row) in src
        .rows_iter()
        .zip(shifted.as_slice_mut().chunks_exact_mut(src.row_stride().max(1)))
    {
        for x in 0..width {
            let from = x - offset;
            dst_row[x as usize * 3 + channel] = if (0..width).contains(&from) {
                src_row[from as usize * 3 + channel]
            } else {
                0
            };
        }
    }

    let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;
    blend_images(src, &shifted, &mut dst, mode)?;

    Ok(dst)
}
