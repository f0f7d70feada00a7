use crate::parallel;
use pixelsort_image::{Image, ImageError};

/// Convert an RGB image to an HSV image.
///
/// The input image is assumed to have 3 channels in the order R, G, B.
///
/// # Arguments
///
/// * `src` - The input RGB image assumed to have 3 channels.
/// * `dst` - The output HSV image.
///
/// # Returns
///
/// The HSV image with the following channels:
///
/// * H: The hue channel in the range [0, 255] (0-360 degrees).
/// * S: The saturation channel in the range [0, 255].
/// * V: The value channel in the range [0, 255].
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use pixelsort_image::{Image, ImageSize};
/// use pixelsort_imgproc::color::hsv_from_rgb;
///
/// let image = Image::<f32, 3>::new(
///     ImageSize {
///        width: 4,
///        height: 5,
///     },
///     vec![0f32; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let mut hsv = Image::<f32, 3>::from_size_val(image.size(), 0.0).unwrap();
///
/// hsv_from_rgb(&image, &mut hsv).unwrap();
///
/// assert_eq!(hsv.num_channels(), 3);
/// assert_eq!(hsv.size().width, 4);
/// assert_eq!(hsv.size().height, 5);
/// ```
pub fn hsv_from_rgb(src: &Image<f32, 3>, dst: &mut Image<f32, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let [h, s, v] = hsv_from_rgb_f32(src_pixel[0], src_pixel[1], src_pixel[2]);
        dst_pixel[0] = h;
        dst_pixel[1] = s;
        dst_pixel[2] = v;
    });

    Ok(())
}

fn hsv_from_rgb_f32(r: f32, g: f32, b: f32) -> [f32; 3] {
    // Normalize the input to the range [0, 1]
    let r = r / 255.;
    let g = g / 255.;
    let b = b / 255.;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    // Ensure h is in the range [0, 360)
    let h = if h < 0.0 { h + 360.0 } else { h };

    let s = if max == 0.0 {
        0.0
    } else {
        (delta / max) * 255.0
    };

    [(h / 360.0) * 255.0, s, max * 255.0]
}

/// Convert one RGB8 pixel to an HSV8 pixel.
///
/// The hue is scaled from [0, 360) degrees to [0, 255].
///
/// # Example
///
/// ```
/// use pixelsort_imgproc::color::hsv_pixel_from_rgb;
///
/// assert_eq!(hsv_pixel_from_rgb([255, 0, 0]), [0, 255, 255]);
/// assert_eq!(hsv_pixel_from_rgb([0, 255, 0]), [85, 255, 255]);
/// assert_eq!(hsv_pixel_from_rgb([64, 64, 64]), [0, 0, 64]);
/// ```
pub fn hsv_pixel_from_rgb(rgb: [u8; 3]) -> [u8; 3] {
    let hsv = hsv_from_rgb_f32(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32);
    hsv.map(|c| c.round().clamp(0.0, 255.0) as u8)
}

/// Convert one HSV8 pixel back to an RGB8 pixel.
///
/// # Example
///
/// ```
/// use pixelsort_imgproc::color::rgb_pixel_from_hsv;
///
/// assert_eq!(rgb_pixel_from_hsv([0, 255, 255]), [255, 0, 0]);
/// assert_eq!(rgb_pixel_from_hsv([170, 255, 255]), [0, 0, 255]);
/// ```
pub fn rgb_pixel_from_hsv(hsv: [u8; 3]) -> [u8; 3] {
    let h = hsv[0] as f32 / 255.0 * 6.0;
    let s = hsv[1] as f32 / 255.0;
    let v = hsv[2] as f32 / 255.0;

    let sector = (h.floor() as i32).rem_euclid(6);
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    [r, g, b].map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8)
}

/// Convert an RGB8 image to an HSV8 image, hue scaled to [0, 255].
///
/// Precondition: the input and output images must have the same size.
pub fn hsv_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let hsv = hsv_pixel_from_rgb([src_pixel[0], src_pixel[1], src_pixel[2]]);
        dst_pixel.copy_from_slice(&hsv);
    });

    Ok(())
}

/// Convert an HSV8 image back to an RGB8 image.
///
/// Precondition: the input and output images must have the same size.
pub fn rgb_from_hsv_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let rgb = rgb_pixel_from_hsv([src_pixel[0], src_pixel[1], src_pixel[2]]);
        dst_pixel.copy_from_slice(&rgb);
    });

    Ok(())
}
