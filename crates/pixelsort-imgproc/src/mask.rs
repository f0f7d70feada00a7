use std::collections::VecDeque;

use pixelsort_image::{Image, ImageError};

use crate::{color, filter, threshold};

/// Kernel size of the blur applied before thresholding.
pub const BLUR_KERNEL_SIZE: usize = 5;

/// Errors that can occur while extracting a foreground mask.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MaskError {
    /// Error related to image.
    #[error(transparent)]
    ImageError(#[from] ImageError),

    /// The thresholded image contains no foreground pixel.
    #[error("No foreground region found in the image")]
    NoForegroundRegion,
}

const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const NEIGHBORS_4: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

fn neighbor(
    x: usize,
    y: usize,
    (dx, dy): (isize, isize),
    width: usize,
    height: usize,
) -> Option<usize> {
    let nx = x.checked_add_signed(dx)?;
    let ny = y.checked_add_signed(dy)?;
    (nx < width && ny < height).then_some(ny * width + nx)
}

/// Separate the subject of an image from its background.
///
/// The image is converted to grayscale, blurred with a 5x5 gaussian kernel,
/// binarized with Otsu's threshold and reduced to its largest foreground
/// region, whose holes are filled. Works best when the subject takes up most
/// of the frame.
///
/// # Returns
///
/// A single channel mask with 255 on the foreground and 0 elsewhere.
///
/// # Errors
///
/// Returns [`MaskError::NoForegroundRegion`] when thresholding leaves no
/// foreground pixel.
pub fn foreground_mask(src: &Image<u8, 3>) -> Result<Image<u8, 1>, MaskError> {
    let mut gray = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    color::gray_from_rgb_u8(src, &mut gray)?;

    let gray_f32 = gray.cast_and_scale_f32(1.0);
    let mut blurred = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    filter::gaussian_blur(
        &gray_f32,
        &mut blurred,
        (BLUR_KERNEL_SIZE, BLUR_KERNEL_SIZE),
        (0.0, 0.0),
    )?;

    let blurred_u8 = Image::<u8, 1>::new(
        src.size(),
        blurred
            .as_slice()
            .iter()
            .map(|v| v.round().clamp(0.0, 255.0) as u8)
            .collect(),
    )?;

    let mut binary = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    let level = threshold::threshold_otsu(&blurred_u8, &mut binary, 255)?;
    log::debug!("foreground threshold level: {level}");

    largest_region_mask(&binary)
}

/// Keep only the largest 8-connected foreground region of a binary image and
/// fill its holes.
///
/// Any nonzero pixel is foreground. Holes are background pockets that cannot
/// reach the image border without crossing the region.
///
/// # Example
///
/// ```
/// use pixelsort_image::{Image, ImageSize};
/// use pixelsort_imgproc::mask::largest_region_mask;
///
/// let bin = Image::<u8, 1>::new(
///     ImageSize { width: 5, height: 1 },
///     vec![255, 0, 255, 255, 255],
/// ).unwrap();
///
/// let mask = largest_region_mask(&bin).unwrap();
/// assert_eq!(mask.as_slice(), &[0, 0, 255, 255, 255]);
/// ```
pub fn largest_region_mask(binary: &Image<u8, 1>) -> Result<Image<u8, 1>, MaskError> {
    let (width, height) = (binary.width(), binary.height());
    let values = binary.as_slice();

    // label 8-connected components and remember the largest one
    let mut labels = vec![0u32; values.len()];
    let mut queue = VecDeque::new();
    let mut next_label = 0u32;
    let mut best: Option<(u32, usize)> = None;

    for start in 0..values.len() {
        if values[start] == 0 || labels[start] != 0 {
            continue;
        }
        next_label += 1;
        labels[start] = next_label;
        queue.push_back(start);
        let mut area = 0usize;

        while let Some(idx) = queue.pop_front() {
            area += 1;
            let (x, y) = (idx % width, idx / width);
            for offset in NEIGHBORS_8 {
                if let Some(n) = neighbor(x, y, offset, width, height) {
                    if values[n] != 0 && labels[n] == 0 {
                        labels[n] = next_label;
                        queue.push_back(n);
                    }
                }
            }
        }

        if best.map_or(true, |(_, best_area)| area > best_area) {
            best = Some((next_label, area));
        }
    }

    let (region, _) = best.ok_or(MaskError::NoForegroundRegion)?;
    let inside: Vec<bool> = labels.iter().map(|&l| l == region).collect();

    // flood the outside from the border through non-region pixels
    let mut outside = vec![false; values.len()];
    for idx in 0..values.len() {
        let (x, y) = (idx % width, idx / width);
        let on_border = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
        if on_border && !inside[idx] {
            outside[idx] = true;
            queue.push_back(idx);
        }
    }
    while let Some(idx) = queue.pop_front() {
        let (x, y) = (idx % width, idx / width);
        for offset in NEIGHBORS_4 {
            if let Some(n) = neighbor(x, y, offset, width, height) {
                if !inside[n] && !outside[n] {
                    outside[n] = true;
                    queue.push_back(n);
                }
            }
        }
    }

    let mask = outside.iter().map(|&o| if o { 0 } else { 255 }).collect();
    Ok(Image::new(binary.size(), mask)?)
}
