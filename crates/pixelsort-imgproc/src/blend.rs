use std::{fmt, str::FromStr};

use pixelsort_image::{Image, ImageError};

use crate::parallel;

/// Weight given to the second image by [`BlendMode::Blend`].
pub const BLEND_RATIO: f32 = 0.6;

/// Error returned when a blend mode name is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown blend mode: {0}")]
pub struct ParseBlendModeError(pub String);

/// Named per-channel functions combining two images into one.
///
/// In every formula `a` is the sample of the first (base) image and `b` the
/// sample of the second image, both in [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Return the second image unchanged.
    #[default]
    None,
    /// `min(a + b, 255)`
    Add,
    /// Linear interpolation, [`BLEND_RATIO`] toward the second image.
    Blend,
    /// `min(a, b)`
    Darker,
    /// `max(a, b)`
    Lighter,
    /// `|a - b|`
    Difference,
    /// `a * b / 255`
    Multiply,
    /// `255 - (255 - a) * (255 - b) / 255`
    Screen,
    /// Multiply or screen depending on the base sample.
    Overlay,
    /// Multiply or screen depending on the second sample.
    HardLight,
    /// Soft light as defined by PIL's `ImageChops.soft_light`.
    SoftLight,
    /// `max(a - b, 0)`
    Subtract,
}

impl BlendMode {
    /// All supported modes.
    pub const ALL: [BlendMode; 12] = [
        BlendMode::None,
        BlendMode::Add,
        BlendMode::Blend,
        BlendMode::Darker,
        BlendMode::Lighter,
        BlendMode::Difference,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Subtract,
    ];

    /// The canonical name of the mode.
    pub fn name(&self) -> &'static str {
        match self {
            BlendMode::None => "none",
            BlendMode::Add => "add",
            BlendMode::Blend => "blend",
            BlendMode::Darker => "darker",
            BlendMode::Lighter => "lighter",
            BlendMode::Difference => "difference",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::HardLight => "hardlight",
            BlendMode::SoftLight => "softlight",
            BlendMode::Subtract => "subtract",
        }
    }

    /// Combine one sample of each image.
    ///
    /// # Example
    ///
    /// ```
    /// use pixelsort_imgproc::blend::BlendMode;
    ///
    /// assert_eq!(BlendMode::None.apply(10, 200), 200);
    /// assert_eq!(BlendMode::Darker.apply(10, 200), 10);
    /// assert_eq!(BlendMode::Add.apply(200, 100), 255);
    /// assert_eq!(BlendMode::Blend.apply(0, 100), 60);
    /// ```
    pub fn apply(&self, a: u8, b: u8) -> u8 {
        let (a32, b32) = (a as u32, b as u32);
        match self {
            BlendMode::None => b,
            BlendMode::Add => a.saturating_add(b),
            BlendMode::Blend => {
                let mixed = a as f32 * (1.0 - BLEND_RATIO) + b as f32 * BLEND_RATIO;
                mixed.round().clamp(0.0, 255.0) as u8
            }
            BlendMode::Darker => a.min(b),
            BlendMode::Lighter => a.max(b),
            BlendMode::Difference => a.abs_diff(b),
            BlendMode::Multiply => (a32 * b32 / 255) as u8,
            BlendMode::Screen => (255 - (255 - a32) * (255 - b32) / 255) as u8,
            BlendMode::Overlay => hard_mix(a32, b32, a32),
            BlendMode::HardLight => hard_mix(a32, b32, b32),
            BlendMode::SoftLight => {
                let dark = (255 - a32) * (a32 * b32) / 65536;
                let light = a32 * (255 - (255 - a32) * (255 - b32) / 255) / 255;
                (dark + light).min(255) as u8
            }
            BlendMode::Subtract => a.saturating_sub(b),
        }
    }
}

// multiply below the midpoint of `selector`, screen above it
fn hard_mix(a: u32, b: u32, selector: u32) -> u8 {
    if selector < 128 {
        (2 * a * b / 255).min(255) as u8
    } else {
        255u32.saturating_sub(2 * (255 - a) * (255 - b) / 255) as u8
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = ParseBlendModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.trim().to_ascii_lowercase().as_str() {
            "none" => BlendMode::None,
            "add" => BlendMode::Add,
            "blend" => BlendMode::Blend,
            "darker" => BlendMode::Darker,
            "lighter" => BlendMode::Lighter,
            "difference" => BlendMode::Difference,
            "multiply" => BlendMode::Multiply,
            "screen" => BlendMode::Screen,
            "overlay" => BlendMode::Overlay,
            "hardlight" | "hard_light" => BlendMode::HardLight,
            "softlight" | "soft_light" => BlendMode::SoftLight,
            "subtract" => BlendMode::Subtract,
            _ => return Err(ParseBlendModeError(s.to_string())),
        };
        Ok(mode)
    }
}

/// Composite two images of the same size sample by sample.
///
/// # Arguments
///
/// * `src1` - The first (base) image.
/// * `src2` - The second image.
/// * `dst` - The output image.
/// * `mode` - The blend function applied to every channel of every pixel.
///
/// # Errors
///
/// Returns an error if the sizes of `src1`, `src2` and `dst` do not match.
///
/// # Example
///
/// ```
/// use pixelsort_image::{Image, ImageSize};
/// use pixelsort_imgproc::blend::{blend_images, BlendMode};
///
/// let size = ImageSize { width: 1, height: 1 };
/// let a = Image::<u8, 3>::new(size, vec![10, 100, 255]).unwrap();
/// let b = Image::<u8, 3>::new(size, vec![20, 50, 0]).unwrap();
/// let mut dst = Image::<u8, 3>::from_size_val(size, 0).unwrap();
///
/// blend_images(&a, &b, &mut dst, BlendMode::Lighter).unwrap();
/// assert_eq!(dst.as_slice(), &[20, 100, 255]);
/// ```
pub fn blend_images<const C: usize>(
    src1: &Image<u8, C>,
    src2: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    mode: BlendMode,
) -> Result<(), ImageError> {
    if src1.size() != src2.size() {
        return Err(ImageError::InvalidImageSize(
            src1.cols(),
            src1.rows(),
            src2.cols(),
            src2.rows(),
        ));
    }

    if src1.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src1.cols(),
            src1.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if mode == BlendMode::None {
        dst.as_slice_mut().copy_from_slice(src2.as_slice());
        return Ok(());
    }

    parallel::par_iter_rows_val_two(src1, src2, dst, |&a, &b, out| {
        *out = mode.apply(a, b);
    });

    Ok(())
}
