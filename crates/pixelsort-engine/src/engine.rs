use rand::{rngs::StdRng, Rng, SeedableRng};

use pixelsort_image::Image;
use pixelsort_imgproc::{
    blend::blend_images,
    color::{alpha_from_rgba, hsv_pixel_from_rgb, rgb_from_rgba},
    mask::foreground_mask,
    parallel::execute_rows,
};

use crate::{
    config::PixelSortConfig,
    error::PixelSortError,
    row::{RowOutcome, RowProcessor},
};

// Pixel of the working image: the HSV key source plus the exact input color.
#[derive(Debug, Clone, Copy, Default)]
struct WorkingPixel {
    hsv: [u8; 3],
    rgb: [u8; 3],
}

/// Random generator of one row.
///
/// Derived from the base seed and the row index only, the result of a seeded
/// run does not depend on how rows are scheduled across threads.
pub fn row_rng(base_seed: u64, row: usize) -> StdRng {
    let mixed = (row as u64)
        .wrapping_add(1)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(base_seed ^ mixed)
}

/// Pixel sort an RGB image.
///
/// Every row is processed independently: it may be skipped, otherwise its
/// active span, the part between the first and last opaque pixel of `mask`,
/// is split into regions which are sorted by the configured HSV channel. The
/// sorted image is finally composited over `src` with the blend mode.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `mask` - Optional opacity mask, nonzero is opaque. Without a mask every
///   pixel is opaque.
/// * `config` - The sort parameters.
///
/// # Returns
///
/// A new image of the size of `src`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the mask size differs
/// from the image size. No row is processed in either case.
///
/// # Example
///
/// ```
/// use pixelsort_engine::{pixel_sort, Partitioning, PixelSortConfig, SortKey};
/// use pixelsort_image::{Image, ImageSize};
///
/// // gray pixels, the value channel equals the gray level
/// let src = Image::<u8, 3>::new(
///     ImageSize { width: 4, height: 1 },
///     vec![3, 3, 3, 1, 1, 1, 4, 4, 4, 2, 2, 2],
/// )
/// .unwrap();
///
/// let config = PixelSortConfig::new(SortKey::Value).with_partitioning(Partitioning::Whole);
/// let sorted = pixel_sort(&src, None, &config).unwrap();
///
/// assert_eq!(sorted.as_slice(), &[1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]);
/// ```
pub fn pixel_sort(
    src: &Image<u8, 3>,
    mask: Option<&Image<u8, 1>>,
    config: &PixelSortConfig,
) -> Result<Image<u8, 3>, PixelSortError> {
    config.validate()?;

    if let Some(mask) = mask {
        if mask.size() != src.size() {
            return Err(PixelSortError::MaskSizeMismatch {
                image: src.size(),
                mask: mask.size(),
            });
        }
    }

    let base_seed = config.seed.unwrap_or_else(|| rand::rng().random());
    log::debug!(
        "pixel sort {} by {} (flipped: {}, skip: {:?}, partitioning: {:?}, mode: {}, seed: {})",
        src.size(),
        config.sort_key,
        config.flipped,
        config.skip,
        config.partitioning,
        config.blend_mode,
        base_seed,
    );

    let (width, height) = (src.width(), src.height());
    if width == 0 || height == 0 {
        return Ok(src.clone());
    }

    let working = src
        .as_slice()
        .chunks_exact(3)
        .map(|p| {
            let rgb = [p[0], p[1], p[2]];
            WorkingPixel {
                hsv: hsv_pixel_from_rgb(rgb),
                rgb,
            }
        })
        .collect::<Vec<_>>();
    let mut sorted = vec![WorkingPixel::default(); working.len()];

    let opaque;
    let mask_values = match mask {
        Some(mask) => mask.as_slice(),
        None => {
            opaque = vec![u8::MAX; width * height];
            opaque.as_slice()
        }
    };

    let processor = RowProcessor::from_config(config);
    let channel = config.sort_key.channel();

    execute_rows(
        config.strategy,
        &working,
        width,
        &mut sorted,
        width,
        |row, src_row, dst_row| {
            let mask_row = &mask_values[row * width..(row + 1) * width];
            let mut rng = row_rng(base_seed, row);
            let outcome = processor.process(
                row,
                src_row,
                mask_row,
                dst_row,
                |p: &WorkingPixel| p.hsv[channel],
                &mut rng,
            )?;
            match outcome {
                RowOutcome::Sorted { span, regions } => log::trace!(
                    "row {row} of {height} sorted, span {}..{} in {regions} regions",
                    span.start,
                    span.end
                ),
                other => log::trace!("row {row} of {height} {other:?}"),
            }
            Ok::<_, PixelSortError>(())
        },
    )?;

    let sorted = Image::<u8, 3>::new(
        src.size(),
        sorted.iter().flat_map(|p| p.rgb).collect(),
    )?;

    let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;
    blend_images(src, &sorted, &mut dst, config.blend_mode)?;

    Ok(dst)
}

/// Pixel sort an RGBA image.
///
/// The alpha channel is the opacity mask unless `mask` is given. The result
/// has no alpha channel.
pub fn pixel_sort_rgba(
    src: &Image<u8, 4>,
    mask: Option<&Image<u8, 1>>,
    config: &PixelSortConfig,
) -> Result<Image<u8, 3>, PixelSortError> {
    let mut rgb = Image::<u8, 3>::from_size_val(src.size(), 0)?;
    rgb_from_rgba(src, &mut rgb)?;

    match mask {
        Some(mask) => pixel_sort(&rgb, Some(mask), config),
        None => {
            let mut alpha = Image::<u8, 1>::from_size_val(src.size(), 0)?;
            alpha_from_rgba(src, &mut alpha)?;
            pixel_sort(&rgb, Some(&alpha), config)
        }
    }
}

/// Pixel sort only the subject of an image.
///
/// The opacity mask is extracted with [`foreground_mask`], so the background
/// ends of every row stay in place.
pub fn pixel_sort_foreground(
    src: &Image<u8, 3>,
    config: &PixelSortConfig,
) -> Result<Image<u8, 3>, PixelSortError> {
    config.validate()?;
    let mask = foreground_mask(src)?;
    pixel_sort(src, Some(&mask), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelsort_image::ImageSize;
    use pixelsort_imgproc::{blend::BlendMode, mask::MaskError};

    use crate::{config::SortKey, partition::Partitioning, skip::SkipPolicy};

    fn gray_row(levels: &[u8]) -> Result<Image<u8, 3>, PixelSortError> {
        let data = levels.iter().flat_map(|&l| [l, l, l]).collect();
        Ok(Image::new(
            ImageSize {
                width: levels.len(),
                height: 1,
            },
            data,
        )?)
    }

    fn whole(key: SortKey) -> PixelSortConfig {
        PixelSortConfig::new(key)
            .with_partitioning(Partitioning::Whole)
            .with_seed(0)
    }

    #[test]
    fn sorts_by_value() -> Result<(), PixelSortError> {
        let src = gray_row(&[3, 1, 4, 2])?;
        let dst = pixel_sort(&src, None, &whole(SortKey::Value))?;
        assert_eq!(dst, gray_row(&[1, 2, 3, 4])?);

        let dst = pixel_sort(&src, None, &whole(SortKey::Value).with_flipped(true))?;
        assert_eq!(dst, gray_row(&[4, 3, 2, 1])?);
        Ok(())
    }

    #[test]
    fn sorts_by_hue() -> Result<(), PixelSortError> {
        // blue, red, green: hue 170, 0, 85
        let src = Image::<u8, 3>::new(
            ImageSize {
                width: 3,
                height: 1,
            },
            vec![0, 0, 255, 255, 0, 0, 0, 255, 0],
        )?;
        let dst = pixel_sort(&src, None, &whole(SortKey::Hue))?;
        assert_eq!(dst.as_slice(), &[255, 0, 0, 0, 255, 0, 0, 0, 255]);
        Ok(())
    }

    #[test]
    fn masked_ends_stay() -> Result<(), PixelSortError> {
        let src = gray_row(&[60, 50, 40, 30, 20, 10])?;
        let mask = Image::<u8, 1>::new(src.size(), vec![0, 0, 255, 255, 255, 0])?;
        let dst = pixel_sort(&src, Some(&mask), &whole(SortKey::Value))?;
        assert_eq!(dst, gray_row(&[60, 50, 20, 30, 40, 10])?);
        Ok(())
    }

    #[test]
    fn mask_size_mismatch() -> Result<(), PixelSortError> {
        let src = gray_row(&[1, 2, 3])?;
        let mask = Image::<u8, 1>::from_size_val([2, 1].into(), 255)?;
        assert_eq!(
            pixel_sort(&src, Some(&mask), &PixelSortConfig::default()),
            Err(PixelSortError::MaskSizeMismatch {
                image: src.size(),
                mask: mask.size(),
            })
        );
        Ok(())
    }

    #[test]
    fn invalid_config_is_rejected() -> Result<(), PixelSortError> {
        let src = gray_row(&[1, 2, 3])?;
        let config = PixelSortConfig::default().with_skip(SkipPolicy::Probabilistic(2.0));
        assert_eq!(
            pixel_sort(&src, None, &config),
            Err(PixelSortError::InvalidSkipProbability(2.0))
        );
        Ok(())
    }

    #[test]
    fn empty_image() -> Result<(), PixelSortError> {
        let src = Image::<u8, 3>::new(
            ImageSize {
                width: 0,
                height: 3,
            },
            vec![],
        )?;
        assert_eq!(pixel_sort(&src, None, &PixelSortConfig::default())?, src);
        Ok(())
    }

    #[test]
    fn blend_after_sort() -> Result<(), PixelSortError> {
        let src = gray_row(&[3, 1, 4, 2])?;
        let config = whole(SortKey::Value).with_blend_mode(BlendMode::Lighter);
        let dst = pixel_sort(&src, None, &config)?;
        assert_eq!(dst, gray_row(&[3, 2, 4, 4])?);
        Ok(())
    }

    #[test]
    fn rgba_uses_alpha() -> Result<(), PixelSortError> {
        let src = Image::<u8, 4>::new(
            ImageSize {
                width: 4,
                height: 1,
            },
            vec![9, 9, 9, 0, 3, 3, 3, 255, 1, 1, 1, 255, 7, 7, 7, 0],
        )?;
        let dst = pixel_sort_rgba(&src, None, &whole(SortKey::Value))?;
        assert_eq!(dst, gray_row(&[9, 1, 3, 7])?);

        let all = Image::<u8, 1>::from_size_val(src.size(), 1)?;
        let dst = pixel_sort_rgba(&src, Some(&all), &whole(SortKey::Value))?;
        assert_eq!(dst, gray_row(&[1, 3, 7, 9])?);
        Ok(())
    }

    #[test]
    fn foreground_of_flat_image() -> Result<(), PixelSortError> {
        let src = Image::<u8, 3>::from_size_val([6, 6].into(), 128)?;
        assert_eq!(
            pixel_sort_foreground(&src, &PixelSortConfig::default()),
            Err(PixelSortError::MaskError(MaskError::NoForegroundRegion))
        );
        Ok(())
    }

    #[test]
    fn row_rng_depends_on_row() {
        let a: u64 = row_rng(1, 0).random();
        let b: u64 = row_rng(1, 1).random();
        let c: u64 = row_rng(1, 0).random();
        assert_ne!(a, b);
        assert_eq!(a, c);
    }
}
