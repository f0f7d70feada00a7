use pixelsort_image::{Image, ImageError};
use rand::Rng;

/// Add uniform noise to every channel of an image.
///
/// Each sample is offset by an independent draw from
/// `[-amplitude, amplitude]` and clamped to [0, 255]. Perturbing an image this
/// way before extracting a mask exaggerates the sorted streaks.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image.
/// * `amplitude` - The maximum absolute offset.
/// * `rng` - The random generator that drives the noise.
///
/// # Example
///
/// ```
/// use pixelsort_image::{Image, ImageSize};
/// use pixelsort_imgproc::noise::add_uniform_noise;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let image = Image::<u8, 3>::from_size_val(ImageSize { width: 4, height: 4 }, 128).unwrap();
/// let mut noisy = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(7);
/// add_uniform_noise(&image, &mut noisy, 10, &mut rng).unwrap();
/// assert!(noisy.as_slice().iter().all(|&v| (118..=138).contains(&v)));
/// ```
pub fn add_uniform_noise<const C: usize, R: Rng>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    amplitude: u8,
    rng: &mut R,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let amplitude = amplitude as i16;
    src.as_slice()
        .iter()
        .zip(dst.as_slice_mut().iter_mut())
        .for_each(|(&s, d)| {
            let offset = rng.random_range(-amplitude..=amplitude);
            *d = (s as i16 + offset).clamp(0, 255) as u8;
        });

    Ok(())
}
