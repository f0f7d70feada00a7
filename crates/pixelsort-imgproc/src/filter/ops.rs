use pixelsort_image::{Image, ImageError};

use super::{kernels, separable_filter};

/// Blur an image using a gaussian blur filter
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_size` - The size of the kernel (kernel_x, kernel_y), odd values.
/// * `sigma` - The sigma of the gaussian kernel. Non-positive values derive
///   sigma from the kernel size.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn gaussian_blur<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel_size: (usize, usize),
    sigma: (f32, f32),
) -> Result<(), ImageError> {
    let sigma_x = if sigma.0 > 0.0 {
        sigma.0
    } else {
        kernels::sigma_from_kernel_size(kernel_size.0)
    };
    let sigma_y = if sigma.1 > 0.0 {
        sigma.1
    } else {
        kernels::sigma_from_kernel_size(kernel_size.1)
    };
    let kernel_x = kernels::gaussian_kernel_1d(kernel_size.0, sigma_x);
    let kernel_y = kernels::gaussian_kernel_1d(kernel_size.1, sigma_y);
    separable_filter(src, dst, &kernel_x, &kernel_y)?;
    Ok(())
}
