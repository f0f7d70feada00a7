#![deny(missing_docs)]
//! Image types for pixel sorting and glitch effects

/// image representation for pixel manipulation purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
