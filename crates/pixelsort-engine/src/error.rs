use pixelsort_image::{ImageError, ImageSize};
use pixelsort_imgproc::{blend::ParseBlendModeError, mask::MaskError, parallel::ParallelError};

/// Errors that can occur while pixel sorting an image.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PixelSortError {
    /// The sort field name is not one of hue, saturation or value.
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    /// The blend mode name is not recognized.
    #[error("Unknown blend mode: {0}")]
    UnknownBlendMode(String),

    /// The lower region bound exceeds the upper one.
    #[error("region_min ({min}) must not exceed region_max ({max})")]
    InvertedRegionBounds {
        /// The lower bound.
        min: f64,
        /// The upper bound.
        max: f64,
    },

    /// A region bound is outside (0, 1].
    #[error("Region bound must be in (0, 1], got {0}")]
    RegionBoundOutOfRange(f64),

    /// The skip interval is negative.
    #[error("Skip interval must be non-negative, got {0}")]
    NegativeSkipInterval(i64),

    /// The skip probability is outside [0, 1].
    #[error("Skip probability must be in [0, 1], got {0}")]
    InvalidSkipProbability(f64),

    /// Both a skip interval and a skip probability were given.
    #[error("skip_interval and skip_probability are mutually exclusive")]
    ConflictingSkipPolicies,

    /// The opacity mask does not have the size of the image.
    #[error("Mask size {mask} does not match image size {image}")]
    MaskSizeMismatch {
        /// The size of the source image.
        image: ImageSize,
        /// The size of the supplied mask.
        mask: ImageSize,
    },

    /// A processed row does not have the width of the image.
    #[error("Row {row} has {actual} pixels, expected {expected}")]
    RowLengthMismatch {
        /// The row index.
        row: usize,
        /// The image width.
        expected: usize,
        /// The assembled row length.
        actual: usize,
    },

    /// The regions of a row do not cover its active span exactly.
    #[error("Regions of row {row} cover {covered} pixels of a {span} pixel span")]
    RegionCoverageMismatch {
        /// The row index.
        row: usize,
        /// The number of pixels covered by the regions.
        covered: usize,
        /// The length of the active span.
        span: usize,
    },

    /// Error related to image.
    #[error(transparent)]
    ImageError(#[from] ImageError),

    /// Error related to the row scheduler.
    #[error(transparent)]
    ParallelError(#[from] ParallelError),

    /// Error raised by the foreground mask extraction.
    #[error(transparent)]
    MaskError(#[from] MaskError),
}

impl PixelSortError {
    /// Whether the error comes from an invalid configuration, detected before
    /// any row is processed.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            PixelSortError::UnknownSortField(_)
                | PixelSortError::UnknownBlendMode(_)
                | PixelSortError::InvertedRegionBounds { .. }
                | PixelSortError::RegionBoundOutOfRange(_)
                | PixelSortError::NegativeSkipInterval(_)
                | PixelSortError::InvalidSkipProbability(_)
                | PixelSortError::ConflictingSkipPolicies
                | PixelSortError::ParallelError(ParallelError::InvalidThreadCount(_))
        )
    }

    /// Whether the error is an internal row assembly failure.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            PixelSortError::RowLengthMismatch { .. } | PixelSortError::RegionCoverageMismatch { .. }
        )
    }
}

impl From<ParseBlendModeError> for PixelSortError {
    fn from(err: ParseBlendModeError) -> Self {
        PixelSortError::UnknownBlendMode(err.0)
    }
}
