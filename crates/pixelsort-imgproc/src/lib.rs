#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
/// per-channel blend modes used to composite two images.
pub mod blend;

/// color transformations module.
pub mod color;

/// image filtering module.
pub mod filter;

/// compute image histogram module.
pub mod histogram;

/// foreground mask extraction module.
pub mod mask;

/// synthetic noise injection module.
pub mod noise;

/// module containing parallization utilities.
pub mod parallel;

/// channel shift glitch effect module.
pub mod shift;

/// operations to threshold images.
pub mod threshold;
