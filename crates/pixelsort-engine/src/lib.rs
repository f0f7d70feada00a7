#![deny(missing_docs)]
//! # Pixel sorting engine
//!
//! Rows of an image are split into runs of pixels which are sorted by a color
//! channel, selectively and at random, then composited over the original.

/// Active span detection against an opacity mask.
pub mod boundary;

/// Typed and untyped configuration of a sort.
pub mod config;

/// The orchestrator running the sort over a whole image.
pub mod engine;

/// Error types for the engine.
pub mod error;

/// Randomized region partitioning of an active span.
pub mod partition;

/// Per-row processing.
pub mod row;

/// Row skip policies.
pub mod skip;

/// Stable region sorting.
pub mod sort;

pub use crate::boundary::{find_active_span, ActiveSpan};
pub use crate::config::{PixelSortConfig, SortKey, SortOptions};
pub use crate::engine::{pixel_sort, pixel_sort_foreground, pixel_sort_rgba, row_rng};
pub use crate::error::PixelSortError;
pub use crate::partition::{Partitioning, Regions};
pub use crate::row::{RowOutcome, RowProcessor};
pub use crate::skip::SkipPolicy;
pub use crate::sort::sort_region;

pub use pixelsort_imgproc::blend::BlendMode;
pub use pixelsort_imgproc::parallel::ExecutionStrategy;
