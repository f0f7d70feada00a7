use std::ops::Range;

/// The contiguous span of a row that is eligible for sorting.
///
/// `start` is inclusive and `end` exclusive, so `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSpan {
    /// Index of the first opaque pixel.
    pub start: usize,
    /// One past the index of the last opaque pixel.
    pub end: usize,
}

impl ActiveSpan {
    /// Number of pixels in the span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Index of the last opaque pixel.
    pub fn last(&self) -> usize {
        self.end - 1
    }

    /// Always false, an active span holds at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The span as a range of column indices.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Find the first and last opaque pixel of a row.
///
/// A mask value is opaque when it is nonzero. Transparent pixels strictly
/// between the first and last opaque ones belong to the span.
///
/// # Returns
///
/// `None` when the row has no opaque pixel.
///
/// # Example
///
/// ```
/// use pixelsort_engine::{find_active_span, ActiveSpan};
///
/// let span = find_active_span(&[0, 0, 1, 0, 1, 0]);
/// assert_eq!(span, Some(ActiveSpan { start: 2, end: 5 }));
/// assert_eq!(find_active_span(&[0, 0, 0]), None);
/// ```
pub fn find_active_span(mask_row: &[u8]) -> Option<ActiveSpan> {
    let start = mask_row.iter().position(|&m| m != 0)?;
    let last = mask_row.iter().rposition(|&m| m != 0)?;
    Some(ActiveSpan {
        start,
        end: last + 1,
    })
}
