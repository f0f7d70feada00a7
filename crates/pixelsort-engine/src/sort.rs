/// Sort a region in place by a key extracted from each pixel.
///
/// The sort is stable in both directions: pixels with equal keys keep their
/// relative order, also when `flipped` requests a non-increasing order.
///
/// # Example
///
/// ```
/// use pixelsort_engine::sort_region;
///
/// let mut region = [(5, 'a'), (2, 'b'), (5, 'c'), (1, 'd')];
/// sort_region(&mut region, |p| p.0, true);
/// assert_eq!(region, [(5, 'a'), (5, 'c'), (2, 'b'), (1, 'd')]);
/// ```
pub fn sort_region<P, K, F>(region: &mut [P], key: F, flipped: bool)
where
    K: Ord,
    F: Fn(&P) -> K,
{
    if flipped {
        region.sort_by(|a, b| key(b).cmp(&key(a)));
    } else {
        region.sort_by_key(key);
    }
}
