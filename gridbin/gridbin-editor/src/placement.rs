//! Overlap checks for candidate placements.

use gridbin_types::{Bin, CellRect};

/// Index of the first bin overlapping `candidate`, skipping `except`.
///
/// `except` is the bin being resized: a bin never collides with its own
/// previous footprint.
///
/// # Example
///
/// ```
/// use gridbin_editor::find_overlap;
/// use gridbin_types::{Bin, CellRect, GridCell};
///
/// let bins = [Bin::new(GridCell::new(0, 0), GridCell::new(2, 2), 3, 42.0)];
/// let inside = CellRect::new(GridCell::new(1, 1), GridCell::new(2, 2));
/// let beside = CellRect::new(GridCell::new(3, 0), GridCell::new(3, 0));
///
/// assert_eq!(find_overlap(&bins, &inside, None), Some(0));
/// assert_eq!(find_overlap(&bins, &inside, Some(0)), None);
/// assert_eq!(find_overlap(&bins, &beside, None), None);
/// ```
pub fn find_overlap(bins: &[Bin], candidate: &CellRect, except: Option<usize>) -> Option<usize> {
    bins.iter()
        .enumerate()
        .filter(|&(index, _)| Some(index) != except)
        .find(|(_, bin)| bin.rect().overlaps(candidate))
        .map(|(index, _)| index)
}

/// Whether two bins share any cell.
pub fn bins_overlap(a: &Bin, b: &Bin) -> bool {
    a.rect().overlaps(&b.rect())
}

/// Whether any two bins in the set overlap.
///
/// This is the layout invariant the editor maintains; it is quadratic and
/// meant for validation, not per-event checks.
pub fn has_any_overlap(bins: &[Bin]) -> bool {
    bins.iter()
        .enumerate()
        .any(|(i, a)| bins[i + 1..].iter().any(|b| bins_overlap(a, b)))
}
