//! Grid sizing and coordinate normalization.
//!
//! Both functions are pure; [`crate::BinStore`] calls them after every
//! mutation to keep its derived extent current.

use gridbin_types::{Bin, GridExtent, MIN_GRID_SIZE};

/// Compute the smallest grid containing every bin, with a 3×3 floor.
///
/// Each bin contributes its exclusive bounds `start.x + rows` and
/// `start.y + cols`. Bins are expected to be normalized; negative bounds
/// simply never raise the extent.
///
/// # Example
///
/// ```
/// use gridbin_layout::calculate_grid_size;
/// use gridbin_types::{Bin, GridCell, GridExtent};
///
/// assert_eq!(calculate_grid_size(&[]), GridExtent::new(3, 3));
///
/// let bins = [
///     Bin::new(GridCell::new(0, 0), GridCell::new(2, 2), 3, 42.0),
///     Bin::new(GridCell::new(3, 0), GridCell::new(3, 0), 3, 42.0),
/// ];
/// assert_eq!(calculate_grid_size(&bins), GridExtent::new(4, 3));
/// ```
pub fn calculate_grid_size(bins: &[Bin]) -> GridExtent {
    let (max_x, max_y) = bins.iter().fold((0_i32, 0_i32), |(mx, my), bin| {
        (mx.max(bin.end_x_exclusive()), my.max(bin.end_y_exclusive()))
    });

    GridExtent::new(
        MIN_GRID_SIZE.max(max_x.max(0) as u32),
        MIN_GRID_SIZE.max(max_y.max(0) as u32),
    )
}

/// Shift a bin set so that no coordinate is negative.
///
/// If the minimum `start` is already non-negative on both axes the bins are
/// returned unchanged. Otherwise every bin moves by
/// `(max(0, -min_x), max(0, -min_y))`, which puts the lowest coordinate on
/// each negative axis at exactly 0. Relative placement is preserved, so a
/// non-overlapping set stays non-overlapping. Applying it twice is the same
/// as applying it once.
pub fn normalize_bins(bins: Vec<Bin>) -> Vec<Bin> {
    let Some((dx, dy)) = normalization_offset(&bins) else {
        return bins;
    };

    bins.into_iter().map(|bin| bin.translated(dx, dy)).collect()
}

/// The shift [`normalize_bins`] would apply, or `None` if it is a no-op.
pub fn normalization_offset(bins: &[Bin]) -> Option<(i32, i32)> {
    let min_x = bins.iter().map(|b| b.start.x).min()?;
    let min_y = bins.iter().map(|b| b.start.y).min()?;

    if min_x >= 0 && min_y >= 0 {
        return None;
    }

    Some((min_x.saturating_neg().max(0), min_y.saturating_neg().max(0)))
}
