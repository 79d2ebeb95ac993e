//! Grid cells and inclusive cell rectangles.

use serde::{Deserialize, Serialize};

/// Largest absolute cell coordinate a layout may use.
///
/// Keeps spans and normalization shifts well inside `i32`.
pub const MAX_GRID_COORD: i32 = 1 << 16;

/// An integer grid coordinate.
///
/// Serialized as a two-element array `[x, y]`, matching the layout JSON
/// consumed by the geometry engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct GridCell {
    /// Column index (along a bin's rows).
    pub x: i32,
    /// Row index (along a bin's cols).
    pub y: i32,
}

impl GridCell {
    /// Create a cell from its coordinates.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return this cell shifted by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Whether both coordinates lie within `±MAX_GRID_COORD`.
    #[inline]
    pub const fn is_in_bounds(self) -> bool {
        self.x.unsigned_abs() <= MAX_GRID_COORD as u32
            && self.y.unsigned_abs() <= MAX_GRID_COORD as u32
    }

    /// Component-wise maximum.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Component-wise minimum.
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }
}

impl From<[i32; 2]> for GridCell {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<GridCell> for [i32; 2] {
    fn from(cell: GridCell) -> Self {
        [cell.x, cell.y]
    }
}

/// An inclusive, axis-aligned rectangle of grid cells.
///
/// `min` is always component-wise less than or equal to `max`; constructors
/// sort the corners.
///
/// # Example
///
/// ```
/// use gridbin_types::{CellRect, GridCell};
///
/// let a = CellRect::new(GridCell::new(0, 0), GridCell::new(2, 2));
/// let b = CellRect::new(GridCell::new(3, 0), GridCell::new(3, 0));
///
/// // Sharing an edge is not an overlap.
/// assert!(!a.overlaps(&b));
/// assert_eq!(a.width(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRect {
    /// Low corner (inclusive).
    pub min: GridCell,
    /// High corner (inclusive).
    pub max: GridCell,
}

impl CellRect {
    /// Create a rectangle from two corners, sorting them per axis.
    #[must_use]
    pub fn new(min: GridCell, max: GridCell) -> Self {
        Self::from_corners(min, max)
    }

    /// Create the rectangle spanned by two arbitrary corners.
    ///
    /// This is how a drag from `a` to `b` becomes a placement regardless of
    /// the drag direction.
    #[must_use]
    pub fn from_corners(a: GridCell, b: GridCell) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A 1×1 rectangle covering a single cell.
    #[inline]
    #[must_use]
    pub const fn single(cell: GridCell) -> Self {
        Self {
            min: cell,
            max: cell,
        }
    }

    /// Number of cells along X.
    #[inline]
    pub fn width(&self) -> u32 {
        span(self.min.x, self.max.x)
    }

    /// Number of cells along Y.
    #[inline]
    pub fn height(&self) -> u32 {
        span(self.min.y, self.max.y)
    }

    /// Inclusive overlap test.
    ///
    /// Two rectangles overlap iff they share at least one cell. The test is
    /// symmetric, and rectangles that only touch along an edge or a corner
    /// (adjacent cells) do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.max.x >= other.min.x
            && other.max.x >= self.min.x
            && self.max.y >= other.min.y
            && other.max.y >= self.min.y
    }

    /// Whether the rectangle covers `cell`.
    #[inline]
    pub fn contains(&self, cell: GridCell) -> bool {
        cell.x >= self.min.x && cell.x <= self.max.x && cell.y >= self.min.y && cell.y <= self.max.y
    }

    /// Smallest rectangle covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow the rectangle by `margin` cells on every side.
    #[must_use]
    pub fn expand(&self, margin: i32) -> Self {
        Self {
            min: self.min.offset(-margin, -margin),
            max: self.max.offset(margin, margin),
        }
    }

    /// Return the rectangle shifted by `(dx, dy)`.
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            min: self.min.offset(dx, dy),
            max: self.max.offset(dx, dy),
        }
    }
}

/// Inclusive cell count of `lo..=hi`, saturating at `u32::MAX`.
fn span(lo: i32, hi: i32) -> u32 {
    let cells = i64::from(hi) - i64::from(lo) + 1;
    u32::try_from(cells.max(0)).unwrap_or(u32::MAX)
}
