//! Storage bins placed on the grid.

use serde::{Deserialize, Serialize};

use crate::cell::{CellRect, GridCell};

/// Smallest allowed height unit.
pub const BIN_U_MIN: u32 = 1;

/// Largest allowed height unit.
pub const BIN_U_MAX: u32 = 12;

/// Height unit given to bins created from the editor.
pub const DEFAULT_U: u32 = 3;

/// Physical size of one grid cell in millimeters.
pub const DEFAULT_UNIT_SIZE: f64 = 42.0;

/// Physical height of one `u` in millimeters.
pub const U_HEIGHT_MM: f64 = 7.0;

/// Height of the base lip below the first `u`, in millimeters.
pub const BASE_HEIGHT_MM: f64 = 4.4;

/// Whether `u` lies within `BIN_U_MIN..=BIN_U_MAX`.
#[inline]
pub const fn is_valid_u(u: u32) -> bool {
    u >= BIN_U_MIN && u <= BIN_U_MAX
}

/// A rectangular storage bin on the grid.
///
/// `start` and `end` are inclusive cell coordinates. `rows` is the span
/// along X and `cols` the span along Y; every mutator keeps them consistent
/// with `start`/`end`.
///
/// # Example
///
/// ```
/// use gridbin_types::{Bin, GridCell};
///
/// let bin = Bin::new(GridCell::new(0, 0), GridCell::new(2, 1), 3, 42.0);
/// assert_eq!((bin.rows, bin.cols), (3, 2));
/// assert!(bin.is_consistent());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bin {
    /// Height in `u` units.
    pub u: u32,
    /// Number of cells along X.
    pub rows: u32,
    /// Number of cells along Y.
    pub cols: u32,
    /// Millimeters per grid cell.
    pub unit_size: f64,
    /// Low corner (inclusive).
    pub start: GridCell,
    /// High corner (inclusive).
    pub end: GridCell,
    /// Stacking layer. Reserved, always 0.
    #[serde(default)]
    pub layer: u32,
}

impl Bin {
    /// Create a bin covering `start..=end` (corners are sorted).
    #[must_use]
    pub fn new(start: GridCell, end: GridCell, u: u32, unit_size: f64) -> Self {
        Self::from_rect(CellRect::from_corners(start, end), u, unit_size)
    }

    /// Create a bin covering `rect`.
    #[must_use]
    pub fn from_rect(rect: CellRect, u: u32, unit_size: f64) -> Self {
        Self {
            u,
            rows: rect.width(),
            cols: rect.height(),
            unit_size,
            start: rect.min,
            end: rect.max,
            layer: 0,
        }
    }

    /// The footprint as a cell rectangle.
    #[inline]
    pub fn rect(&self) -> CellRect {
        CellRect {
            min: self.start,
            max: self.end,
        }
    }

    /// Move this bin onto `rect`, keeping height, unit size and layer.
    #[must_use]
    pub fn with_rect(mut self, rect: CellRect) -> Self {
        self.start = rect.min;
        self.end = rect.max;
        self.rows = rect.width();
        self.cols = rect.height();
        self
    }

    /// Return the bin with a different height.
    #[must_use]
    pub fn with_u(mut self, u: u32) -> Self {
        self.u = u;
        self
    }

    /// Return the bin shifted by `(dx, dy)` cells.
    #[must_use]
    pub fn translated(self, dx: i32, dy: i32) -> Self {
        let rect = self.rect().translate(dx, dy);
        self.with_rect(rect)
    }

    /// Exclusive X bound (`start.x + rows`).
    #[inline]
    pub fn end_x_exclusive(&self) -> i32 {
        self.start.x + self.rows as i32
    }

    /// Exclusive Y bound (`start.y + cols`).
    #[inline]
    pub fn end_y_exclusive(&self) -> i32 {
        self.start.y + self.cols as i32
    }

    /// Number of grid cells covered (`rows × cols`).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Whether both corners lie within `±MAX_GRID_COORD`.
    pub fn is_in_bounds(&self) -> bool {
        self.start.is_in_bounds() && self.end.is_in_bounds()
    }

    /// Whether `rows`/`cols` agree with `start`/`end` and the corners are ordered.
    pub fn is_consistent(&self) -> bool {
        self.start.x <= self.end.x
            && self.start.y <= self.end.y
            && self.rows == self.rect().width()
            && self.cols == self.rect().height()
    }

    /// Physical footprint `(x, y)` in millimeters.
    pub fn footprint_mm(&self) -> (f64, f64) {
        (
            f64::from(self.rows) * self.unit_size,
            f64::from(self.cols) * self.unit_size,
        )
    }

    /// Physical height in millimeters, excluding the base lip.
    pub fn height_mm(&self) -> f64 {
        f64::from(self.u) * U_HEIGHT_MM
    }
}
