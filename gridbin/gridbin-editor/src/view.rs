//! The auto-expanding editing surface.
//!
//! The visible grid is not tied to the layout's [`GridExtent`]. It is
//! recomputed on every render from the bins plus the in-progress drag, with a
//! margin of empty cells around the content, so a new bin can be dragged past
//! the current layout without clipping. Its size is capped by
//! [`EditorConfig::max_rows`]/[`EditorConfig::max_cols`].
//!
//! [`GridExtent`]: gridbin_types::GridExtent

use gridbin_types::{Bin, CellRect, GridCell, MIN_GRID_SIZE};
use nalgebra::Point2;

use crate::config::EditorConfig;

/// The visible window of cells.
///
/// `offset_x`/`offset_y` is the absolute coordinate of the top-left visible
/// cell; `rows × cols` cells are shown from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualGrid {
    /// Absolute X of the first visible cell.
    pub offset_x: i32,
    /// Absolute Y of the first visible cell.
    pub offset_y: i32,
    /// Visible cells along X.
    pub rows: u32,
    /// Visible cells along Y.
    pub cols: u32,
}

impl VirtualGrid {
    /// Compute the view for `bins` and an optional drag candidate.
    ///
    /// The content rectangle is the union of every bin and the candidate. An
    /// empty layout stands in the 3×3 minimum grid at the origin for the
    /// bins, so the surface does not shrink under the first drag.
    /// The content is padded by `config.margin` cells on both sides of each
    /// axis, then capped at `config.max_rows × config.max_cols`, keeping the
    /// low corner anchored.
    pub fn compute<'a>(
        bins: impl IntoIterator<Item = &'a Bin>,
        candidate: Option<CellRect>,
        config: &EditorConfig,
    ) -> Self {
        let floor = {
            let last = MIN_GRID_SIZE as i32 - 1;
            CellRect::new(GridCell::new(0, 0), GridCell::new(last, last))
        };
        let placed = bins.into_iter().map(Bin::rect).reduce(|acc, rect| acc.union(&rect));

        let content = candidate
            .into_iter()
            .fold(placed.unwrap_or(floor), |acc, rect| acc.union(&rect));

        let padded = content.expand(config.margin as i32);

        Self {
            offset_x: padded.min.x,
            offset_y: padded.min.y,
            rows: padded.width().min(config.max_rows),
            cols: padded.height().min(config.max_cols),
        }
    }

    /// The visible cells as an absolute rectangle.
    pub fn cell_rect(&self) -> CellRect {
        CellRect::new(
            GridCell::new(self.offset_x, self.offset_y),
            GridCell::new(
                self.offset_x + self.rows as i32 - 1,
                self.offset_y + self.cols as i32 - 1,
            ),
        )
    }

    /// Whether an absolute cell is visible.
    pub fn contains(&self, cell: GridCell) -> bool {
        self.cell_rect().contains(cell)
    }

    /// Map a pointer position to an absolute cell.
    ///
    /// The surface rectangle is divided into `rows × cols` uniform cells.
    /// Returns `None` if the point lies outside the visible cells or the
    /// surface has no area.
    pub fn cell_at(&self, point: Point2<f64>, surface: &SurfaceRect) -> Option<GridCell> {
        if surface.width <= 0.0 || surface.height <= 0.0 || self.rows == 0 || self.cols == 0 {
            return None;
        }

        let cell_width = surface.width / f64::from(self.rows);
        let cell_height = surface.height / f64::from(self.cols);

        let col = ((point.x - surface.left) / cell_width).floor();
        let row = ((point.y - surface.top) / cell_height).floor();

        if col < 0.0 || row < 0.0 || col >= f64::from(self.rows) || row >= f64::from(self.cols) {
            return None;
        }

        Some(GridCell::new(
            self.offset_x + col as i32,
            self.offset_y + row as i32,
        ))
    }

    /// Placement of an absolute cell rectangle as fractions of the surface.
    ///
    /// This is how bins and the drag preview are positioned for display.
    /// Values are in `[0, 1]` for visible content and may fall outside for
    /// clipped content.
    pub fn fraction_of(&self, rect: &CellRect) -> SurfaceRect {
        let rows = f64::from(self.rows.max(1));
        let cols = f64::from(self.cols.max(1));
        SurfaceRect {
            left: f64::from(rect.min.x - self.offset_x) / rows,
            top: f64::from(rect.min.y - self.offset_y) / cols,
            width: f64::from(rect.width()) / rows,
            height: f64::from(rect.height()) / cols,
        }
    }
}

/// A screen-space rectangle (pixels, or fractions for [`VirtualGrid::fraction_of`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl SurfaceRect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bin(x0: i32, y0: i32, x1: i32, y1: i32) -> Bin {
        Bin::new(GridCell::new(x0, y0), GridCell::new(x1, y1), 3, 42.0)
    }

    #[test]
    fn test_empty_layout_view() {
        let bins: [Bin; 0] = [];
        let grid = VirtualGrid::compute(&bins, None, &EditorConfig::default());
        assert_eq!(grid.offset_x, -1);
        assert_eq!(grid.offset_y, -1);
        assert_eq!((grid.rows, grid.cols), (5, 5));
    }

    #[test]
    fn test_first_drag_keeps_floor() {
        let bins: [Bin; 0] = [];
        let candidate = CellRect::single(GridCell::new(0, 0));
        let grid = VirtualGrid::compute(&bins, Some(candidate), &EditorConfig::default());
        assert_eq!((grid.rows, grid.cols), (5, 5));
    }

    #[test]
    fn test_view_pads_bins() {
        let bins = [bin(0, 0, 2, 3)];
        let grid = VirtualGrid::compute(&bins, None, &EditorConfig::default());
        assert_eq!((grid.offset_x, grid.offset_y), (-1, -1));
        assert_eq!((grid.rows, grid.cols), (5, 6));
    }

    #[test]
    fn test_view_includes_candidate() {
        let bins = [bin(0, 0, 0, 0)];
        let candidate = CellRect::new(GridCell::new(-3, 0), GridCell::new(-2, 4));
        let grid = VirtualGrid::compute(&bins, Some(candidate), &EditorConfig::default());
        assert_eq!((grid.offset_x, grid.offset_y), (-4, -1));
        assert_eq!((grid.rows, grid.cols), (6, 7));
    }

    #[test]
    fn test_view_capped() {
        let bins = [bin(0, 0, 99, 99)];
        let config = EditorConfig::default().with_max_size(10, 12);
        let grid = VirtualGrid::compute(&bins, None, &config);
        assert_eq!((grid.rows, grid.cols), (10, 12));
        assert_eq!((grid.offset_x, grid.offset_y), (-1, -1));
    }

    #[test]
    fn test_cell_at_uses_offset() {
        let grid = VirtualGrid {
            offset_x: -1,
            offset_y: -1,
            rows: 5,
            cols: 4,
        };
        let surface = SurfaceRect::new(100.0, 50.0, 500.0, 400.0);

        assert_eq!(
            grid.cell_at(Point2::new(101.0, 51.0), &surface),
            Some(GridCell::new(-1, -1))
        );
        assert_eq!(
            grid.cell_at(Point2::new(350.0, 260.0), &surface),
            Some(GridCell::new(1, 1))
        );
        assert_eq!(
            grid.cell_at(Point2::new(599.0, 449.0), &surface),
            Some(GridCell::new(3, 2))
        );
    }

    #[test]
    fn test_cell_at_rejects_outside() {
        let grid = VirtualGrid {
            offset_x: 0,
            offset_y: 0,
            rows: 3,
            cols: 3,
        };
        let surface = SurfaceRect::new(0.0, 0.0, 300.0, 300.0);
        assert_eq!(grid.cell_at(Point2::new(-1.0, 10.0), &surface), None);
        assert_eq!(grid.cell_at(Point2::new(300.0, 10.0), &surface), None);
        assert_eq!(grid.cell_at(Point2::new(10.0, 301.0), &surface), None);
        assert_eq!(
            grid.cell_at(Point2::new(10.0, 10.0), &SurfaceRect::new(0.0, 0.0, 0.0, 0.0)),
            None
        );
    }

    #[test]
    fn test_fraction_of() {
        let grid = VirtualGrid {
            offset_x: -1,
            offset_y: -1,
            rows: 4,
            cols: 5,
        };
        let rect = CellRect::new(GridCell::new(0, 0), GridCell::new(1, 0));
        let frac = grid.fraction_of(&rect);
        assert_relative_eq!(frac.left, 0.25);
        assert_relative_eq!(frac.top, 0.2);
        assert_relative_eq!(frac.width, 0.5);
        assert_relative_eq!(frac.height, 0.2);
    }
}
