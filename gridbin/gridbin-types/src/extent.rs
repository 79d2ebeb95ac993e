//! Grid extents and the serialized layout.

use serde::{Deserialize, Serialize};

use crate::bin::Bin;

/// Floor on both grid dimensions.
pub const MIN_GRID_SIZE: u32 = 3;

/// Bounding grid of a bin set, in cells, relative to a normalized origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridExtent {
    /// Cells along X.
    pub total_rows: u32,
    /// Cells along Y.
    pub total_cols: u32,
}

impl GridExtent {
    /// Create an extent.
    #[inline]
    #[must_use]
    pub const fn new(total_rows: u32, total_cols: u32) -> Self {
        Self {
            total_rows,
            total_cols,
        }
    }

    /// The 3×3 extent of an empty layout.
    #[inline]
    #[must_use]
    pub const fn minimum() -> Self {
        Self::new(MIN_GRID_SIZE, MIN_GRID_SIZE)
    }
}

impl Default for GridExtent {
    fn default() -> Self {
        Self::minimum()
    }
}

/// The layout handed to the geometry engine.
///
/// Field names follow the engine's JSON input (`totalRows`, `totalCols`,
/// `bins`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// Grid extent.
    #[serde(flatten)]
    pub extent: GridExtent,
    /// Bins in store order.
    pub bins: Vec<Bin>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridCell;

    #[test]
    fn test_default_is_minimum() {
        assert_eq!(GridExtent::default(), GridExtent::new(3, 3));
    }

    #[test]
    fn test_layout_json_shape() {
        let layout = Layout {
            extent: GridExtent::new(4, 3),
            bins: vec![Bin::new(GridCell::new(0, 0), GridCell::new(2, 2), 3, 42.0)],
        };
        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["totalRows"], 4);
        assert_eq!(json["totalCols"], 3);
        assert_eq!(json["bins"].as_array().map(Vec::len), Some(1));

        let back: Layout = serde_json::from_value(json).unwrap();
        assert_eq!(back, layout);
    }
}
