//! The authoritative bin collection.
//!
//! [`BinStore`] owns the bin list and its derived [`GridExtent`]. Every
//! mutator normalizes the full set and recomputes the extent, so readers
//! never observe a stale extent or negative coordinates.
//!
//! The store does not check for overlap; callers (the layout editor) are
//! expected to validate placements before committing them.

use gridbin_types::{
    BASE_HEIGHT_MM, BIN_U_MAX, BIN_U_MIN, Bin, CellRect, GridCell, GridExtent, Layout,
    MAX_GRID_COORD, U_HEIGHT_MM, is_valid_u,
};
use tracing::{debug, info};

use crate::error::{LayoutError, LayoutResult};
use crate::grid::{calculate_grid_size, normalize_bins};

/// The bin collection plus its derived grid extent.
///
/// # Example
///
/// ```
/// use gridbin_layout::BinStore;
/// use gridbin_types::{Bin, GridCell, GridExtent};
///
/// let mut store = BinStore::new();
/// store.add_bin(Bin::new(GridCell::new(0, 0), GridCell::new(2, 2), 3, 42.0));
/// store.add_bin(Bin::new(GridCell::new(3, 0), GridCell::new(3, 0), 3, 42.0));
///
/// assert_eq!(store.len(), 2);
/// assert_eq!(store.extent(), GridExtent::new(4, 3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BinStore {
    bins: Vec<Bin>,
    extent: GridExtent,
    revision: u64,
}

impl BinStore {
    /// Create an empty store with a 3×3 extent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an existing bin list.
    ///
    /// The bins are made consistent and normalized.
    #[must_use]
    pub fn from_bins(bins: Vec<Bin>) -> Self {
        let mut store = Self {
            bins: bins.into_iter().map(conform).collect(),
            extent: GridExtent::minimum(),
            revision: 0,
        };
        store.refresh();
        store
    }

    /// Load a store from layout JSON as produced by [`Self::to_layout_json`].
    ///
    /// The stored extent is ignored and re-derived from the bins.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Json`] if the input is not a valid layout, or
    /// [`LayoutError::InvalidBin`] if a bin has an out-of-range height, a
    /// corner beyond `±MAX_GRID_COORD`, or a non-positive unit size.
    pub fn from_layout_json(json: &str) -> LayoutResult<Self> {
        let layout: Layout = serde_json::from_str(json)?;
        for (index, bin) in layout.bins.iter().enumerate() {
            check_loaded(index, bin)?;
        }
        let store = Self::from_bins(layout.bins);
        info!(bins = store.len(), extent = ?store.extent, "Loaded layout");
        Ok(store)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// All bins in insertion order.
    #[inline]
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// The bin at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Bin> {
        self.bins.get(index)
    }

    /// Number of bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Whether the store has no bins.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// The current grid extent.
    #[inline]
    pub fn extent(&self) -> GridExtent {
        self.extent
    }

    /// Monotonic counter bumped by every mutation.
    ///
    /// Consumers cache derived results (such as composed geometry) against it.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Index of the bin covering `cell`, if any.
    pub fn bin_at(&self, cell: GridCell) -> Option<usize> {
        self.bins.iter().position(|bin| bin.rect().contains(cell))
    }

    /// Largest `u` over all bins, 0 when empty.
    pub fn max_u(&self) -> u32 {
        self.bins.iter().map(|bin| bin.u).max().unwrap_or(0)
    }

    /// Physical envelope `(x, y, z)` of the layout in millimeters.
    ///
    /// X and Y follow the grid extent; Z is the tallest bin plus the base lip.
    /// The unit size of the first bin is used, falling back to the default.
    pub fn envelope_mm(&self) -> (f64, f64, f64) {
        let unit = self
            .bins
            .first()
            .map_or(gridbin_types::DEFAULT_UNIT_SIZE, |bin| bin.unit_size);
        (
            f64::from(self.extent.total_rows) * unit,
            f64::from(self.extent.total_cols) * unit,
            f64::from(self.max_u()).mul_add(U_HEIGHT_MM, BASE_HEIGHT_MM),
        )
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Append a bin, then normalize and recompute the extent.
    ///
    /// A bin placed at negative coordinates shifts every bin so that the
    /// origin stays at 0. Returns the index of the new bin.
    pub fn add_bin(&mut self, bin: Bin) -> usize {
        self.bins.push(conform(bin));
        self.refresh();
        let index = self.bins.len() - 1;
        debug!(index, extent = ?self.extent, "Added bin");
        index
    }

    /// Remove the bin at `index`, then normalize and recompute the extent.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::IndexOutOfRange`] if `index` is not a stored bin.
    pub fn remove_bin(&mut self, index: usize) -> LayoutResult<Bin> {
        self.check_index(index)?;
        let removed = self.bins.remove(index);
        self.refresh();
        debug!(index, extent = ?self.extent, "Removed bin");
        Ok(removed)
    }

    /// Replace the bin at `index`, then normalize and recompute the extent.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::IndexOutOfRange`] if `index` is not a stored bin.
    pub fn update_bin(&mut self, index: usize, bin: Bin) -> LayoutResult<()> {
        self.check_index(index)?;
        self.bins[index] = conform(bin);
        self.refresh();
        debug!(index, extent = ?self.extent, "Updated bin");
        Ok(())
    }

    /// Change the height of the bin at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::HeightOutOfRange`] if `u` is outside
    /// `BIN_U_MIN..=BIN_U_MAX`, or [`LayoutError::IndexOutOfRange`].
    pub fn set_bin_u(&mut self, index: usize, u: u32) -> LayoutResult<()> {
        if !is_valid_u(u) {
            return Err(LayoutError::HeightOutOfRange { u });
        }
        let bin = self
            .get(index)
            .cloned()
            .ok_or(LayoutError::IndexOutOfRange {
                index,
                len: self.len(),
            })?;
        self.update_bin(index, bin.with_u(u))
    }

    /// Remove every bin.
    pub fn clear(&mut self) {
        self.bins.clear();
        self.refresh();
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Snapshot of the layout for the geometry engine.
    pub fn layout(&self) -> Layout {
        Layout {
            extent: self.extent,
            bins: self.bins.clone(),
        }
    }

    /// Serialize the layout as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Json`] if serialization fails.
    pub fn to_layout_json(&self) -> LayoutResult<String> {
        Ok(serde_json::to_string(&self.layout())?)
    }

    fn check_index(&self, index: usize) -> LayoutResult<()> {
        if index < self.bins.len() {
            Ok(())
        } else {
            Err(LayoutError::IndexOutOfRange {
                index,
                len: self.bins.len(),
            })
        }
    }

    fn refresh(&mut self) {
        self.bins = normalize_bins(std::mem::take(&mut self.bins));
        self.extent = calculate_grid_size(&self.bins);
        self.revision += 1;
    }
}

/// Re-derive `rows`/`cols` from the corners and order them.
fn check_loaded(index: usize, bin: &Bin) -> LayoutResult<()> {
    let details = if !is_valid_u(bin.u) {
        format!("height u{} outside u{BIN_U_MIN}..=u{BIN_U_MAX}", bin.u)
    } else if !bin.is_in_bounds() {
        format!(
            "corners {:?}..{:?} exceed ±{MAX_GRID_COORD}",
            <[i32; 2]>::from(bin.start),
            <[i32; 2]>::from(bin.end)
        )
    } else if !(bin.unit_size.is_finite() && bin.unit_size > 0.0) {
        format!("unit size {} is not a positive length", bin.unit_size)
    } else {
        return Ok(());
    };
    Err(LayoutError::InvalidBin { index, details })
}

fn conform(bin: Bin) -> Bin {
    let rect = CellRect::from_corners(bin.start, bin.end);
    bin.with_rect(rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bin(x0: i32, y0: i32, x1: i32, y1: i32) -> Bin {
        Bin::new(GridCell::new(x0, y0), GridCell::new(x1, y1), 3, 42.0)
    }

    #[test]
    fn test_new_store_is_minimum() {
        let store = BinStore::new();
        assert!(store.is_empty());
        assert_eq!(store.extent(), GridExtent::new(3, 3));
    }

    #[test]
    fn test_add_negative_bin_shifts_all() {
        let mut store = BinStore::new();
        store.add_bin(bin(0, 0, 1, 1));
        store.add_bin(bin(-2, 0, -2, 0));

        assert_eq!(store.bins()[0].start, GridCell::new(2, 0));
        assert_eq!(store.bins()[1].start, GridCell::new(0, 0));
        assert_eq!(store.extent(), GridExtent::new(4, 3));
    }

    #[test]
    fn test_remove_recomputes_extent() {
        let mut store = BinStore::from_bins(vec![bin(0, 0, 0, 0), bin(4, 5, 4, 5)]);
        assert_eq!(store.extent(), GridExtent::new(5, 6));

        let removed = store.remove_bin(1).unwrap();
        assert_eq!(removed.start, GridCell::new(4, 5));
        assert_eq!(store.extent(), GridExtent::new(3, 3));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut store = BinStore::new();
        let err = store.remove_bin(0).unwrap_err();
        assert!(matches!(err, LayoutError::IndexOutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn test_update_conforms_rows_and_cols() {
        let mut store = BinStore::from_bins(vec![bin(0, 0, 0, 0)]);
        let mut replacement = bin(0, 0, 0, 0);
        replacement.end = GridCell::new(3, 1);
        store.update_bin(0, replacement).unwrap();

        let stored = &store.bins()[0];
        assert_eq!((stored.rows, stored.cols), (4, 2));
        assert_eq!(store.extent(), GridExtent::new(4, 3));
    }

    #[test]
    fn test_set_bin_u_validates() {
        let mut store = BinStore::from_bins(vec![bin(0, 0, 0, 0)]);
        store.set_bin_u(0, 6).unwrap();
        assert_eq!(store.bins()[0].u, 6);

        assert!(matches!(
            store.set_bin_u(0, 0),
            Err(LayoutError::HeightOutOfRange { u: 0 })
        ));
        assert!(matches!(
            store.set_bin_u(3, 4),
            Err(LayoutError::IndexOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn test_revision_bumps_on_mutation() {
        let mut store = BinStore::new();
        let r0 = store.revision();
        store.add_bin(bin(0, 0, 0, 0));
        assert!(store.revision() > r0);

        let r1 = store.revision();
        let _ = store.remove_bin(7);
        assert_eq!(store.revision(), r1);
    }

    #[test]
    fn test_bin_at() {
        let store = BinStore::from_bins(vec![bin(0, 0, 1, 1), bin(3, 0, 3, 2)]);
        assert_eq!(store.bin_at(GridCell::new(1, 1)), Some(0));
        assert_eq!(store.bin_at(GridCell::new(3, 2)), Some(1));
        assert_eq!(store.bin_at(GridCell::new(2, 0)), None);
    }

    #[test]
    fn test_envelope() {
        let mut store = BinStore::from_bins(vec![bin(0, 0, 3, 1)]);
        store.set_bin_u(0, 5).unwrap();
        let (x, y, z) = store.envelope_mm();
        assert_relative_eq!(x, 168.0);
        assert_relative_eq!(y, 126.0);
        assert_relative_eq!(z, 39.4);
        assert_eq!(store.max_u(), 5);
    }

    #[test]
    fn test_layout_json_roundtrip_rederives_extent() {
        let store = BinStore::from_bins(vec![bin(0, 0, 2, 3), bin(4, 6, 4, 6)]);
        let json = store.to_layout_json().unwrap();
        assert!(json.contains("\"totalRows\":5"));

        let loaded = BinStore::from_layout_json(&json).unwrap();
        assert_eq!(loaded.bins(), store.bins());
        assert_eq!(loaded.extent(), store.extent());
    }

    #[test]
    fn test_layout_json_bad_input() {
        assert!(matches!(
            BinStore::from_layout_json("{\"bins\": 3}"),
            Err(LayoutError::Json(_))
        ));
    }

    fn layout_json(start: [i64; 2], end: [i64; 2], u: u32, unit_size: f64) -> String {
        format!(
            r#"{{"totalRows":3,"totalCols":3,"bins":[{{"u":{u},"rows":1,"cols":1,"unitSize":{unit_size},"start":[{},{}],"end":[{},{}]}}]}}"#,
            start[0], start[1], end[0], end[1]
        )
    }

    fn invalid_details(json: &str) -> String {
        match BinStore::from_layout_json(json) {
            Err(LayoutError::InvalidBin { index, details }) => {
                assert_eq!(index, 0);
                details
            }
            other => panic!("expected InvalidBin, got {other:?}"),
        }
    }

    #[test]
    fn test_layout_json_rejects_extreme_start() {
        let json = layout_json([-2_147_483_648, 0], [0, 0], 3, 42.0);
        assert!(invalid_details(&json).contains("exceed"));
    }

    #[test]
    fn test_layout_json_rejects_overwide_span() {
        let json = layout_json([-2_000_000_000, 0], [2_000_000_000, 0], 3, 42.0);
        assert!(invalid_details(&json).contains("exceed"));
    }

    #[test]
    fn test_layout_json_rejects_height_out_of_range() {
        assert!(invalid_details(&layout_json([0, 0], [0, 0], 0, 42.0)).contains("u0"));
        assert!(invalid_details(&layout_json([0, 0], [0, 0], 13, 42.0)).contains("u13"));
    }

    #[test]
    fn test_layout_json_rejects_bad_unit_size() {
        assert!(invalid_details(&layout_json([0, 0], [0, 0], 3, -1.0)).contains("unit size"));
    }

    #[test]
    fn test_layout_json_accepts_limit_coordinates() {
        let limit = i64::from(MAX_GRID_COORD);
        let json = layout_json([-limit, 0], [limit, 0], 3, 42.0);
        let store = BinStore::from_layout_json(&json).unwrap();
        assert_eq!(store.bins()[0].start, GridCell::new(0, 0));
        assert_eq!(store.bins()[0].rows, 2 * MAX_GRID_COORD as u32 + 1);
    }
}
