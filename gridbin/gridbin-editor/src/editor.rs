//! The pointer-driven layout editor.
//!
//! [`LayoutEditor`] turns pointer events into bin creation and resize commits.
//! Drag state is an explicit [`DragState`] value, so the whole interaction
//! can be driven and asserted without a UI:
//!
//! ```text
//!            pointer-down (empty cell)          pointer-up / leave
//!   Idle ───────────────────────────────► Creating ─────────────────► Idle
//!     │      pointer-down (resize handle)        pointer-up / leave
//!     └─────────────────────────────────► Resizing ─────────────────► Idle
//! ```
//!
//! Commits go through [`BinStore`]; the editor never touches bins directly.
//! A candidate that overlaps another bin is discarded without mutation.

use gridbin_layout::{BinStore, LayoutError, LayoutResult};
use gridbin_types::{Bin, CellRect, GridCell};
use nalgebra::Point2;
use tracing::{debug, info};

use crate::config::EditorConfig;
use crate::placement::find_overlap;
use crate::view::{SurfaceRect, VirtualGrid};

/// Transient drag state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,

    /// Drawing a new bin from `start` to the pointer cell `end`.
    Creating {
        /// Cell where the drag began.
        start: GridCell,
        /// Cell under the pointer.
        end: GridCell,
    },

    /// Resizing bin `index`; `start` is pinned to the bin's low corner.
    Resizing {
        /// Index of the bin in the store.
        index: usize,
        /// The bin's low corner.
        start: GridCell,
        /// Cell under the pointer, never below `start` on either axis.
        end: GridCell,
    },
}

impl DragState {
    /// The rectangle a release would commit, if a drag is active.
    pub fn candidate(&self) -> Option<CellRect> {
        match *self {
            Self::Idle => None,
            Self::Creating { start, end } | Self::Resizing { start, end, .. } => {
                Some(CellRect::from_corners(start, end))
            }
        }
    }

    /// Index of the bin under resize.
    pub fn resizing_index(&self) -> Option<usize> {
        match *self {
            Self::Resizing { index, .. } => Some(index),
            _ => None,
        }
    }

    /// Whether no drag is active.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The grid surface itself.
    Surface,
    /// The resize handle of bin `index`.
    ResizeHandle(usize),
}

/// Result of releasing a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// No drag was active.
    Ignored,
    /// A new bin was added at `index`.
    Created {
        /// Store index of the new bin.
        index: usize,
    },
    /// Bin `index` was resized.
    Resized {
        /// Store index of the resized bin.
        index: usize,
    },
    /// The candidate overlapped bin `conflict` and was discarded.
    Rejected {
        /// Store index of the first overlapping bin.
        conflict: usize,
    },
}

/// The in-progress candidate as shown while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPreview {
    /// Candidate rectangle.
    pub rect: CellRect,
    /// Whether releasing now would be rejected.
    pub overlaps: bool,
}

/// Interactive editor over a [`BinStore`].
///
/// # Example
///
/// ```
/// use gridbin_editor::{EditOutcome, LayoutEditor};
/// use gridbin_layout::BinStore;
/// use gridbin_types::GridCell;
///
/// let mut store = BinStore::new();
/// let mut editor = LayoutEditor::default();
///
/// assert!(editor.begin_create(&store, GridCell::new(0, 0)));
/// editor.drag_to(GridCell::new(2, 1));
/// let outcome = editor.release(&mut store).unwrap();
///
/// assert_eq!(outcome, EditOutcome::Created { index: 0 });
/// assert_eq!((store.bins()[0].rows, store.bins()[0].cols), (3, 2));
/// assert!(editor.state().is_idle());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutEditor {
    config: EditorConfig,
    state: DragState,
}

impl LayoutEditor {
    /// Create an editor with `config`.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            state: DragState::Idle,
        }
    }

    /// The editor configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The current drag state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// The visible grid for the current bins and drag.
    pub fn view(&self, store: &BinStore) -> VirtualGrid {
        VirtualGrid::compute(store.bins(), self.state.candidate(), &self.config)
    }

    /// The drag candidate with its overlap flag.
    pub fn preview(&self, store: &BinStore) -> Option<DragPreview> {
        let rect = self.state.candidate()?;
        let overlaps = find_overlap(store.bins(), &rect, self.state.resizing_index()).is_some();
        Some(DragPreview { rect, overlaps })
    }

    /// Bins to draw, omitting the one under resize (the preview stands in for it).
    pub fn visible_bins<'a>(&self, store: &'a BinStore) -> impl Iterator<Item = (usize, &'a Bin)> {
        let hidden = self.state.resizing_index();
        store
            .bins()
            .iter()
            .enumerate()
            .filter(move |&(index, _)| Some(index) != hidden)
    }

    // =========================================================================
    // Pointer events
    // =========================================================================

    /// Handle a pointer-down at `point` on a surface of pixel bounds `surface`.
    ///
    /// Returns `true` if a drag started.
    pub fn pointer_down(
        &mut self,
        store: &BinStore,
        point: Point2<f64>,
        surface: &SurfaceRect,
        target: PointerTarget,
    ) -> bool {
        match target {
            PointerTarget::ResizeHandle(index) => self.begin_resize(store, index),
            PointerTarget::Surface => match self.view(store).cell_at(point, surface) {
                Some(cell) => self.begin_create(store, cell),
                None => false,
            },
        }
    }

    /// Handle a pointer move. Positions outside the visible cells are ignored.
    pub fn pointer_move(&mut self, store: &BinStore, point: Point2<f64>, surface: &SurfaceRect) {
        if self.state.is_idle() {
            return;
        }
        if let Some(cell) = self.view(store).cell_at(point, surface) {
            self.drag_to(cell);
        }
    }

    /// Handle a pointer-up; see [`Self::release`].
    ///
    /// # Errors
    ///
    /// See [`Self::release`].
    pub fn pointer_up(&mut self, store: &mut BinStore) -> LayoutResult<EditOutcome> {
        self.release(store)
    }

    /// The pointer left the surface. Treated as a release.
    ///
    /// # Errors
    ///
    /// See [`Self::release`].
    pub fn pointer_leave(&mut self, store: &mut BinStore) -> LayoutResult<EditOutcome> {
        self.release(store)
    }

    // =========================================================================
    // Cell-level transitions
    // =========================================================================

    /// Start drawing a new bin at `cell`.
    ///
    /// Ignored while another drag is active or when `cell` belongs to a bin.
    pub fn begin_create(&mut self, store: &BinStore, cell: GridCell) -> bool {
        if !self.state.is_idle() || store.bin_at(cell).is_some() {
            return false;
        }
        self.state = DragState::Creating {
            start: cell,
            end: cell,
        };
        debug!(?cell, "Begin create");
        true
    }

    /// Start resizing bin `index`, pinning its low corner.
    pub fn begin_resize(&mut self, store: &BinStore, index: usize) -> bool {
        if !self.state.is_idle() {
            return false;
        }
        let Some(bin) = store.get(index) else {
            return false;
        };
        self.state = DragState::Resizing {
            index,
            start: bin.start,
            end: bin.end,
        };
        debug!(index, "Begin resize");
        true
    }

    /// Move the drag end to `cell`.
    ///
    /// While resizing, the end is clamped so it never passes the pinned
    /// corner; the minimum size is 1×1.
    pub fn drag_to(&mut self, cell: GridCell) {
        match &mut self.state {
            DragState::Idle => {}
            DragState::Creating { end, .. } => *end = cell,
            DragState::Resizing { start, end, .. } => *end = cell.max(*start),
        }
    }

    /// Commit the active drag and return to idle.
    ///
    /// The candidate is checked against every bin except the one under
    /// resize. Overlapping candidates are discarded; the editor is idle
    /// afterwards in every case.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::IndexOutOfRange`] if the bin under resize was
    /// removed from the store during the drag.
    pub fn release(&mut self, store: &mut BinStore) -> LayoutResult<EditOutcome> {
        let state = std::mem::take(&mut self.state);
        let Some(rect) = state.candidate() else {
            return Ok(EditOutcome::Ignored);
        };

        if let Some(conflict) = find_overlap(store.bins(), &rect, state.resizing_index()) {
            debug!(?rect, conflict, "Rejected overlapping placement");
            return Ok(EditOutcome::Rejected { conflict });
        }

        match state {
            DragState::Idle => Ok(EditOutcome::Ignored),
            DragState::Creating { .. } => {
                let bin = Bin::from_rect(rect, self.config.default_u, self.config.default_unit_size);
                let index = store.add_bin(bin);
                info!(index, rows = rect.width(), cols = rect.height(), "Created bin");
                Ok(EditOutcome::Created { index })
            }
            DragState::Resizing { index, .. } => {
                let existing = store.get(index).cloned().ok_or(LayoutError::IndexOutOfRange {
                    index,
                    len: store.len(),
                })?;
                store.update_bin(index, existing.with_rect(rect))?;
                info!(index, rows = rect.width(), cols = rect.height(), "Resized bin");
                Ok(EditOutcome::Resized { index })
            }
        }
    }

    /// Drop the active drag without committing.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Delete bin `index` through the store.
    ///
    /// Ignored (returns `Ok(None)`) while a drag is active, since the drag
    /// may refer to the bin by index.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::IndexOutOfRange`] if `index` is not a stored bin.
    pub fn delete_bin(&mut self, store: &mut BinStore, index: usize) -> LayoutResult<Option<Bin>> {
        if !self.state.is_idle() {
            return Ok(None);
        }
        let removed = store.remove_bin(index)?;
        info!(index, "Deleted bin");
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(x0: i32, y0: i32, x1: i32, y1: i32) -> Bin {
        Bin::new(GridCell::new(x0, y0), GridCell::new(x1, y1), 3, 42.0)
    }

    #[test]
    fn test_create_reverse_drag() {
        let mut store = BinStore::new();
        let mut editor = LayoutEditor::default();

        assert!(editor.begin_create(&store, GridCell::new(2, 2)));
        editor.drag_to(GridCell::new(0, 1));
        let outcome = editor.release(&mut store).unwrap();

        assert_eq!(outcome, EditOutcome::Created { index: 0 });
        let created = &store.bins()[0];
        assert_eq!(created.start, GridCell::new(0, 1));
        assert_eq!(created.end, GridCell::new(2, 2));
        assert_eq!(created.u, 3);
    }

    #[test]
    fn test_create_on_existing_bin_ignored() {
        let store = BinStore::from_bins(vec![bin(0, 0, 1, 1)]);
        let mut editor = LayoutEditor::default();
        assert!(!editor.begin_create(&store, GridCell::new(1, 0)));
        assert!(editor.state().is_idle());
    }

    #[test]
    fn test_overlap_rejected_without_mutation() {
        let mut store = BinStore::from_bins(vec![bin(0, 0, 1, 1)]);
        let before = store.bins().to_vec();
        let revision = store.revision();
        let mut editor = LayoutEditor::default();

        assert!(editor.begin_create(&store, GridCell::new(3, 1)));
        editor.drag_to(GridCell::new(1, 1));
        assert!(editor.preview(&store).unwrap().overlaps);

        let outcome = editor.release(&mut store).unwrap();
        assert_eq!(outcome, EditOutcome::Rejected { conflict: 0 });
        assert_eq!(store.bins(), before.as_slice());
        assert_eq!(store.revision(), revision);
        assert!(editor.state().is_idle());
    }

    #[test]
    fn test_resize_clamps_to_pinned_corner() {
        let mut store = BinStore::from_bins(vec![bin(2, 2, 3, 3)]);
        let mut editor = LayoutEditor::default();

        assert!(editor.begin_resize(&store, 0));
        editor.drag_to(GridCell::new(0, 5));
        assert_eq!(
            editor.state(),
            DragState::Resizing {
                index: 0,
                start: GridCell::new(2, 2),
                end: GridCell::new(2, 5),
            }
        );

        let outcome = editor.release(&mut store).unwrap();
        assert_eq!(outcome, EditOutcome::Resized { index: 0 });
        let resized = &store.bins()[0];
        assert_eq!((resized.rows, resized.cols), (1, 4));
        assert_eq!(resized.start, GridCell::new(2, 2));
    }

    #[test]
    fn test_resize_ignores_own_footprint_and_keeps_height() {
        let mut store = BinStore::from_bins(vec![bin(0, 0, 1, 1).with_u(7), bin(4, 0, 4, 0)]);
        let mut editor = LayoutEditor::default();

        assert!(editor.begin_resize(&store, 0));
        editor.drag_to(GridCell::new(2, 2));
        assert_eq!(editor.release(&mut store).unwrap(), EditOutcome::Resized { index: 0 });
        assert_eq!(store.bins()[0].u, 7);
        assert_eq!(store.bins()[0].end, GridCell::new(2, 2));
    }

    #[test]
    fn test_resize_into_neighbor_rejected() {
        let mut store = BinStore::from_bins(vec![bin(0, 0, 1, 1), bin(3, 0, 3, 0)]);
        let mut editor = LayoutEditor::default();

        assert!(editor.begin_resize(&store, 0));
        editor.drag_to(GridCell::new(3, 1));
        assert_eq!(
            editor.release(&mut store).unwrap(),
            EditOutcome::Rejected { conflict: 1 }
        );
        assert_eq!(store.bins()[0].end, GridCell::new(1, 1));
    }

    #[test]
    fn test_resize_hides_bin() {
        let store = BinStore::from_bins(vec![bin(0, 0, 0, 0), bin(2, 0, 2, 0)]);
        let mut editor = LayoutEditor::default();
        editor.begin_resize(&store, 1);
        let visible: Vec<usize> = editor.visible_bins(&store).map(|(i, _)| i).collect();
        assert_eq!(visible, vec![0]);
    }

    #[test]
    fn test_release_when_idle() {
        let mut store = BinStore::new();
        let mut editor = LayoutEditor::default();
        assert_eq!(editor.release(&mut store).unwrap(), EditOutcome::Ignored);
    }

    #[test]
    fn test_resize_of_removed_bin_errors_and_resets() {
        let mut store = BinStore::from_bins(vec![bin(0, 0, 0, 0)]);
        let mut editor = LayoutEditor::default();
        editor.begin_resize(&store, 0);
        store.remove_bin(0).unwrap();

        assert!(editor.release(&mut store).is_err());
        assert!(editor.state().is_idle());
    }

    #[test]
    fn test_delete_ignored_mid_drag() {
        let mut store = BinStore::from_bins(vec![bin(0, 0, 0, 0)]);
        let mut editor = LayoutEditor::default();
        editor.begin_create(&store, GridCell::new(2, 2));
        assert_eq!(editor.delete_bin(&mut store, 0).unwrap(), None);
        assert_eq!(store.len(), 1);

        editor.cancel();
        assert!(editor.delete_bin(&mut store, 0).unwrap().is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn test_negative_creation_shifts_layout() {
        let mut store = BinStore::from_bins(vec![bin(0, 0, 1, 1)]);
        let mut editor = LayoutEditor::default();

        assert!(editor.begin_create(&store, GridCell::new(-1, 0)));
        assert_eq!(editor.release(&mut store).unwrap(), EditOutcome::Created { index: 1 });
        assert_eq!(store.bins()[0].start, GridCell::new(1, 0));
        assert_eq!(store.bins()[1].start, GridCell::new(0, 0));
    }
}
