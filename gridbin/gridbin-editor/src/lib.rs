//! Interactive grid layout editor.
//!
//! This crate translates pointer input into bin placements on a
//! [`gridbin_layout::BinStore`]:
//!
//! - [`LayoutEditor`] - The `Idle | Creating | Resizing` state machine
//! - [`VirtualGrid`] - The auto-expanding visible surface and pointer mapping
//! - [`find_overlap`] - Inclusive overlap test used to reject placements
//! - [`EditorConfig`] - Defaults for new bins and view caps
//!
//! # Pointer-driven Example
//!
//! ```
//! use gridbin_editor::{LayoutEditor, PointerTarget, SurfaceRect};
//! use gridbin_layout::BinStore;
//! use nalgebra::Point2;
//!
//! let mut store = BinStore::new();
//! let mut editor = LayoutEditor::default();
//!
//! // An empty layout shows 5×5 cells: the 3×3 minimum plus a 1-cell margin.
//! let surface = SurfaceRect::new(0.0, 0.0, 500.0, 500.0);
//! assert_eq!(editor.view(&store).rows, 5);
//!
//! // Press on cell (0, 0), drag to (1, 1), release.
//! editor.pointer_down(&store, Point2::new(150.0, 150.0), &surface, PointerTarget::Surface);
//! editor.pointer_move(&store, Point2::new(250.0, 250.0), &surface);
//! editor.pointer_up(&mut store).unwrap();
//!
//! assert_eq!(store.len(), 1);
//! assert_eq!((store.bins()[0].rows, store.bins()[0].cols), (2, 2));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
// Cell coordinates are small; pointer math floors into i32 after a range check
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

mod config;
mod editor;
mod placement;
mod view;

pub use config::{EditorConfig, VIRTUAL_GRID_MAX_COLS, VIRTUAL_GRID_MAX_ROWS};
pub use editor::{DragPreview, DragState, EditOutcome, LayoutEditor, PointerTarget};
pub use placement::{bins_overlap, find_overlap, has_any_overlap};
pub use view::{SurfaceRect, VirtualGrid};
