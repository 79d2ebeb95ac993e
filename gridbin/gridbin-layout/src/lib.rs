//! Grid sizing, normalization and the authoritative bin store.
//!
//! This crate owns the bin list of a layout:
//!
//! - [`calculate_grid_size`] - Minimal bounding grid with a 3×3 floor
//! - [`normalize_bins`] - Shift a bin set to a non-negative origin
//! - [`BinStore`] - CRUD over bins that keeps the extent current
//!
//! # Example
//!
//! ```
//! use gridbin_layout::BinStore;
//! use gridbin_types::{Bin, GridCell};
//!
//! let mut store = BinStore::new();
//! store.add_bin(Bin::new(GridCell::new(-1, 0), GridCell::new(0, 0), 3, 42.0));
//!
//! // Negative placements shift the whole layout back to the origin.
//! assert_eq!(store.bins()[0].start, GridCell::new(0, 0));
//! assert_eq!(store.bins()[0].end, GridCell::new(1, 0));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]

mod error;
mod grid;
mod store;

pub use error::{LayoutError, LayoutResult};
pub use grid::{calculate_grid_size, normalization_offset, normalize_bins};
pub use store::BinStore;

// Re-export the core types for convenience
pub use gridbin_types::{Bin, CellRect, GridCell, GridExtent, Layout};
