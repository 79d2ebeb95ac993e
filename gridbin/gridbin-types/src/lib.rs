//! Core types for grid bin layouts.
//!
//! This crate provides the foundational types shared by the layout store,
//! the interactive editor and the fragment composition pipeline:
//!
//! - [`GridCell`] - An integer cell coordinate `[x, y]`
//! - [`CellRect`] - An inclusive axis-aligned rectangle of cells
//! - [`Bin`] - A storage bin placed on the grid
//! - [`GridExtent`] - The bounding grid of a bin set
//! - [`Layout`] - The serialized layout handed to the geometry engine
//!
//! # Layer 0 Crate
//!
//! This crate has no UI or rendering dependencies. It can be used from
//! CLI tools, servers or WASM front-ends alike.
//!
//! # Coordinate System
//!
//! - X runs along a bin's `rows` (width)
//! - Y runs along a bin's `cols` (depth)
//!
//! Ranges are **inclusive**: a bin with `start = [0, 0]` and `end = [2, 2]`
//! covers nine cells.
//!
//! # Example
//!
//! ```
//! use gridbin_types::{Bin, CellRect, GridCell};
//!
//! let rect = CellRect::from_corners(GridCell::new(2, 3), GridCell::new(0, 0));
//! let bin = Bin::from_rect(rect, 3, 42.0);
//!
//! assert_eq!(bin.rows, 3);
//! assert_eq!(bin.cols, 4);
//! assert_eq!(bin.start, GridCell::new(0, 0));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
// Bin spans are small positive integers; cell coordinates are i32
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod bin;
mod cell;
mod extent;

pub use bin::{
    BASE_HEIGHT_MM, BIN_U_MAX, BIN_U_MIN, Bin, DEFAULT_U, DEFAULT_UNIT_SIZE, U_HEIGHT_MM,
    is_valid_u,
};
pub use cell::{CellRect, GridCell, MAX_GRID_COORD};
pub use extent::{GridExtent, Layout, MIN_GRID_SIZE};
