//! Error types for layout operations.

use gridbin_types::{BIN_U_MAX, BIN_U_MIN};
use thiserror::Error;

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors that can occur while mutating or (de)serializing a layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A bin index does not refer to a stored bin.
    #[error("bin index {index} out of range (store holds {len} bins)")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of bins in the store.
        len: usize,
    },

    /// A height outside `BIN_U_MIN..=BIN_U_MAX` was requested.
    #[error("height u{u} outside allowed range u{min}..=u{max}", min = BIN_U_MIN, max = BIN_U_MAX)]
    HeightOutOfRange {
        /// The rejected height.
        u: u32,
    },

    /// A loaded bin violates the layout invariants.
    #[error("bin {index} is invalid: {details}")]
    InvalidBin {
        /// Position of the bin in the loaded list.
        index: usize,
        /// What is wrong with it.
        details: String,
    },

    /// The layout could not be serialized or parsed.
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
