//! Configuration for the layout editor.
//!
//! [`EditorConfig`] controls the defaults given to newly drawn bins and the
//! bounds of the auto-expanding view.
//!
//! # Example
//!
//! ```
//! use gridbin_editor::EditorConfig;
//!
//! let config = EditorConfig::default()
//!     .with_default_u(6)
//!     .with_max_size(20, 16);
//!
//! assert_eq!(config.default_u, 6);
//! assert_eq!(config.max_rows, 20);
//! ```

use gridbin_types::{BIN_U_MAX, BIN_U_MIN, DEFAULT_U, DEFAULT_UNIT_SIZE};

/// Upper bound on visible cells along X.
pub const VIRTUAL_GRID_MAX_ROWS: u32 = 30;

/// Upper bound on visible cells along Y.
pub const VIRTUAL_GRID_MAX_COLS: u32 = 30;

/// Editor configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Height unit given to newly drawn bins.
    pub default_u: u32,

    /// Cell size in millimeters given to newly drawn bins.
    pub default_unit_size: f64,

    /// Empty cells shown around the content on each side.
    pub margin: u32,

    /// Cap on visible cells along X.
    pub max_rows: u32,

    /// Cap on visible cells along Y.
    pub max_cols: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_u: DEFAULT_U,
            default_unit_size: DEFAULT_UNIT_SIZE,
            margin: 1,
            max_rows: VIRTUAL_GRID_MAX_ROWS,
            max_cols: VIRTUAL_GRID_MAX_COLS,
        }
    }
}

impl EditorConfig {
    /// Set the height unit for new bins, clamped to `BIN_U_MIN..=BIN_U_MAX`.
    #[must_use]
    pub fn with_default_u(mut self, u: u32) -> Self {
        self.default_u = u.clamp(BIN_U_MIN, BIN_U_MAX);
        self
    }

    /// Set the cell size for new bins.
    #[must_use]
    pub fn with_unit_size(mut self, unit_size: f64) -> Self {
        self.default_unit_size = unit_size.abs();
        self
    }

    /// Set the margin around the content.
    #[must_use]
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the view caps. Each is at least 1.
    #[must_use]
    pub fn with_max_size(mut self, max_rows: u32, max_cols: u32) -> Self {
        self.max_rows = max_rows.max(1);
        self.max_cols = max_cols.max(1);
        self
    }
}
