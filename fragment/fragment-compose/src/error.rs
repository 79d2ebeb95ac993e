//! Error types for kernels and the composition pipeline.

use gridbin_layout::LayoutError;
use thiserror::Error;

/// Errors reported by a [`crate::CsgKernel`].
///
/// The composer catches these per call; they never abort a whole pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// The mesh could not be converted to a solid.
    #[error("invalid mesh: {details}")]
    InvalidMesh {
        /// Description of the defect.
        details: String,
    },

    /// A boolean operation failed.
    #[error("{operation} failed: {details}")]
    OperationFailed {
        /// `"union"` or `"difference"`.
        operation: &'static str,
        /// Description of the failure.
        details: String,
    },

    /// The kernel does not implement the operation.
    #[error("{operation} is not supported by this kernel")]
    Unsupported {
        /// The missing operation.
        operation: &'static str,
    },
}

/// Result type for kernel calls.
pub type KernelResult<T> = Result<T, KernelError>;

/// Errors from the engine → label → compose pipeline.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The layout could not be serialized for the geometry engine.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// The geometry engine failed to evaluate the layout.
    #[error("geometry engine error: {details}")]
    Engine {
        /// Description of the failure.
        details: String,
    },
}

/// Result type for pipeline operations.
pub type ComposeResult<T> = Result<T, ComposeError>;
