//! Turning engine fragments into per-bin solids.
//!
//! The geometry engine evaluates a serialized layout into an ordered stream of
//! mesh fragments. This crate gives those fragments meaning and folds them:
//!
//! - [`label_fragments`] - Assign `{group}_base` / `{group}_union` labels by
//!   stream position against the bin list
//! - [`BooleanComposer`] - Fold each group into one solid through a
//!   [`CsgKernel`], containing failures per step and per group
//! - [`ConcatKernel`] - A concatenating union kernel over [`TriangleMesh`]
//! - [`CompositionGate`] - Run the pipeline only when a view needs geometry
//!   and the layout changed
//!
//! # Example
//!
//! ```
//! use fragment_compose::{
//!     BooleanComposer, ConcatKernel, LabelConfig, RawFragment, TriangleMesh, label_fragments,
//! };
//! use gridbin_types::{Bin, GridCell};
//!
//! let tri = |dx: f64| {
//!     TriangleMesh::from_raw(&[dx, 0.0, 0.0, dx + 1.0, 0.0, 0.0, dx, 1.0, 0.0], &[0, 1, 2])
//! };
//!
//! let bins = [Bin::new(GridCell::new(0, 0), GridCell::new(0, 0), 3, 42.0)];
//! let raw = vec![RawFragment::new("0", tri(0.0)), RawFragment::new("1", tri(2.0))];
//!
//! let labeled = label_fragments(raw, &bins, &LabelConfig::default());
//! let result = BooleanComposer::new(ConcatKernel).compose(labeled.fragments);
//!
//! assert_eq!(result.fragments.len(), 1);
//! assert_eq!(result.fragments[0].label, "bin_1x1_u3_001");
//! assert_eq!(result.fragments[0].geometry.face_count(), 2);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod compose;
mod concat;
mod error;
mod fragment;
mod gate;
mod kernel;
mod label;

pub use compose::{BooleanComposer, ComposeConfig, ComposeStats, Composition, passthrough};
pub use concat::{ConcatKernel, Solid, TriangleMesh};
pub use error::{ComposeError, ComposeResult, KernelError, KernelResult};
pub use fragment::{LabelSuffix, LabeledFragment, RawFragment, parse_label};
pub use gate::{CompositionGate, GeometryEngine, View};
pub use kernel::CsgKernel;
pub use label::{LabelConfig, LabelReport, LabelStats, label_fragments};
