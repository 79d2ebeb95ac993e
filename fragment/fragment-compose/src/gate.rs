//! Deciding when the engine → label → compose pipeline runs.
//!
//! Editing never triggers composition. The gate runs the pipeline only when
//! the active view needs geometry, and reuses the previous result until the
//! serialized layout changes.

use gridbin_layout::BinStore;
use tracing::{debug, info};

use crate::compose::{BooleanComposer, ComposeConfig, Composition, passthrough};
use crate::error::ComposeResult;
use crate::fragment::RawFragment;
use crate::kernel::CsgKernel;
use crate::label::{LabelConfig, LabelStats, label_fragments};

/// What the user is currently looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    /// The 2D grid editor. No geometry.
    #[default]
    Plan,
    /// 3D preview of the composed layout.
    Preview,
    /// Export of the composed layout.
    Download,
}

impl View {
    /// Whether this view consumes composed geometry.
    pub const fn needs_geometry(self) -> bool {
        matches!(self, Self::Preview | Self::Download)
    }
}

/// The external geometry engine.
///
/// Given the serialized layout it returns fragments in generation order: for
/// each bin one base followed by one fragment per cell, interleaved with any
/// auxiliary parts under their own origin tags.
pub trait GeometryEngine {
    /// Mesh type of the emitted fragments.
    type Mesh;

    /// Evaluate a serialized layout.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ComposeError::Engine`] if evaluation fails.
    fn evaluate(&self, layout_json: &str) -> ComposeResult<Vec<RawFragment<Self::Mesh>>>;
}

/// Runs the composition pipeline on demand and caches its result.
///
/// # Example
///
/// ```
/// use fragment_compose::{
///     ComposeResult, CompositionGate, ConcatKernel, GeometryEngine, RawFragment, TriangleMesh,
///     View,
/// };
/// use gridbin_layout::BinStore;
///
/// struct NoParts;
///
/// impl GeometryEngine for NoParts {
///     type Mesh = TriangleMesh;
///
///     fn evaluate(&self, _: &str) -> ComposeResult<Vec<RawFragment<TriangleMesh>>> {
///         Ok(Vec::new())
///     }
/// }
///
/// let store = BinStore::new();
/// let mut gate = CompositionGate::new(NoParts, Some(ConcatKernel));
///
/// // The plan view never needs geometry.
/// assert!(gate.request(&store).unwrap().is_none());
///
/// gate.set_view(View::Preview);
/// assert!(gate.request(&store).unwrap().is_some());
/// assert_eq!(gate.evaluations(), 1);
/// ```
pub struct CompositionGate<E: GeometryEngine, K> {
    engine: E,
    composer: Option<BooleanComposer<K>>,
    label_config: LabelConfig,
    view: View,
    /// Last result, keyed by the layout JSON it was computed from.
    cached: Option<(String, Composition<E::Mesh>)>,
    label_stats: LabelStats,
    evaluations: usize,
}

impl<E, K> CompositionGate<E, K>
where
    E: GeometryEngine,
    K: CsgKernel<Mesh = E::Mesh>,
{
    /// Create a gate in the plan view.
    ///
    /// Without a kernel, fragments are labeled and passed through unchanged.
    pub fn new(engine: E, kernel: Option<K>) -> Self {
        Self {
            engine,
            composer: kernel.map(BooleanComposer::new),
            label_config: LabelConfig::default(),
            view: View::default(),
            cached: None,
            label_stats: LabelStats::default(),
            evaluations: 0,
        }
    }

    /// Set the labeling configuration.
    #[must_use]
    pub fn with_label_config(mut self, config: LabelConfig) -> Self {
        self.label_config = config;
        self.cached = None;
        self
    }

    /// Set the composition configuration.
    #[must_use]
    pub fn with_compose_config(mut self, config: ComposeConfig) -> Self {
        self.composer = self
            .composer
            .map(|c| BooleanComposer::with_config(c.into_kernel(), config));
        self.cached = None;
        self
    }

    /// The active view.
    pub fn view(&self) -> View {
        self.view
    }

    /// Switch the active view. The cache survives view changes.
    pub fn set_view(&mut self, view: View) {
        if view != self.view {
            debug!(from = ?self.view, to = ?view, "View changed");
            self.view = view;
        }
    }

    /// Drop the cached result so the next request recomputes.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Number of times the pipeline has run.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Label counters from the most recent run.
    pub fn label_stats(&self) -> &LabelStats {
        &self.label_stats
    }

    /// The cached composition, if any, regardless of view.
    pub fn cached(&self) -> Option<&Composition<E::Mesh>> {
        self.cached.as_ref().map(|(_, c)| c)
    }

    /// Composition for the current store, if the view needs one.
    ///
    /// Returns `Ok(None)` in views without geometry. Otherwise reuses the
    /// cached result when the serialized layout is unchanged, or runs
    /// engine → label → compose and caches the new result. Revisions are
    /// per store, so the layout itself is the cache key and switching stores
    /// never serves a stale composition.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout cannot be serialized or the engine
    /// fails. The previous cached result is kept in that case.
    pub fn request(&mut self, store: &BinStore) -> ComposeResult<Option<&Composition<E::Mesh>>> {
        if !self.view.needs_geometry() {
            debug!(view = ?self.view, "View needs no geometry; skipping composition");
            return Ok(None);
        }

        let revision = store.revision();
        let layout_json = store.to_layout_json()?;
        if self.cached.as_ref().is_some_and(|(key, _)| *key == layout_json) {
            debug!(revision, "Layout unchanged; reusing composition");
            return Ok(self.cached());
        }

        let raw = self.engine.evaluate(&layout_json)?;
        let fragment_count = raw.len();

        let report = label_fragments(raw, store.bins(), &self.label_config);
        self.label_stats = report.stats;

        let composition = match &self.composer {
            Some(composer) => composer.compose(report.fragments),
            None => passthrough(report.fragments),
        };
        self.evaluations += 1;

        info!(
            revision,
            bins = store.len(),
            fragments = fragment_count,
            outputs = composition.fragments.len(),
            "Recomputed composition"
        );

        self.cached = Some((layout_json, composition));
        Ok(self.cached())
    }
}
