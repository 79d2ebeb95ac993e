//! Label-driven boolean composition.
//!
//! Fragments sharing a group key are folded into one solid:
//!
//! ```text
//! result = base ∪ union₁ ∪ … ∪ unionₙ − diff₁ − … − diffₘ
//! ```
//!
//! Unions and differences are applied sequentially in input order. Failures
//! are contained at the smallest scope: a failed step is skipped, a failed
//! group falls back to its base, and no group affects another.

use hashbrown::HashMap;
use tracing::{debug, info, warn};

use crate::error::KernelResult;
use crate::fragment::{LabelSuffix, LabeledFragment, parse_label};
use crate::kernel::CsgKernel;

/// Configuration for [`BooleanComposer`].
///
/// # Example
///
/// ```
/// use fragment_compose::ComposeConfig;
///
/// let config = ComposeConfig::strict();
/// assert!(!config.skip_failed_steps);
/// assert!(config.fallback_to_base);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeConfig {
    /// Skip a failed union or difference and keep the accumulated solid.
    ///
    /// When `false`, a failed step fails the whole group.
    pub skip_failed_steps: bool,

    /// Emit the unmodified base under the group key when a group fails.
    ///
    /// When `false`, a failed group emits nothing.
    pub fallback_to_base: bool,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            skip_failed_steps: true,
            fallback_to_base: true,
        }
    }
}

impl ComposeConfig {
    /// Any failed step fails its group; the group then falls back to its base.
    pub fn strict() -> Self {
        Self {
            skip_failed_steps: false,
            fallback_to_base: true,
        }
    }

    /// Set whether failed steps are skipped.
    #[must_use]
    pub fn with_skip_failed_steps(mut self, skip: bool) -> Self {
        self.skip_failed_steps = skip;
        self
    }

    /// Set whether failed groups fall back to their base.
    #[must_use]
    pub fn with_fallback_to_base(mut self, fallback: bool) -> Self {
        self.fallback_to_base = fallback;
        self
    }
}

/// Counters from a composition pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeStats {
    /// Distinct group keys seen.
    pub groups: usize,
    /// Groups folded into a solid.
    pub composed: usize,
    /// Groups that fell back to their base.
    pub fallbacks: usize,
    /// Groups that failed with fallback disabled.
    pub dropped: usize,
    /// Groups without a base, emitted unchanged.
    pub orphaned: usize,
    /// Union steps skipped after a failure.
    pub failed_unions: usize,
    /// Difference steps skipped after a failure.
    pub failed_diffs: usize,
    /// Bases replaced by a later base of the same group.
    pub superseded_bases: usize,
    /// Fragments without a group label, appended at the end.
    pub ungrouped: usize,
}

/// Output of a composition pass.
#[derive(Debug, Clone)]
pub struct Composition<M> {
    /// Composed groups in first-appearance order, then ungrouped fragments.
    pub fragments: Vec<LabeledFragment<M>>,
    /// Counters.
    pub stats: ComposeStats,
}

/// Folds labeled fragments into per-group solids through a [`CsgKernel`].
#[derive(Debug)]
pub struct BooleanComposer<K> {
    kernel: K,
    config: ComposeConfig,
}

struct Group<M> {
    key: String,
    base: Option<LabeledFragment<M>>,
    unions: Vec<LabeledFragment<M>>,
    diffs: Vec<LabeledFragment<M>>,
}

impl<M> Group<M> {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            base: None,
            unions: Vec::new(),
            diffs: Vec::new(),
        }
    }
}

enum GroupOutcome<M> {
    Composed(M),
    Failed,
}

impl<K: CsgKernel> BooleanComposer<K> {
    /// Create a composer with the default configuration.
    pub fn new(kernel: K) -> Self {
        Self::with_config(kernel, ComposeConfig::default())
    }

    /// Create a composer with a custom configuration.
    pub fn with_config(kernel: K, config: ComposeConfig) -> Self {
        Self { kernel, config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    /// The kernel in use.
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Take the kernel back.
    pub fn into_kernel(self) -> K {
        self.kernel
    }

    /// Compose a labeled fragment list.
    ///
    /// - Labels ending in `_base`, `_union` or `_diff` form groups keyed by
    ///   the label minus its suffix, kept in order of first appearance.
    /// - A group with a base emits one fragment
    ///   `{label: key, id: base.id, geometry: result}`.
    /// - A group without a base emits its unions, then its diffs, unchanged.
    /// - Every other fragment is appended at the end in input order.
    ///
    /// A repeated base within a group replaces the earlier one.
    pub fn compose(&self, fragments: Vec<LabeledFragment<K::Mesh>>) -> Composition<K::Mesh> {
        let (groups, ungrouped, superseded_bases) = partition(fragments);

        let mut stats = ComposeStats {
            groups: groups.len(),
            ungrouped: ungrouped.len(),
            superseded_bases,
            ..ComposeStats::default()
        };
        let mut out = Vec::with_capacity(groups.len() + ungrouped.len());

        for group in groups {
            let Group {
                key,
                base,
                unions,
                diffs,
            } = group;

            let Some(base) = base else {
                debug!(group = %key, unions = unions.len(), diffs = diffs.len(), "Group has no base; passing through");
                stats.orphaned += 1;
                out.extend(unions);
                out.extend(diffs);
                continue;
            };

            match self.fold_group(&key, &base, &unions, &diffs, &mut stats) {
                GroupOutcome::Composed(geometry) => {
                    stats.composed += 1;
                    out.push(LabeledFragment::new(key, base.id, geometry));
                }
                GroupOutcome::Failed if self.config.fallback_to_base => {
                    stats.fallbacks += 1;
                    out.push(LabeledFragment::new(key, base.id, base.geometry));
                }
                GroupOutcome::Failed => {
                    stats.dropped += 1;
                }
            }
        }

        out.extend(ungrouped);

        info!(
            groups = stats.groups,
            composed = stats.composed,
            fallbacks = stats.fallbacks,
            failed_steps = stats.failed_unions + stats.failed_diffs,
            ungrouped = stats.ungrouped,
            "Composition complete"
        );

        Composition {
            fragments: out,
            stats,
        }
    }

    fn fold_group(
        &self,
        key: &str,
        base: &LabeledFragment<K::Mesh>,
        unions: &[LabeledFragment<K::Mesh>],
        diffs: &[LabeledFragment<K::Mesh>],
        stats: &mut ComposeStats,
    ) -> GroupOutcome<K::Mesh> {
        let mut solid = match self.kernel.to_solid(&base.geometry) {
            Ok(solid) => solid,
            Err(e) => {
                warn!(group = %key, id = %base.id, error = %e, "Base conversion failed");
                return GroupOutcome::Failed;
            }
        };

        for fragment in unions {
            match self.apply(&solid, fragment, |a, b| self.kernel.union(a, b)) {
                Ok(next) => solid = next,
                Err(e) => {
                    warn!(label = %fragment.label, id = %fragment.id, error = %e, "Union step failed");
                    stats.failed_unions += 1;
                    if !self.config.skip_failed_steps {
                        return GroupOutcome::Failed;
                    }
                }
            }
        }

        for fragment in diffs {
            match self.apply(&solid, fragment, |a, b| self.kernel.difference(a, b)) {
                Ok(next) => solid = next,
                Err(e) => {
                    warn!(label = %fragment.label, id = %fragment.id, error = %e, "Difference step failed");
                    stats.failed_diffs += 1;
                    if !self.config.skip_failed_steps {
                        return GroupOutcome::Failed;
                    }
                }
            }
        }

        match self.kernel.to_mesh(&solid) {
            Ok(mesh) => {
                debug!(group = %key, unions = unions.len(), diffs = diffs.len(), "Group composed");
                GroupOutcome::Composed(mesh)
            }
            Err(e) => {
                warn!(group = %key, error = %e, "Result conversion failed");
                GroupOutcome::Failed
            }
        }
    }

    fn apply(
        &self,
        acc: &K::Solid,
        fragment: &LabeledFragment<K::Mesh>,
        op: impl FnOnce(&K::Solid, &K::Solid) -> KernelResult<K::Solid>,
    ) -> KernelResult<K::Solid> {
        let operand = self.kernel.to_solid(&fragment.geometry)?;
        op(acc, &operand)
    }
}

/// Return every fragment unchanged, for when no kernel is available.
///
/// Labels are carried as-is; a fragment with no label keeps the empty string.
pub fn passthrough<M>(fragments: Vec<LabeledFragment<M>>) -> Composition<M> {
    let stats = ComposeStats {
        ungrouped: fragments.len(),
        ..ComposeStats::default()
    };
    debug!(fragments = stats.ungrouped, "No kernel; passing fragments through");
    Composition { fragments, stats }
}

/// Split fragments into groups (first-appearance order) and ungrouped ones.
fn partition<M>(
    fragments: Vec<LabeledFragment<M>>,
) -> (Vec<Group<M>>, Vec<LabeledFragment<M>>, usize) {
    let mut groups: Vec<Group<M>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut ungrouped = Vec::new();
    let mut superseded = 0;

    for fragment in fragments {
        let Some((key, suffix)) = parse_label(&fragment.label) else {
            ungrouped.push(fragment);
            continue;
        };

        let slot = match index.get(key) {
            Some(&i) => i,
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push(Group::new(key));
                groups.len() - 1
            }
        };
        let group = &mut groups[slot];

        match suffix {
            LabelSuffix::Base => {
                if group.base.replace(fragment).is_some() {
                    warn!(group = %group.key, "Duplicate base; keeping the later one");
                    superseded += 1;
                }
            }
            LabelSuffix::Union => group.unions.push(fragment),
            LabelSuffix::Diff => group.diffs.push(fragment),
        }
    }

    (groups, ungrouped, superseded)
}
