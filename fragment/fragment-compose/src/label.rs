//! Assigning composition labels to the engine's fragment stream.
//!
//! The engine emits, for every bin in layout order, one base fragment
//! followed by `rows × cols` union fragments (one per grid cell). Order is the
//! only link between fragments and bins, so labeling walks the stream once,
//! front to back, and never reorders it.

use gridbin_types::Bin;
use tracing::{debug, warn};

use crate::fragment::{LabelSuffix, LabeledFragment, RawFragment};

/// Configuration for the labeling pass.
///
/// # Example
///
/// ```
/// use fragment_compose::LabelConfig;
///
/// let config = LabelConfig::default().with_mesh_tag("grid");
/// assert_eq!(config.mesh_tag, "grid");
/// assert_eq!(config.prefix, "bin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelConfig {
    /// Origin tag the engine puts on grid-driven fragments.
    pub mesh_tag: String,

    /// Leading segment of generated group keys.
    pub prefix: String,

    /// Zero-padded width of the 1-based bin number.
    pub number_width: usize,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            mesh_tag: "mesh".to_string(),
            prefix: "bin".to_string(),
            number_width: 3,
        }
    }
}

impl LabelConfig {
    /// Set the engine's grid-fragment tag.
    #[must_use]
    pub fn with_mesh_tag(mut self, tag: impl Into<String>) -> Self {
        self.mesh_tag = tag.into();
        self
    }

    /// Set the group key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the bin number width.
    #[must_use]
    pub fn with_number_width(mut self, width: usize) -> Self {
        self.number_width = width;
        self
    }

    /// Group key of the bin at 0-based `index`: `bin_{rows}x{cols}_u{u}_{NNN}`.
    pub fn group_key(&self, bin: &Bin, index: usize) -> String {
        format!(
            "{prefix}_{rows}x{cols}_u{u}_{number:0width$}",
            prefix = self.prefix,
            rows = bin.rows,
            cols = bin.cols,
            u = bin.u,
            number = index + 1,
            width = self.number_width,
        )
    }

    fn is_grid_fragment(&self, origin: Option<&str>) -> bool {
        origin.is_none_or(|tag| tag == self.mesh_tag)
    }
}

/// Counters from a labeling pass.
///
/// `unmatched_fragments` and `starved_bins` expose the two lenient cases:
/// surplus grid fragments (emitted unlabeled) and bins that ran out of
/// fragments (left incomplete).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelStats {
    /// Fragments with a foreign origin tag, passed through as-is.
    pub passthrough: usize,
    /// `_base` labels assigned.
    pub bases: usize,
    /// `_union` labels assigned.
    pub unions: usize,
    /// Grid fragments left over after every bin was served.
    pub unmatched_fragments: usize,
    /// Bins that did not receive all `1 + rows × cols` fragments.
    pub starved_bins: usize,
}

impl LabelStats {
    /// Whether fragments and bins matched exactly.
    pub fn is_exact(&self) -> bool {
        self.unmatched_fragments == 0 && self.starved_bins == 0
    }
}

/// Output of [`label_fragments`].
#[derive(Debug, Clone)]
pub struct LabelReport<M> {
    /// Fragments in input order.
    pub fragments: Vec<LabeledFragment<M>>,
    /// Counters.
    pub stats: LabelStats,
}

/// Label an ordered fragment stream against the bin list.
///
/// - A fragment whose origin tag is present and differs from
///   `config.mesh_tag` keeps its tag as its label.
/// - Every other fragment takes the next slot: for bin *i*, one
///   `{key}_base` followed by `rows × cols` `{key}_union`.
/// - Grid fragments beyond the last slot get an empty label.
/// - If the stream ends first, the remaining slots stay unfilled.
///
/// # Example
///
/// ```
/// use fragment_compose::{LabelConfig, RawFragment, label_fragments};
/// use gridbin_types::{Bin, GridCell};
///
/// let bins = [Bin::new(GridCell::new(0, 0), GridCell::new(1, 0), 3, 42.0)];
/// let fragments = (0..3).map(|i| RawFragment::new(i.to_string(), i)).collect();
///
/// let report = label_fragments(fragments, &bins, &LabelConfig::default());
/// let labels: Vec<_> = report.fragments.iter().map(|f| f.label.as_str()).collect();
/// assert_eq!(
///     labels,
///     ["bin_2x1_u3_001_base", "bin_2x1_u3_001_union", "bin_2x1_u3_001_union"]
/// );
/// ```
pub fn label_fragments<M>(
    fragments: Vec<RawFragment<M>>,
    bins: &[Bin],
    config: &LabelConfig,
) -> LabelReport<M> {
    let mut slots = SlotCursor::new(bins, config);
    let mut stats = LabelStats::default();
    let mut labeled = Vec::with_capacity(fragments.len());

    for fragment in fragments {
        let RawFragment { id, mesh, origin } = fragment;

        if !config.is_grid_fragment(origin.as_deref()) {
            stats.passthrough += 1;
            labeled.push(LabeledFragment::new(origin.unwrap_or_default(), id, mesh));
            continue;
        }

        let label = match slots.next() {
            Some((key, LabelSuffix::Base)) => {
                stats.bases += 1;
                format!("{key}{}", LabelSuffix::Base.as_suffix())
            }
            Some((key, suffix)) => {
                stats.unions += 1;
                format!("{key}{}", suffix.as_suffix())
            }
            None => {
                stats.unmatched_fragments += 1;
                String::new()
            }
        };
        labeled.push(LabeledFragment::new(label, id, mesh));
    }

    stats.starved_bins = slots.starved_bins();

    if stats.unmatched_fragments > 0 {
        warn!(
            unmatched = stats.unmatched_fragments,
            bins = bins.len(),
            "More grid fragments than bins need; surplus left unlabeled"
        );
    }
    if stats.starved_bins > 0 {
        warn!(
            starved = stats.starved_bins,
            bins = bins.len(),
            "Fragment stream ended before every bin was labeled"
        );
    }
    debug!(
        bases = stats.bases,
        unions = stats.unions,
        passthrough = stats.passthrough,
        "Labeled fragments"
    );

    LabelReport {
        fragments: labeled,
        stats,
    }
}

/// Walks the `(bin, slot)` sequence: slot 0 is the base, slots
/// `1..=rows×cols` are unions.
struct SlotCursor<'a> {
    bins: &'a [Bin],
    config: &'a LabelConfig,
    bin: usize,
    slot: usize,
    key: Option<String>,
}

impl<'a> SlotCursor<'a> {
    fn new(bins: &'a [Bin], config: &'a LabelConfig) -> Self {
        Self {
            bins,
            config,
            bin: 0,
            slot: 0,
            key: None,
        }
    }

    fn next(&mut self) -> Option<(String, LabelSuffix)> {
        let bin = self.bins.get(self.bin)?;
        let key = self
            .key
            .get_or_insert_with(|| self.config.group_key(bin, self.bin))
            .clone();
        let suffix = if self.slot == 0 {
            LabelSuffix::Base
        } else {
            LabelSuffix::Union
        };

        self.slot += 1;
        if self.slot > bin.cell_count() {
            self.bin += 1;
            self.slot = 0;
            self.key = None;
        }

        Some((key, suffix))
    }

    /// Bins not fully served: the current partial bin plus all after it.
    fn starved_bins(&self) -> usize {
        self.bins.len().saturating_sub(self.bin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbin_types::GridCell;

    fn bin(x0: i32, y0: i32, x1: i32, y1: i32, u: u32) -> Bin {
        Bin::new(GridCell::new(x0, y0), GridCell::new(x1, y1), u, 42.0)
    }

    fn raw(n: usize) -> Vec<RawFragment<usize>> {
        (0..n).map(|i| RawFragment::new(i.to_string(), i)).collect()
    }

    fn labels<M>(report: &LabelReport<M>) -> Vec<&str> {
        report.fragments.iter().map(|f| f.label.as_str()).collect()
    }

    #[test]
    fn test_group_key_format() {
        let config = LabelConfig::default();
        assert_eq!(config.group_key(&bin(0, 0, 2, 3, 6), 11), "bin_3x4_u6_012");
        assert_eq!(config.with_number_width(1).group_key(&bin(0, 0, 0, 0, 3), 0), "bin_1x1_u3_1");
    }

    #[test]
    fn test_two_bins_exact() {
        let bins = [bin(0, 0, 0, 0, 3), bin(1, 0, 2, 0, 5)];
        let report = label_fragments(raw(5), &bins, &LabelConfig::default());

        assert_eq!(
            labels(&report),
            [
                "bin_1x1_u3_001_base",
                "bin_1x1_u3_001_union",
                "bin_2x1_u5_002_base",
                "bin_2x1_u5_002_union",
                "bin_2x1_u5_002_union",
            ]
        );
        assert!(report.stats.is_exact());
        let order: Vec<usize> = report.fragments.iter().map(|f| f.geometry).collect();
        assert_eq!(order, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_surplus_unlabeled() {
        let bins = [bin(0, 0, 0, 0, 3)];
        let report = label_fragments(raw(4), &bins, &LabelConfig::default());
        assert_eq!(
            labels(&report),
            ["bin_1x1_u3_001_base", "bin_1x1_u3_001_union", "", ""]
        );
        assert_eq!(report.stats.unmatched_fragments, 2);
        assert_eq!(report.stats.starved_bins, 0);
    }

    #[test]
    fn test_starvation_stops_quietly() {
        let bins = [bin(0, 0, 1, 1, 3), bin(2, 0, 2, 0, 3)];
        let report = label_fragments(raw(3), &bins, &LabelConfig::default());
        assert_eq!(report.fragments.len(), 3);
        assert_eq!(report.stats.bases, 1);
        assert_eq!(report.stats.unions, 2);
        assert_eq!(report.stats.starved_bins, 2);
    }

    #[test]
    fn test_foreign_origin_passes_through_in_place() {
        let bins = [bin(0, 0, 0, 0, 3)];
        let fragments = vec![
            RawFragment::new("a", 0).with_origin("mesh"),
            RawFragment::new("plate", 1).with_origin("baseplate"),
            RawFragment::new("b", 2),
        ];
        let report = label_fragments(fragments, &bins, &LabelConfig::default());

        assert_eq!(
            labels(&report),
            ["bin_1x1_u3_001_base", "baseplate", "bin_1x1_u3_001_union"]
        );
        assert_eq!(report.stats.passthrough, 1);
        assert!(report.stats.is_exact());
    }

    #[test]
    fn test_custom_mesh_tag() {
        let bins = [bin(0, 0, 0, 0, 3)];
        let fragments = vec![
            RawFragment::new("a", 0).with_origin("grid"),
            RawFragment::new("b", 1).with_origin("mesh"),
        ];
        let config = LabelConfig::default().with_mesh_tag("grid");
        let report = label_fragments(fragments, &bins, &config);
        assert_eq!(labels(&report), ["bin_1x1_u3_001_base", "mesh"]);
        assert_eq!(report.stats.starved_bins, 1);
    }

    #[test]
    fn test_no_bins() {
        let report = label_fragments(raw(2), &[], &LabelConfig::default());
        assert_eq!(labels(&report), ["", ""]);
        assert_eq!(report.stats.unmatched_fragments, 2);
    }
}
