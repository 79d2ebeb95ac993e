//! Fragments as delivered by the geometry engine, and their labels.

/// A raw fragment from the geometry engine.
///
/// `origin` is the engine's own tag for the fragment. Grid-driven fragments
/// carry the engine's mesh tag (see [`crate::LabelConfig::mesh_tag`]) or no
/// tag at all; any other tag marks an auxiliary part that bypasses labeling.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFragment<M> {
    /// Engine-assigned identifier.
    pub id: String,
    /// The mesh payload.
    pub mesh: M,
    /// Engine origin tag.
    pub origin: Option<String>,
}

impl<M> RawFragment<M> {
    /// A fragment without an origin tag.
    pub fn new(id: impl Into<String>, mesh: M) -> Self {
        Self {
            id: id.into(),
            mesh,
            origin: None,
        }
    }

    /// Set the origin tag.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

/// A fragment annotated with a composition label.
///
/// Labels of the form `{group}_base`, `{group}_union` and `{group}_diff` take
/// part in composition; anything else (including the empty label) passes
/// through.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledFragment<M> {
    /// Composition label or passthrough label.
    pub label: String,
    /// Identifier of the source fragment.
    pub id: String,
    /// The mesh payload.
    pub geometry: M,
}

impl<M> LabeledFragment<M> {
    /// Create a labeled fragment.
    pub fn new(label: impl Into<String>, id: impl Into<String>, geometry: M) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
            geometry,
        }
    }

    /// Parse the label into its group key and role.
    pub fn role(&self) -> Option<(&str, LabelSuffix)> {
        parse_label(&self.label)
    }
}

/// Role of a fragment within its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelSuffix {
    /// The solid everything else is applied to.
    Base,
    /// Added to the base.
    Union,
    /// Subtracted after all unions.
    Diff,
}

impl LabelSuffix {
    /// The label suffix including its separator.
    pub const fn as_suffix(self) -> &'static str {
        match self {
            Self::Base => "_base",
            Self::Union => "_union",
            Self::Diff => "_diff",
        }
    }

    const ALL: [Self; 3] = [Self::Base, Self::Union, Self::Diff];
}

/// Split a label into `(group_key, suffix)`.
///
/// The group key must be non-empty, so `"_base"` alone is not a group label.
///
/// # Example
///
/// ```
/// use fragment_compose::{LabelSuffix, parse_label};
///
/// assert_eq!(
///     parse_label("bin_2x1_u3_001_union"),
///     Some(("bin_2x1_u3_001", LabelSuffix::Union))
/// );
/// assert_eq!(parse_label("baseplate"), None);
/// assert_eq!(parse_label("_diff"), None);
/// ```
pub fn parse_label(label: &str) -> Option<(&str, LabelSuffix)> {
    LabelSuffix::ALL.into_iter().find_map(|suffix| {
        label
            .strip_suffix(suffix.as_suffix())
            .filter(|key| !key.is_empty())
            .map(|key| (key, suffix))
    })
}
