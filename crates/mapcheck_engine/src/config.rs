//! Rule configuration.
//!
//! Optional checks are grouped into named categories that can be switched
//! on or off. Severity suppression only affects which diagnostics are
//! shown, not which are recorded.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use mapcheck_foundation::SeverityFilter;

/// A switchable group of checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    /// Non-world map without background music.
    MapNoMusic,
    /// Non-world map without a region.
    MapNoRegion,
    /// Layer 5 object sharing a tile with a layer 2 object.
    DecorWallL2,
    /// Layer 5 object sharing a tile with a layer 3 object.
    DecorWallL3,
    /// Layer 5 object sharing a tile with a layer 4 object.
    DecorWallL4,
    /// System object followed by a non-floor object.
    SysNotOnTop,
    /// Deprecated `^`, `~` or `|` markup in messages.
    DeprecatedControlChars,
    /// Object layer differs from its archetype's.
    LayerChanged,
}

impl Category {
    /// Every category.
    pub const ALL: [Self; 8] = [
        Self::MapNoMusic,
        Self::MapNoRegion,
        Self::DecorWallL2,
        Self::DecorWallL3,
        Self::DecorWallL4,
        Self::SysNotOnTop,
        Self::DeprecatedControlChars,
        Self::LayerChanged,
    ];

    /// Configuration key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MapNoMusic => "map_no_music",
            Self::MapNoRegion => "map_no_region",
            Self::DecorWallL2 => "decor_wall_l2",
            Self::DecorWallL3 => "decor_wall_l3",
            Self::DecorWallL4 => "decor_wall_l4",
            Self::SysNotOnTop => "sys_not_on_top",
            Self::DeprecatedControlChars => "deprecated_control_chars",
            Self::LayerChanged => "layer_changed",
        }
    }

    /// Looks up a category by configuration key.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Whether the category is on when not configured.
    #[must_use]
    pub const fn default_enabled(self) -> bool {
        matches!(self, Self::MapNoRegion | Self::SysNotOnTop)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings that shape a validation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleConfig {
    enabled: BTreeSet<Category>,
    /// Severities hidden from output.
    pub suppress: SeverityFilter,
    /// Directory absolute event script paths are resolved against.
    ///
    /// Script existence is not checked when unset.
    pub script_root: Option<PathBuf>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            enabled: Category::ALL
                .into_iter()
                .filter(|c| c.default_enabled())
                .collect(),
            suppress: SeverityFilter::none(),
            script_root: None,
        }
    }
}

impl RuleConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if checks in `category` run.
    #[must_use]
    pub fn is_enabled(&self, category: Category) -> bool {
        self.enabled.contains(&category)
    }

    /// Switches a category on or off.
    pub fn set(&mut self, category: Category, enabled: bool) {
        if enabled {
            self.enabled.insert(category);
        } else {
            self.enabled.remove(&category);
        }
    }

    /// Builder form of [`RuleConfig::set`].
    #[must_use]
    pub fn with(mut self, category: Category, enabled: bool) -> Self {
        self.set(category, enabled);
        self
    }

    /// Sets the severity filter.
    #[must_use]
    pub fn with_suppress(mut self, suppress: SeverityFilter) -> Self {
        self.suppress = suppress;
        self
    }

    /// Sets the event script root.
    #[must_use]
    pub fn with_script_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.script_root = Some(root.into());
        self
    }

    /// Enabled categories in declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = Category> + '_ {
        self.enabled.iter().copied()
    }
}
