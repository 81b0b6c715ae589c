//! Diagnostics and their aggregation.
//!
//! Validation never fails; it produces [`Diagnostic`]s. The
//! [`DiagnosticAggregator`] collects them in insertion order, grouped by
//! the file (or catalog) they belong to, and applies severity suppression
//! when they are read back out.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::Serialize;

// =============================================================================
// Severity
// =============================================================================

/// How serious a diagnostic is. Ordered from least to most severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Severity {
    /// Often not an error, but worth a look.
    Warning,
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
    /// The content is broken.
    Critical,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Self; 5] = [
        Self::Warning,
        Self::Low,
        Self::Medium,
        Self::High,
        Self::Critical,
    ];

    /// Upper-case label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Warning => "WARNING",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Lower-case key used in configuration.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Looks up a severity by its configuration key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key().eq_ignore_ascii_case(key))
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A set of suppressed severities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeverityFilter {
    suppressed: u8,
}

impl SeverityFilter {
    /// A filter that lets everything through.
    #[must_use]
    pub const fn none() -> Self {
        Self { suppressed: 0 }
    }

    /// Builder method to suppress or unsuppress a severity.
    #[must_use]
    pub fn with(mut self, severity: Severity, suppressed: bool) -> Self {
        self.set(severity, suppressed);
        self
    }

    /// Suppresses or unsuppresses a severity.
    pub fn set(&mut self, severity: Severity, suppressed: bool) {
        if suppressed {
            self.suppressed |= severity.bit();
        } else {
            self.suppressed &= !severity.bit();
        }
    }

    /// Returns true if the severity is suppressed.
    #[must_use]
    pub const fn is_suppressed(&self, severity: Severity) -> bool {
        self.suppressed & severity.bit() != 0
    }

    /// Returns true if a diagnostic of this severity should be shown.
    #[must_use]
    pub const fn allows(&self, severity: Severity) -> bool {
        !self.is_suppressed(severity)
    }
}

// =============================================================================
// Diagnostic
// =============================================================================

/// Where a group of diagnostics came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    /// A map file, identified by its path relative to the maps root.
    Map(Arc<str>),
    /// The archetypes catalog.
    Archetypes,
    /// The artifacts catalog.
    Artifacts,
    /// The regions catalog.
    Regions,
}

impl SourceId {
    /// Creates a map source.
    #[must_use]
    pub fn map(path: &str) -> Self {
        Self::Map(Arc::from(path))
    }

    /// Returns true for one of the three catalog sources.
    #[must_use]
    pub const fn is_catalog(&self) -> bool {
        !matches!(self, Self::Map(_))
    }

    /// Name shown in reports.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Map(path) => path,
            Self::Archetypes => "Archetypes",
            Self::Artifacts => "Artifacts",
            Self::Regions => "Regions",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl Serialize for SourceId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A tile coordinate on a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Position {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single validation finding.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Diagnostic {
    /// The file or catalog this belongs to.
    pub source: SourceId,
    /// Human-readable description.
    pub message: String,
    /// How serious it is.
    pub severity: Severity,
    /// Tile the finding is attached to, if any.
    pub position: Option<Position>,
}

impl Diagnostic {
    /// Creates a diagnostic.
    #[must_use]
    pub fn new(
        source: SourceId,
        message: impl Into<String>,
        severity: Severity,
        position: Option<Position>,
    ) -> Self {
        Self {
            source,
            message: message.into(),
            severity,
            position,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.source, self.severity, self.message)?;
        if let Some(pos) = self.position {
            write!(f, " {pos}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Aggregator
// =============================================================================

/// Diagnostics belonging to one source, in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DiagnosticGroup {
    /// The shared source of every diagnostic in the group.
    pub source: SourceId,
    /// The diagnostics, oldest first.
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticGroup {
    fn new(source: SourceId) -> Self {
        Self {
            source,
            diagnostics: Vec::new(),
        }
    }

    /// Iterates over the diagnostics the filter lets through.
    pub fn visible<'a>(&'a self, filter: &'a SeverityFilter) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| filter.allows(d.severity))
    }
}

/// Collects diagnostics grouped by source.
///
/// Map diagnostics start a new group whenever the source differs from the
/// previous map record, so a map validated twice produces two groups.
/// Catalog diagnostics always land in one of three fixed groups.
#[derive(Clone, Debug)]
pub struct DiagnosticAggregator {
    maps: Vec<DiagnosticGroup>,
    archetypes: DiagnosticGroup,
    artifacts: DiagnosticGroup,
    regions: DiagnosticGroup,
}

impl Default for DiagnosticAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            maps: Vec::new(),
            archetypes: DiagnosticGroup::new(SourceId::Archetypes),
            artifacts: DiagnosticGroup::new(SourceId::Artifacts),
            regions: DiagnosticGroup::new(SourceId::Regions),
        }
    }

    /// Appends a diagnostic.
    pub fn record(
        &mut self,
        source: &SourceId,
        message: impl Into<String>,
        severity: Severity,
        position: Option<Position>,
    ) {
        let diagnostic = Diagnostic::new(source.clone(), message, severity, position);
        self.push(diagnostic);
    }

    /// Appends an already-built diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        let group = match diagnostic.source {
            SourceId::Archetypes => &mut self.archetypes,
            SourceId::Artifacts => &mut self.artifacts,
            SourceId::Regions => &mut self.regions,
            SourceId::Map(_) => {
                let starts_group = self
                    .maps
                    .last()
                    .is_none_or(|g| g.source != diagnostic.source);
                if starts_group {
                    self.maps.push(DiagnosticGroup::new(diagnostic.source.clone()));
                }
                let last = self.maps.len() - 1;
                &mut self.maps[last]
            }
        };
        group.diagnostics.push(diagnostic);
    }

    /// Total number of diagnostics, suppressed or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups().map(|g| g.diagnostics.len()).sum()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map groups in insertion order.
    #[must_use]
    pub fn map_groups(&self) -> &[DiagnosticGroup] {
        &self.maps
    }

    /// The fixed group for a catalog source.
    ///
    /// Returns `None` for map sources.
    #[must_use]
    pub fn catalog_group(&self, source: &SourceId) -> Option<&DiagnosticGroup> {
        match source {
            SourceId::Archetypes => Some(&self.archetypes),
            SourceId::Artifacts => Some(&self.artifacts),
            SourceId::Regions => Some(&self.regions),
            SourceId::Map(_) => None,
        }
    }

    /// All groups: map groups in insertion order, then the catalog groups.
    pub fn groups(&self) -> impl Iterator<Item = &DiagnosticGroup> {
        self.maps
            .iter()
            .chain([&self.archetypes, &self.artifacts, &self.regions])
    }

    /// All groups ordered for final reporting.
    ///
    /// Map groups are sorted by source name (stable, so repeated groups of
    /// one map keep their order), followed by the catalog groups.
    #[must_use]
    pub fn sorted_groups(&self) -> Vec<&DiagnosticGroup> {
        let mut maps: Vec<_> = self.maps.iter().collect();
        maps.sort_by(|a, b| a.source.cmp(&b.source));
        maps.extend([&self.archetypes, &self.artifacts, &self.regions]);
        maps
    }

    /// Iterates over every diagnostic the filter lets through.
    pub fn iter_visible<'a>(
        &'a self,
        filter: &'a SeverityFilter,
    ) -> impl Iterator<Item = &'a Diagnostic> {
        self.groups().flat_map(move |g| g.visible(filter))
    }

    /// Calls `f` for every visible diagnostic in reporting order, stopping
    /// at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error `f` returns.
    pub fn try_for_each<E>(
        &self,
        filter: &SeverityFilter,
        mut f: impl FnMut(&Diagnostic) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        for group in self.sorted_groups() {
            group.visible(filter).try_for_each(&mut f)?;
        }
        Ok(())
    }

    /// Counts diagnostics of one severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.groups()
            .flat_map(|g| &g.diagnostics)
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Drops every map diagnostic, keeping catalog groups.
    pub fn clear_maps(&mut self) {
        self.maps.clear();
    }

    /// Drops the diagnostics of one catalog group.
    pub fn clear_catalog(&mut self, source: &SourceId) {
        match source {
            SourceId::Archetypes => self.archetypes.diagnostics.clear(),
            SourceId::Artifacts => self.artifacts.diagnostics.clear(),
            SourceId::Regions => self.regions.diagnostics.clear(),
            SourceId::Map(_) => {}
        }
    }
}
