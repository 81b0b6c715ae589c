//! Where rules write their findings.

use mapcheck_foundation::{DiagnosticAggregator, Position, Severity, SourceId};

use crate::config::{Category, RuleConfig};
use crate::state::ScanState;

/// Routes rule output into an aggregator.
///
/// The sink fixes the source and default position so rules only supply a
/// message and severity. Disabled categories are dropped here.
pub struct RuleSink<'a> {
    diagnostics: &'a mut DiagnosticAggregator,
    source: &'a SourceId,
    position: Option<Position>,
    config: &'a RuleConfig,
    scan: &'a mut ScanState,
}

impl<'a> RuleSink<'a> {
    /// Creates a sink writing to `source` with no position.
    pub fn new(
        diagnostics: &'a mut DiagnosticAggregator,
        source: &'a SourceId,
        config: &'a RuleConfig,
        scan: &'a mut ScanState,
    ) -> Self {
        Self {
            diagnostics,
            source,
            position: None,
            config,
            scan,
        }
    }

    /// Sets the position attached to subsequent diagnostics.
    pub fn at(&mut self, position: Option<Position>) {
        self.position = position;
    }

    /// The rule configuration.
    #[must_use]
    pub fn config(&self) -> &RuleConfig {
        self.config
    }

    /// Scan-scoped state.
    pub fn scan(&mut self) -> &mut ScanState {
        self.scan
    }

    /// Records a diagnostic.
    pub fn emit(&mut self, message: impl Into<String>, severity: Severity) {
        self.diagnostics
            .record(self.source, message, severity, self.position);
    }

    /// Records a diagnostic if `category` is enabled.
    pub fn emit_if(&mut self, category: Category, message: impl Into<String>, severity: Severity) {
        if self.config.is_enabled(category) {
            self.emit(message, severity);
        }
    }
}
