//! Drives the rule lists over maps and catalogs.

use mapcheck_foundation::{DiagnosticAggregator, Severity, SourceId, Value};
use mapcheck_storage::{Catalog, CatalogIndex, MapDocument, ObjectId};
use tracing::{debug, trace};

use crate::config::RuleConfig;
use crate::rules::{
    CATALOG_RULES, CatalogCheck, HEADER_RULES, HeaderCheck, OBJECT_RULES, ObjectCheck,
    TILE_RULES, TileCheck, TileSummary,
};
use crate::sink::RuleSink;
use crate::state::ScanState;

/// Runs validation rules against a fixed catalog and configuration.
pub struct Validator<'c> {
    catalog: &'c CatalogIndex,
    config: &'c RuleConfig,
}

impl<'c> Validator<'c> {
    /// Creates a validator.
    #[must_use]
    pub const fn new(catalog: &'c CatalogIndex, config: &'c RuleConfig) -> Self {
        Self { catalog, config }
    }

    /// Checks one map: header rules, then every occupied tile in x-major
    /// order. On each tile the objects are checked in file order (each
    /// followed by its inventory, depth first) before the tile rules run.
    pub fn validate_map(
        &self,
        doc: &MapDocument,
        scan: &mut ScanState,
        diagnostics: &mut DiagnosticAggregator,
    ) {
        let before = diagnostics.len();
        let mut sink = RuleSink::new(diagnostics, &doc.source, self.config, scan);

        let header = HeaderCheck {
            doc,
            catalog: self.catalog,
        };
        for (name, rule) in HEADER_RULES {
            trace!(rule = name, "header rule");
            rule(&header, &mut sink);
        }

        let difficulty = doc.header.get("difficulty").map_or(Some(1), Value::as_int);

        for (position, roots) in doc.tiles() {
            sink.at(Some(position));
            let mut summary = TileSummary::default();

            for &root in roots {
                let object = doc.object(root);
                if !summary.count(object) {
                    let layer = object.attributes.text("layer").unwrap_or_else(|| "0".into());
                    let sub_layer = object
                        .attributes
                        .text("sub_layer")
                        .unwrap_or_else(|| "0".into());
                    sink.emit(
                        format!(
                            "Object '{}' has invalid layer {layer}, sub-layer {sub_layer}.",
                            object.archetype_name
                        ),
                        Severity::Medium,
                    );
                }
                self.check_tree(doc, root, difficulty, &mut sink);
            }

            let tile = TileCheck {
                doc,
                position,
                objects: roots,
                summary: &summary,
            };
            for (name, rule) in TILE_RULES {
                trace!(rule = name, %position, "tile rule");
                rule(&tile, &mut sink);
            }
        }

        debug!(
            source = %doc.source,
            diagnostics = diagnostics.len() - before,
            "validated map"
        );
    }

    /// Runs object rules over `root` and everything inside it, pre-order.
    ///
    /// Objects without a `type`, or inside a root without one, are walked
    /// through but not checked.
    fn check_tree(
        &self,
        doc: &MapDocument,
        root: ObjectId,
        difficulty: Option<i64>,
        sink: &mut RuleSink<'_>,
    ) {
        let root_typed = doc.object(root).object_type().is_some();
        let mut pending = vec![root];

        while let Some(id) = pending.pop() {
            let object = doc.object(id);
            pending.extend(object.inventory.iter().rev().copied());
            if !root_typed || object.object_type().is_none() {
                continue;
            }

            let check = ObjectCheck::new(doc, self.catalog, id, difficulty);
            for (name, rule) in OBJECT_RULES {
                trace!(rule = name, object = %object.archetype_name, "object rule");
                rule(&check, sink);
            }
        }
    }

    /// Checks archetype and artifact definitions. Entries without a `type`
    /// are skipped.
    pub fn validate_catalogs(&self, diagnostics: &mut DiagnosticAggregator) {
        let mut scan = ScanState::new();
        self.validate_catalog(
            &SourceId::Archetypes,
            self.catalog.archetypes(),
            &mut scan,
            diagnostics,
        );
        self.validate_catalog(
            &SourceId::Artifacts,
            self.catalog.artifacts(),
            &mut scan,
            diagnostics,
        );
    }

    fn validate_catalog(
        &self,
        source: &SourceId,
        catalog: &Catalog,
        scan: &mut ScanState,
        diagnostics: &mut DiagnosticAggregator,
    ) {
        let mut sink = RuleSink::new(diagnostics, source, self.config, scan);
        for (name, record) in catalog.iter() {
            if !record.contains("type") {
                continue;
            }
            let check = CatalogCheck { name, record };
            for (_, rule) in CATALOG_RULES {
                rule(&check, &mut sink);
            }
        }
        debug!(%source, entries = catalog.len(), "validated catalog");
    }
}
