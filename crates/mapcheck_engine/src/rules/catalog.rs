//! Archetype and artifact definition rules.

use mapcheck_foundation::{AttributeRecord, Severity};

use crate::sink::RuleSink;
use crate::types::object_type;

/// A catalog entry rule.
pub type CatalogRule = fn(&CatalogCheck<'_>, &mut RuleSink<'_>);

/// One catalog entry under inspection.
pub struct CatalogCheck<'a> {
    /// Entry name.
    pub name: &'a str,
    /// Entry attributes.
    pub record: &'a AttributeRecord,
}

/// Catalog rules in the order they run.
pub const CATALOG_RULES: &[(&str, CatalogRule)] = &[
    ("material_quality", material_quality),
    ("floor_flag", floor_flag),
    ("magic_mirror", magic_mirror),
];

fn material_quality(check: &CatalogCheck<'_>, sink: &mut RuleSink<'_>) {
    let record = check.record;
    let has_quality = record.truthy("material_real") || record.truthy("item_quality");
    if record.truthy("material") && !has_quality && !record.truthy("no_pick") {
        sink.emit(
            format!(
                "Archetype '{}' has material set but no material_real or item_quality.",
                check.name
            ),
            Severity::Low,
        );
    }
}

fn floor_flag(check: &CatalogCheck<'_>, sink: &mut RuleSink<'_>) {
    let kind = check.record.int("type");
    let is_floor = matches!(kind, Some(object_type::FLOOR | object_type::SHOP_FLOOR));
    if is_floor && !check.record.flag("is_floor") {
        sink.emit(
            format!(
                "Archetype '{}' is of type floor but doesn't have 'is_floor 1' set.",
                check.name
            ),
            Severity::Low,
        );
    }
}

fn magic_mirror(check: &CatalogCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.record.int("type") == Some(object_type::MAGIC_MIRROR) && !check.record.flag("sys_object") {
        sink.emit(
            format!(
                "Archetype '{}' is a magic mirror but is not 'sys_object 1'.",
                check.name
            ),
            Severity::Medium,
        );
    }
}
