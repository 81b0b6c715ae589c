//! Tile rules.
//!
//! Run once per occupied cell, after the object rules for everything on
//! it, over a [`TileSummary`] gathered while those objects were visited.

use mapcheck_foundation::{Position, Severity};
use mapcheck_storage::{MapDocument, ObjectId, ObjectInstance};

use crate::config::Category;
use crate::sink::RuleSink;
use crate::types::{MAX_LAYERS, NUM_SUB_LAYERS, object_type};

const LAYER_SLOTS: usize = MAX_LAYERS as usize + 1;
const SUB_LAYER_SLOTS: usize = NUM_SUB_LAYERS as usize;

/// A tile rule.
pub type TileRule = fn(&TileCheck<'_>, &mut RuleSink<'_>);

/// Layer occupancy and placement facts for one tile.
#[derive(Clone, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct TileSummary {
    layers: [[u32; SUB_LAYER_SLOTS]; LAYER_SLOTS],
    above_system_layer: usize,
    is_shop: bool,
    system_seen: bool,
    system_below_floor: bool,
    system_not_on_top: bool,
}

impl TileSummary {
    /// Counts a root object.
    ///
    /// Returns false, recording nothing, when its layer or sub-layer is
    /// out of range.
    pub fn count(&mut self, object: &ObjectInstance) -> bool {
        let Some((layer, sub_layer)) = layer_slot(object) else {
            return false;
        };
        self.layers[layer][sub_layer] += 1;
        if layer != 0 {
            self.above_system_layer += 1;
        }

        if let Some(kind) = object.object_type() {
            if kind == object_type::SHOP_FLOOR {
                self.is_shop = true;
            }
            if layer == 0 {
                self.system_seen = true;
            } else if self.system_seen {
                if layer == 1 {
                    self.system_below_floor = true;
                } else {
                    self.system_not_on_top = true;
                }
            }
        }
        true
    }

    /// Number of objects counted on `layer` across all sub-layers.
    #[must_use]
    pub fn layer_total(&self, layer: usize) -> u32 {
        self.layers.get(layer).map_or(0, |subs| subs.iter().sum())
    }

    /// Returns true if a shop floor was counted.
    #[must_use]
    pub const fn is_shop(&self) -> bool {
        self.is_shop
    }
}

fn layer_slot(object: &ObjectInstance) -> Option<(usize, usize)> {
    let slot = |name: &str, slots: usize| match object.attributes.get(name) {
        None => Some(0),
        Some(value) => value
            .as_int()
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n < slots),
    };
    Some((slot("layer", LAYER_SLOTS)?, slot("sub_layer", SUB_LAYER_SLOTS)?))
}

/// What a tile rule may look at.
pub struct TileCheck<'a> {
    /// The map being checked.
    pub doc: &'a MapDocument,
    /// The cell.
    pub position: Position,
    /// Root objects on the cell, in file order.
    pub objects: &'a [ObjectId],
    /// Facts gathered from the objects.
    pub summary: &'a TileSummary,
}

/// Tile rules in the order they run.
pub const TILE_RULES: &[(&str, TileRule)] = &[
    ("missing_floor", missing_floor),
    ("stacked_layers", stacked_layers),
    ("decor_walls", decor_walls),
    ("system_placement", system_placement),
    ("shop_unpaid", shop_unpaid),
    ("out_of_bounds", out_of_bounds),
];

fn missing_floor(check: &TileCheck<'_>, sink: &mut RuleSink<'_>) {
    let summary = check.summary;
    if summary.layer_total(1) == 0 && summary.above_system_layer > 0 {
        sink.emit(
            "Missing layer 1 object on tile with some objects -- missing floor?",
            Severity::Medium,
        );
    }
}

fn stacked_layers(check: &TileCheck<'_>, sink: &mut RuleSink<'_>) {
    for (layer, subs) in check.summary.layers.iter().enumerate().take(LAYER_SLOTS - 1).skip(1) {
        for (sub_layer, &count) in subs.iter().enumerate() {
            if count > 1 {
                sink.emit(
                    format!(
                        "More than 1 object ({count}) with layer {layer}, sub-layer {sub_layer} on same tile."
                    ),
                    Severity::Warning,
                );
            }
        }
    }
}

fn decor_walls(check: &TileCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.summary.layer_total(5) == 0 {
        return;
    }
    let categories = [
        (2, Category::DecorWallL2),
        (3, Category::DecorWallL3),
        (4, Category::DecorWallL4),
    ];
    for (layer, category) in categories {
        if check.summary.layer_total(layer) > 0 {
            sink.emit_if(
                category,
                format!("Layer 5 object on tile with layer {layer} object(s)."),
                Severity::Warning,
            );
        }
    }
}

fn system_placement(check: &TileCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.summary.system_below_floor {
        sink.emit("System object is below floor.", Severity::Low);
    }
    if check.summary.system_not_on_top {
        sink.emit_if(
            Category::SysNotOnTop,
            "System object is not on top.",
            Severity::Low,
        );
    }
}

fn shop_unpaid(check: &TileCheck<'_>, sink: &mut RuleSink<'_>) {
    if !check.summary.is_shop() {
        return;
    }
    for &id in check.objects {
        let object = check.doc.object(id);
        let attrs = &object.attributes;
        if attrs.flag("sys_object") || attrs.flag("no_pick") {
            continue;
        }
        let unpaid = attrs.get("unpaid").is_some_and(|v| !v.is_zero());
        if !unpaid {
            sink.emit(
                format!(
                    "Object '{}' is on a shop tile but is not unpaid.",
                    object.archetype_name
                ),
                Severity::High,
            );
        }
    }
}

fn out_of_bounds(check: &TileCheck<'_>, sink: &mut RuleSink<'_>) {
    let Some((width, height)) = check.doc.dimensions() else {
        return;
    };
    let Position { x, y } = check.position;
    if !(0..width).contains(&x) || !(0..height).contains(&y) {
        sink.emit(
            format!("Tile ({x}, {y}) is outside the map ({width} x {height})."),
            Severity::High,
        );
    }
}
