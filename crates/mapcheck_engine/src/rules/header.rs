//! Map header rules.

use mapcheck_foundation::{AttributeRecord, Severity};
use mapcheck_storage::{CatalogIndex, MapDocument};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Category;
use crate::sink::RuleSink;
use crate::types::MAX_LEVEL;

static MUSIC_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_\-]+\.\w+").expect("music pattern is valid"));

static MAP_MESSAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^Created:\s*\d{4}-\d{2}-\d{2} [^\n]*(\nModified:\s*\d{4}-\d{2}-\d{2} [^\n]*)?\n?$",
    )
    .expect("map message pattern is valid")
});

const TILE_PATH_PREFIX: &str = "tile_path_";

/// Name of the world overview map, which carries no objects of its own.
pub const WORLD_MAP_NAME: &str = "World";

/// A header rule.
pub type HeaderRule = fn(&HeaderCheck<'_>, &mut RuleSink<'_>);

/// What a header rule may look at.
pub struct HeaderCheck<'a> {
    /// The map being checked.
    pub doc: &'a MapDocument,
    /// Catalog lookups.
    pub catalog: &'a CatalogIndex,
}

impl<'a> HeaderCheck<'a> {
    /// The header record.
    #[must_use]
    pub fn header(&self) -> &'a AttributeRecord {
        &self.doc.header
    }
}

/// Header rules in the order they run.
pub const HEADER_RULES: &[(&str, HeaderRule)] = &[
    ("tiling", tiling),
    ("difficulty", difficulty),
    ("music_format", music_format),
    ("dimensions", dimensions),
    ("region_defined", region_defined),
    ("message_format", message_format),
    ("world_region", world_region),
];

fn tiling(check: &HeaderCheck<'_>, sink: &mut RuleSink<'_>) {
    let path = check.doc.source.name();
    let mut seen: Vec<String> = Vec::new();

    for (name, value) in check.header().with_prefix(TILE_PATH_PREFIX) {
        let tile = value.to_string();
        if path.ends_with(&tile) {
            let number = &name[TILE_PATH_PREFIX.len()..];
            sink.emit(
                format!("Map is tiled into itself (tile #{number})."),
                Severity::Critical,
            );
            continue;
        }
        for _ in seen.iter().filter(|earlier| **earlier == tile) {
            sink.emit(
                format!("Map is tiled to '{tile}' more than once."),
                Severity::Critical,
            );
        }
        seen.push(tile);
    }
}

fn difficulty(check: &HeaderCheck<'_>, sink: &mut RuleSink<'_>) {
    let Some(value) = check.header().get("difficulty") else {
        sink.emit("Map is missing difficulty.", Severity::Low);
        return;
    };
    if !value.as_int().is_some_and(|d| (1..=MAX_LEVEL).contains(&d)) {
        sink.emit(
            format!("Map has invalid difficulty: {value}. Valid difficulties are 1-{MAX_LEVEL}."),
            Severity::Medium,
        );
    }
}

fn music_format(check: &HeaderCheck<'_>, sink: &mut RuleSink<'_>) {
    let Some(music) = check.header().text("bg_music") else {
        return;
    };
    if !MUSIC_FILE.is_match(&music) {
        sink.emit(
            format!(
                "Map's background music attribute ('{music}') is not in a valid format. Valid format is (example): ocean.ogg"
            ),
            Severity::High,
        );
    }
}

fn dimensions(check: &HeaderCheck<'_>, sink: &mut RuleSink<'_>) {
    if !check.header().contains("width") {
        sink.emit("Map is missing width.", Severity::High);
    }
    if !check.header().contains("height") {
        sink.emit("Map is missing height.", Severity::High);
    }
}

fn region_defined(check: &HeaderCheck<'_>, sink: &mut RuleSink<'_>) {
    let Some(region) = check.header().text("region") else {
        return;
    };
    if check.catalog.region(&region).is_none() {
        sink.emit(
            format!("Map's region '{region}' is not defined in regions.reg file."),
            Severity::High,
        );
    }
}

fn message_format(check: &HeaderCheck<'_>, sink: &mut RuleSink<'_>) {
    match check.header().text("msg") {
        None => sink.emit("Map is missing message.", Severity::Low),
        Some(msg) if !MAP_MESSAGE.is_match(&msg) => {
            sink.emit("Map's message is in incorrect format.", Severity::Low);
        }
        Some(_) => {}
    }
}

fn world_region(check: &HeaderCheck<'_>, sink: &mut RuleSink<'_>) {
    let header = check.header();
    if check.doc.name() == Some(WORLD_MAP_NAME) {
        if header.contains("region") {
            sink.emit("Empty world map has a region.", Severity::Warning);
        }
        return;
    }
    if !header.contains("region") {
        sink.emit_if(Category::MapNoRegion, "Map is missing region.", Severity::Medium);
    }
    if !header.contains("bg_music") {
        sink.emit_if(
            Category::MapNoMusic,
            "Map is missing background music.",
            Severity::Low,
        );
    }
}
