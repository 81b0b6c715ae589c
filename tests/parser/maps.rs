//! Map building against a parsed catalog.

use mapcheck_foundation::{DiagnosticAggregator, ErrorKind, Position, Severity, SourceId};
use mapcheck_parser::{MapBuilder, parse_archetypes, parse_artifacts, parse_regions};
use mapcheck_storage::{CatalogIndex, MapDocument};

const ARCHETYPES: &str = "\
Object floor
type 71
layer 1
is_floor 1
end
Object chest
type 122
layer 3
end
Object sword
type 15
layer 4
dam 5
end
";

const ARTIFACTS: &str = "artifact sword_of_fire\ndef_arch sword\ndam 12\nend\n";

const MAP: &str = "\
arch map
name Cellar
width 3
height 2
difficulty 4
region cellar
msg
Created:  2020-05-01 Builder
endmsg
end
arch floor
end
arch floor
x 1
end
arch chest
x 1
arch sword_of_fire
nrof 2
end
arch sword
end
end
";

fn catalog() -> CatalogIndex {
    let mut diagnostics = DiagnosticAggregator::new();
    let archetypes = parse_archetypes(ARCHETYPES, &mut diagnostics);
    let artifacts = parse_artifacts(ARTIFACTS, &archetypes, &mut diagnostics);
    let regions = parse_regions("region cellar\nend\n", &mut diagnostics);
    CatalogIndex::new(archetypes, artifacts, regions)
}

fn build(text: &str) -> (mapcheck_foundation::Result<MapDocument>, DiagnosticAggregator) {
    let index = catalog();
    let mut diagnostics = DiagnosticAggregator::new();
    let result = MapBuilder::new(&index).build(SourceId::map("/cellar"), text, &mut diagnostics);
    (result, diagnostics)
}

#[test]
fn header_is_separate_from_objects() {
    let (doc, diagnostics) = build(MAP);
    let doc = doc.unwrap();
    assert!(diagnostics.is_empty());

    assert_eq!(doc.name(), Some("Cellar"));
    assert_eq!(doc.dimensions(), Some((3, 2)));
    assert_eq!(doc.header.str("msg"), Some("Created:  2020-05-01 Builder"));
    assert!(!doc.header.contains("type"));
}

#[test]
fn roots_are_placed_by_position() {
    let (doc, _) = build(MAP);
    let doc = doc.unwrap();

    assert_eq!(doc.object_count(), 5);
    assert_eq!(doc.tile(Position::new(0, 0)).len(), 1);

    let names: Vec<_> = doc
        .tile(Position::new(1, 0))
        .iter()
        .map(|&id| doc.object(id).archetype_name.as_str())
        .collect();
    assert_eq!(names, ["floor", "chest"]);
}

#[test]
fn inventory_inherits_catalog_defaults() {
    let (doc, _) = build(MAP);
    let doc = doc.unwrap();
    let chest = doc.tile(Position::new(1, 0))[1];

    let items: Vec<_> = doc.inventory(chest).map(|(_, item)| item).collect();
    assert_eq!(items.len(), 2);

    let fire = items[0];
    assert_eq!(fire.archetype_name, "sword_of_fire");
    assert_eq!(fire.attributes.int("dam"), Some(12));
    assert_eq!(fire.attributes.int("type"), Some(15));
    assert_eq!(fire.attributes.int("nrof"), Some(2));
    assert!(!fire.modified_artifact);

    let (sword_id, sword) = doc.inventory(chest).nth(1).unwrap();
    assert_eq!(sword.attributes.int("dam"), Some(5));
    assert_eq!(doc.position_of(sword_id), Position::new(1, 0));
    assert_eq!(doc.root_of(sword_id), chest);
}

#[test]
fn unknown_archetypes_are_reported_once() {
    let text = format!("{MAP}arch ghost\nx 2\ny 1\narch sword\nend\nend\n");
    let (doc, diagnostics) = build(&text);
    let doc = doc.unwrap();

    let group = &diagnostics.map_groups()[0];
    assert_eq!(group.source.name(), "/cellar");
    assert_eq!(group.diagnostics.len(), 1);
    assert_eq!(group.diagnostics[0].severity, Severity::Critical);
    assert_eq!(group.diagnostics[0].message, "Invalid archetype 'ghost' found.");
    assert_eq!(group.diagnostics[0].position, Some(Position::new(2, 1)));

    let ghost = doc.tile(Position::new(2, 1))[0];
    assert!(!doc.object(ghost).resolved);
    assert_eq!(doc.inventory(ghost).count(), 1);
}

#[test]
fn other_files_are_not_maps() {
    let texts = [
        "",
        "Object floor\nend\n",
        "region north\nend\n",
        "arch map\nwidth 3\n",
        "arch map\narch ghost\n",
        "arch map\nwidth 3\narch floor\narch ghost\n",
    ];
    for text in texts {
        let (result, diagnostics) = build(text);
        let err = result.unwrap_err();
        assert!(err.is_recoverable(), "{text:?}");
        assert!(matches!(err.kind, ErrorKind::NotADocument(_)));
        assert!(diagnostics.is_empty());
    }
}

#[test]
fn windows_line_endings() {
    let text = MAP.replace('\n', "\r\n");
    let (doc, _) = build(&text);
    let doc = doc.unwrap();
    assert_eq!(doc.name(), Some("Cellar"));
    assert_eq!(doc.object_count(), 5);
}
