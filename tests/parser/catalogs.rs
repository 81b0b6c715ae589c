//! Catalog parsing across the three catalog files.

use mapcheck_foundation::{DiagnosticAggregator, Severity, SourceId};
use mapcheck_parser::{parse_archetypes, parse_artifacts, parse_regions};
use mapcheck_storage::CatalogIndex;

const ARCHETYPES: &str = "\
Object ring
type 70
name ring
material 64
end
Object amulet
type 39
end
";

const ARTIFACTS: &str = "\
Allowed none
chance 10
artifact ring_of_strength
def_arch ring
name ring of strength
Str 2
end
artifact ring_of_giants
def_arch ring_of_strength
Str 4
end
artifact ring_of_nothing
def_arch crown
end
";

#[test]
fn artifacts_chain_through_earlier_artifacts() {
    let mut diagnostics = DiagnosticAggregator::new();
    let archetypes = parse_archetypes(ARCHETYPES, &mut diagnostics);
    let artifacts = parse_artifacts(ARTIFACTS, &archetypes, &mut diagnostics);

    let strength = artifacts.get("ring_of_strength").unwrap();
    assert_eq!(strength.str("name"), Some("ring of strength"));
    assert_eq!(strength.int("Str"), Some(2));
    assert_eq!(strength.int("material"), Some(64));

    let giants = artifacts.get("ring_of_giants").unwrap();
    assert_eq!(giants.str("archname"), Some("ring_of_giants"));
    assert_eq!(giants.str("name"), Some("ring of strength"));
    assert_eq!(giants.int("Str"), Some(4));
    assert_eq!(giants.int("type"), Some(70));
}

#[test]
fn lines_before_the_first_block_are_ignored() {
    let mut diagnostics = DiagnosticAggregator::new();
    let archetypes = parse_archetypes(ARCHETYPES, &mut diagnostics);
    let artifacts = parse_artifacts(ARTIFACTS, &archetypes, &mut diagnostics);
    assert_eq!(artifacts.len(), 3);
    assert!(artifacts.iter().all(|(_, record)| !record.contains("Allowed")));
}

#[test]
fn unresolved_def_arch_keeps_own_attributes() {
    let mut diagnostics = DiagnosticAggregator::new();
    let archetypes = parse_archetypes(ARCHETYPES, &mut diagnostics);
    let artifacts = parse_artifacts(ARTIFACTS, &archetypes, &mut diagnostics);

    let nothing = artifacts.get("ring_of_nothing").unwrap();
    assert_eq!(nothing.str("archname"), Some("ring_of_nothing"));
    assert!(!nothing.contains("type"));

    let group = diagnostics.catalog_group(&SourceId::Artifacts).unwrap();
    assert_eq!(group.diagnostics.len(), 1);
    assert_eq!(group.diagnostics[0].severity, Severity::Critical);
    assert_eq!(
        group.diagnostics[0].message,
        "Artifact 'ring_of_nothing': Could not find archetype 'crown' for def_arch command (line: 13)."
    );
    assert_eq!(group.diagnostics[0].position, None);
}

#[test]
fn index_lookups() {
    let mut diagnostics = DiagnosticAggregator::new();
    let archetypes = parse_archetypes(ARCHETYPES, &mut diagnostics);
    let artifacts = parse_artifacts(ARTIFACTS, &archetypes, &mut diagnostics);
    let regions = parse_regions(
        "region world\nend\nregion island\nparent world\nlongname The Island\nend\n",
        &mut diagnostics,
    );
    let index = CatalogIndex::new(archetypes, artifacts, regions);

    assert_eq!(index.find_archetype("amulet").and_then(|r| r.int("type")), Some(39));
    assert_eq!(
        index.find_archetype("ring_of_giants").and_then(|r| r.int("Str")),
        Some(4)
    );
    assert!(index.is_artifact("ring_of_giants"));
    assert!(!index.is_artifact("ring"));
    assert_eq!(
        index.region("island").and_then(|r| r.str("longname")),
        Some("The Island")
    );
    assert!(index.region("ring").is_none());
}

#[test]
fn duplicate_archetypes() {
    let mut diagnostics = DiagnosticAggregator::new();
    let archetypes = parse_archetypes(
        "Object ring\ntype 70\nend\nObject ring\ntype 71\nend\n",
        &mut diagnostics,
    );
    assert_eq!(archetypes.get("ring").and_then(|r| r.int("type")), Some(71));

    let group = diagnostics.catalog_group(&SourceId::Archetypes).unwrap();
    assert_eq!(group.diagnostics[0].message, "Archetype 'ring' is defined more than once.");
    assert_eq!(group.diagnostics[0].severity, Severity::High);
}
