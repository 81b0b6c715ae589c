//! Whole-pipeline properties.

use mapcheck_engine::{Category, RuleConfig};
use mapcheck_foundation::{DiagnosticAggregator, Severity, Value};
use mapcheck_parser::{parse_archetypes, parse_artifacts};
use proptest::prelude::*;

use crate::common::{CLEAN_HEADER, Checker, check, map};

fn attribute_name() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,10}".prop_filter("reserved names", |name| {
        !matches!(name.as_str(), "end" | "msg" | "endmsg" | "def_arch" | "archname" | "name" | "artifact" | "region")
    })
}

fn attribute_value() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i64>().prop_map(|n| n.to_string()),
        "[a-z][a-z0-9_.]{0,12}",
    ]
}

proptest! {
    #[test]
    fn bare_def_arch_copies_the_base(
        attrs in proptest::collection::btree_map(attribute_name(), attribute_value(), 0..8)
    ) {
        let mut text = String::from("Object base\n");
        for (name, value) in &attrs {
            text.push_str(&format!("{name} {value}\n"));
        }
        text.push_str("end\n");

        let mut diagnostics = DiagnosticAggregator::new();
        let archetypes = parse_archetypes(&text, &mut diagnostics);
        let artifacts = parse_artifacts(
            "artifact copy\ndef_arch base\nend\n",
            &archetypes,
            &mut diagnostics,
        );
        prop_assert!(diagnostics.is_empty());

        let mut expected = archetypes.get("base").cloned().unwrap_or_default();
        expected.set("archname", Value::text("copy"));
        prop_assert_eq!(artifacts.get("copy"), Some(&expected));
    }
}

fn beacon(name: &str) -> String {
    map(&format!("arch beacon\nname {name}\nend\n"))
}

fn critical_count(checker: &Checker) -> usize {
    checker
        .findings()
        .iter()
        .filter(|f| f.severity == Severity::Critical)
        .count()
}

#[test]
fn duplicate_beacon_across_maps() {
    let mut checker = Checker::new();
    checker.check("/first", &beacon("gate_key"));
    assert_eq!(critical_count(&checker), 0);

    checker.check("/second", &beacon("gate_key"));
    let findings = checker.findings();
    assert_eq!(critical_count(&checker), 1);
    assert_eq!(
        findings[0].message,
        "Beacon 'beacon' with the name 'gate_key' already exists."
    );

    let second = checker
        .diagnostics
        .map_groups()
        .iter()
        .find(|group| group.source.name() == "/second")
        .map(|group| group.diagnostics.len());
    assert_eq!(second, Some(1));
}

#[test]
fn duplicate_beacon_in_one_map() {
    let text = map("arch beacon\nname twin\nend\narch beacon\nname twin\nx 1\nend\narch beacon\nname other\nend\n");
    let findings = check(&text);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Critical);
    assert_eq!(findings[0].position.map(|p| (p.x, p.y)), Some((1, 0)));
}

#[test]
fn clearing_scan_state_forgets_beacons() {
    let mut checker = Checker::new();
    checker.check("/first", &beacon("gate_key"));
    checker.scan.clear();
    checker.check("/first", &beacon("gate_key"));
    assert!(checker.findings().is_empty());
}

#[test]
fn region_toggle_removes_only_that_diagnostic() {
    let text = CLEAN_HEADER
        .replace("region north\n", "")
        .replace("difficulty 5\n", "");

    let with = check(&text);
    let mut checker = Checker::with_config(RuleConfig::new().with(Category::MapNoRegion, false));
    checker.check("/test/map", &text);
    let without = checker.findings();

    assert_eq!(with.len(), without.len() + 1);
    let removed: Vec<_> = with.iter().filter(|f| !without.contains(f)).collect();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].message, "Map is missing region.");
}

#[test]
fn shop_diagnostic_appears_once_per_item() {
    let text = map("arch shop_floor\nend\narch sword\nend\narch sword\nunpaid 1\nend\n");
    let findings = check(&text);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::High);
}
