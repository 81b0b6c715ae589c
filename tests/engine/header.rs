//! Map header rules.

use mapcheck_engine::{Category, RuleConfig};
use mapcheck_foundation::Severity;

use crate::common::{CLEAN_HEADER, Checker, check, messages};

fn header(lines: &str) -> String {
    format!("arch map\n{lines}end\n")
}

#[test]
fn clean_header_has_no_findings() {
    assert!(check(CLEAN_HEADER).is_empty());
}

#[test]
fn empty_header_reports_in_rule_order() {
    assert_eq!(
        messages(&header("")),
        [
            "Map is missing difficulty.",
            "Map is missing width.",
            "Map is missing height.",
            "Map is missing message.",
            "Map is missing region.",
        ]
    );
}

#[test]
fn header_findings_have_no_position() {
    assert!(check(&header("")).iter().all(|f| f.position.is_none()));
}

#[test]
fn difficulty_out_of_range() {
    let text = CLEAN_HEADER.replace("difficulty 5", "difficulty 200");
    let findings = check(&text);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Medium);
    assert_eq!(
        findings[0].message,
        "Map has invalid difficulty: 200. Valid difficulties are 1-115."
    );
}

#[test]
fn difficulty_not_a_number() {
    let text = CLEAN_HEADER.replace("difficulty 5", "difficulty hard");
    assert_eq!(
        messages(&text),
        ["Map has invalid difficulty: hard. Valid difficulties are 1-115."]
    );
}

#[test]
fn music_format() {
    let text = CLEAN_HEADER.replace("bg_music ocean.ogg", "bg_music the ocean");
    let findings = check(&text);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::High);
    assert_eq!(
        findings[0].message,
        "Map's background music attribute ('the ocean') is not in a valid format. Valid format is (example): ocean.ogg"
    );
}

#[test]
fn undefined_region() {
    let text = CLEAN_HEADER.replace("region north", "region south");
    assert_eq!(
        messages(&text),
        ["Map's region 'south' is not defined in regions.reg file."]
    );
}

#[test]
fn message_format() {
    let text = CLEAN_HEADER.replace("Created:  2024-01-01 Someone", "made by someone");
    let findings = check(&text);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Low);
    assert_eq!(findings[0].message, "Map's message is in incorrect format.");

    let modified = CLEAN_HEADER.replace(
        "Created:  2024-01-01 Someone",
        "Created:  2024-01-01 Someone\nModified: 2024-02-03 Someone Else",
    );
    assert!(check(&modified).is_empty());
}

#[test]
fn tiling() {
    let text = CLEAN_HEADER.replace(
        "width 4",
        "tile_path_1 /test/map\ntile_path_2 other\ntile_path_3 other\nwidth 4",
    );
    let findings = check(&text);
    assert_eq!(
        findings.iter().map(|f| f.message.as_str()).collect::<Vec<_>>(),
        [
            "Map is tiled into itself (tile #1).",
            "Map is tiled to 'other' more than once.",
        ]
    );
    assert!(findings.iter().all(|f| f.severity == Severity::Critical));
}

#[test]
fn world_map() {
    let text = header("name World\nwidth 4\nheight 4\ndifficulty 1\nregion north\n");
    let findings = check(&text);
    assert!(findings.contains(&crate::common::Finding {
        severity: Severity::Warning,
        message: "Empty world map has a region.".into(),
        position: None,
    }));
    assert!(!findings.iter().any(|f| f.message == "Map is missing region."));

    let bare = header("name World\nwidth 4\nheight 4\ndifficulty 1\n");
    assert_eq!(messages(&bare), ["Map is missing message."]);
}

#[test]
fn missing_music_is_opt_in() {
    let text = CLEAN_HEADER.replace("bg_music ocean.ogg\n", "");
    assert!(check(&text).is_empty());

    let mut checker = Checker::with_config(RuleConfig::new().with(Category::MapNoMusic, true));
    checker.check("/test/map", &text);
    let findings = checker.findings();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].message, "Map is missing background music.");
    assert_eq!(findings[0].severity, Severity::Low);
}
