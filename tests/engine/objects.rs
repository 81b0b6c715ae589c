//! Object rules.

use std::fs;

use mapcheck_engine::{Category, RuleConfig};
use mapcheck_foundation::{Position, Severity};

use crate::common::{CLEAN_HEADER, Checker, Finding, check, map, messages};

fn finding(severity: Severity, message: &str, x: i64, y: i64) -> Finding {
    Finding {
        severity,
        message: message.into(),
        position: Some(Position::new(x, y)),
    }
}

#[test]
fn unknown_archetype_is_critical() {
    let text = map("arch nothing\nx 2\ny 3\nend\n");
    assert_eq!(
        check(&text),
        [finding(Severity::Critical, "Invalid archetype 'nothing' found.", 2, 3)]
    );
}

#[test]
fn monster_outside_spawn_point() {
    let text = map("arch floor\nx 1\ny 1\nend\narch orc\nx 1\ny 1\nend\n");
    assert_eq!(
        check(&text),
        [finding(Severity::Medium, "Monster 'orc' is outside spawn point.", 1, 1)]
    );
}

#[test]
fn spawn_point_contents() {
    assert_eq!(
        messages(&map("arch spawn_point\nend\n")),
        ["Empty spawn point object."]
    );
    assert!(check(&map("arch spawn_point\narch guard\nend\nend\n")).is_empty());
    assert_eq!(
        messages(&map("arch spawn_point\narch sword\nend\nend\n")),
        ["Object 'sword' is not a monster but is inside a spawn point."]
    );
    assert_eq!(
        messages(&map("arch floor\nend\narch guard\nend\n")),
        ["Monster 'guard' is a spawn point monster but is not inside a spawn point."]
    );
}

#[test]
fn inventory_items_share_the_root_position() {
    let text = map("arch spawn_point\nx 3\ny 2\narch sword\nend\nend\n");
    let findings = check(&text);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].position, Some(Position::new(3, 2)));
}

#[test]
fn position_inside_inventory() {
    let text = map("arch spawn_point\narch guard\nx 1\nend\nend\n");
    assert_eq!(
        messages(&text),
        ["Object 'guard' has X position set but is in inventory of another object."]
    );
}

#[test]
fn spawn_point_inside_inventory() {
    let text = map("arch floor\nend\narch orc\narch spawn_point\narch guard\nend\nend\nend\n");
    assert_eq!(
        messages(&text),
        [
            "Monster 'orc' is outside spawn point.",
            "Object 'spawn_point' is inside inventory of another object, but it's not allowed for that object to be inside of inventory.",
        ]
    );
}

#[test]
fn modified_artifact() {
    let text = map("arch floor\nend\narch sword_of_fire\ndam 15\nend\n");
    assert_eq!(
        check(&text),
        [finding(
            Severity::High,
            "Artifact 'sword_of_fire' with modified attributes. Move to artifacts file to fix this.",
            0,
            0
        )]
    );

    let varying = map("arch floor\nend\narch sword_of_fire\nidentified 1\nnrof 2\nend\n");
    assert!(check(&varying).is_empty());
}

#[test]
fn redundant_attribute() {
    let text = map("arch floor\nend\narch sword\ndam 5\nend\n");
    assert_eq!(
        check(&text),
        [finding(
            Severity::Low,
            "Object 'sword' has attribute(s) with values same as the default.",
            0,
            0
        )]
    );
}

#[test]
fn monster_levels() {
    let easy = CLEAN_HEADER.replace("difficulty 5", "difficulty 1");
    let text = format!("{easy}arch floor\nend\narch orc\nlevel 12\nend\n");
    assert_eq!(
        messages(&text),
        [
            "Monster 'orc' is level 12 but map's difficulty is 1.",
            "Monster 'orc' is outside spawn point.",
        ]
    );

    let text = map("arch orc\nlevel 200\nend\n");
    let findings = check(&text);
    assert_eq!(findings[0], finding(Severity::High, "Monster 'orc' has invalid level (200).", 0, 0));
}

#[test]
fn missing_difficulty_counts_as_one() {
    let header = CLEAN_HEADER.replace("difficulty 5\n", "");
    let text = format!("{header}arch orc\nlevel 10\nend\n");
    assert!(
        messages(&text).contains(&"Monster 'orc' is level 10 but map's difficulty is 1.".to_string())
    );
}

#[test]
fn undead_race_needs_flag() {
    let text = map("arch orc\nrace undead\nend\n");
    assert_eq!(
        messages(&text)[0],
        "Monster 'orc' is of race 'undead', but has no 'undead 1' flag set."
    );
}

#[test]
fn random_drop_outside_inventory() {
    let text = map("arch random_drop\nend\n");
    assert_eq!(messages(&text), ["Object 'random_drop' outside of inventory."]);
    assert!(check(&map("arch orc\narch random_drop\nend\nend\n"))
        .iter()
        .all(|f| f.message != "Object 'random_drop' outside of inventory."));
}

#[test]
fn waypoints() {
    let none = map("arch orc\nmovement_type 176\nend\n");
    assert!(messages(&none).contains(
        &"Monster 'orc' has waypoint movement enabled but no waypoints.".to_string()
    ));

    let broken = map(
        "arch orc\nmovement_type 176\narch waypoint\nname a\ntitle b\nend\nend\n",
    );
    assert!(messages(&broken).contains(
        &"Monster 'orc' has waypoint ('a') with nonexistent next waypoint.".to_string()
    ));

    let linked = map(
        "arch floor\nend\narch orc\nmovement_type 176\narch waypoint\nname a\ntitle b\nend\narch waypoint\nname b\nend\nend\n",
    );
    assert_eq!(messages(&linked), ["Monster 'orc' is outside spawn point."]);
}

#[test]
fn event_plugins() {
    let missing = map("arch spawn_point\narch guard\narch event_obj\nend\nend\nend\n");
    assert_eq!(
        messages(&missing),
        ["Event object 'event_obj' is missing plugin name."]
    );

    let unknown = map("arch spawn_point\narch guard\narch event_obj\nname Ruby\nend\nend\nend\n");
    let findings = check(&unknown);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Critical);
    assert_eq!(findings[0].message, "Event object 'event_obj' has unknown plugin 'Ruby'.");
}

#[test]
fn event_script_paths() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("scripts")).unwrap();
    fs::write(root.path().join("scripts/found.py"), "").unwrap();

    let event = |script: &str| {
        map(&format!(
            "arch spawn_point\narch guard\narch event_obj\nname Python\nrace {script}\nend\nend\nend\n"
        ))
    };
    let config = RuleConfig::new().with_script_root(root.path());

    let mut checker = Checker::with_config(config.clone());
    checker.check("/test/map", &event("/scripts/found.py"));
    assert!(checker.findings().is_empty());

    let mut checker = Checker::with_config(config);
    checker.check("/test/map", &event("/scripts/lost.py"));
    assert_eq!(
        checker.findings()[0].message,
        "Event object 'event_obj' has a path that doesn't exist."
    );

    // Without a script root only the path shape is checked.
    assert_eq!(
        messages(&event("../../python/x.py")),
        ["Event object 'event_obj' is using a relative path to point to the global /python directory."]
    );
    assert!(check(&event("/scripts/lost.py")).is_empty());
}

#[test]
fn beacon_needs_name() {
    let text = map("arch beacon\nend\n");
    assert_eq!(
        check(&text),
        [finding(Severity::Critical, "Beacon 'beacon' is missing name.", 0, 0)]
    );
}

#[test]
fn inventory_is_checked_depth_first() {
    let text = map(
        "arch spawn_point\narch guard\narch event_obj\nend\nend\narch sword\nend\nend\n",
    );
    assert_eq!(
        messages(&text),
        [
            "Event object 'event_obj' is missing plugin name.",
            "Object 'sword' is not a monster but is inside a spawn point.",
        ]
    );
}

#[test]
fn untyped_roots_are_not_checked() {
    let text = map("arch marker\narch spawn_point\nend\nend\n");
    assert!(check(&text).is_empty());
}

#[test]
fn book_messages() {
    let text = map("arch floor\nend\narch book\nmsg\nSee [b]this[/b] ~now~\nendmsg\nend\n");
    assert_eq!(
        messages(&text),
        ["Object book contains unescaped markup in message."]
    );

    let mut checker = Checker::with_config(
        RuleConfig::new().with(Category::DeprecatedControlChars, true),
    );
    checker.check("/test/map", &text);
    assert_eq!(checker.findings().len(), 2);
}

#[test]
fn door_flags() {
    let text = map("arch floor\nend\narch wall\ndamned 1\nno_magic 1\nend\n");
    assert_eq!(
        messages(&text),
        [
            "Object wall has 'damned 1' flag set, but this is not supported.",
            "Object wall has 'no_magic 1' flag set, which may be an error, as this flag is usually set on floor objects.",
        ]
    );
}

#[test]
fn changed_layer_is_opt_in() {
    let text = map("arch floor\nend\narch sword\nlayer 3\nend\n");
    assert!(check(&text).is_empty());

    let mut checker = Checker::with_config(RuleConfig::new().with(Category::LayerChanged, true));
    checker.check("/test/map", &text);
    assert_eq!(
        checker.findings()[0].message,
        "Object sword has had layer changed to 3 from the default value of 4 - this is not recommended."
    );
}

/// A villager NPC inside a spawn point, with extra lines for the villager.
fn villager(lines: &str) -> String {
    map(&format!("arch spawn_point\narch villager\n{lines}end\nend\n"))
}

#[test]
fn npc_without_custom_name() {
    let dialog = villager("msg\n@match ^hello$\nHi.\nendmsg\n");
    assert_eq!(
        check(&dialog),
        [finding(
            Severity::Warning,
            "NPC 'villager' has no custom name, but has a dialog.",
            0,
            0
        )]
    );

    let say_event = villager("arch event_obj\nname Python\nsub_type 6\nend\n");
    assert_eq!(
        messages(&say_event),
        ["NPC 'villager' has no custom name, but has a dialog."]
    );

    // No dialog, a guard script or a custom name are all fine
    assert!(check(&villager("")).is_empty());
    let guard = villager(
        "arch event_obj\nname Python\nsub_type 6\nrace /python/generic/guard.py\nend\n",
    );
    assert!(check(&guard).is_empty());
    let named = villager("name Aldric\nmsg\n@match ^hello$\nHi.\nendmsg\n");
    assert!(check(&named).is_empty());
}

#[test]
fn npc_name_format() {
    assert_eq!(
        check(&villager("name ALDRIC\n")),
        [finding(
            Severity::Low,
            "NPC 'villager' has name in incorrect format.",
            0,
            0
        )]
    );
    assert!(check(&villager("name Aldric Smith III\n")).is_empty());
    assert!(check(&villager("name old aldric\n")).is_empty());
}

#[test]
fn spell_casting_needs_abilities_mana_and_usage() {
    assert_eq!(
        check(&villager("can_cast_spell 1\n")),
        [
            finding(
                Severity::Low,
                "Monster 'villager' can cast spells but has no ability objects.",
                0,
                0
            ),
            finding(
                Severity::Medium,
                "Monster 'villager' can cast spells but has 0 mana.",
                0,
                0
            ),
            finding(
                Severity::Medium,
                "Monster 'villager' can cast spells but has unset ability usage.",
                0,
                0
            ),
        ]
    );

    let ready = villager("can_cast_spell 1\nmaxsp 20\nDex 3\narch ability\nend\n");
    assert!(check(&ready).is_empty());
}

#[test]
fn abilities_without_spell_casting() {
    assert_eq!(
        check(&villager("arch ability\nend\n")),
        [finding(
            Severity::Warning,
            "Monster 'villager' cannot cast spells but has ability objects.",
            0,
            0
        )]
    );
}

#[test]
fn only_integer_zero_mana_counts_as_unset() {
    let bare = villager("can_cast_spell 1\nmaxsp\nDex 3\narch ability\nend\n");
    assert!(check(&bare).is_empty());

    let zero = villager("can_cast_spell 1\nmaxsp 0\nDex 3\narch ability\nend\n");
    assert!(messages(&zero).contains(&"Monster 'villager' can cast spells but has 0 mana.".to_string()));
}

#[test]
fn magic_mouth_direction() {
    let text = map("arch mouth\nwalk_on 1\nsplitting 1\nend\n");
    assert_eq!(
        check(&text),
        [finding(
            Severity::Warning,
            "Magic mouth 'mouth' has adjacent direction set but actual facing direction is not set.",
            0,
            0
        )]
    );

    let facing = map("arch mouth\nwalk_on 1\nsplitting 1\ndirection 3\nis_turnable 1\nend\n");
    assert!(check(&facing).is_empty());
    assert!(check(&map("arch mouth\nwalk_on 1\nend\n")).is_empty());
}

#[test]
fn unsupported_direction() {
    let text = map("arch floor\nend\narch decor\ndirection 2\nend\n");
    assert_eq!(
        check(&text),
        [finding(
            Severity::Warning,
            "Object 'decor' has direction but that type of object doesn't support directions.",
            0,
            0
        )]
    );

    let animated = map("arch floor\nend\narch decor\ndirection 2\nis_animated 1\nend\n");
    assert!(check(&animated).is_empty());
}

#[test]
fn turnable_direction() {
    let turned = |direction: i64| {
        map(&format!(
            "arch floor\nend\narch decor\nis_turnable 1\ndraw_direction 1\ndirection {direction}\nend\n"
        ))
    };
    assert_eq!(
        check(&turned(4)),
        [finding(
            Severity::Low,
            "Object decor has wrong direction 4; must be facing either west or north.",
            0,
            0
        )]
    );
    assert!(check(&turned(7)).is_empty());
    assert!(check(&turned(1)).is_empty());
}

#[test]
fn random_movement_range() {
    assert_eq!(
        check(&villager("random_movement 1\n")),
        [finding(
            Severity::Low,
            "Monster 'villager' has random movement enabled but no max movement range X/Y.",
            0,
            0
        )]
    );
    assert!(check(&villager("random_movement 1\nitem_race 3\nitem_level 2\n")).is_empty());
}

#[test]
fn duplicate_events() {
    let event = |sub_type: i64| format!("arch event_obj\nname Python\nsub_type {sub_type}\nend\n");
    let twice = villager(&format!("{}{}", event(1), event(1)));
    assert_eq!(
        check(&twice),
        [finding(
            Severity::Low,
            "NPC 'villager' has events with two or more events with the same event type.",
            0,
            0
        )]
    );

    let distinct = villager(&format!("{}{}", event(1), event(2)));
    assert!(check(&distinct).is_empty());
}

#[test]
fn carrying_attribute() {
    let text = map("arch floor\nend\narch decor\ncarrying 10\nend\n");
    assert_eq!(
        check(&text),
        [finding(Severity::Warning, "Object decor has carrying attribute set.", 0, 0)]
    );
    assert!(check(&map("arch floor\nend\narch decor\nend\n")).is_empty());
}

#[test]
fn animation_none() {
    let text = map("arch floor\nend\narch decor\nanimation NONE\nend\n");
    assert_eq!(
        check(&text),
        [finding(Severity::Warning, "Object decor has animation attribute set to NONE.", 0, 0)]
    );
    assert!(check(&map("arch floor\nend\narch decor\nanimation decor_spin\nend\n")).is_empty());
}

#[test]
fn face_changed() {
    let lamp = map("arch floor\nend\narch lamp\nface lamp_off.101\nend\n");
    assert_eq!(
        check(&lamp),
        [finding(
            Severity::Warning,
            "Object lamp is a light source but has had face changed.",
            0,
            0
        )]
    );

    let animated = map("arch floor\nend\narch decor\nis_animated 1\nface statue.101\nend\n");
    assert_eq!(
        messages(&animated),
        ["Object decor is animated/turnable but has had face changed."]
    );

    assert!(check(&map("arch floor\nend\narch lamp\nend\n")).is_empty());
    assert!(check(&map("arch floor\nend\narch decor\nface statue.101\nend\n")).is_empty());
}

#[test]
fn quest_container_name() {
    // Archetypes always carry a name; artifacts only when they define one
    assert_eq!(
        check(&villager("arch quest_pouch\nend\n")),
        [finding(
            Severity::High,
            "Quest container 'quest_pouch' has no quest name.",
            0,
            0
        )]
    );
    assert!(check(&villager("arch quest_box\nend\n")).is_empty());
}

#[test]
fn player_type() {
    let text = map("arch floor\nend\narch hero\nend\n");
    assert_eq!(
        check(&text),
        [finding(Severity::Critical, "Object 'hero' is of type player.", 0, 0)]
    );
    assert!(check(&map("arch floor\nend\narch decor\nend\n")).is_empty());
}

#[test]
fn system_object_on_a_layer() {
    let text = map("arch floor\nend\narch mouth\nlayer 2\nend\n");
    assert_eq!(
        check(&text),
        [finding(
            Severity::Low,
            "Object 'mouth' is a system object but has a layer set.",
            0,
            0
        )]
    );

    // Inside a spawn point monster the layer is allowed
    assert!(check(&villager("arch random_drop\nlayer 3\nend\n")).is_empty());
    assert!(check(&map("arch mouth\nend\n")).is_empty());
}
