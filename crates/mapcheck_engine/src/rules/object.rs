//! Per-object rules.
//!
//! Every rule sees one object together with its direct container, its
//! archetype defaults and the map it is on. Diagnostics are positioned on
//! the tile of the outermost container.

use std::path::Path;

use mapcheck_foundation::{AttributeRecord, Severity, Value};
use mapcheck_storage::{CatalogIndex, MapDocument, ObjectId, ObjectInstance};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Category;
use crate::message::MessageIssues;
use crate::sink::RuleSink;
use crate::types::{
    EVENT_SAY, GENERIC_GUARD_SCRIPT, MAX_LEVEL, MOVEMENT_WAYPOINTS, PLUGINS, object_type,
};

static NPC_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][a-z']*)( [A-Z][a-z']*)?( (XC|XL|L?X{0,3})(IX|IV|V?I{0,3}))?$")
        .expect("NPC name pattern is valid")
});

/// NPC names that are fine to leave at their archetype default.
const GENERIC_NPC_NAMES: &[&str] = &["guard", "knight"];

/// Region whose NPCs keep default names.
const CREATION_REGION: &str = "creation";

/// An object rule.
pub type ObjectRule = fn(&ObjectCheck<'_>, &mut RuleSink<'_>);

/// Everything an object rule may look at.
pub struct ObjectCheck<'a> {
    /// The map being checked.
    pub doc: &'a MapDocument,
    /// Catalog lookups.
    pub catalog: &'a CatalogIndex,
    /// The object's id in `doc`.
    pub id: ObjectId,
    /// The object itself.
    pub object: &'a ObjectInstance,
    /// Its direct container.
    pub parent: Option<&'a ObjectInstance>,
    /// Archetype (or artifact) defaults, if the name resolved.
    pub archetype: Option<&'a AttributeRecord>,
    /// The map's difficulty: 1 when unset, `None` when not an integer.
    pub difficulty: Option<i64>,
}

impl<'a> ObjectCheck<'a> {
    /// Builds the check context for one object.
    #[must_use]
    pub fn new(
        doc: &'a MapDocument,
        catalog: &'a CatalogIndex,
        id: ObjectId,
        difficulty: Option<i64>,
    ) -> Self {
        let object = doc.object(id);
        Self {
            doc,
            catalog,
            id,
            object,
            parent: doc.parent(id),
            archetype: catalog.find_archetype(&object.archetype_name),
            difficulty,
        }
    }

    /// The archetype name the object was created from.
    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.object.archetype_name
    }

    /// The object's attributes.
    #[must_use]
    pub fn attrs(&self) -> &'a AttributeRecord {
        &self.object.attributes
    }

    /// Returns true if the object's `type` is `kind`.
    #[must_use]
    pub fn is(&self, kind: i64) -> bool {
        self.object.object_type() == Some(kind)
    }

    /// Returns true if the object's `type` is any of `kinds`.
    #[must_use]
    pub fn is_any(&self, kinds: &[i64]) -> bool {
        self.object
            .object_type()
            .is_some_and(|kind| kinds.contains(&kind))
    }

    /// The direct container's `type`.
    #[must_use]
    pub fn parent_type(&self) -> Option<i64> {
        self.parent.and_then(ObjectInstance::object_type)
    }

    /// Direct inventory items of a given `type`.
    pub fn inventory_of(&self, kind: i64) -> impl Iterator<Item = &'a ObjectInstance> + use<'a> {
        let doc = self.doc;
        doc.inventory(self.id)
            .map(|(_, item)| item)
            .filter(move |item| item.object_type() == Some(kind))
    }

    fn archetype_value(&self, name: &str) -> Option<&'a Value> {
        self.archetype.and_then(|archetype| archetype.get(name))
    }
}

/// Object rules in the order they run.
pub const OBJECT_RULES: &[(&str, ObjectRule)] = &[
    ("empty_spawn_point", empty_spawn_point),
    ("player", player),
    ("not_monster_in_spawn_point", not_monster_in_spawn_point),
    ("not_allowed_in_inventory", not_allowed_in_inventory),
    ("position_in_inventory", position_in_inventory),
    ("modified_artifact", modified_artifact),
    ("redundant_attribute", redundant_attribute),
    ("system_object_layer", system_object_layer),
    ("monster_level", monster_level),
    ("monster_race", monster_race),
    ("npc_name", npc_name),
    ("spawn_point_mob_outside", spawn_point_mob_outside),
    ("monster_outside_spawn_point", monster_outside_spawn_point),
    ("outside_inventory", outside_inventory),
    ("quest_container_name", quest_container_name),
    ("duplicate_events", duplicate_events),
    ("spell_casting", spell_casting),
    ("waypoints", waypoints),
    ("magic_mouth", magic_mouth),
    ("unsupported_direction", unsupported_direction),
    ("event_plugin", event_plugin),
    ("event_script", event_script),
    ("beacon", beacon),
    ("random_movement", random_movement),
    ("turnable_direction", turnable_direction),
    ("door_flags", door_flags),
    ("message", message),
    ("layer_changed", layer_changed),
    ("carrying", carrying),
    ("animation_none", animation_none),
    ("face_changed", face_changed),
];

fn empty_spawn_point(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.is(object_type::SPAWN_POINT) && check.object.inventory.is_empty() {
        sink.emit("Empty spawn point object.", Severity::Medium);
    }
}

fn player(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.is(object_type::PLAYER) {
        sink.emit(
            format!("Object '{}' is of type player.", check.name()),
            Severity::Critical,
        );
    }
}

fn not_monster_in_spawn_point(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    let allowed = [
        object_type::SPAWN_POINT_MOB,
        object_type::BEACON,
        object_type::EVENT_OBJECT,
    ];
    if check.parent_type() == Some(object_type::SPAWN_POINT) && !check.is_any(&allowed) {
        sink.emit(
            format!(
                "Object '{}' is not a monster but is inside a spawn point.",
                check.name()
            ),
            Severity::High,
        );
    }
}

fn not_allowed_in_inventory(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.parent.is_none() {
        return;
    }
    let exit_outside_creator = check.parent_type() != Some(object_type::CREATOR)
        && check.is_any(&[object_type::EXIT, object_type::TELEPORTER]);
    if check.is(object_type::SPAWN_POINT) || exit_outside_creator {
        sink.emit(
            format!(
                "Object '{}' is inside inventory of another object, but it's not allowed for that object to be inside of inventory.",
                check.name()
            ),
            Severity::High,
        );
    }
}

fn position_in_inventory(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.parent.is_none() {
        return;
    }
    for (attr, axis) in [("x", "X"), ("y", "Y")] {
        if check.attrs().contains(attr) {
            sink.emit(
                format!(
                    "Object '{}' has {axis} position set but is in inventory of another object.",
                    check.name()
                ),
                Severity::Medium,
            );
        }
    }
}

fn modified_artifact(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.object.modified_artifact && check.catalog.is_artifact(check.name()) {
        sink.emit(
            format!(
                "Artifact '{}' with modified attributes. Move to artifacts file to fix this.",
                check.name()
            ),
            Severity::High,
        );
    }
}

fn redundant_attribute(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.object.redundant_attribute {
        sink.emit(
            format!(
                "Object '{}' has attribute(s) with values same as the default.",
                check.name()
            ),
            Severity::Low,
        );
    }
}

fn system_object_layer(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    let has_layer = check.attrs().get("layer").is_some_and(|layer| !layer.is_zero());
    if check.attrs().flag("sys_object")
        && has_layer
        && check.parent_type() != Some(object_type::SPAWN_POINT_MOB)
    {
        sink.emit(
            format!(
                "Object '{}' is a system object but has a layer set.",
                check.name()
            ),
            Severity::Low,
        );
    }
}

fn is_monster(check: &ObjectCheck<'_>) -> bool {
    check.is_any(&[object_type::MONSTER, object_type::SPAWN_POINT_MOB])
}

fn monster_level(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if !is_monster(check) {
        return;
    }
    let Some(level) = check.attrs().get("level") else {
        sink.emit(
            format!("Monster '{}' has unset level.", check.name()),
            Severity::Medium,
        );
        return;
    };

    match level.as_int() {
        Some(n) if (0..=MAX_LEVEL).contains(&n) => {
            if !check.attrs().flag("friendly") && n >= 10 && check.difficulty == Some(1) {
                sink.emit(
                    format!(
                        "Monster '{}' is level {n} but map's difficulty is 1.",
                        check.name()
                    ),
                    Severity::Medium,
                );
            }
        }
        _ => sink.emit(
            format!("Monster '{}' has invalid level ({level}).", check.name()),
            Severity::High,
        ),
    }
}

fn monster_race(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if !is_monster(check) {
        return;
    }
    match check.attrs().get("race") {
        None => sink.emit(
            format!("Monster '{}' is missing a race.", check.name()),
            Severity::Medium,
        ),
        Some(race) if race.as_str() == Some("undead") && !check.attrs().flag("undead") => {
            sink.emit(
                format!(
                    "Monster '{}' is of race 'undead', but has no 'undead 1' flag set.",
                    check.name()
                ),
                Severity::Medium,
            );
        }
        Some(_) => {}
    }
}

fn npc_name(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if !is_monster(check) || !check.attrs().flag("friendly") {
        return;
    }
    let name = check.attrs().text("name").unwrap_or_default();
    if GENERIC_NPC_NAMES.contains(&name.as_str()) {
        return;
    }

    let default_name = check
        .archetype_value("name")
        .is_some_and(|default| default.to_string() == name);
    let in_creation = check.doc.header.str("region") == Some(CREATION_REGION);

    if default_name && !in_creation {
        let say_event = check
            .inventory_of(object_type::EVENT_OBJECT)
            .find(|event| event.attributes.int("sub_type") == Some(EVENT_SAY));
        let guard_script = say_event
            .is_some_and(|event| event.attributes.str("race") == Some(GENERIC_GUARD_SCRIPT));
        let has_dialog = check.attrs().contains("msg") || say_event.is_some();
        if !guard_script && has_dialog {
            sink.emit(
                format!(
                    "NPC '{}' has no custom name, but has a dialog.",
                    check.name()
                ),
                Severity::Warning,
            );
        }
    } else if name.chars().next().is_some_and(char::is_uppercase) && !NPC_NAME.is_match(&name) {
        sink.emit(
            format!("NPC '{}' has name in incorrect format.", check.name()),
            Severity::Low,
        );
    }
}

fn spawn_point_mob_outside(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.is(object_type::SPAWN_POINT_MOB)
        && check.parent_type() != Some(object_type::SPAWN_POINT)
    {
        sink.emit(
            format!(
                "Monster '{}' is a spawn point monster but is not inside a spawn point.",
                check.name()
            ),
            Severity::Critical,
        );
    }
}

fn monster_outside_spawn_point(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.is(object_type::MONSTER) {
        sink.emit(
            format!("Monster '{}' is outside spawn point.", check.name()),
            Severity::Medium,
        );
    }
}

fn outside_inventory(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.parent.is_none()
        && check.is_any(&[object_type::RANDOM_DROP, object_type::QUEST_CONTAINER])
    {
        sink.emit(
            format!("Object '{}' outside of inventory.", check.name()),
            Severity::High,
        );
    }
}

fn quest_container_name(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.is(object_type::QUEST_CONTAINER) && !check.attrs().contains("name") {
        sink.emit(
            format!("Quest container '{}' has no quest name.", check.name()),
            Severity::High,
        );
    }
}

fn duplicate_events(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    let sub_types: Vec<Option<&Value>> = check
        .inventory_of(object_type::EVENT_OBJECT)
        .map(|event| event.attributes.get("sub_type"))
        .collect();
    let duplicated = sub_types
        .iter()
        .enumerate()
        .any(|(i, sub_type)| sub_types[i + 1..].contains(sub_type));
    if duplicated {
        sink.emit(
            format!(
                "NPC '{}' has events with two or more events with the same event type.",
                check.name()
            ),
            Severity::Low,
        );
    }
}

fn spell_casting(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    let has_abilities = check.inventory_of(object_type::ABILITY).next().is_some();
    if !check.attrs().flag("can_cast_spell") {
        if has_abilities {
            sink.emit(
                format!(
                    "Monster '{}' cannot cast spells but has ability objects.",
                    check.name()
                ),
                Severity::Warning,
            );
        }
        return;
    }

    if !has_abilities {
        sink.emit(
            format!(
                "Monster '{}' can cast spells but has no ability objects.",
                check.name()
            ),
            Severity::Low,
        );
    }
    let unset = |name: &str| check.attrs().get(name).is_none_or(Value::is_zero);
    if unset("maxsp") {
        sink.emit(
            format!("Monster '{}' can cast spells but has 0 mana.", check.name()),
            Severity::Medium,
        );
    }
    if unset("Dex") {
        sink.emit(
            format!(
                "Monster '{}' can cast spells but has unset ability usage.",
                check.name()
            ),
            Severity::Medium,
        );
    }
}

fn waypoints(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    let waypoints: Vec<&ObjectInstance> = check.inventory_of(object_type::WAYPOINT).collect();
    if check.attrs().int("movement_type") != Some(MOVEMENT_WAYPOINTS) {
        if !waypoints.is_empty() {
            sink.emit(
                format!(
                    "Monster '{}' has waypoint movement disabled but has waypoints in inventory.",
                    check.name()
                ),
                Severity::Warning,
            );
        }
        return;
    }

    if waypoints.is_empty() {
        sink.emit(
            format!(
                "Monster '{}' has waypoint movement enabled but no waypoints.",
                check.name()
            ),
            Severity::Medium,
        );
        return;
    }

    for waypoint in &waypoints {
        let name = waypoint.attributes.get("name");
        if name.is_none() {
            sink.emit(
                format!("Monster '{}' has waypoint with no name.", check.name()),
                Severity::High,
            );
        }
        let Some(next) = waypoint.attributes.get("title") else {
            continue;
        };
        let linked = waypoints
            .iter()
            .any(|other| other.attributes.get("name") == Some(next));
        if !linked {
            let label = name.map_or_else(|| "<no name>".to_string(), Value::to_string);
            sink.emit(
                format!(
                    "Monster '{}' has waypoint ('{label}') with nonexistent next waypoint.",
                    check.name()
                ),
                Severity::High,
            );
        }
    }
}

fn magic_mouth(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    let attrs = check.attrs();
    let triggered = attrs.flag("walk_on") || attrs.flag("fly_on");
    if check.is(object_type::SIGN)
        && triggered
        && attrs.flag("splitting")
        && !attrs.contains("direction")
    {
        sink.emit(
            format!(
                "Magic mouth '{}' has adjacent direction set but actual facing direction is not set.",
                check.name()
            ),
            Severity::Warning,
        );
    }
}

fn unsupported_direction(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    let attrs = check.attrs();
    let has_direction = attrs.get("direction").is_some_and(|d| !d.is_zero());
    let directional =
        attrs.flag("is_turnable") || attrs.flag("is_animated") || attrs.flag("draw_direction");
    if has_direction && !directional {
        sink.emit(
            format!(
                "Object '{}' has direction but that type of object doesn't support directions.",
                check.name()
            ),
            Severity::Warning,
        );
    }
}

fn is_event(check: &ObjectCheck<'_>) -> bool {
    check.is_any(&[object_type::EVENT_OBJECT, object_type::MAP_EVENT_OBJECT])
}

fn event_plugin(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if !is_event(check) {
        return;
    }
    match check.attrs().get("name") {
        None => sink.emit(
            format!("Event object '{}' is missing plugin name.", check.name()),
            Severity::High,
        ),
        Some(plugin) if !PLUGINS.contains(&plugin.to_string().as_str()) => sink.emit(
            format!(
                "Event object '{}' has unknown plugin '{plugin}'.",
                check.name()
            ),
            Severity::Critical,
        ),
        Some(_) => {}
    }
}

fn event_script(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if !is_event(check) {
        return;
    }
    let Some(script) = check.attrs().str("race") else {
        return;
    };

    if script.starts_with("..") && script.contains("/python") {
        sink.emit(
            format!(
                "Event object '{}' is using a relative path to point to the global /python directory.",
                check.name()
            ),
            Severity::Warning,
        );
    }

    let Some(relative) = script.strip_prefix('/') else {
        return;
    };
    let missing = sink
        .config()
        .script_root
        .as_deref()
        .is_some_and(|root| !script_exists(root, relative));
    if missing {
        sink.emit(
            format!(
                "Event object '{}' has a path that doesn't exist.",
                check.name()
            ),
            Severity::Warning,
        );
    }
}

fn script_exists(root: &Path, relative: &str) -> bool {
    root.join(relative).is_file()
}

fn beacon(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if !check.is(object_type::BEACON) {
        return;
    }
    let Some(name) = check.attrs().text("name") else {
        sink.emit(
            format!("Beacon '{}' is missing name.", check.name()),
            Severity::Critical,
        );
        return;
    };
    if !sink.scan().claim_beacon(&name) {
        sink.emit(
            format!(
                "Beacon '{}' with the name '{name}' already exists.",
                check.name()
            ),
            Severity::Critical,
        );
    }
}

fn random_movement(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    let attrs = check.attrs();
    if attrs.flag("random_movement") && !(attrs.truthy("item_race") && attrs.truthy("item_level"))
    {
        sink.emit(
            format!(
                "Monster '{}' has random movement enabled but no max movement range X/Y.",
                check.name()
            ),
            Severity::Low,
        );
    }
}

fn turnable_direction(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    let attrs = check.attrs();
    if !(attrs.flag("is_turnable") && attrs.flag("draw_direction")) {
        return;
    }
    if let Some(direction @ (2..=6 | 8)) = attrs.int("direction") {
        sink.emit(
            format!(
                "Object {} has wrong direction {direction}; must be facing either west or north.",
                check.name()
            ),
            Severity::Low,
        );
    }
}

fn door_flags(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if !check.is_any(&[object_type::DOOR, object_type::GATE, object_type::WALL]) {
        return;
    }
    if check.attrs().flag("damned") {
        sink.emit(
            format!(
                "Object {} has 'damned 1' flag set, but this is not supported.",
                check.name()
            ),
            Severity::Low,
        );
    }
    if check.attrs().flag("no_magic") {
        sink.emit(
            format!(
                "Object {} has 'no_magic 1' flag set, which may be an error, as this flag is usually set on floor objects.",
                check.name()
            ),
            Severity::Warning,
        );
    }
}

fn message(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    let kinds = [
        object_type::SPAWN_POINT_MOB,
        object_type::MAGIC_EAR,
        object_type::BOOK,
        object_type::SIGN,
    ];
    if !check.is_any(&kinds) {
        return;
    }
    let Some(msg) = check.attrs().get("msg").filter(|msg| msg.is_truthy()) else {
        return;
    };

    let issues = MessageIssues::scan(&msg.to_string());
    let is_mob = check.is(object_type::SPAWN_POINT_MOB);
    let is_dialog = is_mob || check.is(object_type::MAGIC_EAR);
    let name = check.name();

    if is_mob && issues.missing_hello {
        sink.emit(
            format!("Object {name} has a @match dialogue that is missing '@match ^hello$'."),
            Severity::Low,
        );
    }
    if is_dialog {
        if issues.invalid_hello {
            sink.emit(
                format!("Object {name} has a @match dialogue that has invalid '@match ^hello$'."),
                Severity::Low,
            );
        }
        if issues.suspicious_regex {
            sink.emit(
                format!("Object {name} has a @match that doesn't use regex."),
                Severity::Low,
            );
        }
        if issues.link_in_msg {
            sink.emit(
                format!(
                    "Object {name} has a @match which uses links of some sort - this is not recommended."
                ),
                Severity::Low,
            );
        }
    }
    if issues.control_chars {
        sink.emit_if(
            Category::DeprecatedControlChars,
            format!("Object {name} contains deprecated control characters in message."),
            Severity::Low,
        );
    }
    if issues.unescaped_markup {
        sink.emit(
            format!("Object {name} contains unescaped markup in message."),
            Severity::Low,
        );
    }
}

fn layer_changed(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    let nonzero = |value: Option<&Value>| value.filter(|v| !v.is_zero()).cloned();
    let (Some(layer), Some(default)) = (
        nonzero(check.attrs().get("layer")),
        nonzero(check.archetype_value("layer")),
    ) else {
        return;
    };
    if layer != default {
        sink.emit_if(
            Category::LayerChanged,
            format!(
                "Object {} has had layer changed to {layer} from the default value of {default} - this is not recommended.",
                check.name()
            ),
            Severity::Warning,
        );
    }
}

fn carrying(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.attrs().contains("carrying") {
        sink.emit(
            format!("Object {} has carrying attribute set.", check.name()),
            Severity::Warning,
        );
    }
}

fn animation_none(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.attrs().str("animation") == Some("NONE") {
        sink.emit(
            format!("Object {} has animation attribute set to NONE.", check.name()),
            Severity::Warning,
        );
    }
}

fn face_changed(check: &ObjectCheck<'_>, sink: &mut RuleSink<'_>) {
    if check.attrs().get("face") == check.archetype_value("face") {
        return;
    }
    if check.attrs().flag("is_turnable") || check.attrs().flag("is_animated") {
        sink.emit(
            format!(
                "Object {} is animated/turnable but has had face changed.",
                check.name()
            ),
            Severity::Warning,
        );
    }
    if check.is(object_type::LIGHT_SOURCE) {
        sink.emit(
            format!(
                "Object {} is a light source but has had face changed.",
                check.name()
            ),
            Severity::Warning,
        );
    }
}
