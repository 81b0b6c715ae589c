//! Game constants the rules check against.

/// Highest valid monster level and map difficulty.
pub const MAX_LEVEL: i64 = 115;
/// Highest layer value.
pub const MAX_LAYERS: i64 = 7;
/// Number of sub-layers per layer.
pub const NUM_SUB_LAYERS: i64 = 5;
/// Plugin names event objects may use.
pub const PLUGINS: &[&str] = &["Python", "Arena"];

/// Object type numbers.
#[allow(missing_docs)]
pub mod object_type {
    pub const PLAYER: i64 = 1;
    pub const POTION: i64 = 5;
    pub const BOOK: i64 = 8;
    pub const BOW: i64 = 14;
    pub const DOOR: i64 = 20;
    pub const MAGIC_MIRROR: i64 = 28;
    pub const MAGIC_EAR: i64 = 29;
    pub const TELEPORTER: i64 = 41;
    pub const CREATOR: i64 = 42;
    pub const EXIT: i64 = 66;
    pub const SHOP_FLOOR: i64 = 68;
    pub const FLOOR: i64 = 71;
    pub const LIGHT_SOURCE: i64 = 74;
    pub const WALL: i64 = 77;
    pub const MONSTER: i64 = 80;
    pub const SPAWN_POINT: i64 = 81;
    pub const SPAWN_POINT_MOB: i64 = 83;
    pub const GATE: i64 = 91;
    pub const SIGN: i64 = 98;
    pub const RANDOM_DROP: i64 = 102;
    pub const ABILITY: i64 = 110;
    pub const SCROLL: i64 = 111;
    pub const EVENT_OBJECT: i64 = 118;
    pub const WAYPOINT: i64 = 119;
    pub const QUEST_CONTAINER: i64 = 120;
    pub const BEACON: i64 = 126;
    pub const MAP_EVENT_OBJECT: i64 = 127;
}

/// Event sub type fired when a player talks to the object.
pub const EVENT_SAY: i64 = 6;
/// Movement type that follows waypoints.
pub const MOVEMENT_WAYPOINTS: i64 = 176;
/// Script that lets default-named NPCs keep a dialog.
pub const GENERIC_GUARD_SCRIPT: &str = "/python/generic/guard.py";
