//! Game-state data model
//!
//! One [`GameState`] is an immutable snapshot of everything visible to the
//! current player at a given turn. The serde shape is the camelCase wire
//! format served by the query endpoint and written to the cache file.
//! Optional attributes are omitted from the JSON entirely when unknown.

use serde::{Deserialize, Serialize};

/// A position on the adventure map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapPos {
    pub x: i32,
    pub y: i32,
}

/// A map tile visible to the current player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    /// Object type label, e.g. "GoldMine", "Town", "Hero"
    pub obj: String,
    /// Owning player ID, absent for neutral objects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<u8>,
}

/// One army slot: a creature stack of `count` units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmySlot {
    pub creature_id: u32,
    pub count: u32,
}

/// Hero primary attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryStats {
    pub attack: u32,
    pub defense: u32,
    pub spell_power: u32,
    pub knowledge: u32,
}

/// A learned secondary skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondarySkill {
    pub id: u32,
    /// 1 = basic, 2 = advanced, 3 = expert
    pub level: u8,
}

/// A hero on the adventure map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub name: String,
    pub location: MapPos,
    pub army: Vec<ArmySlot>,
    pub movement_left: u32,
    pub primary_stats: PrimaryStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mana: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<SecondarySkill>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spells: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Vec<u32>>,
}

/// A town and its garrison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Town {
    pub name: String,
    pub location: MapPos,
    pub owner: u8,
    /// Town type label: Castle, Rampart, Tower, ...
    #[serde(rename = "type")]
    pub town_type: String,
    /// Built building IDs
    pub buildings: Vec<u32>,
    pub garrison: Vec<ArmySlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_creatures: Option<Vec<ArmySlot>>,
}

/// The player's resource pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub gold: u32,
    pub wood: u32,
    pub ore: u32,
    pub mercury: u32,
    pub sulfur: u32,
    pub crystal: u32,
    pub gems: u32,
}

/// Complete game state visible to the current player at one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Current game turn (day), starts at 1
    pub turn: u32,
    /// Current player ID (0-7)
    pub current_player: u8,
    pub visible_tiles: Vec<Tile>,
    pub heroes: Vec<Hero>,
    pub towns: Vec<Town>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

impl GameState {
    /// Serialize to a single JSON line for stdout / NDJSON consumers
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
