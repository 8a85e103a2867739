//! Static description of the room.
//!
//! A [`RoomDescription`] is built once during startup (custom commands
//! registered, exits installed from the map service) and then frozen
//! behind an `Arc`. After that point every handler invocation only reads
//! it, so no locking is needed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default short name for a room that was not configured.
pub const DEFAULT_NAME: &str = "BasicRoom";

/// Default display name.
pub const DEFAULT_FULL_NAME: &str = "A Basic Room";

/// Default description text.
pub const DEFAULT_DESCRIPTION: &str =
    "A helpful room that doesn't do very much. There are doors in every direction.";

/// One directional connection to a neighbouring room, as reported by the
/// map service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exit {
    /// Short name of the destination room.
    pub name: String,

    /// Display name of the destination room.
    #[serde(default)]
    pub full_name: String,

    /// Description of the door, shown to players.
    #[serde(default)]
    pub door: String,
}

/// Display identity, exits and advertised commands of this room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDescription {
    name: String,
    full_name: String,
    description: String,

    /// Exit key (`n`, `s`, `e`, `w`) -> destination.
    #[serde(default)]
    exits: IndexMap<String, Exit>,

    /// Command keyword (with leading `/`) -> help text.
    /// Insertion order is kept so the help listing is stable.
    #[serde(default)]
    commands: IndexMap<String, String>,
}

impl RoomDescription {
    pub fn new(
        name: impl Into<String>,
        full_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        RoomDescription {
            name: name.into(),
            full_name: full_name.into(),
            description: description.into(),
            exits: IndexMap::new(),
            commands: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn exits(&self) -> &IndexMap<String, Exit> {
        &self.exits
    }

    pub fn commands(&self) -> &IndexMap<String, String> {
        &self.commands
    }

    /// Advertise a custom command. Re-adding a keyword replaces its help
    /// text but keeps its original position.
    pub fn add_command(&mut self, keyword: impl Into<String>, help: impl Into<String>) {
        self.commands.insert(keyword.into(), help.into());
    }

    /// Replace the exit list wholesale (startup only).
    pub fn set_exits(&mut self, exits: IndexMap<String, Exit>) {
        self.exits = exits;
    }
}

impl Default for RoomDescription {
    fn default() -> Self {
        RoomDescription::new(DEFAULT_NAME, DEFAULT_FULL_NAME, DEFAULT_DESCRIPTION)
    }
}
