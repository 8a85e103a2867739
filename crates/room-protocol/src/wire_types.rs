//! JSON bodies carried inside text frames.
//!
//! These types exist only for (de)serialization; the room itself works on
//! `room_core::InboundEvent` / `OutboundEvent`.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Frame targets sent to the room.
pub const TARGET_HELLO: &str = "roomHello";
pub const TARGET_JOIN: &str = "roomJoin";
pub const TARGET_GOODBYE: &str = "roomGoodbye";
pub const TARGET_PART: &str = "roomPart";
pub const TARGET_ROOM: &str = "room";

/// Frame targets sent by the room.
pub const TARGET_ACK: &str = "ack";
pub const TARGET_PLAYER: &str = "player";
pub const TARGET_PLAYER_LOCATION: &str = "playerLocation";

/// Recipient id meaning "everyone in the room".
pub const ALL_RECIPIENTS: &str = "*";

/// Protocol versions this room speaks, advertised in the `ack` frame.
pub const SUPPORTED_VERSIONS: [u32; 2] = [1, 2];

/// Body of every inbound frame. All fields are optional on the wire;
/// the decoder decides what is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct AckBody {
    pub version: [u32; 2],
}

/// Bodies of `player` / `playerLocation` frames, tagged by `type`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerBody<'a> {
    #[serde(rename_all = "camelCase")]
    Location {
        name: &'a str,
        full_name: &'a str,
        description: &'a str,
        exits: IndexMap<&'a str, &'a str>,
        commands: &'a IndexMap<String, String>,
        room_inventory: Vec<String>,
    },

    Chat {
        username: &'a str,
        content: &'a str,
        bookmark: u64,
    },

    /// `content` maps recipient (`*` or a user id) to the text they see.
    Event {
        content: BTreeMap<&'a str, &'a str>,
        bookmark: u64,
    },

    #[serde(rename_all = "camelCase")]
    Exit {
        content: &'a str,
        exit_id: &'a str,
    },
}
