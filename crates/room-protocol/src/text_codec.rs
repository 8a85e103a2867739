//! Text frame codec.
//!
//! Every frame is a single line of the form:
//!
//! ```text
//! target,recipient,{json body}
//! target,{json body}              (frames without a recipient, e.g. ack)
//! ```
//!
//! Input frames (gateway → room):
//!
//! - `roomHello,<roomId>,{"userId":..,"username":..,"version":1|2}`
//! - `roomJoin,<roomId>,{"userId":..,"username":..,"version":2}`
//! - `roomGoodbye,<roomId>,{"userId":..,"username":..}`
//! - `roomPart,<roomId>,{"userId":..,"username":..}`
//! - `room,<roomId>,{"userId":..,"username":..,"content":..}`
//!
//! Any other target decodes to `EventKind::Unknown`.
//!
//! Output frames (room → gateway):
//!
//! - Location:      `player,<userId>,{"type":"location",...}`
//! - Chat echo:     `player,*,{"type":"chat","username":..,"content":..,"bookmark":N}`
//! - Broadcast:     `player,*,{"type":"event","content":{"*":..,"<userId>":..},"bookmark":N}`
//! - Directed:      `player,<userId>,{"type":"event","content":{"<userId>":..},"bookmark":N}`
//! - Exit:          `playerLocation,<userId>,{"type":"exit","content":..,"exitId":..}`
//! - Session ack:   `ack,{"version":[1,2]}`

use std::collections::BTreeMap;

use indexmap::IndexMap;
use room_core::{EventKind, InboundEvent, OutboundEvent, PersonalText};

use crate::wire_types::{
    AckBody, InboundBody, PlayerBody, ALL_RECIPIENTS, SUPPORTED_VERSIONS, TARGET_ACK,
    TARGET_GOODBYE, TARGET_HELLO, TARGET_JOIN, TARGET_PART, TARGET_PLAYER,
    TARGET_PLAYER_LOCATION, TARGET_ROOM,
};

/// Errors decoding or encoding a frame.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(&'static str),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid json body: {0}")]
    Json(#[from] serde_json::Error),
}

/// A frame split into its three parts; the body is still raw JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
    pub target: &'a str,
    pub recipient: Option<&'a str>,
    pub body: &'a str,
}

impl<'a> Frame<'a> {
    pub fn split(line: &'a str) -> Result<Self, ProtocolError> {
        let line = line.trim();
        let (target, rest) = line
            .split_once(',')
            .ok_or(ProtocolError::Malformed("no target separator"))?;

        if target.is_empty() {
            return Err(ProtocolError::Malformed("empty target"));
        }

        // The body is the only part that may contain commas.
        if rest.starts_with('{') {
            return Ok(Frame {
                target,
                recipient: None,
                body: rest,
            });
        }

        let (recipient, body) = rest
            .split_once(',')
            .ok_or(ProtocolError::Malformed("no body"))?;

        if !body.starts_with('{') {
            return Err(ProtocolError::Malformed("body is not a json object"));
        }

        Ok(Frame {
            target,
            recipient: Some(recipient),
            body,
        })
    }
}

/// An inbound frame decoded into a room event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    /// Room the frame was addressed to, if any.
    pub room_id: Option<String>,

    pub event: InboundEvent,
}

fn kind_for_target(target: &str) -> EventKind {
    match target {
        TARGET_HELLO => EventKind::Hello,
        TARGET_JOIN => EventKind::Join,
        TARGET_GOODBYE => EventKind::Goodbye,
        TARGET_PART => EventKind::Part,
        TARGET_ROOM => EventKind::Chat,
        _ => EventKind::Unknown,
    }
}

fn target_for_kind(kind: EventKind) -> Option<&'static str> {
    match kind {
        EventKind::Hello => Some(TARGET_HELLO),
        EventKind::Join => Some(TARGET_JOIN),
        EventKind::Goodbye => Some(TARGET_GOODBYE),
        EventKind::Part => Some(TARGET_PART),
        EventKind::Chat => Some(TARGET_ROOM),
        EventKind::Unknown => None,
    }
}

/// Decode one inbound line.
///
/// Frames without `userId` or `username` are rejected; the caller is
/// expected to drop them.
pub fn decode_inbound(line: &str) -> Result<InboundFrame, ProtocolError> {
    let frame = Frame::split(line)?;
    let body: InboundBody = serde_json::from_str(frame.body)?;

    let user_id = body.user_id.ok_or(ProtocolError::MissingField("userId"))?;
    let username = body.username.ok_or(ProtocolError::MissingField("username"))?;
    let kind = kind_for_target(frame.target);

    Ok(InboundFrame {
        room_id: frame.recipient.map(str::to_string),
        event: InboundEvent {
            kind,
            user_id,
            username,
            content: if kind == EventKind::Chat { body.content } else { None },
        },
    })
}

/// Encode an inbound event as a frame (used by clients and tests).
pub fn encode_inbound(room_id: &str, event: &InboundEvent) -> Result<String, ProtocolError> {
    let target = target_for_kind(event.kind).ok_or(ProtocolError::Malformed("unknown event kind"))?;
    let body = InboundBody {
        user_id: Some(event.user_id.clone()),
        username: Some(event.username.clone()),
        content: event.content.clone(),
        version: Some(2),
    };
    Ok(format!("{target},{room_id},{}", serde_json::to_string(&body)?))
}

/// Frame sent when a session opens.
pub fn encode_ack() -> Result<String, ProtocolError> {
    let body = AckBody {
        version: SUPPORTED_VERSIONS,
    };
    Ok(format!("{TARGET_ACK},{}", serde_json::to_string(&body)?))
}

/// Encode an outbound event. `bookmark` orders chat/event frames and is
/// ignored for location and exit frames.
pub fn encode_outbound(msg: &OutboundEvent, bookmark: u64) -> Result<String, ProtocolError> {
    let (target, recipient, body) = match msg {
        OutboundEvent::Location { user_id, room } => {
            let exits: IndexMap<&str, &str> = room
                .exits()
                .iter()
                .map(|(dir, exit)| {
                    let door = if exit.door.is_empty() {
                        exit.full_name.as_str()
                    } else {
                        exit.door.as_str()
                    };
                    (dir.as_str(), door)
                })
                .collect();

            let body = PlayerBody::Location {
                name: room.name(),
                full_name: room.full_name(),
                description: room.description(),
                exits,
                commands: room.commands(),
                room_inventory: Vec::new(),
            };
            (TARGET_PLAYER, user_id.as_str(), serde_json::to_string(&body)?)
        }

        OutboundEvent::BroadcastChat {
            text,
            sender: Some(username),
            ..
        } => {
            let body = PlayerBody::Chat {
                username,
                content: text,
                bookmark,
            };
            (TARGET_PLAYER, ALL_RECIPIENTS, serde_json::to_string(&body)?)
        }

        OutboundEvent::BroadcastChat {
            text,
            sender: None,
            personal,
        } => {
            let mut content = BTreeMap::new();
            content.insert(ALL_RECIPIENTS, text.as_str());
            if let Some(PersonalText { user_id, text }) = personal {
                content.insert(user_id.as_str(), text.as_str());
            }
            let body = PlayerBody::Event { content, bookmark };
            (TARGET_PLAYER, ALL_RECIPIENTS, serde_json::to_string(&body)?)
        }

        OutboundEvent::Directed { user_id, text } => {
            let content = BTreeMap::from([(user_id.as_str(), text.as_str())]);
            let body = PlayerBody::Event { content, bookmark };
            (TARGET_PLAYER, user_id.as_str(), serde_json::to_string(&body)?)
        }

        OutboundEvent::ExitGranted {
            user_id,
            exit_id,
            text,
        } => {
            let body = PlayerBody::Exit {
                content: text,
                exit_id,
            };
            (TARGET_PLAYER_LOCATION, user_id.as_str(), serde_json::to_string(&body)?)
        }
    };

    Ok(format!("{target},{recipient},{body}"))
}
