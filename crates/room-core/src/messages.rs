//! Message types used by the room.
//!
//! These are **transport-agnostic** logical messages:
//! - [`InboundEvent`]: what the room consumes.
//! - [`OutboundEvent`]: what the room produces.
//!
//! Every output message knows its own audience (see
//! [`OutboundEvent::recipient`]) so the networking layer can route it
//! without extra context.
//!
//! Note: the text frame codec lives in the `room-protocol` crate;
//! this module is purely logical.

use std::sync::Arc;

use crate::description::RoomDescription;

/// Kind of an inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// First arrival of a participant.
    Hello,

    /// Reconnect / re-sync of a participant already here.
    Join,

    /// Participant leaving through the front door.
    Goodbye,

    /// Participant silently dropping off.
    Part,

    /// A chat line, possibly a `/` command.
    Chat,

    /// Anything this room does not understand. Discarded.
    Unknown,
}

/// A single event delivered to the room by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub kind: EventKind,

    /// Stable participant identity.
    pub user_id: String,

    /// Display name. May change between events for the same `user_id`,
    /// so always use the one on the current event.
    pub username: String,

    /// Only present for [`EventKind::Chat`].
    pub content: Option<String>,
}

impl InboundEvent {
    pub fn new(kind: EventKind, user_id: impl Into<String>, username: impl Into<String>) -> Self {
        InboundEvent {
            kind,
            user_id: user_id.into(),
            username: username.into(),
            content: None,
        }
    }

    /// Convenience constructor for a chat line.
    pub fn chat(
        user_id: impl Into<String>,
        username: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        InboundEvent {
            content: Some(content.into()),
            ..InboundEvent::new(EventKind::Chat, user_id, username)
        }
    }
}

/// Text shown to one participant in place of a broadcast's general text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalText {
    pub user_id: String,
    pub text: String,
}

/// A high-level event emitted by the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// Full room description, sent to one participant.
    Location {
        user_id: String,
        room: Arc<RoomDescription>,
    },

    /// Text for everyone in the room.
    ///
    /// - `sender`: set for a plain chat echo; the username the line is
    ///   attributed to.
    /// - `personal`: what the originating participant sees instead of `text`.
    BroadcastChat {
        text: String,
        sender: Option<String>,
        personal: Option<PersonalText>,
    },

    /// Text for exactly one participant.
    Directed { user_id: String, text: String },

    /// The participant may leave through `exit_id`.
    ExitGranted {
        user_id: String,
        exit_id: String,
        text: String,
    },
}

/// Who an [`OutboundEvent`] is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient<'a> {
    /// Only this participant.
    User(&'a str),

    /// Every participant currently in the room.
    All,
}

impl OutboundEvent {
    pub fn recipient(&self) -> Recipient<'_> {
        match self {
            OutboundEvent::Location { user_id, .. }
            | OutboundEvent::Directed { user_id, .. }
            | OutboundEvent::ExitGranted { user_id, .. } => Recipient::User(user_id),
            OutboundEvent::BroadcastChat { .. } => Recipient::All,
        }
    }
}

// -----------------------------------------------------------------------------
// Convenience constructors
// -----------------------------------------------------------------------------

impl OutboundEvent {
    pub fn location(user_id: impl Into<String>, room: &Arc<RoomDescription>) -> Self {
        OutboundEvent::Location {
            user_id: user_id.into(),
            room: Arc::clone(room),
        }
    }

    /// Broadcast with no special text for anyone.
    pub fn broadcast(text: impl Into<String>) -> Self {
        OutboundEvent::BroadcastChat {
            text: text.into(),
            sender: None,
            personal: None,
        }
    }

    /// Broadcast where `user_id` sees `user_text` instead of `text`.
    pub fn broadcast_with_personal(
        text: impl Into<String>,
        user_id: impl Into<String>,
        user_text: impl Into<String>,
    ) -> Self {
        OutboundEvent::BroadcastChat {
            text: text.into(),
            sender: None,
            personal: Some(PersonalText {
                user_id: user_id.into(),
                text: user_text.into(),
            }),
        }
    }

    /// Echo of a plain chat line, attributed to `username`.
    pub fn chat(username: impl Into<String>, content: impl Into<String>) -> Self {
        OutboundEvent::BroadcastChat {
            text: content.into(),
            sender: Some(username.into()),
            personal: None,
        }
    }

    pub fn directed(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        OutboundEvent::Directed {
            user_id: user_id.into(),
            text: text.into(),
        }
    }

    pub fn exit_granted(
        user_id: impl Into<String>,
        exit_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        OutboundEvent::ExitGranted {
            user_id: user_id.into(),
            exit_id: exit_id.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipients_follow_event_shape() {
        let room = Arc::new(RoomDescription::default());

        assert_eq!(
            OutboundEvent::location("u1", &room).recipient(),
            Recipient::User("u1")
        );
        assert_eq!(
            OutboundEvent::directed("u2", "hi").recipient(),
            Recipient::User("u2")
        );
        assert_eq!(
            OutboundEvent::exit_granted("u3", "n", "You head North").recipient(),
            Recipient::User("u3")
        );
        assert_eq!(OutboundEvent::broadcast("hi").recipient(), Recipient::All);
        assert_eq!(
            OutboundEvent::broadcast_with_personal("a is here", "u1", "Welcome!").recipient(),
            Recipient::All
        );
    }
}
