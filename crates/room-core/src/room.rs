//! The room event handler.
//!
//! [`Room`] is the top-level state machine: one inbound event in, zero or
//! more outbound events out. It never fails; bad input is dropped and
//! user mistakes become directed messages.
//!
//! Lifecycle:
//! - [`Room::start`] registers custom commands, registers with the map
//!   service (when the identity is real), then freezes the description.
//! - [`Room::handle`] is called concurrently from any number of sessions.
//! - [`Room::shutdown`] consumes the room.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::command::{CommandProcessor, CommandTable, NEWS_HELP, PING_HELP};
use crate::description::RoomDescription;
use crate::identity::RoomIdentity;
use crate::map::MapDirectory;
use crate::messages::{EventKind, InboundEvent, OutboundEvent};
use crate::news::NewsLookup;

pub const HELLO_USER: &str = "Welcome!";
pub const GOODBYE_USER: &str = "Bye!";

pub struct Room {
    identity: RoomIdentity,
    description: Arc<RoomDescription>,
    map: Arc<dyn MapDirectory>,
    commands: CommandProcessor,
}

impl Room {
    /// Build the room and announce it to the map service.
    ///
    /// A failed registration is logged and the room runs without exits.
    pub async fn start(
        identity: RoomIdentity,
        mut description: RoomDescription,
        map: Arc<dyn MapDirectory>,
        news: NewsLookup,
    ) -> Self {
        description.add_command("/ping", PING_HELP);
        description.add_command("/news", NEWS_HELP);

        if identity.is_generated() {
            info!(room_id = identity.id(), "no room id assigned; skipping map registration");
        } else {
            match map.register_or_update(identity.id(), &description).await {
                Ok(registration) => {
                    info!(
                        room_id = identity.id(),
                        exits = registration.exits.len(),
                        "registered with map"
                    );
                    description.set_exits(registration.exits);
                }
                Err(err) => {
                    warn!(room_id = identity.id(), error = %err, "map registration failed");
                }
            }
        }

        let description = Arc::new(description);
        let commands = CommandProcessor::new(CommandTable::standard(), Arc::clone(&description), news);

        info!(room_id = identity.id(), name = description.name(), "room initialized");

        Room {
            identity,
            description,
            map,
            commands,
        }
    }

    pub fn id(&self) -> &str {
        self.identity.id()
    }

    pub fn description(&self) -> &Arc<RoomDescription> {
        &self.description
    }

    /// Health of the room, which is the health of its map connection.
    pub fn ok(&self) -> bool {
        self.map.ok()
    }

    /// Process a single inbound event and return any output events.
    pub async fn handle(&self, event: InboundEvent) -> Vec<OutboundEvent> {
        let InboundEvent {
            kind,
            user_id,
            username,
            content,
        } = event;

        debug!(%user_id, %username, ?kind, "received event");

        match kind {
            EventKind::Hello => vec![
                OutboundEvent::location(&user_id, &self.description),
                OutboundEvent::broadcast_with_personal(
                    format!("{username} is here"),
                    &user_id,
                    HELLO_USER,
                ),
            ],
            EventKind::Join => vec![OutboundEvent::location(&user_id, &self.description)],
            EventKind::Goodbye => vec![OutboundEvent::broadcast_with_personal(
                format!("{username} has gone"),
                &user_id,
                GOODBYE_USER,
            )],
            EventKind::Part => Vec::new(),
            EventKind::Chat => self.handle_chat(&user_id, &username, content).await,
            EventKind::Unknown => Vec::new(),
        }
    }

    async fn handle_chat(
        &self,
        user_id: &str,
        username: &str,
        content: Option<String>,
    ) -> Vec<OutboundEvent> {
        let content = match content {
            Some(c) if !c.is_empty() => c,
            _ => {
                debug!(user_id, "chat without content; dropped");
                return Vec::new();
            }
        };

        if content.starts_with('/') {
            self.commands.process(user_id, username, &content).await
        } else {
            vec![OutboundEvent::chat(username, content)]
        }
    }

    /// Drain hook. Nothing is buffered, so this only records the shutdown.
    pub fn shutdown(self) {
        info!(room_id = self.identity.id(), "room shutting down");
    }
}
