//! In-room `/` commands.
//!
//! A chat line starting with `/` is parsed into a [`ParsedCommand`] and
//! looked up in a [`CommandTable`] that is built once at startup. The
//! table maps keywords to [`Command`] tags; the [`CommandProcessor`]
//! turns a tag plus arguments into outbound events.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::description::RoomDescription;
use crate::direction::{exit_id, pretty_direction};
use crate::messages::OutboundEvent;
use crate::news::NewsLookup;

pub const LOOK_UNKNOWN: &str = "It doesn't look interesting.";
pub const UNSPECIFIED_DIRECTION: &str = "You didn't say which way you wanted to go.";
pub const NEWS_USAGE: &str = "The '/news' command expects a company name after it.";

/// Help text advertised for `/ping`.
pub const PING_HELP: &str = "Does this work?";

/// Help text advertised for `/news`.
pub const NEWS_HELP: &str =
    "Query the Watson Alchemy News Service to get current information on a company; `e.g.: /news IBM`";

/// A chat line split into keyword and argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lower-cased, including the leading `/`.
    pub keyword: String,

    /// Lower-cased, trimmed. `None` when nothing follows the keyword.
    pub remainder: Option<String>,
}

impl ParsedCommand {
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        let lower = lower.trim();

        match lower.split_once(' ') {
            Some((keyword, rest)) => {
                let rest = rest.trim();
                ParsedCommand {
                    keyword: keyword.to_string(),
                    remainder: (!rest.is_empty()).then(|| rest.to_string()),
                }
            }
            None => ParsedCommand {
                keyword: lower.to_string(),
                remainder: None,
            },
        }
    }
}

/// Commands this room knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Go,
    Look,
    News,
    Ping,
}

/// Keyword -> command. Read-only once built.
#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: HashMap<&'static str, Command>,
}

impl CommandTable {
    /// The built-in commands plus this room's custom ones.
    pub fn standard() -> Self {
        let commands = HashMap::from([
            ("/go", Command::Go),
            ("/look", Command::Look),
            ("/examine", Command::Look),
            ("/news", Command::News),
            ("/ping", Command::Ping),
        ]);
        CommandTable { commands }
    }

    pub fn get(&self, keyword: &str) -> Option<Command> {
        self.commands.get(keyword).copied()
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        CommandTable::standard()
    }
}

/// Runs `/` commands on behalf of one participant.
#[derive(Clone)]
pub struct CommandProcessor {
    table: CommandTable,
    room: Arc<RoomDescription>,
    news: NewsLookup,
}

impl CommandProcessor {
    pub fn new(table: CommandTable, room: Arc<RoomDescription>, news: NewsLookup) -> Self {
        CommandProcessor { table, room, news }
    }

    /// Run the command in `content` (which starts with `/`).
    pub async fn process(&self, user_id: &str, username: &str, content: &str) -> Vec<OutboundEvent> {
        let parsed = ParsedCommand::parse(content);
        let remainder = parsed.remainder.as_deref();

        let Some(command) = self.table.get(&parsed.keyword) else {
            debug!(user_id, keyword = %parsed.keyword, "unknown command");
            return vec![OutboundEvent::directed(
                user_id,
                format!("This room is a basic model. It doesn't understand `{content}`"),
            )];
        };

        match command {
            Command::Go => vec![self.go(user_id, remainder)],
            Command::Look => vec![self.look(user_id, remainder)],
            Command::News => vec![self.news(username, remainder).await],
            Command::Ping => vec![ping(user_id, username, remainder)],
        }
    }

    // -------------------------------------------------------------------------
    // Internal handlers
    // -------------------------------------------------------------------------

    fn go(&self, user_id: &str, direction: Option<&str>) -> OutboundEvent {
        // Exit existence is left to whoever consumes ExitGranted.
        match (exit_id(direction), direction) {
            (Some(exit), _) => OutboundEvent::exit_granted(
                user_id,
                exit,
                format!("You head {}", pretty_direction(exit)),
            ),
            (None, None) => OutboundEvent::directed(user_id, UNSPECIFIED_DIRECTION),
            (None, Some(unknown)) => OutboundEvent::directed(
                user_id,
                format!("There isn't a door in that direction ({unknown})"),
            ),
        }
    }

    fn look(&self, user_id: &str, target: Option<&str>) -> OutboundEvent {
        match target {
            None => OutboundEvent::location(user_id, &self.room),
            Some(t) if t.contains("room") => OutboundEvent::location(user_id, &self.room),
            Some(_) => OutboundEvent::directed(user_id, LOOK_UNKNOWN),
        }
    }

    async fn news(&self, username: &str, keyword: Option<&str>) -> OutboundEvent {
        match keyword {
            // Sent to the whole room, unlike the other usage errors.
            None => OutboundEvent::broadcast(NEWS_USAGE),
            Some(keyword) => {
                let result = self.news.lookup(keyword).await;
                OutboundEvent::broadcast(format!("Watson news response to {username}:\n {result}"))
            }
        }
    }
}

fn ping(user_id: &str, username: &str, text: Option<&str>) -> OutboundEvent {
    match text {
        None => OutboundEvent::broadcast_with_personal(
            format!("Ping! Pong sent to {username}"),
            user_id,
            "Ping! Pong!",
        ),
        Some(text) => OutboundEvent::broadcast_with_personal(
            format!("Ping! Pong sent to {username}: {text}"),
            user_id,
            format!("Ping! Pong! {text}"),
        ),
    }
}
