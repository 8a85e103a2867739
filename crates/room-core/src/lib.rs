//! room-core
//!
//! Pure room logic:
//! - room description and identity
//! - messages (inbound/outbound types)
//! - direction resolver and `/` command processor
//! - news lookup adapter
//! - the room event handler
//!
//! Collaborators (map service, news search) are traits here; their
//! network implementations live in `room-server`.

pub mod command;
pub mod description;
pub mod direction;
pub mod identity;
pub mod map;
pub mod messages;
pub mod news;
pub mod room;

pub use description::{Exit, RoomDescription};
pub use identity::RoomIdentity;

pub use messages::{EventKind, InboundEvent, OutboundEvent, PersonalText, Recipient};

pub use command::{Command, CommandProcessor, CommandTable, ParsedCommand};
pub use map::{MapDirectory, MapError, NoMap, Registration};
pub use news::{NewsEndpoint, NewsError, NewsLookup, NewsQuery, NewsResponse, NewsSearch};
pub use room::Room;
