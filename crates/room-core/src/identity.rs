//! Room identity as provisioned by the environment.

/// Id used when the environment did not assign one.
pub const GENERATED_ROOM_ID: &str = "TheGeneratedIdForThisRoom";

/// Token left behind when a deployment template did not substitute the id.
const UNRESOLVED_PLACEHOLDER: &str = "ROOM_ID";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomIdentity {
    /// Id handed to us by the environment; the room registers with the map.
    Assigned(String),

    /// No usable id; the room runs standalone and skips registration.
    Generated,
}

impl RoomIdentity {
    /// Decide the identity from the raw environment value.
    pub fn resolve(raw: Option<String>) -> Self {
        match raw {
            Some(id) if !id.trim().is_empty() && !id.contains(UNRESOLVED_PLACEHOLDER) => {
                RoomIdentity::Assigned(id.trim().to_string())
            }
            _ => RoomIdentity::Generated,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            RoomIdentity::Assigned(id) => id,
            RoomIdentity::Generated => GENERATED_ROOM_ID,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, RoomIdentity::Generated)
    }
}
