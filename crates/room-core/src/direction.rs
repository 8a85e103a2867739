//! Direction normalization for `/go`.
//!
//! Free text typed after `/go` is mapped onto a canonical exit key. The
//! resolver does not know which exits this room actually has; it only
//! produces a *candidate* key.

/// Map a lower-cased, trimmed direction to an exit key.
///
/// - `None` (no argument given) stays `None`.
/// - `north`, `south`, `east`, `west` become `n`, `s`, `e`, `w`.
/// - `n`, `s`, `e`, `w` are already canonical.
/// - Anything else is an unknown direction and also yields `None`; the
///   caller tells the two `None` cases apart by looking at its input.
pub fn exit_id(direction: Option<&str>) -> Option<&'static str> {
    match direction? {
        "north" | "n" => Some("n"),
        "south" | "s" => Some("s"),
        "east" | "e" => Some("e"),
        "west" | "w" => Some("w"),
        _ => None,
    }
}

/// Human-readable label for an exit key, used in the exit message.
/// Unknown keys are returned unchanged.
pub fn pretty_direction(exit_id: &str) -> &str {
    match exit_id {
        "n" => "North",
        "s" => "South",
        "e" => "East",
        "w" => "West",
        other => other,
    }
}
