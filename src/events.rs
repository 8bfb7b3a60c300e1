use crate::error::EventParseError;
use crate::world::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Placed,
    Broken,
    RightClicked,
}

impl EventKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "placed" | "place" => Some(EventKind::Placed),
            "broken" | "break" => Some(EventKind::Broken),
            "right_clicked" | "rightclicked" | "interact" => Some(EventKind::RightClicked),
            _ => None,
        }
    }
}

/// Whoever caused the event. Non-player sources are explosions, pistons,
/// machines and the like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub is_player: bool,
    pub identity: String,
}

impl Actor {
    pub fn player(name: impl Into<String>) -> Self {
        Self {
            is_player: true,
            identity: name.into(),
        }
    }

    pub fn non_player(source: impl Into<String>) -> Self {
        Self {
            is_player: false,
            identity: source.into(),
        }
    }

    pub fn normalized(&self) -> String {
        normalize_identity(&self.identity)
    }
}

pub fn normalize_identity(identity: &str) -> String {
    identity.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEvent {
    pub kind: EventKind,
    pub block_id: String,
    pub position: Position,
    pub actor: Actor,
}

/// What the host should do with an event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventOutcome {
    pub cancelled: bool,
    /// Text to send to the acting player.
    pub message: Option<String>,
}

impl EventOutcome {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn allow_with(message: String) -> Self {
        Self {
            cancelled: false,
            message: Some(message),
        }
    }

    pub fn cancel(message: Option<String>) -> Self {
        Self {
            cancelled: true,
            message,
        }
    }
}

/// Parses `<kind> <block-id> <x> <y> <z> <actor>`; `@source` marks a non-player actor.
pub fn parse_event_line(line: &str) -> Result<BlockEvent, EventParseError> {
    let mut parts = line.split_whitespace();
    let kind_raw = parts.next().ok_or(EventParseError::Missing("event kind"))?;
    let kind = EventKind::parse(kind_raw)
        .ok_or_else(|| EventParseError::UnknownKind(kind_raw.to_string()))?;
    let block_id = parts
        .next()
        .ok_or(EventParseError::Missing("block id"))?
        .to_string();
    let position = parse_position_args(&mut parts)?;
    let actor = parse_actor(parts.next().ok_or(EventParseError::Missing("actor"))?)?;
    if let Some(extra) = parts.next() {
        return Err(EventParseError::Trailing(extra.to_string()));
    }
    Ok(BlockEvent {
        kind,
        block_id,
        position,
        actor,
    })
}

pub(crate) fn parse_position_args<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
) -> Result<Position, EventParseError> {
    let x = parse_coordinate(parts.next(), "x")?;
    let y = parse_coordinate(parts.next(), "y")?;
    let z = parse_coordinate(parts.next(), "z")?;
    Ok(Position { x, y, z })
}

fn parse_coordinate(value: Option<&str>, label: &'static str) -> Result<i32, EventParseError> {
    let value = value.ok_or(EventParseError::Missing(label))?;
    value
        .parse::<i32>()
        .map_err(|_| EventParseError::InvalidCoordinate {
            label,
            value: value.to_string(),
        })
}

fn parse_actor(raw: &str) -> Result<Actor, EventParseError> {
    let actor = match raw.strip_prefix('@') {
        Some(source) => Actor::non_player(source),
        None => Actor::player(raw),
    };
    if actor.identity.is_empty() {
        return Err(EventParseError::EmptyActor);
    }
    Ok(actor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_event_line_reads_player_break() {
        let event = parse_event_line("broken waystones:waystone 10 63 20 Bob").expect("parse");
        assert_eq!(
            event,
            BlockEvent {
                kind: EventKind::Broken,
                block_id: "waystones:waystone".to_string(),
                position: Position::new(10, 63, 20),
                actor: Actor::player("Bob"),
            }
        );
    }

    #[test]
    fn parse_event_line_reads_non_player_actor() {
        let event = parse_event_line("broken waystones:warp_plate -4 70 -9 @tnt").expect("parse");
        assert_eq!(event.actor, Actor::non_player("tnt"));
        assert_eq!(event.position, Position::new(-4, 70, -9));
    }

    #[test]
    fn parse_event_line_accepts_kind_aliases() {
        let event = parse_event_line("interact waystones:warp_plate 0 0 0 alice").expect("parse");
        assert_eq!(event.kind, EventKind::RightClicked);
    }

    #[test]
    fn parse_event_line_rejects_unknown_kind() {
        assert_eq!(
            parse_event_line("exploded a:b 0 0 0 alice"),
            Err(EventParseError::UnknownKind("exploded".to_string()))
        );
    }

    #[test]
    fn parse_event_line_rejects_bad_coordinates() {
        assert_eq!(
            parse_event_line("placed a:b 0 up 0 alice"),
            Err(EventParseError::InvalidCoordinate {
                label: "y",
                value: "up".to_string()
            })
        );
        assert_eq!(
            parse_event_line("placed a:b 0 0"),
            Err(EventParseError::Missing("z"))
        );
    }

    #[test]
    fn parse_event_line_rejects_missing_or_empty_actor() {
        assert_eq!(
            parse_event_line("placed a:b 0 0 0"),
            Err(EventParseError::Missing("actor"))
        );
        assert_eq!(
            parse_event_line("placed a:b 0 0 0 @"),
            Err(EventParseError::EmptyActor)
        );
    }

    #[test]
    fn parse_event_line_rejects_trailing_tokens() {
        assert_eq!(
            parse_event_line("placed a:b 0 0 0 alice extra"),
            Err(EventParseError::Trailing("extra".to_string()))
        );
    }

    #[test]
    fn normalize_identity_lowercases_and_trims() {
        assert_eq!(normalize_identity("  AshBee404 "), "ashbee404");
        assert_eq!(Actor::player("Alice").normalized(), "alice");
    }
}
