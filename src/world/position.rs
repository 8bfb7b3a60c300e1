use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A block cell in the world. Ordered so registries serialize deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionDelta {
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionParseError {
    #[error("position key '{0}' must have exactly three components")]
    ComponentCount(String),
    #[error("position key '{key}' has invalid component '{component}'")]
    InvalidComponent { key: String, component: String },
}

impl Position {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(self, delta: PositionDelta) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(delta.dx)?,
            y: self.y.checked_add(delta.dy)?,
            z: self.z.checked_add(delta.dz)?,
        })
    }

    /// The cell directly underneath, or `self` at the bottom of the i32 range.
    pub fn below(self) -> Self {
        self.offset(PositionDelta { dx: 0, dy: -1, dz: 0 })
            .unwrap_or(self)
    }

    pub fn above(self) -> Self {
        self.offset(PositionDelta { dx: 0, dy: 1, dz: 0 })
            .unwrap_or(self)
    }
}

/// Canonical position key: `x,y,z`.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

impl FromStr for Position {
    type Err = PositionParseError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = key.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(PositionParseError::ComponentCount(key.to_string()));
        }
        let component = |raw: &str| {
            raw.parse::<i32>()
                .map_err(|_| PositionParseError::InvalidComponent {
                    key: key.to_string(),
                    component: raw.to_string(),
                })
        };
        Ok(Self {
            x: component(parts[0])?,
            y: component(parts[1])?,
            z: component(parts[2])?,
        })
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = Position;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a position key of the form \"x,y,z\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Position, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_roundtrip_with_negative_components() {
        let position = Position::new(-10, 64, -3);
        let key = position.to_string();
        assert_eq!(key, "-10,64,-3");
        assert_eq!(key.parse::<Position>().expect("parse"), position);
    }

    #[test]
    fn parse_rejects_wrong_component_count() {
        assert_eq!(
            "1,2".parse::<Position>(),
            Err(PositionParseError::ComponentCount("1,2".to_string()))
        );
        assert!("1,2,3,4".parse::<Position>().is_err());
    }

    #[test]
    fn parse_rejects_non_integer_component() {
        assert!(matches!(
            "1,up,3".parse::<Position>(),
            Err(PositionParseError::InvalidComponent { .. })
        ));
        assert!("1,,3".parse::<Position>().is_err());
    }

    #[test]
    fn parse_tolerates_spaces_around_components() {
        assert_eq!(
            " 1, 2 ,3".parse::<Position>().expect("parse"),
            Position::new(1, 2, 3)
        );
    }

    #[test]
    fn vertical_steps() {
        let origin = Position::new(10, 64, 20);
        assert_eq!(origin.below(), Position::new(10, 63, 20));
        assert_eq!(origin.above(), Position::new(10, 65, 20));
        assert_eq!(origin.above().below(), origin);
    }

    #[test]
    fn vertical_steps_saturate_at_range_limits() {
        let floor = Position::new(0, i32::MIN, 0);
        assert_eq!(floor.below(), floor);
        let ceiling = Position::new(0, i32::MAX, 0);
        assert_eq!(ceiling.above(), ceiling);
    }

    #[test]
    fn serializes_as_json_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(Position::new(1, -2, 3), "alice".to_string());
        let json = serde_json::to_string(&map).expect("serialize");
        assert_eq!(json, r#"{"1,-2,3":"alice"}"#);
        let back: std::collections::BTreeMap<Position, String> =
            serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, map);
    }
}
