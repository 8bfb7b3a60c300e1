use crate::world::position::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Owner per cell for one protected block type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnershipRegistry {
    owners: BTreeMap<Position, String>,
}

impl OwnershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner_at(&self, position: Position) -> Option<&str> {
        self.owners
            .get(&position)
            .map(String::as_str)
            .filter(|owner| !owner.is_empty())
    }

    /// First candidate with a recorded owner wins.
    pub fn first_owner(&self, candidates: &[Position]) -> Option<&str> {
        candidates
            .iter()
            .find_map(|position| self.owner_at(*position))
    }

    pub fn claim(&mut self, cells: &[Position], owner: &str) {
        for cell in cells {
            self.owners.insert(*cell, owner.to_string());
        }
    }

    /// Returns true if any cell had an entry.
    pub fn release(&mut self, cells: &[Position]) -> bool {
        let mut removed = false;
        for cell in cells {
            removed |= self.owners.remove(cell).is_some();
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &str)> {
        self.owners
            .iter()
            .map(|(position, owner)| (*position, owner.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_owner_respects_candidate_order() {
        let mut registry = OwnershipRegistry::new();
        registry.claim(&[Position::new(0, 1, 0)], "bob");
        registry.claim(&[Position::new(0, -1, 0)], "carol");
        let candidates = [
            Position::new(0, 0, 0),
            Position::new(0, -1, 0),
            Position::new(0, 1, 0),
        ];
        assert_eq!(registry.first_owner(&candidates), Some("carol"));
    }

    #[test]
    fn empty_owner_entries_count_as_unowned() {
        let registry: OwnershipRegistry =
            serde_json::from_str(r#"{"0,0,0":"","0,-1,0":"dave"}"#).expect("parse");
        assert_eq!(registry.owner_at(Position::new(0, 0, 0)), None);
        assert_eq!(
            registry.first_owner(&[Position::new(0, 0, 0), Position::new(0, -1, 0)]),
            Some("dave")
        );
    }

    #[test]
    fn release_reports_whether_anything_changed() {
        let mut registry = OwnershipRegistry::new();
        let cells = [Position::new(5, 5, 5), Position::new(5, 4, 5)];
        registry.claim(&cells, "alice");
        assert_eq!(registry.len(), 2);
        assert!(registry.release(&cells));
        assert!(registry.is_empty());
        assert!(!registry.release(&cells));
    }

    #[test]
    fn serializes_as_flat_key_map() {
        let mut registry = OwnershipRegistry::new();
        registry.claim(&[Position::new(10, 64, 20)], "alice");
        let json = serde_json::to_string(&registry).expect("serialize");
        assert_eq!(json, r#"{"10,64,20":"alice"}"#);
    }
}
