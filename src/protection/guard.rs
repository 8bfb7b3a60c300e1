//! Ownership checks for protected blocks.
//!
//! Every check reloads the owner file of the block type before deciding, so
//! ownership survives restarts and picks up edits made by other tools.

use crate::events::{normalize_identity, BlockEvent, EventKind, EventOutcome};
use crate::persistence::store::OwnerStore;
use crate::protection::block_types::ProtectedBlockType;
use crate::protection::registry::OwnershipRegistry;
use crate::world::position::Position;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Break,
    Interact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { owner: String, message: String },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

#[derive(Debug, Clone)]
pub struct Guard {
    block_types: Vec<ProtectedBlockType>,
    operators: HashSet<String>,
    data_dir: PathBuf,
    protect_from_non_players: bool,
}

impl Guard {
    pub fn new<I, S>(block_types: Vec<ProtectedBlockType>, operators: I, data_dir: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            block_types,
            operators: operators
                .into_iter()
                .map(|name| normalize_identity(name.as_ref()))
                .filter(|name| !name.is_empty())
                .collect(),
            data_dir: data_dir.to_path_buf(),
            protect_from_non_players: false,
        }
    }

    /// Makes breaks by explosions, machines and other non-player sources
    /// subject to the ownership check.
    pub fn with_non_player_protection(mut self, enabled: bool) -> Self {
        self.protect_from_non_players = enabled;
        self
    }

    pub fn block_types(&self) -> &[ProtectedBlockType] {
        &self.block_types
    }

    /// First configured type listing `block_id`; later types are never consulted.
    pub fn resolve(&self, block_id: &str) -> Option<&ProtectedBlockType> {
        self.block_types
            .iter()
            .find(|block_type| block_type.matches(block_id))
    }

    pub fn is_operator(&self, actor: &str) -> bool {
        self.operators.contains(&normalize_identity(actor))
    }

    pub fn store_for(&self, block_type: &ProtectedBlockType) -> OwnerStore {
        OwnerStore::in_dir(&self.data_dir, &block_type.storage_file_name())
    }

    /// Claims every footprint cell for `actor` and returns the message for them.
    pub fn record_placement(
        &self,
        block_type: &ProtectedBlockType,
        position: Position,
        actor: &str,
    ) -> String {
        let actor = normalize_identity(actor);
        let store = self.store_for(block_type);
        let mut registry = self.load_registry(block_type, &store);
        registry.claim(&block_type.footprint.cells(position), &actor);
        self.persist(block_type, &store, &registry);
        log::info!("{} at {} placed by {}", block_type.name, position, actor);
        block_type.placed_message(&actor)
    }

    pub fn authorize(
        &self,
        block_type: &ProtectedBlockType,
        position: Position,
        actor: &str,
        intent: Intent,
    ) -> Decision {
        if intent == Intent::Interact && !block_type.protect_interaction {
            return Decision::Allow;
        }
        let actor = normalize_identity(actor);
        let store = self.store_for(block_type);
        let mut registry = self.load_registry(block_type, &store);
        let candidates = block_type.footprint.candidates(position);
        let owner = registry.first_owner(&candidates).map(str::to_string);
        let owned = owned_cells(&registry, &candidates, owner.as_deref());

        if self.is_operator(&actor) {
            if intent == Intent::Break {
                self.release(block_type, &store, &mut registry, &owned, &actor);
            }
            return Decision::Allow;
        }

        if let Some(owner) = owner.filter(|owner| *owner != actor) {
            log::warn!(
                "{} denied {:?} on {} at {} owned by {}",
                actor,
                intent,
                block_type.name,
                position,
                owner
            );
            let message = block_type.denied_message(&owner);
            return Decision::Deny { owner, message };
        }

        if intent == Intent::Break {
            self.release(block_type, &store, &mut registry, &owned, &actor);
        }
        Decision::Allow
    }

    /// Entry point for the host: never fails, storage problems are logged.
    pub fn handle(&self, event: &BlockEvent) -> EventOutcome {
        let Some(block_type) = self.resolve(&event.block_id) else {
            return EventOutcome::pass();
        };
        if !event.actor.is_player {
            return self.handle_non_player(block_type, event);
        }
        let actor = event.actor.normalized();
        let intent = match event.kind {
            EventKind::Placed => {
                let message = self.record_placement(block_type, event.position, &actor);
                return EventOutcome::allow_with(message);
            }
            EventKind::Broken => Intent::Break,
            EventKind::RightClicked => Intent::Interact,
        };
        match self.authorize(block_type, event.position, &actor, intent) {
            Decision::Allow => EventOutcome::pass(),
            Decision::Deny { message, .. } => EventOutcome::cancel(Some(message)),
        }
    }

    fn handle_non_player(&self, block_type: &ProtectedBlockType, event: &BlockEvent) -> EventOutcome {
        if !self.protect_from_non_players || event.kind != EventKind::Broken {
            return EventOutcome::pass();
        }
        let store = self.store_for(block_type);
        let registry = self.load_registry(block_type, &store);
        let candidates = block_type.footprint.candidates(event.position);
        match registry.first_owner(&candidates) {
            Some(owner) => {
                log::warn!(
                    "non-player source {} denied break on {} at {} owned by {}",
                    event.actor.identity,
                    block_type.name,
                    event.position,
                    owner
                );
                EventOutcome::cancel(None)
            }
            None => EventOutcome::pass(),
        }
    }

    /// `(type name, owner)` for every type with an entry at exactly `position`.
    pub fn owners_at(&self, position: Position) -> Vec<(String, String)> {
        self.block_types
            .iter()
            .filter_map(|block_type| {
                let registry = self.load_registry(block_type, &self.store_for(block_type));
                registry
                    .owner_at(position)
                    .map(|owner| (block_type.name.clone(), owner.to_string()))
            })
            .collect()
    }

    /// Clears every type's entries around `position`. Returns how many types changed.
    pub fn release_at(&self, position: Position, actor: &str) -> usize {
        let actor = normalize_identity(actor);
        let mut changed = 0;
        for block_type in &self.block_types {
            let store = self.store_for(block_type);
            let mut registry = self.load_registry(block_type, &store);
            let candidates = block_type.footprint.candidates(position);
            if self.release(block_type, &store, &mut registry, &candidates, &actor) {
                changed += 1;
            }
        }
        changed
    }

    fn release(
        &self,
        block_type: &ProtectedBlockType,
        store: &OwnerStore,
        registry: &mut OwnershipRegistry,
        cells: &[Position],
        actor: &str,
    ) -> bool {
        if !registry.release(cells) {
            return false;
        }
        self.persist(block_type, store, registry);
        let keys: Vec<String> = cells.iter().map(Position::to_string).collect();
        log::info!(
            "{} at [{}] released by {}",
            block_type.name,
            keys.join(" "),
            actor
        );
        true
    }

    fn load_registry(&self, block_type: &ProtectedBlockType, store: &OwnerStore) -> OwnershipRegistry {
        match store.load() {
            Ok(registry) => registry,
            Err(err) => {
                log::error!("{} owners treated as empty: {}", block_type.name, err);
                OwnershipRegistry::new()
            }
        }
    }

    fn persist(&self, block_type: &ProtectedBlockType, store: &OwnerStore, registry: &OwnershipRegistry) {
        let Err(err) = store.save(registry) else {
            return;
        };
        log::warn!("{} owner save failed, retrying: {}", block_type.name, err);
        if let Err(err) = store.save(registry) {
            log::error!(
                "{} owner save failed twice, change not persisted: {}",
                block_type.name,
                err
            );
        }
    }
}

/// Candidates held by the resolved owner; a stacked neighbour owned by
/// someone else keeps its entries.
fn owned_cells(registry: &OwnershipRegistry, candidates: &[Position], owner: Option<&str>) -> Vec<Position> {
    let Some(owner) = owner else {
        return Vec::new();
    };
    candidates
        .iter()
        .copied()
        .filter(|cell| registry.owner_at(*cell) == Some(owner))
        .collect()
}
