use crate::world::position::Position;
use serde::{Deserialize, Serialize};

const OWNER_PLACEHOLDER: &str = "{owner}";

/// Cells a single block instance occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Footprint {
    #[default]
    Single,
    /// Placed cell is the top, the cell underneath is the base.
    VerticalPair,
}

impl Footprint {
    /// Cells claimed when a block is placed at `origin`.
    pub fn cells(self, origin: Position) -> Vec<Position> {
        match self {
            Footprint::Single => vec![origin],
            Footprint::VerticalPair => vec![origin, origin.below()],
        }
    }

    /// Cells checked, in order, when an event fires at `trigger`. The trigger may
    /// be either half of a pair, so both neighbours are checked.
    pub fn candidates(self, trigger: Position) -> Vec<Position> {
        match self {
            Footprint::Single => vec![trigger],
            Footprint::VerticalPair => vec![trigger, trigger.below(), trigger.above()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedBlockType {
    /// Short name, also the stem of the storage file.
    pub name: String,
    pub ids: Vec<String>,
    #[serde(default)]
    pub footprint: Footprint,
    #[serde(default)]
    pub protect_interaction: bool,
    pub placed_message: String,
    pub denied_message: String,
}

impl ProtectedBlockType {
    pub fn matches(&self, block_id: &str) -> bool {
        self.ids.iter().any(|id| id == block_id)
    }

    pub fn placed_message(&self, owner: &str) -> String {
        self.placed_message.replace(OWNER_PLACEHOLDER, owner)
    }

    pub fn denied_message(&self, owner: &str) -> String {
        self.denied_message.replace(OWNER_PLACEHOLDER, owner)
    }

    pub fn storage_file_name(&self) -> String {
        format!("{}Owners.json", camel_case(&self.name))
    }
}

/// The warp plate, waystone and shop table the server shipped with.
pub fn default_block_types() -> Vec<ProtectedBlockType> {
    vec![
        ProtectedBlockType {
            name: "warp_plate".to_string(),
            ids: vec!["waystones:warp_plate".to_string()],
            footprint: Footprint::Single,
            protect_interaction: true,
            placed_message: "§c{owner} seul vous pourra modifier cette warp plate !".to_string(),
            denied_message: "§cCette warp plate appartient à §e{owner} !".to_string(),
        },
        ProtectedBlockType {
            name: "waystone".to_string(),
            ids: vec![
                "waystones:waystone".to_string(),
                "waystones:mossy_waystone".to_string(),
                "waystones:sandy_waystone".to_string(),
            ],
            footprint: Footprint::VerticalPair,
            protect_interaction: false,
            placed_message: "§c{owner} seul vous pourra casser cette waystone !".to_string(),
            denied_message: "§cCette waystone appartient à §e{owner} !".to_string(),
        },
        ProtectedBlockType {
            name: "shop".to_string(),
            ids: vec![
                "numismatic-overhaul:shop".to_string(),
                "numismatic-overhaul:inexhaustible_shop".to_string(),
            ],
            footprint: Footprint::Single,
            protect_interaction: false,
            placed_message: "§c{owner} seul vous pourra casser ce shop !".to_string(),
            denied_message: "§cLe shop appartient à §e{owner} !".to_string(),
        },
    ]
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' || ch == '-' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
