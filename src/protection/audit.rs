use crate::protection::block_types::{Footprint, ProtectedBlockType};
use crate::protection::guard::Guard;
use crate::world::position::Position;

#[derive(Debug, Default)]
pub struct OwnerFileReport {
    pub block_type: String,
    pub missing: bool,
    pub entries: usize,
    pub owners: usize,
    /// Pair cells whose partner above or below is gone or owned by someone else.
    pub orphaned: Vec<Position>,
    pub error: Option<String>,
}

impl OwnerFileReport {
    pub fn is_clean(&self) -> bool {
        self.error.is_none() && self.orphaned.is_empty()
    }
}

pub fn audit_owner_files(guard: &Guard) -> Vec<OwnerFileReport> {
    guard
        .block_types()
        .iter()
        .map(|block_type| audit_block_type(guard, block_type))
        .collect()
}

fn audit_block_type(guard: &Guard, block_type: &ProtectedBlockType) -> OwnerFileReport {
    let store = guard.store_for(block_type);
    let mut report = OwnerFileReport {
        block_type: block_type.name.clone(),
        missing: !store.path().exists(),
        ..OwnerFileReport::default()
    };
    let registry = match store.load() {
        Ok(registry) => registry,
        Err(err) => {
            report.error = Some(err.to_string());
            return report;
        }
    };
    report.entries = registry.len();
    let mut owners: Vec<&str> = registry.iter().map(|(_, owner)| owner).collect();
    owners.sort_unstable();
    owners.dedup();
    report.owners = owners.len();

    if block_type.footprint == Footprint::VerticalPair {
        for (position, owner) in registry.iter() {
            let paired = [position.below(), position.above()]
                .into_iter()
                .any(|partner| partner != position && registry.owner_at(partner) == Some(owner));
            if !paired {
                report.orphaned.push(position);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protection::block_types::default_block_types;
    use crate::protection::registry::OwnershipRegistry;

    #[test]
    fn audit_reports_missing_files_and_counts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let guard = Guard::new(default_block_types(), ["ashbee"], dir.path());
        let shop = guard.resolve("numismatic-overhaul:shop").expect("shop").clone();
        guard.record_placement(&shop, Position::new(0, 0, 0), "alice");
        guard.record_placement(&shop, Position::new(1, 0, 0), "alice");
        guard.record_placement(&shop, Position::new(2, 0, 0), "bob");

        let reports = audit_owner_files(&guard);
        assert_eq!(reports.len(), 3);
        assert!(reports[0].missing);
        let shop_report = &reports[2];
        assert!(!shop_report.missing);
        assert_eq!(shop_report.entries, 3);
        assert_eq!(shop_report.owners, 2);
        assert!(shop_report.is_clean());
    }

    #[test]
    fn audit_flags_half_pairs_and_malformed_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let guard = Guard::new(default_block_types(), ["ashbee"], dir.path());
        let waystone = guard.resolve("waystones:waystone").expect("waystone").clone();
        guard.record_placement(&waystone, Position::new(10, 64, 20), "alice");

        let mut registry = guard.store_for(&waystone).load().expect("load");
        registry.claim(&[Position::new(50, 70, 50)], "bob");
        guard.store_for(&waystone).save(&registry).expect("save");

        let plate = guard.resolve("waystones:warp_plate").expect("plate").clone();
        std::fs::write(guard.store_for(&plate).path(), "{broken").expect("corrupt");

        let reports = audit_owner_files(&guard);
        assert!(reports[0].error.is_some());
        assert_eq!(reports[1].orphaned, vec![Position::new(50, 70, 50)]);
        assert!(!reports[1].is_clean());

        let empty = OwnershipRegistry::new();
        guard.store_for(&plate).save(&empty).expect("overwrite");
        assert!(audit_owner_files(&guard)[0].is_clean());
    }
}
