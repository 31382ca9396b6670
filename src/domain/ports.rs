use crate::domain::model::{Part, PartId};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Resolves live parts by identity. Deferred tasks go through this so a
/// destroyed part simply resolves to `None`.
pub trait PartLookup {
    fn part_mut(&mut self, id: PartId) -> Option<&mut Part>;
}

impl PartLookup for HashMap<PartId, Part> {
    fn part_mut(&mut self, id: PartId) -> Option<&mut Part> {
        self.get_mut(&id)
    }
}

impl PartLookup for BTreeMap<PartId, Part> {
    fn part_mut(&mut self, id: PartId) -> Option<&mut Part> {
        self.get_mut(&id)
    }
}

/// Source of pristine part templates.
pub trait PrototypeCatalog {
    fn prototype(&self, name: &str) -> Option<&Part>;
}

impl PrototypeCatalog for HashMap<String, Part> {
    fn prototype(&self, name: &str) -> Option<&Part> {
        self.get(name)
    }
}

/// Progression state: which parts the player has unlocked.
pub trait TechProgress {
    fn is_unlocked(&self, part_name: &str) -> bool;
}

impl TechProgress for HashSet<String> {
    fn is_unlocked(&self, part_name: &str) -> bool {
        self.contains(part_name)
    }
}

/// Every part counts as unlocked (sandbox games, tools).
#[derive(Debug, Clone, Copy, Default)]
pub struct AllUnlocked;

impl TechProgress for AllUnlocked {
    fn is_unlocked(&self, _part_name: &str) -> bool {
        true
    }
}
