use crate::core::scale::ScaleFactors;
use crate::domain::model::Part;
use crate::utils::error::Result;
use std::fmt;

/// Plugin that owns one physical aspect of a part and recomputes it on rescale.
pub trait PartUpdater {
    /// Dispatch order key; lower runs first.
    fn priority(&self) -> u32 {
        0
    }

    /// Prepares the updater for `part`. Returning `false` declines: the
    /// updater does not apply to this part and is detached again.
    fn init(&mut self, _part: &Part, _prototype: &Part) -> bool {
        true
    }

    /// Captures pristine values as of this point.
    fn save_defaults(&mut self, _part: &Part, _prototype: &Part) {}

    fn on_rescale(&mut self, part: &mut Part, scale: &ScaleFactors) -> Result<()>;

    /// Per-frame hook for updaters that apply their effect a frame late.
    fn on_frame(&mut self, _part: &mut Part) {}
}

/// An updater attached to one part.
pub struct UpdaterEntry {
    pub kind: String,
    pub priority: u32,
    /// Monotonic attachment order, used to break priority ties.
    pub attach_seq: u64,
    /// Set once the updater failed at rescale time; inert updaters are skipped.
    pub inert: bool,
    pub instance: Box<dyn PartUpdater>,
}

impl fmt::Debug for UpdaterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdaterEntry")
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("attach_seq", &self.attach_seq)
            .field("inert", &self.inert)
            .finish_non_exhaustive()
    }
}

/// The updaters attached to one part, at most one per kind.
#[derive(Debug, Default)]
pub struct AttachedUpdaters {
    entries: Vec<UpdaterEntry>,
    next_seq: u64,
}

impl AttachedUpdaters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, kind: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.kind == kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.position(kind).is_some()
    }

    pub fn get(&self, kind: &str) -> Option<&UpdaterEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn get_mut(&mut self, kind: &str) -> Option<&mut UpdaterEntry> {
        self.entries.iter_mut().find(|e| e.kind == kind)
    }

    pub(crate) fn entry_at(&mut self, index: usize) -> Option<&mut UpdaterEntry> {
        self.entries.get_mut(index)
    }

    /// Attaches a new instance. Callers check `contains` first.
    pub(crate) fn attach(
        &mut self,
        kind: &str,
        instance: Box<dyn PartUpdater>,
    ) -> &mut UpdaterEntry {
        let seq = self.next_seq;
        self.next_seq += 1;
        let priority = instance.priority();
        self.entries.push(UpdaterEntry {
            kind: kind.to_string(),
            priority,
            attach_seq: seq,
            inert: false,
            instance,
        });
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    pub fn detach(&mut self, kind: &str) -> Option<UpdaterEntry> {
        let index = self.position(kind)?;
        Some(self.entries.remove(index))
    }

    /// Stable sort by priority; ties keep attachment order.
    pub fn sort_by_priority(&mut self) {
        for entry in &mut self.entries {
            entry.priority = entry.instance.priority();
        }
        self.entries
            .sort_by_key(|e| (e.priority, e.attach_seq));
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpdaterEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut UpdaterEntry> {
        self.entries.iter_mut()
    }

    pub fn kinds(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.kind.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
