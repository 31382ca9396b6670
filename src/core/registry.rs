//! Table of known updater kinds.
//!
//! Kinds are registered explicitly by name, normally once at startup through
//! [`crate::app::updaters::register_builtin`]. The first registration of a
//! name wins; later duplicates are ignored.

use crate::core::updater::{AttachedUpdaters, PartUpdater, UpdaterEntry};
use crate::domain::model::Part;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Builds an updater for a part, or declines with `None`.
pub type UpdaterConstructor = Arc<dyn Fn(&Part) -> Option<Box<dyn PartUpdater>> + Send + Sync>;

#[derive(Default)]
pub struct UpdaterRegistry {
    constructors: RwLock<Vec<(String, UpdaterConstructor)>>,
}

impl UpdaterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in updater kind.
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        crate::app::updaters::register_builtin(&registry);
        registry
    }

    /// Process-wide registry, populated with the built-in kinds on first use.
    pub fn global() -> &'static UpdaterRegistry {
        static GLOBAL: OnceLock<UpdaterRegistry> = OnceLock::new();
        GLOBAL.get_or_init(UpdaterRegistry::with_builtin)
    }

    /// Returns `true` if the kind was newly registered.
    pub fn register<F>(&self, kind: impl Into<String>, constructor: F) -> bool
    where
        F: Fn(&Part) -> Option<Box<dyn PartUpdater>> + Send + Sync + 'static,
    {
        let kind = kind.into();
        let mut constructors = self
            .constructors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if constructors.iter().any(|(k, _)| *k == kind) {
            tracing::debug!("Updater {} is already registered", kind);
            return false;
        }
        tracing::debug!("Updater registered: {}", kind);
        constructors.push((kind, Arc::new(constructor)));
        true
    }

    /// Registers a kind that applies to every part.
    pub fn register_default<U>(&self, kind: impl Into<String>) -> bool
    where
        U: PartUpdater + Default + 'static,
    {
        self.register(kind, |_| Some(Box::new(U::default()) as Box<dyn PartUpdater>))
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.read().iter().any(|(k, _)| k == kind)
    }

    /// Registered kinds in registration order.
    pub fn kinds(&self) -> Vec<String> {
        self.read().iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns the entry of `kind` already attached to the part, or builds and
    /// attaches a new one. `None` if the kind is unknown or declines.
    pub fn instantiate<'a>(
        &self,
        kind: &str,
        part: &Part,
        attached: &'a mut AttachedUpdaters,
    ) -> Option<&'a mut UpdaterEntry> {
        if let Some(index) = attached.position(kind) {
            return attached.entry_at(index);
        }
        let constructor = self.constructor(kind)?;
        let instance = constructor(part)?;
        Some(attached.attach(kind, instance))
    }

    fn constructor(&self, kind: &str) -> Option<UpdaterConstructor> {
        self.read()
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, c)| Arc::clone(c))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<(String, UpdaterConstructor)>> {
        self.constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for UpdaterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdaterRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scale::ScaleFactors;
    use crate::domain::model::PartId;
    use crate::utils::error::Result;

    #[derive(Default)]
    struct Noop;

    impl PartUpdater for Noop {
        fn on_rescale(&mut self, _part: &mut Part, _scale: &ScaleFactors) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = UpdaterRegistry::new();
        assert!(registry.register_default::<Noop>("noop"));
        assert!(!registry.register_default::<Noop>("noop"));
        assert_eq!(registry.kinds(), vec!["noop".to_string()]);
    }

    #[test]
    fn test_first_registration_wins() {
        let registry = UpdaterRegistry::new();
        registry.register("picky", |_| None);
        registry.register_default::<Noop>("picky");

        let part = Part::new(PartId(1), "sensor");
        let mut attached = AttachedUpdaters::new();
        assert!(registry.instantiate("picky", &part, &mut attached).is_none());
        assert!(attached.is_empty());
    }

    #[test]
    fn test_instantiate_returns_existing_instance() {
        let registry = UpdaterRegistry::new();
        registry.register_default::<Noop>("noop");
        let part = Part::new(PartId(1), "sensor");
        let mut attached = AttachedUpdaters::new();

        let first_seq = registry
            .instantiate("noop", &part, &mut attached)
            .map(|e| e.attach_seq);
        let second_seq = registry
            .instantiate("noop", &part, &mut attached)
            .map(|e| e.attach_seq);

        assert!(first_seq.is_some());
        assert_eq!(first_seq, second_seq);
        assert_eq!(attached.len(), 1);
    }

    #[test]
    fn test_unknown_kind() {
        let registry = UpdaterRegistry::new();
        let part = Part::new(PartId(1), "sensor");
        let mut attached = AttachedUpdaters::new();
        assert!(registry.instantiate("missing", &part, &mut attached).is_none());
    }

    #[test]
    fn test_global_has_builtin_kinds() {
        let registry = UpdaterRegistry::global();
        assert!(registry.contains("nodes"));
        assert!(registry.contains("jettison"));
    }
}
