//! Updaters that rescale one module type.
//!
//! Live and pristine modules are paired by `(kind, ordinal within kind)`, so
//! unrelated modules interleaved in either list do not shift the pairing.

use crate::core::scale::ScaleFactors;
use crate::core::updater::PartUpdater;
use crate::domain::model::{AttachNode, Part};
use crate::domain::modules::{ModuleKind, ModuleType};
use crate::utils::error::{ResizeError, Result};
use std::collections::HashMap;

/// Secondary pristine values captured at `save_defaults` time.
pub type OrigData = HashMap<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleKey {
    pub kind: ModuleKind,
    pub ordinal: usize,
}

#[derive(Debug, Clone)]
pub struct ModulePair<M> {
    pub key: ModuleKey,
    /// Snapshot of the pristine module; never mutated.
    pub base_module: M,
    pub orig_data: OrigData,
}

/// What a per-pair hook sees besides the live module.
pub struct PairContext<'a, M> {
    pub base: &'a M,
    pub orig_data: &'a OrigData,
    pub attach_nodes: &'a [AttachNode],
}

pub trait ModuleRescaler {
    type Module: ModuleType;

    /// Registry name of the updater.
    const NAME: &'static str;

    fn save_pair(&self, _live: &Self::Module, _orig_data: &mut OrigData) {}

    /// Rejects a pair that `rescale` could not apply in full. Runs for every
    /// pair before any of them is rescaled.
    fn check(&self, _base: &Self::Module, _live: &Self::Module) -> Result<()> {
        Ok(())
    }

    fn rescale(
        &self,
        ctx: PairContext<'_, Self::Module>,
        live: &mut Self::Module,
        scale: &ScaleFactors,
    ) -> Result<()>;
}

pub struct ModuleUpdater<R: ModuleRescaler> {
    rescaler: R,
    pairs: Vec<ModulePair<R::Module>>,
}

impl<R: ModuleRescaler + Default> Default for ModuleUpdater<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R: ModuleRescaler> ModuleUpdater<R> {
    pub const PRIORITY: u32 = 100;

    pub fn new(rescaler: R) -> Self {
        Self {
            rescaler,
            pairs: Vec::new(),
        }
    }

    pub fn pairs(&self) -> &[ModulePair<R::Module>] {
        &self.pairs
    }

    fn pair_modules(part: &Part, prototype: &Part) -> Vec<ModulePair<R::Module>> {
        prototype
            .modules_of::<R::Module>()
            .zip(part.modules_of::<R::Module>())
            .enumerate()
            .map(|(ordinal, (base, _live))| ModulePair {
                key: ModuleKey {
                    kind: <R::Module as ModuleType>::KIND,
                    ordinal,
                },
                base_module: base.clone(),
                orig_data: OrigData::new(),
            })
            .collect()
    }
}

impl<R: ModuleRescaler> PartUpdater for ModuleUpdater<R> {
    fn priority(&self) -> u32 {
        Self::PRIORITY
    }

    fn init(&mut self, part: &Part, prototype: &Part) -> bool {
        self.pairs = Self::pair_modules(part, prototype);
        tracing::debug!(
            "{} paired {} modules on {}",
            R::NAME,
            self.pairs.len(),
            part.name
        );
        !self.pairs.is_empty()
    }

    fn save_defaults(&mut self, part: &Part, _prototype: &Part) {
        let live: Vec<&R::Module> = part.modules_of::<R::Module>().collect();
        for pair in &mut self.pairs {
            if let Some(module) = live.get(pair.key.ordinal) {
                self.rescaler.save_pair(module, &mut pair.orig_data);
            }
        }
    }

    fn on_rescale(&mut self, part: &mut Part, scale: &ScaleFactors) -> Result<()> {
        let Part {
            name,
            modules,
            attach_nodes,
            ..
        } = part;
        let mut live: Vec<&mut R::Module> = modules
            .iter_mut()
            .filter_map(<R::Module as ModuleType>::from_module_mut)
            .collect();
        // Everything is checked before the first write, so a failure leaves
        // the part as it was.
        if live.len() < self.pairs.len() {
            return Err(ResizeError::Misconfigured {
                updater: R::NAME.to_string(),
                reason: format!(
                    "{} has {} {:?} modules, expected {}",
                    name,
                    live.len(),
                    <R::Module as ModuleType>::KIND,
                    self.pairs.len()
                ),
            });
        }
        for pair in &self.pairs {
            if let Some(module) = live.get(pair.key.ordinal) {
                self.rescaler.check(&pair.base_module, module)?;
            }
        }
        for pair in &self.pairs {
            if let Some(module) = live.get_mut(pair.key.ordinal) {
                let ctx = PairContext {
                    base: &pair.base_module,
                    orig_data: &pair.orig_data,
                    attach_nodes: attach_nodes.as_slice(),
                };
                self.rescaler.rescale(ctx, module, scale)?;
            }
        }
        Ok(())
    }
}
