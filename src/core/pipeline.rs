use crate::core::registry::UpdaterRegistry;
use crate::core::scale::ScaleFactors;
use crate::core::updater::AttachedUpdaters;
use crate::domain::model::Part;

/// Outcome of one dispatch over the attached updaters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RescaleReport {
    pub applied: Vec<String>,
    /// Updaters that failed during this pass, with the reason.
    pub failed: Vec<(String, String)>,
    /// Updaters skipped because they failed in an earlier pass.
    pub skipped: Vec<String>,
}

impl RescaleReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// The updaters of one part, in dispatch order.
#[derive(Debug, Default)]
pub struct UpdaterPipeline {
    attached: AttachedUpdaters,
}

impl UpdaterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches every applicable registered kind, then sorts by priority.
    /// Returns the number of attached updaters.
    pub fn init(&mut self, registry: &UpdaterRegistry, part: &Part, prototype: &Part) -> usize {
        for kind in registry.kinds() {
            let Some(entry) = registry.instantiate(&kind, part, &mut self.attached) else {
                tracing::trace!("{} does not apply to {}", kind, part.name);
                continue;
            };
            if entry.instance.init(part, prototype) {
                entry.instance.save_defaults(part, prototype);
            } else {
                tracing::debug!("{} declined {}, detaching", kind, part.name);
                self.attached.detach(&kind);
            }
        }
        self.attached.sort_by_priority();
        tracing::debug!(
            "Updaters of {}: {}",
            part.name,
            self.attached.kinds().join(", ")
        );
        self.attached.len()
    }

    /// Dispatches one rescale in priority order. A failing updater is logged
    /// and becomes inert; the remaining updaters still run.
    pub fn on_rescale(&mut self, part: &mut Part, scale: &ScaleFactors) -> RescaleReport {
        let mut report = RescaleReport::default();
        for entry in self.attached.iter_mut() {
            if entry.inert {
                report.skipped.push(entry.kind.clone());
                continue;
            }
            match entry.instance.on_rescale(part, scale) {
                Ok(()) => report.applied.push(entry.kind.clone()),
                Err(e) => {
                    tracing::warn!("Updater {} failed on {}: {}", entry.kind, part.name, e);
                    entry.inert = true;
                    report.failed.push((entry.kind.clone(), e.to_string()));
                }
            }
        }
        report
    }

    pub fn on_frame(&mut self, part: &mut Part) {
        for entry in self.attached.iter_mut().filter(|e| !e.inert) {
            entry.instance.on_frame(part);
        }
    }

    pub fn attached(&self) -> &AttachedUpdaters {
        &self.attached
    }

    pub fn kinds(&self) -> Vec<&str> {
        self.attached.kinds()
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }
}
