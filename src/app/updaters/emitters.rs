use crate::core::scale::ScaleFactors;
use crate::core::updater::PartUpdater;
use crate::domain::model::{Part, ParticleEmitter};
use crate::utils::error::Result;

/// Scales particle emitters with the part, one frame after the rescale.
///
/// Each emitter is snapshotted the first time it is seen and always scaled
/// from that snapshot. Emitters created later by particle effects get their
/// snapshot when they first show up.
#[derive(Debug, Default)]
pub struct EmitterUpdater {
    pending: Option<f32>,
    orig: Vec<ParticleEmitter>,
}

impl EmitterUpdater {
    /// Scales every emitter from its snapshot.
    fn apply(&mut self, emitters: &mut [ParticleEmitter], linear: f32) {
        for (i, emitter) in emitters.iter_mut().enumerate() {
            if i >= self.orig.len() {
                self.orig.push(emitter.clone());
            }
            let orig = &self.orig[i];
            emitter.min_size = orig.min_size * linear;
            emitter.max_size = orig.max_size * linear;
            emitter.shape_1d = orig.shape_1d * linear;
            emitter.shape_2d = [orig.shape_2d[0] * linear, orig.shape_2d[1] * linear];
            emitter.shape_3d = orig.shape_3d * linear;
            emitter.force = orig.force * linear;
            emitter.local_velocity = orig.local_velocity * linear;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl PartUpdater for EmitterUpdater {
    fn init(&mut self, part: &Part, _prototype: &Part) -> bool {
        part.has_emitters()
    }

    fn save_defaults(&mut self, part: &Part, _prototype: &Part) {
        self.orig = part.emitters.clone();
    }

    fn on_rescale(&mut self, part: &mut Part, scale: &ScaleFactors) -> Result<()> {
        if part.has_emitters() {
            self.pending = Some(scale.absolute_linear());
        }
        Ok(())
    }

    fn on_frame(&mut self, part: &mut Part) {
        if let Some(linear) = self.pending.take() {
            self.apply(&mut part.emitters, linear);
        }
    }
}
