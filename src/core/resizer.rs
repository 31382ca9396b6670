//! Per-part rescale orchestration.
//!
//! A `PartResizer` goes `Uninitialized -> Ready` in [`PartResizer::init`],
//! which always ends with one rescale pass flagged as the first application.
//! After that every detected change of size, aspect or model scale runs one
//! more pass: clamp, validate, recompute mass and cost, dispatch the updater
//! pipeline, commit, and schedule the deferred drag refresh.

use crate::core::limits::{AbsoluteLimits, EffectiveBounds, LimitTable};
use crate::core::pipeline::{RescaleReport, UpdaterPipeline};
use crate::core::registry::UpdaterRegistry;
use crate::core::scale::ScaleFactors;
use crate::core::scheduler::{DeferredAction, TickScheduler};
use crate::domain::model::{Dimensions, Part, PartId};
use crate::utils::error::{ResizeError, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

const EPS: f32 = 1e-5;

fn unequal(a: f32, b: f32) -> bool {
    (a - b).abs() > EPS
}

/// Per part-type resizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizerSettings {
    pub size_only: bool,
    pub aspect_only: bool,
    /// Mass curve `(cubic, quadratic, linear, constant)`.
    pub specific_mass: [f32; 4],
    /// Cost curve, same layout as `specific_mass`.
    pub specific_cost: [f32; 4],
    pub min_size: f32,
    pub max_size: f32,
    pub size_step_large: f32,
    pub size_step_small: f32,
    pub min_aspect: f32,
    pub max_aspect: f32,
    pub aspect_step_large: f32,
    pub aspect_step_small: f32,
    /// Tech group whose limits apply; empty for none.
    pub tech_group: String,
}

impl Default for ResizerSettings {
    fn default() -> Self {
        Self {
            size_only: false,
            aspect_only: false,
            specific_mass: [1.0, 1.0, 1.0, 0.0],
            specific_cost: [1.0, 1.0, 1.0, 0.0],
            min_size: -1.0,
            max_size: -1.0,
            size_step_large: 1.0,
            size_step_small: 0.1,
            min_aspect: -1.0,
            max_aspect: -1.0,
            aspect_step_large: 0.5,
            aspect_step_small: 0.1,
            tech_group: String::new(),
        }
    }
}

/// `((x*s + y)*s + z)*s*aspect + w`
pub fn specific_curve(coefficients: [f32; 4], scale: &ScaleFactors) -> f32 {
    let [x, y, z, w] = coefficients;
    let s = scale.absolute_linear();
    ((x * s + y) * s + z) * s * scale.absolute_aspect() + w
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    Editor,
    Flight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizerPhase {
    Uninitialized,
    Ready,
    /// Between the first mutation of a pass and its commit.
    Rescaling,
}

/// Reference, previously applied and currently applied dimensions.
/// Only the commit step of a rescale pass writes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RescaleState {
    pub orig: Dimensions,
    pub previous: Dimensions,
    pub current: Dimensions,
}

/// Values the host saves with the part and hands back through `restore`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub size: f32,
    pub aspect: f32,
    pub orig_size: f32,
    pub orig_aspect: f32,
    pub orig_local_scale: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderSpec {
    pub visible: bool,
    pub min: f32,
    pub max: f32,
    pub step_large: f32,
    pub step_small: f32,
}

/// Shared collaborators needed to set a resizer up.
#[derive(Debug, Clone, Copy)]
pub struct ResizeContext<'a> {
    pub registry: &'a UpdaterRegistry,
    pub globals: &'a AbsoluteLimits,
    pub limits: &'a LimitTable,
    pub scene: Scene,
}

#[derive(Debug)]
pub struct PartResizer {
    settings: ResizerSettings,
    phase: ResizerPhase,
    scene: Scene,
    state: Option<RescaleState>,
    restored: Option<PersistedState>,
    orig_local_scale: Vec3,
    applied_local_scale: Vec3,
    bounds: EffectiveBounds,
    pipeline: UpdaterPipeline,
    mass: f32,
    cost: f32,
}

impl PartResizer {
    pub fn new(mut settings: ResizerSettings) -> Self {
        if settings.size_only && settings.aspect_only {
            settings.aspect_only = false;
        }
        Self {
            settings,
            phase: ResizerPhase::Uninitialized,
            scene: Scene::Editor,
            state: None,
            restored: None,
            orig_local_scale: Vec3::ONE,
            applied_local_scale: Vec3::ONE,
            bounds: EffectiveBounds::from(&AbsoluteLimits::default()),
            pipeline: UpdaterPipeline::new(),
            mass: 0.0,
            cost: 0.0,
        }
    }

    /// Reapplies persisted fields before `init`, restoring the saved model
    /// scale so the part loads with its resized geometry.
    pub fn restore(&mut self, part: &mut Part, saved: &PersistedState) {
        let dims = Dimensions::new(saved.size, saved.aspect);
        part.dimensions = Some(dims);
        self.restored = Some(*saved);
        if saved.orig_size > 0.0 && saved.orig_aspect > 0.0 {
            let orig = Dimensions::new(saved.orig_size, saved.orig_aspect);
            let scale = ScaleFactors::new(dims, dims, orig, true);
            part.model_scale = scale.scale_vector(saved.orig_local_scale);
        }
    }

    pub fn init(
        &mut self,
        part: &mut Part,
        prototype: &Part,
        ctx: &ResizeContext<'_>,
        scheduler: &mut TickScheduler,
    ) -> Result<RescaleReport> {
        self.scene = ctx.scene;
        let attached = self.pipeline.init(ctx.registry, part, prototype);

        let current = part
            .dimensions
            .or(prototype.dimensions)
            .unwrap_or_default();
        part.dimensions = Some(current);

        let persisted_orig = self
            .restored
            .filter(|saved| saved.orig_size > 0.0 && saved.orig_aspect > 0.0)
            .map(|saved| Dimensions::new(saved.orig_size, saved.orig_aspect));
        let orig = match (ctx.scene, persisted_orig) {
            (Scene::Flight, Some(orig)) => orig,
            _ => prototype.dimensions.unwrap_or(current),
        };
        if !valid(orig) {
            return Err(ResizeError::InvalidDimensions {
                size: orig.size,
                aspect: orig.aspect,
            });
        }

        self.orig_local_scale = match (ctx.scene, self.restored) {
            (Scene::Flight, Some(saved)) => saved.orig_local_scale,
            _ => prototype.model_scale,
        };
        self.applied_local_scale = part.model_scale;
        self.bounds = self.resolve_bounds(ctx, current, orig);
        self.state = Some(RescaleState {
            orig,
            previous: current,
            current,
        });
        self.phase = ResizerPhase::Ready;
        tracing::debug!(
            "Resizer of {} ready: {} updaters, orig size {}, orig aspect {}",
            part.name,
            attached,
            orig.size,
            orig.aspect
        );

        self.rescale(part, true, scheduler)
    }

    fn resolve_bounds(
        &self,
        ctx: &ResizeContext<'_>,
        current: Dimensions,
        orig: Dimensions,
    ) -> EffectiveBounds {
        let or_global = |configured: f32, global: f32| {
            if configured < 0.0 {
                global
            } else {
                configured
            }
        };
        let bounds = EffectiveBounds {
            min_size: or_global(self.settings.min_size, ctx.globals.abs_min_size),
            max_size: or_global(self.settings.max_size, ctx.globals.abs_max_size),
            min_aspect: or_global(self.settings.min_aspect, ctx.globals.abs_min_aspect),
            max_aspect: or_global(self.settings.max_aspect, ctx.globals.abs_max_aspect),
        };
        if ctx.scene != Scene::Editor || self.settings.tech_group.is_empty() {
            return bounds;
        }
        match ctx.limits.get(&self.settings.tech_group) {
            Some(limit) => bounds.tighten_keeping(
                limit,
                (current.size.min(orig.size), current.size.max(orig.size)),
                (
                    current.aspect.min(orig.aspect),
                    current.aspect.max(orig.aspect),
                ),
            ),
            None => bounds,
        }
    }

    /// Runs a rescale pass for an externally signalled parameter change.
    pub fn on_parameter_changed(
        &mut self,
        part: &mut Part,
        scheduler: &mut TickScheduler,
    ) -> Result<RescaleReport> {
        self.apply_change(part, scheduler)
    }

    /// Per-frame hook. Runs deferred updater work, then in the editor
    /// rescales if the parameters or the model scale changed since the last
    /// pass. Returns the report of the pass, if one ran.
    pub fn update(
        &mut self,
        part: &mut Part,
        scheduler: &mut TickScheduler,
    ) -> Result<Option<RescaleReport>> {
        let state = self.state.ok_or(ResizeError::NotInitialized)?;
        self.pipeline.on_frame(part);
        if self.scene != Scene::Editor {
            return Ok(None);
        }

        let requested = part.dimensions.unwrap_or(state.current);
        let geometry_edited = !part.model_scale.abs_diff_eq(self.applied_local_scale, EPS);
        let parameters_changed = unequal(requested.size, state.current.size)
            || unequal(requested.aspect, state.current.aspect);
        if !(geometry_edited || parameters_changed) {
            return Ok(None);
        }
        if geometry_edited {
            tracing::debug!("Model of {} was scaled externally", part.name);
        }
        self.apply_change(part, scheduler).map(Some)
    }

    fn apply_change(
        &mut self,
        part: &mut Part,
        scheduler: &mut TickScheduler,
    ) -> Result<RescaleReport> {
        let report = self.rescale(part, false, scheduler)?;
        // Joints computed against the old geometry are no longer valid.
        let broken = part.break_compound_links();
        if broken > 0 {
            tracing::debug!("Broke {} compound links on {}", broken, part.name);
        }
        Ok(report)
    }

    fn rescale(
        &mut self,
        part: &mut Part,
        first: bool,
        scheduler: &mut TickScheduler,
    ) -> Result<RescaleReport> {
        let _span =
            tracing::debug_span!("rescale", part = %part.name, id = %part.id, first).entered();
        let state = self.state.ok_or(ResizeError::NotInitialized)?;
        let requested = part.dimensions.unwrap_or(state.current);
        let dims = self.bounds.clamp(requested);
        if !valid(dims) {
            tracing::warn!(
                "Rescale of {} aborted: size {} aspect {}",
                part.name,
                dims.size,
                dims.aspect
            );
            return Err(ResizeError::InvalidDimensions {
                size: dims.size,
                aspect: dims.aspect,
            });
        }
        self.phase = ResizerPhase::Rescaling;
        part.dimensions = Some(dims);

        let scale = ScaleFactors::new(dims, state.current, state.orig, first);
        part.model_scale = scale.scale_vector(self.orig_local_scale);
        let mass = specific_curve(self.settings.specific_mass, &scale);
        let cost = specific_curve(self.settings.specific_cost, &scale);
        part.mass = mass;
        part.cost = cost;

        let report = self.pipeline.on_rescale(part, &scale);

        self.state = Some(RescaleState {
            orig: state.orig,
            previous: state.current,
            current: dims,
        });
        self.applied_local_scale = part.model_scale;
        self.mass = mass;
        self.cost = cost;
        self.phase = ResizerPhase::Ready;
        scheduler.schedule(part.id, DeferredAction::RefreshDragCube, 1);
        scheduler.schedule(part.id, DeferredAction::RefreshMassDisplay, 1);

        tracing::debug!(
            "Rescaled {}: size {} aspect {}, mass {:.4}, cost {:.2}",
            part.name,
            dims.size,
            dims.aspect,
            mass,
            cost
        );
        Ok(report)
    }

    /// Cancels deferred work for a part that is being destroyed.
    pub fn on_destroy(&self, part: PartId, scheduler: &mut TickScheduler) -> usize {
        scheduler.cancel_for(part)
    }

    pub fn persisted(&self) -> Option<PersistedState> {
        self.state.map(|state| PersistedState {
            size: state.current.size,
            aspect: state.current.aspect,
            orig_size: state.orig.size,
            orig_aspect: state.orig.aspect,
            orig_local_scale: self.orig_local_scale,
        })
    }

    pub fn current_mass(&self) -> f32 {
        self.mass
    }

    pub fn current_cost(&self) -> f32 {
        self.cost
    }

    /// Mass modifier relative to the part's default mass.
    pub fn mass_delta(&self, default_mass: f32) -> f32 {
        self.mass - default_mass
    }

    pub fn cost_delta(&self, default_cost: f32) -> f32 {
        self.cost - default_cost
    }

    /// `(min_size, max_size, min_aspect, max_aspect)`
    pub fn effective_bounds(&self) -> (f32, f32, f32, f32) {
        self.bounds.as_tuple()
    }

    pub fn size_slider(&self) -> SliderSpec {
        SliderSpec {
            visible: !self.settings.aspect_only && self.bounds.min_size != self.bounds.max_size,
            min: self.bounds.min_size,
            max: self.bounds.max_size,
            step_large: self.settings.size_step_large,
            step_small: self.settings.size_step_small,
        }
    }

    pub fn aspect_slider(&self) -> SliderSpec {
        SliderSpec {
            visible: !self.settings.size_only
                && self.bounds.min_aspect != self.bounds.max_aspect,
            min: self.bounds.min_aspect,
            max: self.bounds.max_aspect,
            step_large: self.settings.aspect_step_large,
            step_small: self.settings.aspect_step_small,
        }
    }

    pub fn state(&self) -> Option<RescaleState> {
        self.state
    }

    pub fn phase(&self) -> ResizerPhase {
        self.phase
    }

    pub fn settings(&self) -> &ResizerSettings {
        &self.settings
    }

    pub fn pipeline(&self) -> &UpdaterPipeline {
        &self.pipeline
    }
}

fn valid(dims: Dimensions) -> bool {
    dims.size.is_finite() && dims.size > 0.0 && dims.aspect.is_finite() && dims.aspect > 0.0
}
