//! Size and aspect limits contributed by the tech tree.
//!
//! Every unlocked part that carries tech resize info contributes a candidate
//! bound to its tech group. Minimum channels keep the smallest candidate and
//! maximum channels the largest, so the aggregate of a group does not depend
//! on the order in which sources are folded in.

use crate::domain::model::Dimensions;
use crate::domain::ports::TechProgress;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Global fallback bounds, always available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbsoluteLimits {
    pub abs_min_size: f32,
    pub abs_max_size: f32,
    pub abs_min_aspect: f32,
    pub abs_max_aspect: f32,
}

impl Default for AbsoluteLimits {
    fn default() -> Self {
        Self {
            abs_min_size: 0.5,
            abs_max_size: 10.0,
            abs_min_aspect: 0.5,
            abs_max_aspect: 10.0,
        }
    }
}

/// Aggregated bound of one tech group. `None` means unset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LimitBound {
    pub min_size: Option<f32>,
    pub max_size: Option<f32>,
    pub min_aspect: Option<f32>,
    pub max_aspect: Option<f32>,
}

impl LimitBound {
    pub fn is_unset(&self) -> bool {
        self.min_size.is_none()
            && self.max_size.is_none()
            && self.min_aspect.is_none()
            && self.max_aspect.is_none()
    }

    /// Folds raw candidates in; negative or non-finite values are unset.
    pub fn fold(&mut self, min_size: f32, max_size: f32, min_aspect: f32, max_aspect: f32) {
        self.min_size = keep_min(self.min_size, candidate(min_size));
        self.max_size = keep_max(self.max_size, candidate(max_size));
        self.min_aspect = keep_min(self.min_aspect, candidate(min_aspect));
        self.max_aspect = keep_max(self.max_aspect, candidate(max_aspect));
    }

    /// Combines two partial aggregates.
    pub fn merge(&self, other: &LimitBound) -> LimitBound {
        LimitBound {
            min_size: keep_min(self.min_size, other.min_size),
            max_size: keep_max(self.max_size, other.max_size),
            min_aspect: keep_min(self.min_aspect, other.min_aspect),
            max_aspect: keep_max(self.max_aspect, other.max_aspect),
        }
    }
}

fn candidate(value: f32) -> Option<f32> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

fn keep_min(current: Option<f32>, candidate: Option<f32>) -> Option<f32> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn keep_max(current: Option<f32>, candidate: Option<f32>) -> Option<f32> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Resize info a part contributes to its tech group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechSource {
    pub part: String,
    #[serde(default)]
    pub tech_group: String,
    #[serde(default = "unset")]
    pub min_size: f32,
    #[serde(default = "unset")]
    pub max_size: f32,
    #[serde(default = "unset")]
    pub min_aspect: f32,
    #[serde(default = "unset")]
    pub max_aspect: f32,
}

fn unset() -> f32 {
    -1.0
}

/// Streaming fold of candidates into per-group bounds.
#[derive(Debug, Default)]
pub struct LimitAggregator {
    groups: HashMap<String, LimitBound>,
}

impl LimitAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(
        &mut self,
        group: &str,
        min_size: f32,
        max_size: f32,
        min_aspect: f32,
        max_aspect: f32,
    ) -> LimitBound {
        let bound = self.groups.entry(group.to_string()).or_default();
        bound.fold(min_size, max_size, min_aspect, max_aspect);
        *bound
    }

    pub fn merge_source(&mut self, source: &TechSource) -> LimitBound {
        self.merge(
            &source.tech_group,
            source.min_size,
            source.max_size,
            source.min_aspect,
            source.max_aspect,
        )
    }

    pub fn finish(self) -> LimitTable {
        LimitTable {
            groups: self.groups,
        }
    }
}

/// Effective bounds per tech group for one progression snapshot.
/// Rebuilt wholesale whenever the unlocked set changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LimitTable {
    groups: HashMap<String, LimitBound>,
}

impl LimitTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Aggregates the sources whose part is unlocked. Every source of a part
    /// is folded in; sources without a group are skipped.
    pub fn build<'a, I, P>(sources: I, progress: &P) -> Self
    where
        I: IntoIterator<Item = &'a TechSource>,
        P: TechProgress + ?Sized,
    {
        let mut aggregator = LimitAggregator::new();
        for source in sources {
            if source.tech_group.trim().is_empty() {
                tracing::info!(
                    "Tech resize info of {} does not provide a tech group. Ignoring it.",
                    source.part
                );
                continue;
            }
            if !progress.is_unlocked(&source.part) {
                continue;
            }
            aggregator.merge_source(source);
        }
        let table = aggregator.finish();
        tracing::debug!("Built tech limits for {} groups", table.groups.len());
        table
    }

    pub fn get(&self, group: &str) -> Option<&LimitBound> {
        self.groups.get(group)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &LimitBound)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Global bounds narrowed by the tier's bound, if the tier is known.
    pub fn effective_bounds(&self, tier: &str, globals: &AbsoluteLimits) -> EffectiveBounds {
        let bounds = EffectiveBounds::from(globals);
        match self.get(tier) {
            Some(bound) => bounds.tighten(bound),
            None => bounds,
        }
    }
}

/// Resolved slider bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveBounds {
    pub min_size: f32,
    pub max_size: f32,
    pub min_aspect: f32,
    pub max_aspect: f32,
}

impl From<&AbsoluteLimits> for EffectiveBounds {
    fn from(globals: &AbsoluteLimits) -> Self {
        Self {
            min_size: globals.abs_min_size,
            max_size: globals.abs_max_size,
            min_aspect: globals.abs_min_aspect,
            max_aspect: globals.abs_max_aspect,
        }
    }
}

impl EffectiveBounds {
    pub fn tighten(self, bound: &LimitBound) -> Self {
        let open = (f32::INFINITY, f32::NEG_INFINITY);
        self.tighten_keeping(bound, open, open)
    }

    /// Narrows the bounds by a tech bound without excluding the given
    /// `(lowest, highest)` spans of size and aspect.
    pub fn tighten_keeping(
        self,
        bound: &LimitBound,
        size_span: (f32, f32),
        aspect_span: (f32, f32),
    ) -> Self {
        Self {
            min_size: tighten_min(self.min_size, bound.min_size, size_span.0),
            max_size: tighten_max(self.max_size, bound.max_size, size_span.1),
            min_aspect: tighten_min(self.min_aspect, bound.min_aspect, aspect_span.0),
            max_aspect: tighten_max(self.max_aspect, bound.max_aspect, aspect_span.1),
        }
    }

    pub fn clamp(&self, dims: Dimensions) -> Dimensions {
        Dimensions::new(
            clamp_between(dims.size, self.min_size, self.max_size),
            clamp_between(dims.aspect, self.min_aspect, self.max_aspect),
        )
    }

    pub fn as_tuple(&self) -> (f32, f32, f32, f32) {
        (self.min_size, self.max_size, self.min_aspect, self.max_aspect)
    }
}

fn tighten_min(limit: f32, tech: Option<f32>, keep: f32) -> f32 {
    match tech {
        Some(tech) => {
            let val = tech.min(keep);
            if limit < 0.0 || limit < val {
                val
            } else {
                limit
            }
        }
        None => limit,
    }
}

fn tighten_max(limit: f32, tech: Option<f32>, keep: f32) -> f32 {
    match tech {
        Some(tech) => {
            let val = tech.max(keep);
            if limit < 0.0 || limit > val {
                val
            } else {
                limit
            }
        }
        None => limit,
    }
}

// Inverted bounds leave the value untouched rather than panicking like f32::clamp.
fn clamp_between(value: f32, min: f32, max: f32) -> f32 {
    if min > max {
        return value;
    }
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
