pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::app::updaters::register_builtin;
pub use crate::config::ResizerConfig;
pub use crate::core::limits::{AbsoluteLimits, EffectiveBounds, LimitAggregator, LimitBound, LimitTable};
pub use crate::core::pipeline::{RescaleReport, UpdaterPipeline};
pub use crate::core::registry::UpdaterRegistry;
pub use crate::core::resizer::{PartResizer, ResizeContext, ResizerSettings, Scene};
pub use crate::core::scale::ScaleFactors;
pub use crate::core::scheduler::TickScheduler;
pub use crate::utils::error::{ResizeError, Result};
