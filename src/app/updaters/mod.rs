//! Built-in updaters and their registration.

pub mod drag;
pub mod emitters;
pub mod modules;
pub mod nodes;
pub mod props;
pub mod resources;

pub use drag::DragCubeUpdater;
pub use emitters::EmitterUpdater;
pub use modules::{
    DecoupleUpdater, DockingNodeUpdater, EngineUpdater, GeneratorUpdater, JettisonUpdater,
    RcsUpdater, ReactionWheelUpdater, ResourceIntakeUpdater, SolarPanelUpdater,
};
pub use nodes::NodesUpdater;
pub use props::PropsUpdater;
pub use resources::ResourcesUpdater;

use crate::core::module_updater::ModuleRescaler;
use crate::core::registry::UpdaterRegistry;
use crate::core::updater::PartUpdater;
use crate::domain::model::Part;

/// Registers every built-in kind. Calling it again is a no-op.
pub fn register_builtin(registry: &UpdaterRegistry) {
    registry.register_default::<NodesUpdater>("nodes");
    registry.register_default::<PropsUpdater>("props");
    registry.register_default::<DragCubeUpdater>("drag_cube");
    registry.register("emitters", |part: &Part| {
        part.has_emitters()
            .then(|| Box::new(EmitterUpdater::default()) as Box<dyn PartUpdater>)
    });
    registry.register_default::<ResourcesUpdater>("resources");

    registry.register_default::<RcsUpdater>(modules::RcsRescaler::NAME);
    registry.register_default::<DockingNodeUpdater>(modules::DockingNodeRescaler::NAME);
    registry.register_default::<ReactionWheelUpdater>(modules::ReactionWheelRescaler::NAME);
    registry.register_default::<GeneratorUpdater>(modules::GeneratorRescaler::NAME);
    registry.register_default::<SolarPanelUpdater>(modules::SolarPanelRescaler::NAME);
    registry.register_default::<DecoupleUpdater>(modules::DecoupleRescaler::NAME);
    registry.register_default::<EngineUpdater>(modules::EngineRescaler::NAME);
    registry.register_default::<ResourceIntakeUpdater>(modules::ResourceIntakeRescaler::NAME);
    registry.register_default::<JettisonUpdater>(modules::JettisonRescaler::NAME);
    tracing::debug!("Registered {} built-in updaters", registry.len());
}
