use crate::core::scale::ScaleFactors;
use crate::core::updater::PartUpdater;
use crate::domain::model::Part;
use crate::utils::error::Result;

/// Invalidates cached drag data right away. The full regeneration is
/// deferred by the resizer until the new geometry has been observed.
#[derive(Debug, Default)]
pub struct DragCubeUpdater;

impl PartUpdater for DragCubeUpdater {
    fn on_rescale(&mut self, part: &mut Part, _scale: &ScaleFactors) -> Result<()> {
        part.drag_cube.force_update();
        Ok(())
    }
}
