use crate::core::scale::ScaleFactors;
use crate::core::updater::PartUpdater;
use crate::domain::model::Part;
use crate::utils::error::Result;

/// Shielding that covers a surface rather than filling a volume.
pub const ABLATIVE_SHIELDING: &str = "AblativeShielding";

#[derive(Debug, Default)]
pub struct ResourcesUpdater;

impl PartUpdater for ResourcesUpdater {
    fn on_rescale(&mut self, part: &mut Part, scale: &ScaleFactors) -> Result<()> {
        // Amounts are persisted, so the load pass has nothing to do.
        if scale.is_first_application {
            return Ok(());
        }
        let volume = f64::from(scale.relative_cube() * scale.relative_aspect());
        let surface = f64::from(scale.relative_quad());
        for resource in &mut part.resources {
            let factor = if resource.name == ABLATIVE_SHIELDING {
                surface
            } else {
                volume
            };
            resource.amount *= factor;
            resource.max_amount *= factor;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Dimensions, PartId, PartResource};

    fn resource(name: &str, amount: f64) -> PartResource {
        PartResource {
            name: name.to_string(),
            amount,
            max_amount: amount,
            density: 0.005,
        }
    }

    fn part() -> Part {
        let mut part = Part::new(PartId(1), "heatshield-tank");
        part.resources.push(resource("LiquidFuel", 100.0));
        part.resources.push(resource(ABLATIVE_SHIELDING, 10.0));
        part
    }

    #[test]
    fn test_volume_and_surface_resources() {
        let mut part = part();
        let s = ScaleFactors::new(
            Dimensions::new(2.0, 1.5),
            Dimensions::new(1.0, 1.0),
            Dimensions::new(1.0, 1.0),
            false,
        );
        ResourcesUpdater.on_rescale(&mut part, &s).unwrap();
        assert_eq!(part.resources[0].amount, 1200.0);
        assert_eq!(part.resources[0].max_amount, 1200.0);
        assert_eq!(part.resources[1].amount, 40.0);
    }

    #[test]
    fn test_skipped_on_first_application() {
        let mut part = part();
        let s = ScaleFactors::new(
            Dimensions::new(2.0, 1.0),
            Dimensions::new(2.0, 1.0),
            Dimensions::new(1.0, 1.0),
            true,
        );
        ResourcesUpdater.on_rescale(&mut part, &s).unwrap();
        assert_eq!(part.resources[0].amount, 100.0);
    }
}
