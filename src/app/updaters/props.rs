use crate::core::scale::ScaleFactors;
use crate::core::updater::PartUpdater;
use crate::domain::model::Part;
use crate::utils::error::Result;

/// Floor for breaking force and torque when the prototype leaves them unset.
pub const MIN_BREAKING: f32 = 22.0;

#[derive(Debug, Clone, Copy, Default)]
struct StructuralProps {
    breaking_force: f32,
    breaking_torque: f32,
    explosion_potential: f32,
}

/// Part-level structural properties.
#[derive(Debug, Default)]
pub struct PropsUpdater {
    base: StructuralProps,
}

impl PartUpdater for PropsUpdater {
    fn save_defaults(&mut self, _part: &Part, prototype: &Part) {
        self.base = StructuralProps {
            breaking_force: prototype.breaking_force,
            breaking_torque: prototype.breaking_torque,
            explosion_potential: prototype.explosion_potential,
        };
    }

    fn on_rescale(&mut self, part: &mut Part, scale: &ScaleFactors) -> Result<()> {
        let quad = scale.absolute_quad();
        part.breaking_force = MIN_BREAKING.max(self.base.breaking_force * quad);
        part.breaking_torque = MIN_BREAKING.max(self.base.breaking_torque * quad);
        part.explosion_potential =
            self.base.explosion_potential * scale.absolute_cube() * scale.absolute_aspect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Dimensions, PartId};

    #[test]
    fn test_props_scale_from_prototype() {
        let mut proto = Part::new(PartId(0), "tank");
        proto.breaking_force = 50.0;
        proto.explosion_potential = 1.0;
        let mut part = proto.instantiate(PartId(1));

        let mut updater = PropsUpdater::default();
        updater.save_defaults(&part, &proto);
        let one = Dimensions::new(1.0, 1.0);
        let s = ScaleFactors::new(Dimensions::new(2.0, 2.0), one, one, false);
        updater.on_rescale(&mut part, &s).unwrap();
        updater.on_rescale(&mut part, &s).unwrap();

        assert_eq!(part.breaking_force, 200.0);
        assert_eq!(part.breaking_torque, MIN_BREAKING);
        assert_eq!(part.explosion_potential, 16.0);
    }
}
