//! Rescalers for individual module types. Each one recomputes the live module
//! from its pristine counterpart, never from the previously scaled value.

use crate::core::module_updater::{ModuleRescaler, ModuleUpdater, OrigData, PairContext};
use crate::core::scale::ScaleFactors;
use crate::domain::modules::{
    DecoupleModule, DockingNodeModule, EngineModule, GeneratorModule, JettisonModule, RcsModule,
    ReactionWheelModule, ResourceIntakeModule, ResourceRate, SolarPanelModule,
};
use crate::utils::error::{ResizeError, Result};
use glam::Vec3;

pub type RcsUpdater = ModuleUpdater<RcsRescaler>;
pub type DockingNodeUpdater = ModuleUpdater<DockingNodeRescaler>;
pub type ReactionWheelUpdater = ModuleUpdater<ReactionWheelRescaler>;
pub type GeneratorUpdater = ModuleUpdater<GeneratorRescaler>;
pub type SolarPanelUpdater = ModuleUpdater<SolarPanelRescaler>;
pub type DecoupleUpdater = ModuleUpdater<DecoupleRescaler>;
pub type EngineUpdater = ModuleUpdater<EngineRescaler>;
pub type ResourceIntakeUpdater = ModuleUpdater<ResourceIntakeRescaler>;
pub type JettisonUpdater = ModuleUpdater<JettisonRescaler>;

fn pristine_rate<'a>(base: &'a [ResourceRate], name: &str) -> Option<&'a ResourceRate> {
    base.iter().find(|r| r.name == name)
}

/// Every live rate needs a pristine rate of the same resource.
fn check_rates(updater: &str, base: &[ResourceRate], live: &[ResourceRate]) -> Result<()> {
    match live.iter().find(|rate| pristine_rate(base, &rate.name).is_none()) {
        Some(rate) => Err(ResizeError::Misconfigured {
            updater: updater.to_string(),
            reason: format!("no pristine rate for resource {}", rate.name),
        }),
        None => Ok(()),
    }
}

/// Rates of `live` set to the pristine rate of the same resource times `factor`.
fn scale_rates(base: &[ResourceRate], live: &mut [ResourceRate], factor: f32) {
    for rate in live.iter_mut() {
        if let Some(orig) = pristine_rate(base, &rate.name) {
            rate.rate = orig.rate * f64::from(factor);
        }
    }
}

#[derive(Debug, Default)]
pub struct RcsRescaler;

impl ModuleRescaler for RcsRescaler {
    type Module = RcsModule;
    const NAME: &'static str = "rcs";

    fn rescale(
        &self,
        ctx: PairContext<'_, RcsModule>,
        live: &mut RcsModule,
        scale: &ScaleFactors,
    ) -> Result<()> {
        live.thruster_power = ctx.base.thruster_power * scale.absolute_quad();
        Ok(())
    }
}

/// Keeps a `sizeN` docking node type in step with its attach node's size.
#[derive(Debug, Default)]
pub struct DockingNodeRescaler;

impl ModuleRescaler for DockingNodeRescaler {
    type Module = DockingNodeModule;
    const NAME: &'static str = "docking_node";

    fn rescale(
        &self,
        ctx: PairContext<'_, DockingNodeModule>,
        live: &mut DockingNodeModule,
        _scale: &ScaleFactors,
    ) -> Result<()> {
        let Some(node) = ctx
            .attach_nodes
            .iter()
            .find(|n| n.id == live.reference_attach_node)
        else {
            return Ok(());
        };
        if live.node_type.starts_with("size") {
            live.node_type = format!("size{}", node.size);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ReactionWheelRescaler;

impl ModuleRescaler for ReactionWheelRescaler {
    type Module = ReactionWheelModule;
    const NAME: &'static str = "reaction_wheel";

    fn check(&self, base: &ReactionWheelModule, live: &ReactionWheelModule) -> Result<()> {
        check_rates(Self::NAME, &base.input_resources, &live.input_resources)
    }

    fn rescale(
        &self,
        ctx: PairContext<'_, ReactionWheelModule>,
        live: &mut ReactionWheelModule,
        scale: &ScaleFactors,
    ) -> Result<()> {
        let factor = scale.absolute_quad() * scale.absolute_aspect();
        live.pitch_torque = ctx.base.pitch_torque * factor;
        live.yaw_torque = ctx.base.yaw_torque * factor;
        live.roll_torque = ctx.base.roll_torque * factor;
        scale_rates(&ctx.base.input_resources, &mut live.input_resources, factor);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct GeneratorRescaler;

impl ModuleRescaler for GeneratorRescaler {
    type Module = GeneratorModule;
    const NAME: &'static str = "generator";

    fn check(&self, base: &GeneratorModule, live: &GeneratorModule) -> Result<()> {
        check_rates(Self::NAME, &base.inputs, &live.inputs)?;
        check_rates(Self::NAME, &base.outputs, &live.outputs)
    }

    fn rescale(
        &self,
        ctx: PairContext<'_, GeneratorModule>,
        live: &mut GeneratorModule,
        scale: &ScaleFactors,
    ) -> Result<()> {
        let factor = scale.absolute_cube() * scale.absolute_aspect();
        scale_rates(&ctx.base.inputs, &mut live.inputs, factor);
        scale_rates(&ctx.base.outputs, &mut live.outputs, factor);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SolarPanelRescaler;

impl ModuleRescaler for SolarPanelRescaler {
    type Module = SolarPanelModule;
    const NAME: &'static str = "solar_panel";

    fn rescale(
        &self,
        ctx: PairContext<'_, SolarPanelModule>,
        live: &mut SolarPanelModule,
        scale: &ScaleFactors,
    ) -> Result<()> {
        let factor = scale.absolute_quad() * scale.absolute_aspect();
        live.charge_rate = ctx.base.charge_rate * factor;
        live.flow_rate = ctx.base.flow_rate * factor;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct DecoupleRescaler;

impl ModuleRescaler for DecoupleRescaler {
    type Module = DecoupleModule;
    const NAME: &'static str = "decouple";

    fn rescale(
        &self,
        ctx: PairContext<'_, DecoupleModule>,
        live: &mut DecoupleModule,
        scale: &ScaleFactors,
    ) -> Result<()> {
        live.ejection_force = ctx.base.ejection_force * scale.absolute_cube();
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct EngineRescaler;

impl ModuleRescaler for EngineRescaler {
    type Module = EngineModule;
    const NAME: &'static str = "engine";

    fn rescale(
        &self,
        ctx: PairContext<'_, EngineModule>,
        live: &mut EngineModule,
        scale: &ScaleFactors,
    ) -> Result<()> {
        live.min_thrust = ctx.base.min_thrust * scale.absolute_quad();
        live.max_thrust = ctx.base.max_thrust * scale.absolute_quad();
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ResourceIntakeRescaler;

impl ModuleRescaler for ResourceIntakeRescaler {
    type Module = ResourceIntakeModule;
    const NAME: &'static str = "resource_intake";

    fn rescale(
        &self,
        ctx: PairContext<'_, ResourceIntakeModule>,
        live: &mut ResourceIntakeModule,
        scale: &ScaleFactors,
    ) -> Result<()> {
        live.area = ctx.base.area * f64::from(scale.absolute_quad());
        Ok(())
    }
}

const LOCAL_SCALE: &str = "local_scale";

#[derive(Debug, Default)]
pub struct JettisonRescaler;

impl ModuleRescaler for JettisonRescaler {
    type Module = JettisonModule;
    const NAME: &'static str = "jettison";

    fn save_pair(&self, live: &JettisonModule, orig_data: &mut OrigData) {
        let Some(transform) = &live.jettison_transform else {
            return;
        };
        match serde_json::to_value(transform.local_scale) {
            Ok(value) => {
                orig_data.insert(LOCAL_SCALE.to_string(), value);
            }
            Err(e) => tracing::warn!("Cannot snapshot jettison transform scale: {}", e),
        }
    }

    fn rescale(
        &self,
        ctx: PairContext<'_, JettisonModule>,
        live: &mut JettisonModule,
        scale: &ScaleFactors,
    ) -> Result<()> {
        let factor = scale.absolute_cube() * scale.absolute_aspect();
        live.jettisoned_object_mass = ctx.base.jettisoned_object_mass * factor;
        live.jettison_force = ctx.base.jettison_force * factor;

        // Only a transform owned by another part's hierarchy is resized here;
        // our own model is already covered by the part's model scale.
        let Some(transform) = live.jettison_transform.as_mut() else {
            return Ok(());
        };
        if !transform.parented_to_other_part {
            return Ok(());
        }
        let orig_scale = ctx
            .orig_data
            .get(LOCAL_SCALE)
            .and_then(|v| serde_json::from_value::<Vec3>(v.clone()).ok());
        if let Some(orig_scale) = orig_scale {
            transform.local_scale = scale.scale_vector(orig_scale);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::updater::PartUpdater;
    use crate::domain::model::{AttachNode, Dimensions, Part, PartId};
    use crate::domain::modules::JettisonTransform;

    fn scale(size: f32, aspect: f32) -> ScaleFactors {
        let one = Dimensions::new(1.0, 1.0);
        ScaleFactors::new(Dimensions::new(size, aspect), one, one, false)
    }

    fn rate(name: &str, rate: f64) -> ResourceRate {
        ResourceRate {
            name: name.to_string(),
            rate,
        }
    }

    fn rescaled<U: PartUpdater + Default>(proto: &Part, s: &ScaleFactors) -> Part {
        let mut part = proto.instantiate(PartId(1));
        let mut updater = U::default();
        assert!(updater.init(&part, proto));
        updater.save_defaults(&part, proto);
        updater.on_rescale(&mut part, s).unwrap();
        part
    }

    #[test]
    fn test_engine_and_rcs_scale_with_area() {
        let proto = Part::new(PartId(0), "engine")
            .with_module(EngineModule {
                min_thrust: 10.0,
                max_thrust: 100.0,
            })
            .with_module(RcsModule { thruster_power: 1.0 });

        let part = rescaled::<EngineUpdater>(&proto, &scale(2.0, 3.0));
        let engine = part.modules_of::<EngineModule>().next().cloned().unwrap();
        assert_eq!(engine.min_thrust, 40.0);
        assert_eq!(engine.max_thrust, 400.0);

        let part = rescaled::<RcsUpdater>(&proto, &scale(2.0, 3.0));
        assert_eq!(part.modules_of::<RcsModule>().next().map(|r| r.thruster_power), Some(4.0));
    }

    #[test]
    fn test_docking_node_type_follows_node_size() {
        let mut proto = Part::new(PartId(0), "port").with_module(DockingNodeModule {
            reference_attach_node: "top".to_string(),
            node_type: "size1".to_string(),
        });
        proto.attach_nodes.push(AttachNode::new("top", Vec3::ZERO, 1));
        let mut part = proto.instantiate(PartId(1));
        if let Some(node) = part.attach_nodes.first_mut() {
            node.size = 3;
        }

        let mut updater = DockingNodeUpdater::default();
        assert!(updater.init(&part, &proto));
        updater.on_rescale(&mut part, &scale(3.0, 1.0)).unwrap();
        assert_eq!(
            part.modules_of::<DockingNodeModule>().next().map(|d| d.node_type.as_str()),
            Some("size3")
        );
    }

    #[test]
    fn test_docking_node_keeps_custom_type() {
        let mut proto = Part::new(PartId(0), "port").with_module(DockingNodeModule {
            reference_attach_node: "top".to_string(),
            node_type: "clamp".to_string(),
        });
        proto.attach_nodes.push(AttachNode::new("top", Vec3::ZERO, 2));
        let part = rescaled::<DockingNodeUpdater>(&proto, &scale(3.0, 1.0));
        assert_eq!(
            part.modules_of::<DockingNodeModule>().next().map(|d| d.node_type.as_str()),
            Some("clamp")
        );
    }

    #[test]
    fn test_reaction_wheel_rates() {
        let proto = Part::new(PartId(0), "wheel").with_module(ReactionWheelModule {
            pitch_torque: 5.0,
            yaw_torque: 5.0,
            roll_torque: 2.0,
            input_resources: vec![rate("ElectricCharge", 0.5)],
        });
        let part = rescaled::<ReactionWheelUpdater>(&proto, &scale(2.0, 0.5));
        let wheel = part.modules_of::<ReactionWheelModule>().next().cloned().unwrap();
        assert_eq!(wheel.pitch_torque, 10.0);
        assert_eq!(wheel.roll_torque, 4.0);
        assert_eq!(wheel.input_resources[0].rate, 1.0);
    }

    #[test]
    fn test_generator_without_pristine_rate_is_misconfigured() {
        let proto = Part::new(PartId(0), "rtg").with_module(GeneratorModule {
            inputs: Vec::new(),
            outputs: vec![rate("ElectricCharge", 0.75)],
        });
        let mut part = proto.instantiate(PartId(1));
        let mut updater = GeneratorUpdater::default();
        assert!(updater.init(&part, &proto));

        updater.on_rescale(&mut part, &scale(2.0, 1.0)).unwrap();
        assert_eq!(
            part.modules_of::<GeneratorModule>().next().map(|g| g.outputs[0].rate),
            Some(6.0)
        );

        if let Some(generator) = part.module_of_mut::<GeneratorModule>(0) {
            generator.outputs.push(rate("Ore", 1.0));
        }
        let err = updater.on_rescale(&mut part, &scale(2.0, 1.0)).unwrap_err();
        assert!(matches!(err, ResizeError::Misconfigured { .. }));
    }

    #[test]
    fn test_unmatched_rate_leaves_generator_untouched() {
        let proto = Part::new(PartId(0), "rtg")
            .with_module(GeneratorModule {
                inputs: vec![rate("Ore", 0.5)],
                outputs: vec![rate("ElectricCharge", 1.0)],
            })
            .with_module(GeneratorModule {
                inputs: Vec::new(),
                outputs: vec![rate("ElectricCharge", 1.0)],
            });
        let mut part = proto.instantiate(PartId(1));
        let mut updater = GeneratorUpdater::default();
        assert!(updater.init(&part, &proto));

        if let Some(generator) = part.module_of_mut::<GeneratorModule>(1) {
            generator.outputs.push(rate("LiquidFuel", 1.0));
        }
        let err = updater.on_rescale(&mut part, &scale(2.0, 1.0)).unwrap_err();
        assert!(matches!(err, ResizeError::Misconfigured { .. }));

        let generators: Vec<GeneratorModule> =
            part.modules_of::<GeneratorModule>().cloned().collect();
        assert_eq!(generators[0].inputs[0].rate, 0.5);
        assert_eq!(generators[0].outputs[0].rate, 1.0);
        assert_eq!(generators[1].outputs[0].rate, 1.0);
        assert_eq!(generators[1].outputs[1].rate, 1.0);
    }

    #[test]
    fn test_solar_decoupler_intake() {
        let proto = Part::new(PartId(0), "combo")
            .with_module(SolarPanelModule {
                charge_rate: 1.0,
                flow_rate: 2.0,
            })
            .with_module(DecoupleModule {
                ejection_force: 10.0,
            })
            .with_module(ResourceIntakeModule { area: 0.5 });
        let s = scale(2.0, 1.5);

        let part = rescaled::<SolarPanelUpdater>(&proto, &s);
        let panel = part.modules_of::<SolarPanelModule>().next().cloned().unwrap();
        assert_eq!(panel.charge_rate, 6.0);
        assert_eq!(panel.flow_rate, 12.0);

        let part = rescaled::<DecoupleUpdater>(&proto, &s);
        assert_eq!(
            part.modules_of::<DecoupleModule>().next().map(|d| d.ejection_force),
            Some(80.0)
        );

        let part = rescaled::<ResourceIntakeUpdater>(&proto, &s);
        assert_eq!(part.modules_of::<ResourceIntakeModule>().next().map(|i| i.area), Some(2.0));
    }

    fn fairing(parented: bool) -> Part {
        Part::new(PartId(0), "fairing").with_module(JettisonModule {
            jettisoned_object_mass: 0.1,
            jettison_force: 5.0,
            jettison_transform: Some(JettisonTransform {
                local_scale: Vec3::ONE,
                parented_to_other_part: parented,
            }),
        })
    }

    #[test]
    fn test_jettison_scales_foreign_transform() {
        let part = rescaled::<JettisonUpdater>(&fairing(true), &scale(2.0, 1.0));
        let jettison = part.modules_of::<JettisonModule>().next().cloned().unwrap();
        assert_eq!(jettison.jettison_force, 40.0);
        assert_eq!(
            jettison.jettison_transform.map(|t| t.local_scale),
            Some(Vec3::new(2.0, 2.0, 2.0))
        );
    }

    #[test]
    fn test_jettison_leaves_own_transform() {
        let part = rescaled::<JettisonUpdater>(&fairing(false), &scale(2.0, 1.0));
        let jettison = part.modules_of::<JettisonModule>().next().cloned().unwrap();
        assert_eq!(jettison.jettison_transform.map(|t| t.local_scale), Some(Vec3::ONE));
    }
}
