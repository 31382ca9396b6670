//! Modules a part can carry. Only the fields that depend on the part's
//! geometry are modelled; everything else belongs to the host.

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Rcs,
    DockingNode,
    ReactionWheel,
    Generator,
    SolarPanel,
    Decouple,
    Engine,
    ResourceIntake,
    Jettison,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRate {
    pub name: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RcsModule {
    pub thruster_power: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DockingNodeModule {
    pub reference_attach_node: String,
    pub node_type: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReactionWheelModule {
    pub pitch_torque: f32,
    pub yaw_torque: f32,
    pub roll_torque: f32,
    #[serde(default)]
    pub input_resources: Vec<ResourceRate>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneratorModule {
    #[serde(default)]
    pub inputs: Vec<ResourceRate>,
    #[serde(default)]
    pub outputs: Vec<ResourceRate>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SolarPanelModule {
    pub charge_rate: f32,
    pub flow_rate: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DecoupleModule {
    pub ejection_force: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineModule {
    pub min_thrust: f32,
    pub max_thrust: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceIntakeModule {
    pub area: f64,
}

/// Transform of a fairing or shroud that is dropped on jettison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JettisonTransform {
    pub local_scale: Vec3,
    /// True when the transform hangs under another part's hierarchy.
    #[serde(default)]
    pub parented_to_other_part: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JettisonModule {
    pub jettisoned_object_mass: f32,
    pub jettison_force: f32,
    #[serde(default)]
    pub jettison_transform: Option<JettisonTransform>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenericModule {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartModule {
    Rcs(RcsModule),
    DockingNode(DockingNodeModule),
    ReactionWheel(ReactionWheelModule),
    Generator(GeneratorModule),
    SolarPanel(SolarPanelModule),
    Decouple(DecoupleModule),
    Engine(EngineModule),
    ResourceIntake(ResourceIntakeModule),
    Jettison(JettisonModule),
    Other(GenericModule),
}

impl PartModule {
    pub fn kind(&self) -> ModuleKind {
        match self {
            PartModule::Rcs(_) => ModuleKind::Rcs,
            PartModule::DockingNode(_) => ModuleKind::DockingNode,
            PartModule::ReactionWheel(_) => ModuleKind::ReactionWheel,
            PartModule::Generator(_) => ModuleKind::Generator,
            PartModule::SolarPanel(_) => ModuleKind::SolarPanel,
            PartModule::Decouple(_) => ModuleKind::Decouple,
            PartModule::Engine(_) => ModuleKind::Engine,
            PartModule::ResourceIntake(_) => ModuleKind::ResourceIntake,
            PartModule::Jettison(_) => ModuleKind::Jettison,
            PartModule::Other(_) => ModuleKind::Other,
        }
    }
}

/// Typed access to one `PartModule` variant.
pub trait ModuleType: Clone + 'static {
    const KIND: ModuleKind;

    fn from_module(module: &PartModule) -> Option<&Self>;
    fn from_module_mut(module: &mut PartModule) -> Option<&mut Self>;
}

macro_rules! module_type {
    ($ty:ident, $variant:ident) => {
        impl ModuleType for $ty {
            const KIND: ModuleKind = ModuleKind::$variant;

            fn from_module(module: &PartModule) -> Option<&Self> {
                match module {
                    PartModule::$variant(m) => Some(m),
                    _ => None,
                }
            }

            fn from_module_mut(module: &mut PartModule) -> Option<&mut Self> {
                match module {
                    PartModule::$variant(m) => Some(m),
                    _ => None,
                }
            }
        }

        impl From<$ty> for PartModule {
            fn from(m: $ty) -> Self {
                PartModule::$variant(m)
            }
        }
    };
}

module_type!(RcsModule, Rcs);
module_type!(DockingNodeModule, DockingNode);
module_type!(ReactionWheelModule, ReactionWheel);
module_type!(GeneratorModule, Generator);
module_type!(SolarPanelModule, SolarPanel);
module_type!(DecoupleModule, Decouple);
module_type!(EngineModule, Engine);
module_type!(ResourceIntakeModule, ResourceIntake);
module_type!(JettisonModule, Jettison);
module_type!(GenericModule, Other);
