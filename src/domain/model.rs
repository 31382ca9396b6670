use crate::domain::modules::{ModuleType, PartModule};
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct PartId(pub u64);

impl std::fmt::Display for PartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two live resize parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub size: f32,
    pub aspect: f32,
}

impl Dimensions {
    pub fn new(size: f32, aspect: f32) -> Self {
        Self { size, aspect }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachNode {
    pub id: String,
    pub position: Vec3,
    pub original_position: Vec3,
    #[serde(default)]
    pub size: i32,
    #[serde(default)]
    pub breaking_force: f32,
    #[serde(default)]
    pub breaking_torque: f32,
}

impl AttachNode {
    pub fn new(id: impl Into<String>, position: Vec3, size: i32) -> Self {
        Self {
            id: id.into(),
            position,
            original_position: position,
            size,
            breaking_force: 0.0,
            breaking_torque: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartResource {
    pub name: String,
    pub amount: f64,
    pub max_amount: f64,
    /// Mass per unit.
    #[serde(default)]
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParticleEmitter {
    pub min_size: f32,
    pub max_size: f32,
    pub shape_1d: f32,
    pub shape_2d: [f32; 2],
    pub shape_3d: Vec3,
    pub force: Vec3,
    pub local_velocity: Vec3,
}

/// A child part attached to this part's surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceChild {
    pub id: PartId,
    pub local_position: Vec3,
    /// Offset of the child's surface attach node, rotated into this part's frame.
    pub attach_offset: Vec3,
}

impl SurfaceChild {
    pub fn attached_position(&self) -> Vec3 {
        self.local_position + self.attach_offset
    }
}

/// Cached aerodynamic drag data derived from the part's geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DragCube {
    pub procedural: bool,
    pub revision: u64,
    pub weights_revision: u64,
}

impl DragCube {
    pub fn force_update(&mut self) {
        self.revision += 1;
    }

    /// Full refresh: procedural regeneration plus new drag weights.
    pub fn refresh(&mut self) {
        self.procedural = true;
        self.force_update();
        self.weights_revision = self.revision;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub id: PartId,
    pub name: String,
    /// Declared resize parameters. On a prototype these are the recorded
    /// reference values; on a live part they are the values the host edits.
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub modules: Vec<PartModule>,
    #[serde(default)]
    pub attach_nodes: Vec<AttachNode>,
    #[serde(default)]
    pub srf_attach_node: Option<AttachNode>,
    #[serde(default)]
    pub resources: Vec<PartResource>,
    #[serde(default)]
    pub emitters: Vec<ParticleEmitter>,
    /// Model-driven particle effects that own emitters created at runtime.
    #[serde(default)]
    pub has_particle_effects: bool,
    #[serde(default)]
    pub breaking_force: f32,
    #[serde(default)]
    pub breaking_torque: f32,
    #[serde(default)]
    pub explosion_potential: f32,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default = "unit_scale")]
    pub model_scale: Vec3,
    #[serde(default)]
    pub surface_children: Vec<SurfaceChild>,
    /// Rigid compound links (struts, fuel lines) anchored on this part.
    #[serde(default)]
    pub compound_links: Vec<PartId>,
    #[serde(default)]
    pub drag_cube: DragCube,
    #[serde(default)]
    pub mass: f32,
    #[serde(default)]
    pub cost: f32,
    #[serde(default)]
    pub mass_display: String,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl Part {
    pub fn new(id: PartId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            dimensions: None,
            modules: Vec::new(),
            attach_nodes: Vec::new(),
            srf_attach_node: None,
            resources: Vec::new(),
            emitters: Vec::new(),
            has_particle_effects: false,
            breaking_force: 0.0,
            breaking_torque: 0.0,
            explosion_potential: 0.0,
            position: Vec3::ZERO,
            model_scale: Vec3::ONE,
            surface_children: Vec::new(),
            compound_links: Vec::new(),
            drag_cube: DragCube::default(),
            mass: 0.0,
            cost: 0.0,
            mass_display: String::new(),
        }
    }

    pub fn with_dimensions(mut self, size: f32, aspect: f32) -> Self {
        self.dimensions = Some(Dimensions::new(size, aspect));
        self
    }

    pub fn with_module(mut self, module: impl Into<PartModule>) -> Self {
        self.modules.push(module.into());
        self
    }

    /// Live copy of a prototype under a new identity.
    pub fn instantiate(&self, id: PartId) -> Part {
        let mut part = self.clone();
        part.id = id;
        part
    }

    /// Modules of type `T`, in declaration order.
    pub fn modules_of<T: ModuleType>(&self) -> impl Iterator<Item = &T> + '_ {
        self.modules.iter().filter_map(T::from_module)
    }

    /// The `ordinal`-th module of type `T`.
    pub fn module_of_mut<T: ModuleType>(&mut self, ordinal: usize) -> Option<&mut T> {
        self.modules
            .iter_mut()
            .filter_map(T::from_module_mut)
            .nth(ordinal)
    }

    pub fn find_attach_node(&self, id: &str) -> Option<&AttachNode> {
        self.attach_nodes.iter().find(|n| n.id == id)
    }

    pub fn has_emitters(&self) -> bool {
        !self.emitters.is_empty() || self.has_particle_effects
    }

    /// Dry mass plus the mass of every resource on board.
    pub fn total_mass(&self) -> f64 {
        let resources: f64 = self.resources.iter().map(|r| r.amount * r.density).sum();
        f64::from(self.mass) + resources
    }

    /// Drops every compound link, returning how many were broken.
    pub fn break_compound_links(&mut self) -> usize {
        let broken = self.compound_links.len();
        self.compound_links.clear();
        broken
    }
}
