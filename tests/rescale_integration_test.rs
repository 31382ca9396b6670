use anyhow::Result;
use glam::Vec3;
use part_resizer::core::scheduler::DeferredAction;
use part_resizer::core::updater::PartUpdater;
use part_resizer::domain::model::{AttachNode, Dimensions, Part, PartId, PartResource};
use part_resizer::domain::modules::{DecoupleModule, EngineModule};
use part_resizer::{
    register_builtin, AbsoluteLimits, LimitTable, PartResizer, ResizeContext, ResizeError,
    ResizerConfig, ResizerSettings, ScaleFactors, Scene, TickScheduler, UpdaterRegistry,
};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn booster() -> Part {
    let mut part = Part::new(PartId(0), "booster")
        .with_dimensions(1.0, 1.0)
        .with_module(EngineModule {
            min_thrust: 0.0,
            max_thrust: 100.0,
        })
        .with_module(DecoupleModule {
            ejection_force: 10.0,
        });
    part.attach_nodes
        .push(AttachNode::new("top", Vec3::new(0.0, 1.0, 0.0), 1));
    part.resources.push(PartResource {
        name: "LiquidFuel".to_string(),
        amount: 100.0,
        max_amount: 100.0,
        density: 0.005,
    });
    part.breaking_force = 50.0;
    part
}

#[test]
fn test_full_rescale_pass() -> Result<()> {
    let registry = UpdaterRegistry::with_builtin();
    let globals = AbsoluteLimits::default();
    let limits = LimitTable::empty();
    let ctx = ResizeContext {
        registry: &registry,
        globals: &globals,
        limits: &limits,
        scene: Scene::Editor,
    };
    let mut scheduler = TickScheduler::new();

    let prototype = booster();
    let id = PartId(1);
    let mut part = prototype.instantiate(id);
    let mut resizer = PartResizer::new(ResizerSettings {
        specific_mass: [1.0, 0.0, 0.0, 0.0],
        ..ResizerSettings::default()
    });
    let first = resizer.init(&mut part, &prototype, &ctx, &mut scheduler)?;
    assert!(first.is_clean());
    assert_eq!(part.resources[0].amount, 100.0);

    part.dimensions = Some(Dimensions::new(2.0, 1.0));
    let report = resizer.on_parameter_changed(&mut part, &mut scheduler)?;
    assert!(report.is_clean());
    assert_eq!(
        report.applied,
        vec!["nodes", "props", "drag_cube", "resources", "decouple", "engine"]
    );

    assert_eq!(resizer.current_mass(), 8.0);
    assert_eq!(part.model_scale, Vec3::new(2.0, 2.0, 2.0));
    assert_eq!(part.resources[0].amount, 800.0);
    assert_eq!(part.breaking_force, 200.0);
    assert_eq!(part.attach_nodes[0].size, 2);
    assert_eq!(part.attach_nodes[0].position, Vec3::new(0.0, 2.0, 0.0));
    assert_eq!(
        part.modules_of::<EngineModule>().next().map(|e| e.max_thrust),
        Some(400.0)
    );
    assert_eq!(
        part.modules_of::<DecoupleModule>().next().map(|d| d.ejection_force),
        Some(80.0)
    );

    assert!(scheduler.is_pending(id, DeferredAction::RefreshDragCube));
    assert!(!part.drag_cube.procedural);
    let mut parts = HashMap::from([(id, part)]);
    scheduler.advance(&mut parts);
    let part = &parts[&id];
    assert!(part.drag_cube.procedural);
    assert_eq!(part.mass_display, "12.000 t");
    Ok(())
}

#[test]
fn test_shrinking_back_restores_pristine_values() -> Result<()> {
    let registry = UpdaterRegistry::with_builtin();
    let globals = AbsoluteLimits::default();
    let limits = LimitTable::empty();
    let ctx = ResizeContext {
        registry: &registry,
        globals: &globals,
        limits: &limits,
        scene: Scene::Editor,
    };
    let mut scheduler = TickScheduler::new();

    let prototype = booster();
    let mut part = prototype.instantiate(PartId(1));
    let mut resizer = PartResizer::new(ResizerSettings::default());
    resizer.init(&mut part, &prototype, &ctx, &mut scheduler)?;

    for size in [2.0, 0.5, 1.0] {
        part.dimensions = Some(Dimensions::new(size, 1.0));
        resizer.update(&mut part, &mut scheduler)?;
    }
    assert_eq!(part.model_scale, Vec3::ONE);
    assert_eq!(part.attach_nodes[0], prototype.attach_nodes[0]);
    assert_eq!(part.modules, prototype.modules);
    assert!((part.resources[0].amount - 100.0).abs() < 1e-3);
    Ok(())
}

struct AlwaysBroken;

impl PartUpdater for AlwaysBroken {
    fn on_rescale(&mut self, _part: &mut Part, _scale: &ScaleFactors) -> part_resizer::Result<()> {
        Err(ResizeError::Misconfigured {
            updater: "always_broken".to_string(),
            reason: "missing hardpoint".to_string(),
        })
    }
}

#[test]
fn test_misconfigured_updater_does_not_touch_mass() -> Result<()> {
    let registry = UpdaterRegistry::new();
    registry.register("always_broken", |_| {
        Some(Box::new(AlwaysBroken) as Box<dyn PartUpdater>)
    });
    register_builtin(&registry);
    let globals = AbsoluteLimits::default();
    let limits = LimitTable::empty();
    let ctx = ResizeContext {
        registry: &registry,
        globals: &globals,
        limits: &limits,
        scene: Scene::Editor,
    };
    let mut scheduler = TickScheduler::new();

    let prototype = booster();
    let mut part = prototype.instantiate(PartId(1));
    let mut resizer = PartResizer::new(ResizerSettings::default());
    let first = resizer.init(&mut part, &prototype, &ctx, &mut scheduler)?;
    assert_eq!(first.failed.len(), 1);

    part.dimensions = Some(Dimensions::new(2.0, 1.0));
    let report = resizer.on_parameter_changed(&mut part, &mut scheduler)?;
    assert_eq!(report.skipped, vec!["always_broken"]);
    assert!(report.applied.contains(&"engine".to_string()));
    // ((1*2 + 1)*2 + 1)*2
    assert_eq!(resizer.current_mass(), 14.0);
    Ok(())
}

#[test]
fn test_deferred_refresh_skips_destroyed_part() -> Result<()> {
    let registry = UpdaterRegistry::with_builtin();
    let globals = AbsoluteLimits::default();
    let limits = LimitTable::empty();
    let ctx = ResizeContext {
        registry: &registry,
        globals: &globals,
        limits: &limits,
        scene: Scene::Editor,
    };
    let mut scheduler = TickScheduler::new();
    let prototype = booster();
    let mut part = prototype.instantiate(PartId(9));
    let mut resizer = PartResizer::new(ResizerSettings::default());
    resizer.init(&mut part, &prototype, &ctx, &mut scheduler)?;

    let mut parts: HashMap<PartId, Part> = HashMap::new();
    assert_eq!(scheduler.advance(&mut parts), 0);
    assert_eq!(scheduler.pending(), 0);

    part.dimensions = Some(Dimensions::new(1.5, 1.0));
    resizer.on_parameter_changed(&mut part, &mut scheduler)?;
    assert_eq!(resizer.on_destroy(part.id, &mut scheduler), 2);
    Ok(())
}

const CAREER: &str = r#"
[globals]
career = true

[tech]
unlocked = ["small-tank"]

[[tech_sources]]
part = "small-tank"
tech_group = "tanks"
min_size = 1.0
max_size = 2.0
max_aspect = 2.0

[resizers.booster]
tech_group = "tanks"

[[parts]]
name = "booster"
dimensions = { size = 1.0, aspect = 1.0 }
"#;

#[test]
fn test_config_driven_editor_bounds() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(CAREER.as_bytes())?;
    let config = ResizerConfig::from_file(file.path())?;

    let registry = UpdaterRegistry::with_builtin();
    let globals = config.globals.limits();
    let limits = config.limit_table();
    let ctx = ResizeContext {
        registry: &registry,
        globals: &globals,
        limits: &limits,
        scene: Scene::Editor,
    };
    let mut scheduler = TickScheduler::new();

    let prototype = config.require_prototype("booster")?;
    let mut part = prototype.instantiate(PartId(1));
    let mut resizer = PartResizer::new(config.settings_for("booster"));
    resizer.init(&mut part, prototype, &ctx, &mut scheduler)?;
    assert_eq!(resizer.effective_bounds(), (1.0, 2.0, 0.5, 2.0));

    part.dimensions = Some(Dimensions::new(5.0, 1.0));
    resizer.on_parameter_changed(&mut part, &mut scheduler)?;
    assert_eq!(part.dimensions, Some(Dimensions::new(2.0, 1.0)));
    Ok(())
}
