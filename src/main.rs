use clap::Parser;
use part_resizer::core::resizer::{PersistedState, SliderSpec};
use part_resizer::domain::model::{Dimensions, PartId};
use part_resizer::utils::error::ErrorSeverity;
use part_resizer::utils::{logger, validation::Validate};
use part_resizer::{
    CliConfig, PartResizer, RescaleReport, ResizeContext, ResizeError, ResizerConfig,
    TickScheduler, UpdaterRegistry,
};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
struct ResizeSummary {
    part: String,
    size: f32,
    aspect: f32,
    mass: f32,
    cost: f32,
    mass_delta: f32,
    cost_delta: f32,
    bounds: (f32, f32, f32, f32),
    size_slider: SliderSpec,
    aspect_slider: SliderSpec,
    updaters: Vec<String>,
    failed: Vec<(String, String)>,
    persisted: Option<PersistedState>,
}

fn run(config: &CliConfig) -> Result<ResizeSummary, ResizeError> {
    let resizer_config = ResizerConfig::from_file(&config.config)?;
    resizer_config.validate()?;

    let prototype = resizer_config.require_prototype(&config.part)?;
    let settings = resizer_config.settings_for(&config.part);
    let globals = resizer_config.globals.limits();
    let limits = resizer_config.limit_table();
    let registry = UpdaterRegistry::with_builtin();
    let ctx = ResizeContext {
        registry: &registry,
        globals: &globals,
        limits: &limits,
        scene: config.scene(),
    };

    let mut scheduler = TickScheduler::new();
    let mut parts = HashMap::new();
    let id = PartId(1);
    let mut part = prototype.instantiate(id);
    let mut resizer = PartResizer::new(settings);
    let first = resizer.init(&mut part, prototype, &ctx, &mut scheduler)?;
    let default_mass = resizer.current_mass();
    let default_cost = resizer.current_cost();

    let current = part.dimensions.unwrap_or_default();
    part.dimensions = Some(Dimensions::new(
        config.size,
        config.aspect.unwrap_or(current.aspect),
    ));
    let report = resizer.on_parameter_changed(&mut part, &mut scheduler)?;
    let failed = merge_failures(&first, &report);

    let dims = part.dimensions.unwrap_or_default();
    let name = part.name.clone();
    parts.insert(id, part);
    scheduler.advance(&mut parts);

    Ok(ResizeSummary {
        part: name,
        size: dims.size,
        aspect: dims.aspect,
        mass: resizer.current_mass(),
        cost: resizer.current_cost(),
        mass_delta: resizer.mass_delta(default_mass),
        cost_delta: resizer.cost_delta(default_cost),
        bounds: resizer.effective_bounds(),
        size_slider: resizer.size_slider(),
        aspect_slider: resizer.aspect_slider(),
        updaters: resizer
            .pipeline()
            .kinds()
            .into_iter()
            .map(String::from)
            .collect(),
        failed,
        persisted: resizer.persisted(),
    })
}

fn merge_failures(first: &RescaleReport, second: &RescaleReport) -> Vec<(String, String)> {
    first.failed.iter().chain(&second.failed).cloned().collect()
}

fn print_summary(summary: &ResizeSummary) {
    println!("Part:     {}", summary.part);
    println!("Size:     {:.3}", summary.size);
    println!("Aspect:   {:.3}", summary.aspect);
    println!(
        "Mass:     {:.4} ({:+.4})",
        summary.mass, summary.mass_delta
    );
    println!(
        "Cost:     {:.2} ({:+.2})",
        summary.cost, summary.cost_delta
    );
    let (min_size, max_size, min_aspect, max_aspect) = summary.bounds;
    println!(
        "Bounds:   size {}..{}, aspect {}..{}",
        min_size, max_size, min_aspect, max_aspect
    );
    println!("Updaters: {}", summary.updaters.join(", "));
    for (kind, reason) in &summary.failed {
        println!("Failed:   {} ({})", kind, reason);
    }
}

fn main() {
    let config = CliConfig::parse();
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting part-resizer");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let outcome = run(&config).and_then(|summary| {
        if config.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }
        Ok(())
    });

    match outcome {
        Ok(()) => tracing::debug!("Done"),
        Err(e) => {
            tracing::error!("Resize failed: {} (Severity: {:?})", e, e.severity());
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", e);
            eprintln!("Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
