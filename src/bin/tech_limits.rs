use anyhow::Context;
use clap::Parser;
use part_resizer::utils::{logger, validation::Validate};
use part_resizer::ResizerConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tech-limits")]
#[command(about = "Print the effective resize bounds of every tech group")]
struct Args {
    #[arg(long, default_value = "resizer.toml")]
    config: PathBuf,

    #[arg(long, help = "Treat every part as unlocked")]
    all_unlocked: bool,

    #[arg(long, help = "Emit JSON log lines")]
    json_logs: bool,

    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    let mut config = ResizerConfig::from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    config.validate().context("validating configuration")?;
    if args.all_unlocked {
        config.tech.all_unlocked = true;
    }

    let globals = config.globals.limits();
    let table = config.limit_table();
    if table.is_empty() {
        tracing::info!("No tech limits apply");
        println!(
            "(globals) size {}..{}, aspect {}..{}",
            globals.abs_min_size, globals.abs_max_size, globals.abs_min_aspect, globals.abs_max_aspect
        );
        return Ok(());
    }

    let mut groups: Vec<&str> = table.groups().map(|(name, _)| name).collect();
    groups.sort_unstable();
    for group in groups {
        let bounds = table.effective_bounds(group, &globals);
        println!(
            "{}: size {}..{}, aspect {}..{}",
            group, bounds.min_size, bounds.max_size, bounds.min_aspect, bounds.max_aspect
        );
    }
    Ok(())
}
