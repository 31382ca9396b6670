//! Subscriber setup for the binaries.
//!
//! Each rescale pass runs inside a `rescale` span carrying the part name and
//! id, so interleaved passes over several parts stay attributable.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    /// One JSON object per line, with the enclosing rescale span attached.
    Json,
}

fn filter(verbose: bool) -> EnvFilter {
    let directive = if verbose {
        "part_resizer=debug,info"
    } else {
        "part_resizer=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

// Verbose runs also report when each rescale span closes, with its timing.
fn span_events(verbose: bool) -> FmtSpan {
    if verbose {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

pub fn init_logger(format: LogFormat, verbose: bool) {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(verbose)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(span_events(verbose));

    let registry = tracing_subscriber::registry().with(filter(verbose));
    match format {
        LogFormat::Compact => registry.with(layer.compact()).init(),
        LogFormat::Json => registry
            .with(layer.json().with_current_span(true).with_span_list(false))
            .init(),
    }
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(LogFormat::Compact, verbose);
}

pub fn init_json_logger(verbose: bool) {
    init_logger(LogFormat::Json, verbose);
}
