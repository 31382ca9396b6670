pub mod toml_config;

pub use toml_config::ResizerConfig;

#[cfg(feature = "cli")]
use crate::core::resizer::Scene;
#[cfg(feature = "cli")]
use crate::utils::error::{ResizeError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_non_empty_string, validate_positive, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "part-resizer")]
#[command(about = "Resize a part anisotropically and report the result")]
pub struct CliConfig {
    #[arg(long, default_value = "resizer.toml")]
    pub config: PathBuf,

    #[arg(long, help = "Prototype part to resize")]
    pub part: String,

    #[arg(long)]
    pub size: f32,

    #[arg(long, help = "Defaults to the prototype's aspect")]
    pub aspect: Option<f32>,

    #[arg(long, help = "Resolve limits as in flight instead of the editor")]
    pub flight: bool,

    #[arg(long, help = "Print the result as JSON")]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn scene(&self) -> Scene {
        if self.flight {
            Scene::Flight
        } else {
            Scene::Editor
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("part", &self.part)?;
        validate_positive("size", self.size)?;
        if let Some(aspect) = self.aspect {
            validate_positive("aspect", aspect)?;
        }
        if !self.config.exists() {
            return Err(ResizeError::MissingConfigError {
                field: self.config.display().to_string(),
            });
        }
        Ok(())
    }
}
