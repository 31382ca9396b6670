use crate::core::limits::{AbsoluteLimits, LimitTable, TechSource};
use crate::core::resizer::ResizerSettings;
use crate::domain::model::Part;
use crate::domain::ports::{AllUnlocked, PrototypeCatalog};
use crate::utils::error::{ResizeError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_optional_bound, validate_ordered_bounds,
    validate_positive, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Everything needed to resize parts outside the host: global bounds,
/// progression, tech limit sources, per-part settings and prototypes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResizerConfig {
    #[serde(default)]
    pub globals: GlobalsConfig,
    #[serde(default)]
    pub tech: TechConfig,
    #[serde(default)]
    pub tech_sources: Vec<TechSource>,
    #[serde(default)]
    pub resizers: HashMap<String, ResizerSettings>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalsConfig {
    pub abs_min_size: f32,
    pub abs_max_size: f32,
    pub abs_min_aspect: f32,
    pub abs_max_aspect: f32,
    /// Tech limits only apply in career games.
    pub career: bool,
}

impl Default for GlobalsConfig {
    fn default() -> Self {
        let limits = AbsoluteLimits::default();
        Self {
            abs_min_size: limits.abs_min_size,
            abs_max_size: limits.abs_max_size,
            abs_min_aspect: limits.abs_min_aspect,
            abs_max_aspect: limits.abs_max_aspect,
            career: true,
        }
    }
}

impl GlobalsConfig {
    pub fn limits(&self) -> AbsoluteLimits {
        AbsoluteLimits {
            abs_min_size: self.abs_min_size,
            abs_max_size: self.abs_max_size,
            abs_min_aspect: self.abs_min_aspect,
            abs_max_aspect: self.abs_max_aspect,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechConfig {
    /// Names of unlocked parts.
    pub unlocked: Vec<String>,
    /// Treat every part as unlocked.
    pub all_unlocked: bool,
}

impl ResizerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ResizeError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ResizeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn validate_config(&self) -> Result<()> {
        let g = &self.globals;
        validate_positive("globals.abs_min_size", g.abs_min_size)?;
        validate_positive("globals.abs_max_size", g.abs_max_size)?;
        validate_positive("globals.abs_min_aspect", g.abs_min_aspect)?;
        validate_positive("globals.abs_max_aspect", g.abs_max_aspect)?;
        validate_ordered_bounds("globals.size", g.abs_min_size, g.abs_max_size)?;
        validate_ordered_bounds("globals.aspect", g.abs_min_aspect, g.abs_max_aspect)?;

        let mut sourced = HashSet::new();
        for (i, source) in self.tech_sources.iter().enumerate() {
            validate_non_empty_string(&format!("tech_sources[{}].part", i), &source.part)?;
            if !sourced.insert(source.part.as_str()) {
                return Err(ResizeError::InvalidConfigValueError {
                    field: "tech_sources.part".to_string(),
                    value: source.part.clone(),
                    reason: "A part may provide tech resize info only once".to_string(),
                });
            }
        }

        for (name, settings) in &self.resizers {
            validate_settings(name, settings)?;
        }

        let mut names = HashSet::new();
        for (i, part) in self.parts.iter().enumerate() {
            validate_non_empty_string(&format!("parts[{}].name", i), &part.name)?;
            if !names.insert(part.name.as_str()) {
                return Err(ResizeError::InvalidConfigValueError {
                    field: "parts.name".to_string(),
                    value: part.name.clone(),
                    reason: "Part names must be unique".to_string(),
                });
            }
            if let Some(dims) = part.dimensions {
                validate_positive(&format!("parts.{}.dimensions.size", part.name), dims.size)?;
                validate_positive(
                    &format!("parts.{}.dimensions.aspect", part.name),
                    dims.aspect,
                )?;
            }
        }
        Ok(())
    }

    /// Tech limits for the configured progression. Sandbox games get none.
    pub fn limit_table(&self) -> LimitTable {
        if !self.globals.career {
            return LimitTable::empty();
        }
        if self.tech.all_unlocked {
            return LimitTable::build(&self.tech_sources, &AllUnlocked);
        }
        let unlocked: HashSet<String> = self.tech.unlocked.iter().cloned().collect();
        LimitTable::build(&self.tech_sources, &unlocked)
    }

    /// Settings of a part type, falling back to the defaults.
    pub fn settings_for(&self, part: &str) -> ResizerSettings {
        self.resizers.get(part).cloned().unwrap_or_default()
    }

    pub fn require_prototype(&self, name: &str) -> Result<&Part> {
        self.prototype(name).ok_or_else(|| ResizeError::UnknownPart {
            name: name.to_string(),
        })
    }
}

fn validate_settings(name: &str, settings: &ResizerSettings) -> Result<()> {
    let field = |f: &str| format!("resizers.{}.{}", name, f);
    validate_optional_bound(&field("min_size"), settings.min_size)?;
    validate_optional_bound(&field("max_size"), settings.max_size)?;
    validate_optional_bound(&field("min_aspect"), settings.min_aspect)?;
    validate_optional_bound(&field("max_aspect"), settings.max_aspect)?;
    validate_ordered_bounds(&field("size"), settings.min_size, settings.max_size)?;
    validate_ordered_bounds(&field("aspect"), settings.min_aspect, settings.max_aspect)?;
    validate_positive(&field("size_step_large"), settings.size_step_large)?;
    validate_positive(&field("size_step_small"), settings.size_step_small)?;
    validate_positive(&field("aspect_step_large"), settings.aspect_step_large)?;
    validate_positive(&field("aspect_step_small"), settings.aspect_step_small)?;
    for (i, c) in settings
        .specific_mass
        .iter()
        .chain(settings.specific_cost.iter())
        .enumerate()
    {
        if !c.is_finite() {
            return Err(ResizeError::InvalidConfigValueError {
                field: field(if i < 4 { "specific_mass" } else { "specific_cost" }),
                value: c.to_string(),
                reason: "Coefficients must be finite".to_string(),
            });
        }
    }
    Ok(())
}

impl PrototypeCatalog for ResizerConfig {
    fn prototype(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }
}

impl Validate for ResizerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
