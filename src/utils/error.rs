use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Unknown part: {name}")]
    UnknownPart { name: String },

    #[error("Invalid dimensions after clamping: size {size}, aspect {aspect}")]
    InvalidDimensions { size: f32, aspect: f32 },

    #[error("Updater {updater} is misconfigured: {reason}")]
    Misconfigured { updater: String, reason: String },

    #[error("Resizer is not initialized")]
    NotInitialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ResizeError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ResizeError::Misconfigured { .. } => ErrorSeverity::Low,
            ResizeError::InvalidDimensions { .. } | ResizeError::NotInitialized => {
                ErrorSeverity::Medium
            }
            ResizeError::ConfigValidationError { .. }
            | ResizeError::InvalidConfigValueError { .. }
            | ResizeError::MissingConfigError { .. }
            | ResizeError::UnknownPart { .. } => ErrorSeverity::High,
            ResizeError::IoError(_) | ResizeError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ResizeError::IoError(_) => "Check that the file exists and is readable",
            ResizeError::SerializationError(_) => "Check the structure of the serialized data",
            ResizeError::ConfigValidationError { .. }
            | ResizeError::InvalidConfigValueError { .. }
            | ResizeError::MissingConfigError { .. } => {
                "Fix the configuration file and run again"
            }
            ResizeError::UnknownPart { .. } => "Use a part name defined in [[parts]]",
            ResizeError::InvalidDimensions { .. } => {
                "Use a strictly positive size and aspect within the slider bounds"
            }
            ResizeError::Misconfigured { .. } => {
                "Add the module the updater expects or remove the updater from the part"
            }
            ResizeError::NotInitialized => "Call init before rescaling the part",
        }
    }
}

pub type Result<T> = std::result::Result<T, ResizeError>;
