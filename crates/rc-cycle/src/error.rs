//! Engine-level errors.
//!
//! Only configuration problems and file I/O are errors here. Anything that
//! goes wrong for a single sample is an `Avail::Unavailable`, never an `Err`.

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Invalid role key '{key}': {reason}")]
    InvalidRoleKey { key: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A configuration problem that prevents a batch from starting.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing required parameter: {parameter}")]
    Missing { parameter: String },

    #[error("invalid value: {parameter} = {value} ({reason})")]
    InvalidValue {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("unknown refrigerant: {name}")]
    UnknownRefrigerant { name: String },

    #[error("refrigerant {refrigerant} not supported by the {provider} property provider")]
    UnsupportedRefrigerant {
        refrigerant: String,
        provider: String,
    },
}

impl ConfigError {
    pub(crate) fn missing(parameter: &str) -> Self {
        ConfigError::Missing {
            parameter: parameter.to_string(),
        }
    }

    pub(crate) fn invalid(parameter: &str, value: impl ToString, reason: &str) -> Self {
        ConfigError::InvalidValue {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Name of the offending parameter, when there is one.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            ConfigError::Missing { parameter } | ConfigError::InvalidValue { parameter, .. } => {
                Some(parameter)
            }
            ConfigError::UnknownRefrigerant { .. } | ConfigError::UnsupportedRefrigerant { .. } => {
                Some("refrigerant")
            }
        }
    }
}
