use rc_cycle::{ConfigError, EngineError};

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown metric '{name}', expected one of: {known}")]
    UnknownMetric { name: String, known: String },
}

pub type CliResult<T> = Result<T, CliError>;
