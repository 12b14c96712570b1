use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum SoloError {
    /// Malformed or shape-inconsistent arguments
    #[error("Validation failed: {0}")]
    Validation(String),
    /// Malformed geometry data file. `line` is 1-based.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    /// Physically out-of-range value (wavelength, angle, time)
    #[error("Value out of physical domain: {0}")]
    Domain(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl SoloError {
    pub fn validation(message: impl Into<String>) -> Self {
        SoloError::Validation(message.into())
    }

    pub fn domain(message: impl Into<String>) -> Self {
        SoloError::Domain(message.into())
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        SoloError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Convenience type for `Result<T, SoloError>`.
pub type SoloResult<T> = Result<T, SoloError>;
