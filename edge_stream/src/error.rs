// THEORY:
// One error type covers the engine and its collaborators. Contract violations
// (bad dimensions, short buffers) are detected before any stage runs; decode,
// encode and filesystem failures come from the host side; a stage task that dies
// surfaces as `StageFailed`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EdgeError {
    #[error("image dimensions must be non-zero (got {height}x{width})")]
    ZeroDimension { height: usize, width: usize },

    #[error("width {width} exceeds the line buffer capacity of {max} columns")]
    WidthTooLarge { width: usize, max: usize },

    #[error("a {height}x{width} frame overflows the addressable pixel count")]
    DimensionOverflow { height: usize, width: usize },

    #[error("input buffer holds {actual} transport words but {expected} are required")]
    InputTooShort { expected: usize, actual: usize },

    #[error("output buffer holds {actual} transport words but {expected} are required")]
    OutputTooShort { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pipeline stage failed: {0}")]
    StageFailed(String),
}

impl EdgeError {
    /// True for caller errors that are detected before any stage runs.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            EdgeError::ZeroDimension { .. }
                | EdgeError::WidthTooLarge { .. }
                | EdgeError::DimensionOverflow { .. }
                | EdgeError::InputTooShort { .. }
                | EdgeError::OutputTooShort { .. }
        )
    }
}

impl From<tokio::task::JoinError> for EdgeError {
    fn from(err: tokio::task::JoinError) -> Self {
        EdgeError::StageFailed(err.to_string())
    }
}
