use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Length mismatch: array {index} has {actual} rows, expected {expected}")]
    LengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Shape mismatch: shape {shape:?} has {elements} elements but data length is {len}")]
    ShapeDataMismatch {
        shape: Vec<usize>,
        elements: usize,
        len: usize,
    },

    #[error("Index {index} out of bounds for first dimension of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Config error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for PrepError {
    fn from(err: toml::de::Error) -> Self {
        PrepError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PrepError>;
