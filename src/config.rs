use crate::data::onehot::NumLabels;
use crate::dtype::DType;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    pub num_labels: NumLabels,
    pub dtype: DType,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShuffleConfig {
    /// `None` draws a fresh permutation on every call
    ///
    /// TOML integers are signed 64-bit, so a seed above `i64::MAX` works
    /// in code but cannot be written to or read from a TOML document.
    pub seed: Option<u64>,
}

/// Preprocessing settings, usually embedded in a larger pipeline config
///
/// ```toml
/// [encoder]
/// num_labels = "auto"   # or an integer
/// dtype = "float64"
///
/// [shuffle]
/// seed = 42
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreprocessConfig {
    pub encoder: EncoderConfig,
    pub shuffle: ShuffleConfig,
}

impl PreprocessConfig {
    /// Parse from an in-memory TOML document; missing tables use defaults
    ///
    /// # Errors
    /// `Config` if the document is not valid TOML or a value is rejected
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
