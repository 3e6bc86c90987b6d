//! Element types for encoded output
//!
//! This module provides the `DType` tag for the numeric kinds a one-hot
//! matrix can be produced in, and the `Element` trait that ties a Rust
//! scalar type to its tag.

use crate::error::PrepError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported output element types
///
/// The default is `F64`, the same float `"float"` names in numeric
/// libraries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
#[repr(u8)]
pub enum DType {
    /// 32-bit floating point
    F32 = 0,
    /// 64-bit floating point (default)
    #[default]
    F64 = 1,
    /// 32-bit signed integer
    I32 = 2,
    /// 64-bit signed integer
    I64 = 3,
    /// 8-bit unsigned integer
    U8 = 4,
    /// Boolean
    Bool = 5,
}

impl DType {
    /// Returns the canonical name of this dtype
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::U8 => "u8",
            DType::Bool => "bool",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DType {
    type Err = PrepError;

    /// Parses both the canonical names and the long numeric-library
    /// spellings. Plain `"float"` is a 64-bit float, as in NumPy.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "float32" | "f32" => Ok(DType::F32),
            "float" | "double" | "float64" | "f64" => Ok(DType::F64),
            "int32" | "i32" => Ok(DType::I32),
            "int" | "int64" | "i64" => Ok(DType::I64),
            "uint8" | "u8" => Ok(DType::U8),
            "bool" => Ok(DType::Bool),
            other => Err(PrepError::InvalidArgument(format!(
                "unknown dtype {other:?}"
            ))),
        }
    }
}

impl TryFrom<String> for DType {
    type Error = PrepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DType> for &'static str {
    fn from(dtype: DType) -> Self {
        dtype.name()
    }
}

/// A scalar type that can hold one-hot values
pub trait Element: Copy + PartialEq + fmt::Debug + 'static {
    const ZERO: Self;
    const ONE: Self;
    const DTYPE: DType;
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:expr, $zero:expr, $one:expr;)*) => {
        $(
            impl Element for $ty {
                const ZERO: Self = $zero;
                const ONE: Self = $one;
                const DTYPE: DType = $dtype;
            }
        )*
    };
}

impl_element! {
    f32 => DType::F32, 0.0, 1.0;
    f64 => DType::F64, 0.0, 1.0;
    i32 => DType::I32, 0, 1;
    i64 => DType::I64, 0, 1;
    u8 => DType::U8, 0, 1;
    bool => DType::Bool, false, true;
}
