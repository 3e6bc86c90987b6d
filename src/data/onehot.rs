use crate::array::{Array, DynArray, Matrix};
use crate::config::EncoderConfig;
use crate::data::label::Label;
use crate::dtype::{DType, Element};
use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Number of one-hot columns
///
/// `Auto` counts the distinct values present in the labels. It does not
/// look at the largest label, so labels are expected to be `0..U`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "NumLabelsRepr", into = "NumLabelsRepr")]
pub enum NumLabels {
    #[default]
    Auto,
    Fixed(usize),
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum NumLabelsRepr {
    Count(usize),
    Name(String),
}

impl NumLabels {
    /// Column count for a label sequence
    ///
    /// # Errors
    /// `InvalidArgument` for `Fixed(0)`
    pub fn resolve<L: Label>(self, labels: &[L]) -> Result<usize> {
        match self {
            NumLabels::Auto => Ok(labels.iter().collect::<BTreeSet<_>>().len()),
            NumLabels::Fixed(0) => Err(PrepError::InvalidArgument(
                "num_labels must be positive".to_string(),
            )),
            NumLabels::Fixed(k) => Ok(k),
        }
    }
}

impl fmt::Display for NumLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumLabels::Auto => write!(f, "auto"),
            NumLabels::Fixed(k) => write!(f, "{k}"),
        }
    }
}

impl FromStr for NumLabels {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "auto" {
            return Ok(NumLabels::Auto);
        }
        s.parse::<usize>().map(NumLabels::Fixed).map_err(|_| {
            PrepError::InvalidArgument(format!(
                "num_labels must be an integer or \"auto\", got {s:?}"
            ))
        })
    }
}

impl From<usize> for NumLabels {
    fn from(k: usize) -> Self {
        NumLabels::Fixed(k)
    }
}

impl TryFrom<NumLabelsRepr> for NumLabels {
    type Error = PrepError;

    fn try_from(repr: NumLabelsRepr) -> Result<Self> {
        match repr {
            NumLabelsRepr::Count(k) => Ok(NumLabels::Fixed(k)),
            NumLabelsRepr::Name(s) => s.parse(),
        }
    }
}

impl From<NumLabels> for NumLabelsRepr {
    fn from(n: NumLabels) -> Self {
        match n {
            NumLabels::Auto => NumLabelsRepr::Name("auto".to_string()),
            NumLabels::Fixed(k) => NumLabelsRepr::Count(k),
        }
    }
}

/// One-hot encode a sequence of class labels
///
/// Row `i` of the `[N, U]` result holds `T::ONE` at column `labels[i]` and
/// `T::ZERO` elsewhere. Labels outside `0..U` (including negative ones)
/// produce an all-zero row.
///
/// When `U` resolves to 1 the result is the `1x1` matrix `[[0]]`,
/// whatever the number of labels.
///
/// # Errors
/// `InvalidArgument` if `num_labels` is `Fixed(0)` or the `[N, U]` result
/// is too large to allocate
///
/// # Examples
/// ```
/// use labelprep::{NumLabels, one_hot};
///
/// let m = one_hot::<_, f32>(&[0, 2, 1], NumLabels::Auto).unwrap();
/// assert_eq!(m.shape(), &[3, 3]);
/// assert_eq!(m.row(1), Some(&[0.0, 0.0, 1.0][..]));
/// ```
pub fn one_hot<L: Label, T: Element>(labels: &[L], num_labels: NumLabels) -> Result<Matrix<T>> {
    let num_classes = num_labels.resolve(labels)?;
    debug!(
        n = labels.len(),
        num_classes,
        %num_labels,
        dtype = %T::DTYPE,
        "one-hot encoding labels"
    );

    if num_classes == 1 {
        return Array::new(vec![T::ZERO], &[1, 1]);
    }

    let mut out = Matrix::<T>::zeros(&[labels.len(), num_classes])?;
    let mut unmatched = 0_usize;
    for (i, &label) in labels.iter().enumerate() {
        match label.class_index().and_then(|c| out.get_mut_2d(i, c)) {
            Some(slot) => *slot = T::ONE,
            None => unmatched += 1,
        }
    }

    if unmatched > 0 {
        warn!(
            unmatched,
            num_classes, "labels outside 0..num_classes encoded as all-zero rows"
        );
    }

    Ok(out)
}

/// One-hot encode a label array, checking that it is 1-dimensional
///
/// # Errors
/// `InvalidArgument` if `labels` is not 1-D or `num_labels` is `Fixed(0)`
pub fn one_hot_array<L: Label, T: Element>(
    labels: &Array<L>,
    num_labels: NumLabels,
) -> Result<Matrix<T>> {
    if labels.ndim() != 1 {
        return Err(PrepError::InvalidArgument(format!(
            "labels must be 1-dimensional, got shape {:?}",
            labels.shape()
        )));
    }
    one_hot(labels.as_slice(), num_labels)
}

/// One-hot encode with the element type picked at runtime
///
/// # Errors
/// Same as [`one_hot`]
pub fn one_hot_dyn<L: Label>(labels: &[L], num_labels: NumLabels, dtype: DType) -> Result<DynArray> {
    Ok(match dtype {
        DType::F32 => one_hot::<L, f32>(labels, num_labels)?.into(),
        DType::F64 => one_hot::<L, f64>(labels, num_labels)?.into(),
        DType::I32 => one_hot::<L, i32>(labels, num_labels)?.into(),
        DType::I64 => one_hot::<L, i64>(labels, num_labels)?.into(),
        DType::U8 => one_hot::<L, u8>(labels, num_labels)?.into(),
        DType::Bool => one_hot::<L, bool>(labels, num_labels)?.into(),
    })
}

/// One-hot encoder with fixed settings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OneHotEncoder {
    num_labels: NumLabels,
    dtype: DType,
}

impl OneHotEncoder {
    #[must_use]
    pub fn new(num_labels: NumLabels, dtype: DType) -> Self {
        OneHotEncoder { num_labels, dtype }
    }

    #[must_use]
    pub fn from_config(config: &EncoderConfig) -> Self {
        Self::new(config.num_labels, config.dtype)
    }

    #[must_use]
    pub fn num_labels(&self) -> NumLabels {
        self.num_labels
    }

    #[must_use]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Encode into the configured dtype
    ///
    /// # Errors
    /// Same as [`one_hot`]
    pub fn encode<L: Label>(&self, labels: &[L]) -> Result<DynArray> {
        one_hot_dyn(labels, self.num_labels, self.dtype)
    }

    /// Encode into `T`, ignoring the configured dtype
    ///
    /// # Errors
    /// Same as [`one_hot`]
    pub fn encode_as<L: Label, T: Element>(&self, labels: &[L]) -> Result<Matrix<T>> {
        one_hot(labels, self.num_labels)
    }
}
