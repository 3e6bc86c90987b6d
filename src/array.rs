//! In-memory array container
//!
//! Arrays are stored the same way throughout the crate: one flat, row-major
//! `Vec<T>` and the shape it is viewed through. Row `i` of an array is the
//! contiguous block of `num_elements / len` values starting at
//! `i * row_size`, which makes row selection a sequence of slice copies.

use crate::dtype::{DType, Element};
use crate::error::{PrepError, Result};

/// A dense n-dimensional array
#[derive(Clone, Debug, PartialEq)]
pub struct Array<T> {
    data: Vec<T>,
    shape: Vec<usize>,
}

/// Two-dimensional array, as produced by the one-hot encoder
pub type Matrix<T> = Array<T>;

/// Number of elements a shape holds
///
/// A zero dimension empties the array whatever the other dimensions are.
fn element_count(shape: &[usize]) -> Result<usize> {
    if shape.contains(&0) {
        return Ok(0);
    }
    shape
        .iter()
        .try_fold(1_usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| {
            PrepError::InvalidArgument(format!("shape {shape:?} overflows the element count"))
        })
}

impl<T> Array<T> {
    /// Create an array from flat row-major data and a shape
    ///
    /// # Errors
    /// `ShapeDataMismatch` if `data.len()` is not the product of `shape`,
    /// `InvalidArgument` if that product overflows `usize`
    pub fn new(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let elements = element_count(shape)?;
        if data.len() != elements {
            return Err(PrepError::ShapeDataMismatch {
                shape: shape.to_vec(),
                elements,
                len: data.len(),
            });
        }
        Ok(Array {
            data,
            shape: shape.to_vec(),
        })
    }

    /// Create a 1-D array
    #[must_use]
    pub fn from_vec(data: Vec<T>) -> Self {
        let shape = vec![data.len()];
        Array { data, shape }
    }

    /// Create a 2-D array from a list of rows
    ///
    /// # Errors
    /// `ShapeDataMismatch` if the rows have different lengths
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let total: usize = rows.iter().map(Vec::len).sum();
        if rows.iter().any(|r| r.len() != ncols) {
            return Err(PrepError::ShapeDataMismatch {
                shape: vec![nrows, ncols],
                elements: nrows.saturating_mul(ncols),
                len: total,
            });
        }
        let data: Vec<T> = rows.into_iter().flatten().collect();
        Ok(Array {
            data,
            shape: vec![nrows, ncols],
        })
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Size of the first dimension (0 for a scalar)
    #[must_use]
    pub fn len(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn num_elements(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Number of elements in one row (product of the trailing dimensions)
    ///
    /// Only an array with no rows can have trailing dimensions whose
    /// product overflows, so saturating is safe.
    fn row_size(&self) -> usize {
        self.shape.iter().skip(1).fold(1, |acc, &dim| acc.saturating_mul(dim))
    }

    /// Borrow row `i` as a contiguous slice
    #[must_use]
    pub fn row(&self, i: usize) -> Option<&[T]> {
        if self.ndim() == 0 || i >= self.len() {
            return None;
        }
        let size = self.row_size();
        self.data.get(i * size..(i + 1) * size)
    }

    /// Iterate over the rows along the first dimension
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    /// Element at a full multi-dimensional index
    #[must_use]
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0;
        for (&i, &dim) in index.iter().zip(&self.shape) {
            if i >= dim {
                return None;
            }
            flat = flat * dim + i;
        }
        self.data.get(flat)
    }
}

impl<T: Clone> Array<T> {
    /// Gather rows along the first dimension in the given order
    ///
    /// The result has shape `[indices.len(), ..trailing dims]`. Indices may
    /// repeat.
    ///
    /// # Errors
    /// `InvalidArgument` for a scalar array or a result too large to
    /// address, `IndexOutOfBounds` for an index past the first dimension
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self> {
        if self.ndim() == 0 {
            return Err(PrepError::InvalidArgument(
                "cannot select rows from a 0-dimensional array".to_string(),
            ));
        }
        let len = self.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(PrepError::IndexOutOfBounds { index, len });
        }
        let capacity = indices.len().checked_mul(self.row_size()).ok_or_else(|| {
            PrepError::InvalidArgument(format!(
                "selecting {} rows of shape {:?} overflows the element count",
                indices.len(),
                self.shape
            ))
        })?;
        let mut data = Vec::with_capacity(capacity);
        for &index in indices {
            let row = self
                .row(index)
                .ok_or(PrepError::IndexOutOfBounds { index, len })?;
            data.extend_from_slice(row);
        }
        let mut shape = self.shape.clone();
        if let Some(first) = shape.first_mut() {
            *first = indices.len();
        }
        Ok(Array { data, shape })
    }
}

impl<T: Element> Array<T> {
    /// Create an array filled with `T::ZERO`
    ///
    /// # Errors
    /// `InvalidArgument` if the element count overflows `usize` or the
    /// buffer cannot be allocated
    pub fn zeros(shape: &[usize]) -> Result<Self> {
        let size = element_count(shape)?;
        let mut data = Vec::new();
        data.try_reserve_exact(size).map_err(|err| {
            PrepError::InvalidArgument(format!("cannot allocate array of shape {shape:?}: {err}"))
        })?;
        data.resize(size, T::ZERO);
        Ok(Array {
            data,
            shape: shape.to_vec(),
        })
    }

    #[must_use]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Mutable access to a single element of a 2-D array
    pub(crate) fn get_mut_2d(&mut self, row: usize, col: usize) -> Option<&mut T> {
        let (&rows, &cols) = (self.shape.first()?, self.shape.get(1)?);
        if self.shape.len() != 2 || row >= rows || col >= cols {
            return None;
        }
        self.data.get_mut(row * cols + col)
    }
}

/// An array whose element type is chosen at runtime
#[derive(Clone, Debug, PartialEq)]
pub enum DynArray {
    F32(Array<f32>),
    F64(Array<f64>),
    I32(Array<i32>),
    I64(Array<i64>),
    U8(Array<u8>),
    Bool(Array<bool>),
}

macro_rules! dyn_array_accessors {
    ($($variant:ident, $ty:ty, $as:ident;)*) => {
        impl DynArray {
            #[must_use]
            pub fn dtype(&self) -> DType {
                match self {
                    $(DynArray::$variant(_) => DType::$variant,)*
                }
            }

            #[must_use]
            pub fn shape(&self) -> &[usize] {
                match self {
                    $(DynArray::$variant(a) => a.shape(),)*
                }
            }

            /// Size of the first dimension (0 for a scalar)
            #[must_use]
            pub fn len(&self) -> usize {
                match self {
                    $(DynArray::$variant(a) => a.len(),)*
                }
            }

            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Gather rows, keeping the element type
            ///
            /// # Errors
            /// Same as [`Array::select_rows`]
            pub fn select_rows(&self, indices: &[usize]) -> Result<Self> {
                Ok(match self {
                    $(DynArray::$variant(a) => DynArray::$variant(a.select_rows(indices)?),)*
                })
            }

            $(
                #[must_use]
                pub fn $as(&self) -> Option<&Array<$ty>> {
                    match self {
                        DynArray::$variant(a) => Some(a),
                        _ => None,
                    }
                }
            )*
        }

        $(
            impl From<Array<$ty>> for DynArray {
                fn from(array: Array<$ty>) -> Self {
                    DynArray::$variant(array)
                }
            }
        )*
    };
}

dyn_array_accessors! {
    F32, f32, as_f32;
    F64, f64, as_f64;
    I32, i32, as_i32;
    I64, i64, as_i64;
    U8, u8, as_u8;
    Bool, bool, as_bool;
}
