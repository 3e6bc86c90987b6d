//! Label preprocessing for ML pipelines
//!
//! Two independent, stateless transforms over in-memory arrays:
//!
//! - [`one_hot`]: integer class labels to an `[N, U]` one-hot matrix
//! - [`shuffle_unison`]: several arrays reordered by one shared random
//!   permutation, keeping rows paired across arrays
//!
//! ```
//! use labelprep::{Array, NumLabels, one_hot, shuffle_pair};
//!
//! let x = Array::from_rows(vec![vec![0.1_f32, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]]).unwrap();
//! let y = Array::from_vec(vec![2_u8, 0, 1]);
//!
//! let (x, y) = shuffle_pair(&x, &y, Some(42)).unwrap();
//! let targets = one_hot::<_, f32>(y.as_slice(), NumLabels::Auto).unwrap();
//! assert_eq!(x.len(), targets.len());
//! ```

pub mod array;
pub mod config;
pub mod data;
pub mod dtype;
pub mod error;

pub use array::{Array, DynArray, Matrix};
pub use config::{EncoderConfig, PreprocessConfig, ShuffleConfig};
pub use data::{
    Label, NumLabels, OneHotEncoder, Permutation, Shuffler, one_hot, one_hot_array, one_hot_dyn,
    shuffle_pair, shuffle_pair_with_rng, shuffle_unison, shuffle_unison_dyn,
    shuffle_unison_dyn_with_rng, shuffle_unison_with_rng,
};
pub use dtype::{DType, Element};
pub use error::{PrepError, Result};
