//! Shuffling several arrays with one shared permutation
//!
//! Every array in a group is reordered along its first dimension by the
//! same permutation, so row `i` of a feature array and row `i` of its
//! label array stay paired.
//!
//! Randomness is never global. A seed builds a fresh `StdRng` for that one
//! call, no seed draws from the thread-local generator, and the
//! `*_with_rng` variants take a generator owned by the caller.

use crate::array::{Array, DynArray};
use crate::config::ShuffleConfig;
use crate::error::{PrepError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use tracing::debug;

/// A bijection over `0..n`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    indices: Vec<usize>,
}

impl Permutation {
    /// Uniformly random permutation of `0..n`
    pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(rng);
        Permutation { indices }
    }

    #[must_use]
    pub fn identity(n: usize) -> Self {
        Permutation {
            indices: (0..n).collect(),
        }
    }

    /// # Errors
    /// `InvalidArgument` unless `indices` holds each of `0..len` exactly once
    pub fn from_indices(indices: Vec<usize>) -> Result<Self> {
        let n = indices.len();
        let mut seen = vec![false; n];
        for &i in &indices {
            match seen.get_mut(i) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(PrepError::InvalidArgument(format!(
                        "{indices:?} is not a permutation of 0..{n}"
                    )));
                }
            }
        }
        Ok(Permutation { indices })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Output row `r` is taken from input row `as_slice()[r]`
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// The permutation that undoes this one
    #[must_use]
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.indices.len()];
        for (pos, &src) in self.indices.iter().enumerate() {
            if let Some(slot) = inv.get_mut(src) {
                *slot = pos;
            }
        }
        Permutation { indices: inv }
    }

    /// Reorder the rows of `array`, returning a new array
    ///
    /// # Errors
    /// `InvalidArgument` for a scalar array, `LengthMismatch` if the first
    /// dimension is not `len()`
    pub fn apply<T: Clone>(&self, array: &Array<T>) -> Result<Array<T>> {
        group_len(&[array.shape()])
            .and_then(|n| check_len(0, self.len(), n))
            .and_then(|()| array.select_rows(&self.indices))
    }
}

fn check_len(index: usize, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(PrepError::LengthMismatch {
            index,
            expected,
            actual,
        })
    }
}

/// Shared first-dimension length of a group of shapes
fn group_len(shapes: &[&[usize]]) -> Result<usize> {
    let mut expected = None;
    for (index, shape) in shapes.iter().enumerate() {
        let &len = shape.first().ok_or_else(|| {
            PrepError::InvalidArgument(format!("array {index} is 0-dimensional"))
        })?;
        match expected {
            None => expected = Some(len),
            Some(n) => check_len(index, n, len)?,
        }
    }
    expected.ok_or_else(|| PrepError::InvalidArgument("no arrays to shuffle".to_string()))
}

/// Run `f` with the generator selected by `seed`
fn with_seed<O>(seed: Option<u64>, f: impl FnOnce(&mut dyn RngCore) -> O) -> O {
    match seed {
        Some(seed) => f(&mut StdRng::seed_from_u64(seed)),
        None => f(&mut rand::rng()),
    }
}

/// Shuffle arrays in unison using a caller-owned generator
///
/// # Errors
/// `InvalidArgument` for an empty group or a scalar member,
/// `LengthMismatch` if first dimensions differ. Nothing is drawn from
/// `rng` when validation fails.
pub fn shuffle_unison_with_rng<T: Clone, R: Rng + ?Sized>(
    arrays: &[&Array<T>],
    rng: &mut R,
) -> Result<Vec<Array<T>>> {
    let shapes: Vec<&[usize]> = arrays.iter().map(|a| a.shape()).collect();
    let n = group_len(&shapes)?;
    debug!(arrays = arrays.len(), n, "shuffling arrays in unison");

    let perm = Permutation::random(n, rng);
    arrays.iter().map(|a| a.select_rows(perm.as_slice())).collect()
}

/// Shuffle arrays in unison
///
/// The same seed always gives the same permutation. `Some(0)` is an
/// ordinary seed; only `None` means unseeded.
///
/// # Errors
/// Same as [`shuffle_unison_with_rng`]
///
/// # Examples
/// ```
/// use labelprep::{Array, shuffle_unison};
///
/// let x = Array::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]).unwrap();
/// let y = Array::from_vec(vec![1, 4, 7]);
/// let out = shuffle_unison(&[&x, &y], Some(3)).unwrap();
/// for (row, label) in out[0].rows().zip(out[1].as_slice()) {
///     assert_eq!(row[0], *label);
/// }
/// ```
pub fn shuffle_unison<T: Clone>(arrays: &[&Array<T>], seed: Option<u64>) -> Result<Vec<Array<T>>> {
    debug!(seeded = seed.is_some(), "selecting shuffle generator");
    with_seed(seed, |rng| shuffle_unison_with_rng(arrays, rng))
}

/// Shuffle arrays of mixed element types in unison using a caller-owned
/// generator
///
/// # Errors
/// Same as [`shuffle_unison_with_rng`]
pub fn shuffle_unison_dyn_with_rng<R: Rng + ?Sized>(
    arrays: &[&DynArray],
    rng: &mut R,
) -> Result<Vec<DynArray>> {
    let shapes: Vec<&[usize]> = arrays.iter().map(|a| a.shape()).collect();
    let n = group_len(&shapes)?;
    debug!(arrays = arrays.len(), n, "shuffling mixed-type arrays in unison");

    let perm = Permutation::random(n, rng);
    arrays.iter().map(|a| a.select_rows(perm.as_slice())).collect()
}

/// Seeded form of [`shuffle_unison_dyn_with_rng`]
///
/// # Errors
/// Same as [`shuffle_unison_with_rng`]
pub fn shuffle_unison_dyn(arrays: &[&DynArray], seed: Option<u64>) -> Result<Vec<DynArray>> {
    with_seed(seed, |rng| shuffle_unison_dyn_with_rng(arrays, rng))
}

/// Shuffle a feature array and a target array of different element types
///
/// # Errors
/// `InvalidArgument` for a scalar input, `LengthMismatch` if the first
/// dimensions differ
pub fn shuffle_pair_with_rng<A: Clone, B: Clone, R: Rng + ?Sized>(
    x: &Array<A>,
    y: &Array<B>,
    rng: &mut R,
) -> Result<(Array<A>, Array<B>)> {
    let n = group_len(&[x.shape(), y.shape()])?;
    debug!(n, "shuffling array pair in unison");

    let perm = Permutation::random(n, rng);
    Ok((x.select_rows(perm.as_slice())?, y.select_rows(perm.as_slice())?))
}

/// Seeded form of [`shuffle_pair_with_rng`]
///
/// # Errors
/// Same as [`shuffle_pair_with_rng`]
pub fn shuffle_pair<A: Clone, B: Clone>(
    x: &Array<A>,
    y: &Array<B>,
    seed: Option<u64>,
) -> Result<(Array<A>, Array<B>)> {
    with_seed(seed, |rng| shuffle_pair_with_rng(x, y, rng))
}

/// Unison shuffler with a fixed seed setting
///
/// A seeded shuffler starts from the same state on every call and
/// therefore repeats its permutation for groups of equal length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Shuffler {
    seed: Option<u64>,
}

impl Shuffler {
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        Shuffler { seed }
    }

    #[must_use]
    pub fn from_config(config: &ShuffleConfig) -> Self {
        Self::new(config.seed)
    }

    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// # Errors
    /// Same as [`shuffle_unison`]
    pub fn shuffle<T: Clone>(&self, arrays: &[&Array<T>]) -> Result<Vec<Array<T>>> {
        shuffle_unison(arrays, self.seed)
    }

    /// # Errors
    /// Same as [`shuffle_unison_dyn`]
    pub fn shuffle_dyn(&self, arrays: &[&DynArray]) -> Result<Vec<DynArray>> {
        shuffle_unison_dyn(arrays, self.seed)
    }

    /// # Errors
    /// Same as [`shuffle_pair`]
    pub fn shuffle_pair<A: Clone, B: Clone>(
        &self,
        x: &Array<A>,
        y: &Array<B>,
    ) -> Result<(Array<A>, Array<B>)> {
        shuffle_pair(x, y, self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> Array<i32> {
        Array::from_rows(vec![
            vec![0, 0, 0],
            vec![1, 1, 1],
            vec![2, 2, 2],
            vec![3, 3, 3],
            vec![4, 4, 4],
        ])
        .unwrap()
    }

    #[test]
    fn test_permutation_from_indices() {
        assert!(Permutation::from_indices(vec![2, 0, 1]).is_ok());
        assert!(Permutation::from_indices(vec![0, 0, 1]).is_err());
        assert!(Permutation::from_indices(vec![0, 3, 1]).is_err());
        assert!(Permutation::from_indices(vec![]).is_ok());
    }

    #[test]
    fn test_permutation_inverse() {
        let p = Permutation::from_indices(vec![2, 0, 3, 1]).unwrap();
        let a = Array::from_vec(vec!['a', 'b', 'c', 'd']);
        let shuffled = p.apply(&a).unwrap();
        assert_eq!(shuffled.as_slice(), &['c', 'a', 'd', 'b']);

        let restored = p.inverse().apply(&shuffled).unwrap();
        assert_eq!(restored, a);
    }

    #[test]
    fn test_permutation_random_is_bijection() {
        let mut rng = StdRng::seed_from_u64(11);
        let p = Permutation::random(50, &mut rng);
        let mut sorted = p.as_slice().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, Permutation::identity(50).as_slice());
    }

    #[test]
    fn test_apply_length_mismatch() {
        let p = Permutation::identity(3);
        let a = Array::from_vec(vec![1, 2]);
        assert!(matches!(
            p.apply(&a),
            Err(PrepError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_shuffle_keeps_rows_paired() {
        let x = features();
        let y = Array::from_vec(vec![0, 1, 2, 3, 4]);
        let out = shuffle_unison(&[&x, &y], Some(42)).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].shape(), x.shape());
        assert_eq!(out[1].shape(), y.shape());
        for (row, label) in out[0].rows().zip(out[1].as_slice()) {
            assert!(row.iter().all(|v| v == label));
        }
    }

    #[test]
    fn test_shuffle_same_seed_same_order() {
        let y = Array::from_vec((0..100).collect::<Vec<u32>>());
        let a = shuffle_unison(&[&y], Some(7)).unwrap();
        let b = shuffle_unison(&[&y], Some(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_zero_is_a_real_seed() {
        let y = Array::from_vec((0..100).collect::<Vec<u32>>());
        let a = shuffle_unison(&[&y], Some(0)).unwrap();
        let b = shuffle_unison(&[&y], Some(0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_length_mismatch() {
        let x = features();
        let y = Array::from_rows(vec![vec![0], vec![1], vec![2]]).unwrap();
        let err = shuffle_unison(&[&x, &y], Some(1));
        assert!(matches!(
            err,
            Err(PrepError::LengthMismatch {
                index: 1,
                expected: 5,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_shuffle_empty_group() {
        let err = shuffle_unison::<f32>(&[], None);
        assert!(matches!(err, Err(PrepError::InvalidArgument(_))));
    }

    #[test]
    fn test_shuffle_scalar_rejected() {
        let s = Array::new(vec![1.0_f32], &[]).unwrap();
        let err = shuffle_unison(&[&s], None);
        assert!(matches!(err, Err(PrepError::InvalidArgument(_))));
    }

    #[test]
    fn test_shuffle_with_caller_rng_matches_seed() {
        let y = Array::from_vec((0..20).collect::<Vec<u8>>());
        let mut rng = StdRng::seed_from_u64(5);
        let a = shuffle_unison_with_rng(&[&y], &mut rng).unwrap();
        let b = shuffle_unison(&[&y], Some(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_failed_validation_draws_nothing() {
        let x = Array::from_vec(vec![1, 2, 3]);
        let y = Array::from_vec(vec![1, 2]);

        let mut rng = StdRng::seed_from_u64(9);
        assert!(shuffle_unison_with_rng(&[&x, &y], &mut rng).is_err());
        let after_error = rng.next_u64();

        let mut fresh = StdRng::seed_from_u64(9);
        assert_eq!(after_error, fresh.next_u64());
    }

    #[test]
    fn test_shuffle_pair_mixed_types() {
        let x = Array::from_rows(vec![vec![0.0_f32, 0.5], vec![1.0, 1.5], vec![2.0, 2.5]]).unwrap();
        let y = Array::from_vec(vec![0_u8, 1, 2]);
        let (xs, ys) = shuffle_pair(&x, &y, Some(3)).unwrap();
        for (row, &label) in xs.rows().zip(ys.as_slice()) {
            assert_eq!(row[0], f32::from(label));
        }
    }

    #[test]
    fn test_shuffle_dyn_three_types() {
        let ids = DynArray::from(Array::from_vec((0..25).collect::<Vec<i64>>()));
        let x = DynArray::from(
            Array::new((0..50).map(f64::from).collect::<Vec<f64>>(), &[25, 2]).unwrap(),
        );
        let mask = DynArray::from(Array::from_vec((0..25).map(|i| i % 2 == 0).collect::<Vec<_>>()));

        let out = shuffle_unison_dyn(&[&ids, &x, &mask], Some(8)).unwrap();
        assert_eq!(out[0].dtype(), ids.dtype());
        assert_eq!(out[1].shape(), &[25, 2]);

        let ids = out[0].as_i64().unwrap().as_slice();
        let rows = out[1].as_f64().unwrap();
        let mask = out[2].as_bool().unwrap().as_slice();
        for (r, &id) in ids.iter().enumerate() {
            let id_f = id as f64;
            assert_eq!(rows.row(r).unwrap(), &[2.0 * id_f, 2.0 * id_f + 1.0]);
            assert_eq!(mask[r], id % 2 == 0);
        }
    }

    #[test]
    fn test_shuffle_dyn_length_mismatch() {
        let a = DynArray::from(Array::from_vec(vec![1_u8, 2, 3]));
        let b = DynArray::from(Array::from_vec(vec![1.0_f32, 2.0]));
        assert!(matches!(
            shuffle_unison_dyn(&[&a, &b], None),
            Err(PrepError::LengthMismatch {
                index: 1,
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_shuffler_from_config() {
        let shuffler = Shuffler::from_config(&ShuffleConfig { seed: Some(21) });
        assert_eq!(shuffler.seed(), Some(21));

        let y = Array::from_vec((0..30).collect::<Vec<i64>>());
        let a = shuffler.shuffle(&[&y]).unwrap();
        let b = shuffler.shuffle(&[&y]).unwrap();
        assert_eq!(a, b);
    }
}
