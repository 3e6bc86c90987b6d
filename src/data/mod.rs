pub mod label;
pub mod onehot;
pub mod shuffle;

pub use label::Label;
pub use onehot::{NumLabels, OneHotEncoder, one_hot, one_hot_array, one_hot_dyn};
pub use shuffle::{
    Permutation, Shuffler, shuffle_pair, shuffle_pair_with_rng, shuffle_unison, shuffle_unison_dyn,
    shuffle_unison_dyn_with_rng, shuffle_unison_with_rng,
};
