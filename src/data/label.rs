use std::fmt::Debug;

/// Integer class label
///
/// A label maps to the one-hot column with the same index. Negative values
/// have no column.
pub trait Label: Copy + Ord + Debug {
    fn class_index(self) -> Option<usize>;
}

macro_rules! impl_label {
    ($($ty:ty),*) => {
        $(
            impl Label for $ty {
                #[inline]
                fn class_index(self) -> Option<usize> {
                    usize::try_from(self).ok()
                }
            }
        )*
    };
}

impl_label!(u8, u16, u32, u64, usize, i8, i16, i32, i64);
