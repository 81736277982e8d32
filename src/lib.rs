mod classic;
mod codec;
mod core;
mod counting;
mod encode;
mod error;
mod hash;

pub use crate::classic::Filter as BloomFilter;
pub use crate::counting::Filter as CountingBloomFilter;
pub use crate::encode::encode_data;
pub use crate::error::{Error, Result};
pub use crate::hash::{Mimc7, PermutationHasher, slot_index};

/// The capability set shared by both filter variants.
///
/// Every operation derives k slot indices from the input bytes through the
/// permutation hash; a collaborator failure aborts the operation with
/// [`Error::Hash`] and leaves the filter unchanged.
pub trait Filter {
    /// True iff every one of the k derived slots is nonzero. Pure read.
    fn test(&self, data: &[u8]) -> Result<bool>;

    /// Records the item in the k derived slots and increments the
    /// operation count.
    fn add(&mut self, data: &[u8]) -> Result<()>;

    /// [`Filter::add`], returning the membership result computed against
    /// the pre-mutation slot values.
    fn test_and_add(&mut self, data: &[u8]) -> Result<bool>;

    /// Removes the item if the variant supports removal and the membership
    /// check holds; returns that membership result.
    fn test_and_remove(&mut self, data: &[u8]) -> Result<bool>;
}
