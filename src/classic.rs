use crate::codec;
use crate::core::FilterCore;
use crate::error::{Error, Result};
use crate::hash::PermutationHasher;

/// Insert-only Bloom filter: slots hold 0 or 1.
pub struct Filter<PH> {
    pub(crate) core: FilterCore<PH>,
}

impl<PH: PermutationHasher> Filter<PH> {
    /// Creates an empty filter with `m` slots and `k` hash rounds.
    pub fn new(m: usize, k: usize, hasher: PH) -> Result<Self> {
        Ok(Self {
            core: FilterCore::new(m, k, hasher)?,
        })
    }

    pub fn m(&self) -> usize {
        self.core.m()
    }

    pub fn k(&self) -> usize {
        self.core.k()
    }

    /// Number of add-class operations applied, duplicates included.
    pub fn count(&self) -> u64 {
        self.core.count()
    }

    /// Defensive copy of the slot array.
    pub fn slots(&self) -> Vec<u8> {
        self.core.slots()
    }

    /// Encodes the filter state as base64-wrapped structured text.
    pub fn serialize(&self) -> Result<String> {
        codec::encode(self.m(), self.k(), self.core.slots_ref(), self.count())
    }

    /// Rebuilds a filter from its serialized form, replacing every field.
    /// Fails on malformed payloads and on slot values a plain Bloom filter
    /// cannot hold.
    pub fn deserialize(src: &str, hasher: PH) -> Result<Self> {
        let state = codec::decode(src)?;
        if let Some(&v) = state.slots.iter().find(|&&v| v > 1) {
            return Err(Error::OversizedSlot(v));
        }
        Ok(Self {
            core: FilterCore::from_state(state.m, state.k, state.slots, state.count, hasher)?,
        })
    }
}

impl<PH: PermutationHasher> crate::Filter for Filter<PH> {
    fn test(&self, data: &[u8]) -> Result<bool> {
        self.core.test(data)
    }

    fn add(&mut self, data: &[u8]) -> Result<()> {
        let indices = self.core.slots_for_key(data)?;
        self.core.set_ones(&indices);
        self.core.bump_count();
        Ok(())
    }

    fn test_and_add(&mut self, data: &[u8]) -> Result<bool> {
        let indices = self.core.slots_for_key(data)?;
        let member = self.core.is_member(&indices);
        self.core.set_ones(&indices);
        self.core.bump_count();
        Ok(member)
    }

    /// Always false: clearing a bit could evict other members that collided
    /// on the slot, so a plain Bloom filter cannot support removal.
    fn test_and_remove(&mut self, _data: &[u8]) -> Result<bool> {
        Ok(false)
    }
}

impl<PH: PermutationHasher> PartialEq for Filter<PH> {
    fn eq(&self, other: &Self) -> bool {
        self.core.state_eq(&other.core)
    }
}
