use crate::encode::encode_data;
use crate::error::{Error, Result};
use crate::hash::{reduce_mod, PermutationHasher};

/// Slot-array state shared by both filter variants: the fixed-size `u8`
/// slot array, the hash parameters and the operation counter.
///
/// The variants differ only in how they write to the slots; everything
/// else (indexing, membership reads, equality, wire state) lives here.
pub(crate) struct FilterCore<PH> {
    m: usize,
    k: usize,
    slots: Vec<u8>,
    count: u64,
    hasher: PH,
}

fn check_slot_count(m: u64) -> Result<usize> {
    if m == 0 || m > i64::max_value() as u64 {
        return Err(Error::InvalidSlotCount(m));
    }
    Ok(m as usize)
}

impl<PH: PermutationHasher> FilterCore<PH> {
    pub fn new(m: usize, k: usize, hasher: PH) -> Result<Self> {
        let m = check_slot_count(m as u64)?;
        Ok(Self {
            m,
            k,
            slots: vec![0; m],
            count: 0,
            hasher,
        })
    }

    /// Rebuilds a core from decoded wire state, replacing every field.
    pub fn from_state(m: u64, k: u64, slots: Vec<u8>, count: u64, hasher: PH) -> Result<Self> {
        let m = check_slot_count(m)?;
        if slots.len() != m {
            return Err(Error::SlotCountMismatch {
                declared: m as u64,
                actual: slots.len() as u64,
            });
        }
        Ok(Self {
            m,
            k: k as usize,
            slots,
            count,
            hasher,
        })
    }

    /// The k slot indices for one input, in round order. Not deduplicated:
    /// colliding rounds yield repeated indices and each occurrence is
    /// applied independently by the callers.
    pub fn slots_for_key(&self, data: &[u8]) -> Result<Vec<usize>> {
        // Encode once; only the round salt varies across the k derivations.
        let x = encode_data(data);
        (0..self.k)
            .map(|round| {
                let h = self.hasher.hash(x, round as u64)?;
                Ok(reduce_mod(h, self.m))
            })
            .collect()
    }

    pub fn is_member(&self, indices: &[usize]) -> bool {
        indices.iter().all(|&i| self.slots[i] != 0)
    }

    pub fn test(&self, data: &[u8]) -> Result<bool> {
        Ok(self.is_member(&self.slots_for_key(data)?))
    }

    /// Plain-Bloom write: every touched slot becomes 1.
    pub fn set_ones(&mut self, indices: &[usize]) {
        indices.iter().for_each(|&i| self.slots[i] = 1);
    }

    /// Counting write: every touched occurrence gains 1, saturating at 255.
    pub fn increment_all(&mut self, indices: &[usize]) {
        indices.iter().for_each(|&i| self.slots[i] = self.slots[i].saturating_add(1));
    }

    /// Counting removal: every touched occurrence loses 1, saturating at 0.
    pub fn decrement_all(&mut self, indices: &[usize]) {
        indices.iter().for_each(|&i| self.slots[i] = self.slots[i].saturating_sub(1));
    }

    pub fn bump_count(&mut self) {
        self.count += 1;
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Defensive copy of the slot array.
    pub fn slots(&self) -> Vec<u8> {
        self.slots.clone()
    }

    pub fn slots_ref(&self) -> &[u8] {
        &self.slots
    }

    /// Projects every slot to 1 iff it is nonzero, keeping `m`, `k` and
    /// `count`. A zero slot maps straight to 0; no arithmetic is performed
    /// on the counter value.
    pub fn project_ones(&self) -> FilterCore<PH>
    where
        PH: Clone,
    {
        FilterCore {
            m: self.m,
            k: self.k,
            slots: self.slots.iter().map(|&v| if v == 0 { 0 } else { 1 }).collect(),
            count: self.count,
            hasher: self.hasher.clone(),
        }
    }

    /// Structural equality over `(m, k, count, slots)`; the hasher is
    /// configuration, not state, and is not compared.
    pub fn state_eq(&self, other: &Self) -> bool {
        self.m == other.m && self.k == other.k && self.count == other.count && self.slots == other.slots
    }
}
