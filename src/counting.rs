use crate::classic;
use crate::codec;
use crate::core::FilterCore;
use crate::error::Result;
use crate::hash::PermutationHasher;

/// Counting Bloom filter: slots are 8-bit saturating counters, which makes
/// removal possible when no other member shares all k touched slots.
///
/// Overflow policy: a counter stuck at 255 stays at 255 on further adds
/// (saturation, never wraparound). Removing through a saturated counter can
/// therefore leave it too high, which errs toward false positives; a
/// wrapping counter would err toward false negatives instead.
pub struct Filter<PH> {
    pub(crate) core: FilterCore<PH>,
}

impl<PH: PermutationHasher> Filter<PH> {
    /// Creates an empty filter with `m` counters and `k` hash rounds.
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

    /// Number of operations applied: every add, and every removal that
    /// found its member. This counts duplicates and is not the number of
    /// distinct members.
    pub fn count(&self) -> u64 {
        self.core.count()
    }

    /// Defensive copy of the counter array.
    pub fn slots(&self) -> Vec<u8> {
        self.core.slots()
    }

    /// Lossy downgrade to a plain Bloom filter: each counter projects to 1
    /// iff it is nonzero; `m`, `k` and `count` carry over unchanged.
    pub fn to_bloom(&self) -> classic::Filter<PH>
    where
        PH: Clone,
    {
        classic::Filter {
            core: self.core.project_ones(),
        }
    }

    /// Encodes the filter state as base64-wrapped structured text.
    pub fn serialize(&self) -> Result<String> {
        codec::encode(self.m(), self.k(), self.core.slots_ref(), self.count())
    }

    /// Rebuilds a filter from its serialized form, replacing every field.
    pub fn deserialize(src: &str, hasher: PH) -> Result<Self> {
        let state = codec::decode(src)?;
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
        self.core.increment_all(&indices);
        self.core.bump_count();
        Ok(())
    }

    fn test_and_add(&mut self, data: &[u8]) -> Result<bool> {
        let indices = self.core.slots_for_key(data)?;
        let member = self.core.is_member(&indices);
        self.core.increment_all(&indices);
        self.core.bump_count();
        Ok(member)
    }

    /// Decrements the k touched counters as a batch, but only when the
    /// membership check over the pre-mutation values holds; a miss leaves
    /// the filter untouched. A successful removal also increments `count`
    /// (see [`Filter::count`]).
    fn test_and_remove(&mut self, data: &[u8]) -> Result<bool> {
        let indices = self.core.slots_for_key(data)?;
        let member = self.core.is_member(&indices);
        if member {
            self.core.decrement_all(&indices);
            self.core.bump_count();
        }
        Ok(member)
    }
}

impl<PH: PermutationHasher> PartialEq for Filter<PH> {
    fn eq(&self, other: &Self) -> bool {
        self.core.state_eq(&other.core)
    }
}

/// Cross-variant comparison is always false: a bit array and a counter
/// array are different structures even when their bytes coincide.
impl<PH> PartialEq<classic::Filter<PH>> for Filter<PH> {
    fn eq(&self, _other: &classic::Filter<PH>) -> bool {
        false
    }
}

impl<PH> PartialEq<Filter<PH>> for classic::Filter<PH> {
    fn eq(&self, _other: &Filter<PH>) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Mimc7;
    use crate::Filter as _;
    use proptest::collection::vec;
    use proptest::prelude::*;
    use rand::{thread_rng, Rng};

    const INPUT: &[u8] = b"1111111122222222111111112222222211111111222222221111111122222222";

    const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

    fn rand_letters(n: usize) -> Vec<u8> {
        let mut rng = thread_rng();
        (0..n).map(|_| LETTERS[rng.gen_range(0..LETTERS.len())]).collect()
    }

    #[test]
    fn add_then_test() {
        let mut filter = Filter::new(128, 4, Mimc7::new()).unwrap();
        assert_eq!(filter.count(), 0);
        assert!(!filter.test(INPUT).unwrap());

        filter.add(INPUT).unwrap();
        assert_eq!(filter.count(), 1);
        assert!(filter.test(INPUT).unwrap());
    }

    #[test]
    fn hundred_members_via_test_and_add() {
        let mut filter = Filter::new(1024, 4, Mimc7::new()).unwrap();
        let inputs: Vec<Vec<u8>> = (0..100).map(|_| rand_letters(64)).collect();

        for input in &inputs {
            // A true here is an index collision with earlier members, not
            // an error; only the final state matters.
            filter.test_and_add(input).unwrap();
        }
        assert_eq!(filter.count(), 100);
        for input in &inputs {
            assert!(filter.test(input).unwrap());
        }
    }

    #[test]
    fn remove_restores_pre_add_state() {
        let mut filter = Filter::new(1024, 4, Mimc7::new()).unwrap();
        for _ in 0..20 {
            filter.add(&rand_letters(64)).unwrap();
        }

        let input = loop {
            let candidate = rand_letters(64);
            if !filter.test(&candidate).unwrap() {
                break candidate;
            }
        };
        let slots_before = filter.slots();
        let count_before = filter.count();

        filter.add(&input).unwrap();
        assert!(filter.test(&input).unwrap());

        assert!(filter.test_and_remove(&input).unwrap());
        assert!(!filter.test(&input).unwrap());
        assert_eq!(filter.slots(), slots_before);
        // A successful removal is itself a counted operation.
        assert_eq!(filter.count(), count_before + 2);
    }

    #[test]
    fn missed_remove_mutates_nothing() {
        let mut filter = Filter::new(128, 4, Mimc7::new()).unwrap();
        filter.add(INPUT).unwrap();
        let slots = filter.slots();

        let absent = loop {
            let candidate = rand_letters(64);
            if !filter.test(&candidate).unwrap() {
                break candidate;
            }
        };
        assert!(!filter.test_and_remove(&absent).unwrap());
        assert_eq!(filter.slots(), slots);
        assert_eq!(filter.count(), 1);
    }

    #[test]
    fn test_and_add_reports_pre_mutation_membership() {
        let mut filter = Filter::new(128, 4, Mimc7::new()).unwrap();
        assert!(!filter.test_and_add(INPUT).unwrap());
        assert!(filter.test_and_add(INPUT).unwrap());
        assert_eq!(filter.count(), 2);
    }

    #[test]
    fn counters_saturate_at_255() {
        let mut filter = Filter::new(1, 1, Mimc7::new()).unwrap();
        for _ in 0..300 {
            filter.add(INPUT).unwrap();
        }
        assert_eq!(filter.slots(), vec![255]);
        assert_eq!(filter.count(), 300);

        assert!(filter.test_and_remove(INPUT).unwrap());
        assert_eq!(filter.slots(), vec![254]);
    }

    #[test]
    fn projection_to_bloom() {
        let mut filter = Filter::new(128, 4, Mimc7::new()).unwrap();
        filter.add(INPUT).unwrap();
        filter.add(INPUT).unwrap();
        filter.add(b"second member").unwrap();

        let bloom = filter.to_bloom();
        assert_eq!(bloom.m(), filter.m());
        assert_eq!(bloom.k(), filter.k());
        assert_eq!(bloom.count(), filter.count());
        let expected: Vec<u8> = filter.slots().iter().map(|&v| if v == 0 { 0 } else { 1 }).collect();
        assert_eq!(bloom.slots(), expected);
        assert!(bloom.test(INPUT).unwrap());
        assert!(bloom.test(b"second member").unwrap());
    }

    #[test]
    fn projection_keeps_empty_slots_empty() {
        let filter = Filter::new(16, 2, Mimc7::new()).unwrap();
        assert_eq!(filter.to_bloom().slots(), vec![0u8; 16]);
    }

    #[test]
    fn serialization_round_trip() {
        let mut filter = Filter::new(128, 4, Mimc7::new()).unwrap();
        filter.add(INPUT).unwrap();
        filter.add(&rand_letters(64)).unwrap();
        let restored = Filter::deserialize(&filter.serialize().unwrap(), Mimc7::new()).unwrap();
        assert!(filter == restored);
        assert!(restored.test(INPUT).unwrap());
    }

    #[test]
    fn slots_returns_a_copy() {
        let mut filter = Filter::new(128, 4, Mimc7::new()).unwrap();
        filter.add(INPUT).unwrap();
        let mut copy = filter.slots();
        copy.iter_mut().for_each(|v| *v = 0);
        assert!(filter.test(INPUT).unwrap());
        assert_ne!(filter.slots(), copy);
    }

    #[test]
    fn variants_never_compare_equal() {
        let counting = Filter::new(32, 2, Mimc7::new()).unwrap();
        let plain = crate::classic::Filter::new(32, 2, Mimc7::new()).unwrap();
        assert!(counting != plain);
        assert!(plain != counting);
    }

    fn _added_items_test_true(items: &[Vec<u8>]) {
        let mut filter = Filter::new(256, 4, Mimc7::new()).unwrap();
        items.iter().for_each(|i| filter.add(i).unwrap());
        assert_eq!(filter.count(), items.len() as u64);
        assert!(items.iter().all(|i| filter.test(i).unwrap()));

        let restored = Filter::deserialize(&filter.serialize().unwrap(), Mimc7::new()).unwrap();
        assert!(filter == restored);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn added_items_test_true(ref items in vec(vec(any::<u8>(), 0..64), 1..8)) {
            _added_items_test_true(items)
        }
    }
}
