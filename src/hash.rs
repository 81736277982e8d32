use crate::error::{Error, Result};
use ark_bn254::Fr;
use ark_crypto_primitives::CRH;
use ark_ff::{BigInteger, PrimeField, Zero};
use arkworks_mimc::params::mimc_7_91_bn254::{MIMC_7_91_BN254_PARAMS, MIMC_7_91_BN254_ROUND_KEYS};
use arkworks_mimc::params::round_keys_contants_to_vec;
use arkworks_mimc::{MiMC, MiMCNonFeistelCRH};

/// The permutation hash collaborator: deterministically maps a field
/// element and a round index to another field element.
///
/// The round index acts as a domain-separation salt so that the k slot
/// indices derived from one input are effectively independent.
pub trait PermutationHasher {
    fn hash(&self, x: Fr, round: u64) -> Result<Fr>;
}

/// MiMC-7 permutation over the BN254 scalar field: exponent 7, 91 rounds,
/// no key. The input fed to the permutation is the 32-byte big-endian
/// encoding of `x` followed by the 8-byte big-endian round index.
#[derive(Clone)]
pub struct Mimc7 {
    params: MiMC<Fr, MIMC_7_91_BN254_PARAMS>,
}

impl Mimc7 {
    pub fn new() -> Self {
        Self {
            params: MiMC::new(
                1,
                Fr::zero(),
                round_keys_contants_to_vec(&MIMC_7_91_BN254_ROUND_KEYS),
            ),
        }
    }
}

impl Default for Mimc7 {
    fn default() -> Self {
        Self::new()
    }
}

impl PermutationHasher for Mimc7 {
    fn hash(&self, x: Fr, round: u64) -> Result<Fr> {
        let mut input = x.into_repr().to_bytes_be();
        input.extend_from_slice(&round.to_be_bytes());
        <MiMCNonFeistelCRH<Fr, MIMC_7_91_BN254_PARAMS> as CRH>::evaluate(&self.params, &input)
            .map_err(|e| Error::Hash(e.to_string()))
    }
}

/// Derives a slot index in `[0, m)` for one hash round: encode the bytes
/// into the field, permute with the round salt, then reduce the 254-bit
/// result modulo `m`.
pub fn slot_index<PH: PermutationHasher>(
    hasher: &PH,
    data: &[u8],
    round: u64,
    m: usize,
) -> Result<usize> {
    let h = hasher.hash(crate::encode::encode_data(data), round)?;
    Ok(reduce_mod(h, m))
}

// Limb-wise long division remainder; m is validated at filter construction
// to fit in an i64, so the u128 intermediate cannot overflow.
pub(crate) fn reduce_mod(h: Fr, m: usize) -> usize {
    let mut rem: u128 = 0;
    for limb in h.into_repr().as_ref().iter().rev() {
        rem = ((rem << 64) | u128::from(*limb)) % m as u128;
    }
    rem as usize
}
