use ark_bn254::Fr;
use ark_ff::PrimeField;

/// Reduces an arbitrary byte string into an element of the BN254 scalar
/// field, the input domain of the permutation hash.
///
/// The bytes are read as one big-endian unsigned integer and reduced modulo
/// the field modulus Q. An empty input encodes to zero.
pub fn encode_data(data: &[u8]) -> Fr {
    Fr::from_be_bytes_mod_order(data)
}
