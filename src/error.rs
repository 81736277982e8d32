use thiserror::Error;

/// Errors surfaced by filter construction, hashing and the wire codec.
#[derive(Debug, Error)]
pub enum Error {
    /// The slot array size is unusable: zero, or too large for the signed
    /// 64-bit modular reduction used by the slot hasher.
    #[error("invalid slot count {0}: must be in 1..=i64::MAX")]
    InvalidSlotCount(u64),

    /// The permutation hash collaborator failed. Deterministic, so the
    /// in-flight operation is aborted rather than retried.
    #[error("permutation hash failed: {0}")]
    Hash(String),

    #[error("malformed base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("malformed filter object: {0}")]
    Structure(#[from] serde_json::Error),

    #[error("malformed slot data hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// The decoded slot data does not contain exactly `M` bytes.
    #[error("slot data holds {actual} slots but M declares {declared}")]
    SlotCountMismatch { declared: u64, actual: u64 },

    /// A plain Bloom filter only admits slot values 0 and 1.
    #[error("slot value {0} out of range for a plain bloom filter")]
    OversizedSlot(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
