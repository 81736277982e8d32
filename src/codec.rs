use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// The structured wire object. Field order and names are part of the
/// format: compact JSON `{"M":..,"K":..,"Data":"<hex>","Count":..}`
/// wrapped in standard padded base64.
#[derive(Serialize, Deserialize)]
struct WireFilter {
    #[serde(rename = "M")]
    m: u64,
    #[serde(rename = "K")]
    k: u64,
    #[serde(rename = "Data")]
    data: String,
    #[serde(rename = "Count")]
    count: u64,
}

/// Decoded wire state, not yet validated against a variant.
pub(crate) struct RawState {
    pub m: u64,
    pub k: u64,
    pub slots: Vec<u8>,
    pub count: u64,
}

pub(crate) fn encode(m: usize, k: usize, slots: &[u8], count: u64) -> Result<String> {
    let wire = WireFilter {
        m: m as u64,
        k: k as u64,
        data: hex::encode(slots),
        count,
    };
    Ok(base64::encode(serde_json::to_string(&wire)?))
}

pub(crate) fn decode(src: &str) -> Result<RawState> {
    let json = base64::decode(src)?;
    let wire: WireFilter = serde_json::from_slice(&json)?;
    let slots = hex::decode(&wire.data)?;
    if slots.len() as u64 != wire.m {
        return Err(Error::SlotCountMismatch {
            declared: wire.m,
            actual: slots.len() as u64,
        });
    }
    Ok(RawState {
        m: wire.m,
        k: wire.k,
        slots,
        count: wire.count,
    })
}
