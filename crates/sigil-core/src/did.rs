//! Bit-packed declaration identifiers
//!
//! A DID keys one registration event. It packs the block timestamp, the
//! source chain, and the transaction index into a single unsigned 64-bit
//! value:
//!
//! ```text
//! +--------------------+----------------+----------------+
//! | timestamp          | chain_id       | tx_idx         |
//! | (36 bits, seconds) | (14 bits)      | (14 bits)      |
//! +--------------------+----------------+----------------+
//! ```
//!
//! Because the timestamp occupies the high bits, DIDs for events on the same
//! chain sort in true chronological order, and DIDs across chains sort in
//! approximate chronological order (block time only). The registration
//! transaction enforces strict per-chain monotonicity on top of this layout;
//! the rollback handler tolerates the cross-chain approximation.

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bits reserved for the block timestamp (seconds since the unix epoch)
pub const TIMESTAMP_BITS: u32 = 36;
/// Bits reserved for the chain identifier
pub const CHAIN_BITS: u32 = 14;
/// Bits reserved for the transaction index within the block
pub const TX_IDX_BITS: u32 = 14;

const TIMESTAMP_MAX: u64 = (1 << TIMESTAMP_BITS) - 1;
const CHAIN_MAX: u16 = (1 << CHAIN_BITS) - 1;
const TX_IDX_MAX: u16 = (1 << TX_IDX_BITS) - 1;

/// Numeric identifier of an observed blockchain
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChainId(pub u16);

impl ChainId {
    /// Get the raw chain number
    pub fn get(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declaration identifier — 64-bit monotonic key for one registration event
///
/// Ordering on `Did` is ordering on the packed integer, which is the primary
/// ordering key of the whole ledger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Did(u64);

impl Did {
    /// Pack a timestamp, chain id, and transaction index into a DID
    ///
    /// Fails with an encoding error when any field exceeds its bit width.
    /// This runs before any store interaction, so an oversized declaration
    /// is rejected as a validation failure.
    pub fn pack(timestamp: u64, chain_id: ChainId, tx_idx: u16) -> Result<Self> {
        if timestamp > TIMESTAMP_MAX {
            return Err(RegistryError::encoding(format!(
                "timestamp {timestamp} exceeds {TIMESTAMP_BITS} bits"
            )));
        }
        if chain_id.get() > CHAIN_MAX {
            return Err(RegistryError::encoding(format!(
                "chain id {chain_id} exceeds {CHAIN_BITS} bits"
            )));
        }
        if tx_idx > TX_IDX_MAX {
            return Err(RegistryError::encoding(format!(
                "tx index {tx_idx} exceeds {TX_IDX_BITS} bits"
            )));
        }
        let packed = (timestamp << (CHAIN_BITS + TX_IDX_BITS))
            | (u64::from(chain_id.get()) << TX_IDX_BITS)
            | u64::from(tx_idx);
        Ok(Self(packed))
    }

    /// Reconstruct a DID from its packed representation
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the packed 64-bit value
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Block timestamp in seconds since the unix epoch
    pub fn timestamp(&self) -> u64 {
        self.0 >> (CHAIN_BITS + TX_IDX_BITS)
    }

    /// Source chain identifier
    pub fn chain_id(&self) -> ChainId {
        ChainId(((self.0 >> TX_IDX_BITS) & u64::from(CHAIN_MAX)) as u16)
    }

    /// Transaction index within the block
    pub fn tx_idx(&self) -> u16 {
        (self.0 & u64::from(TX_IDX_MAX)) as u16
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Did {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s
            .parse::<u64>()
            .map_err(|e| RegistryError::encoding(format!("invalid did {s:?}: {e}")))?;
        Ok(Self(raw))
    }
}

impl From<Did> for u64 {
    fn from(did: Did) -> Self {
        did.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_pack_layout() {
        let did = Did::pack(1_649_008_119, ChainId(2), 0).unwrap();
        assert_eq!(did.get(), 442_652_246_371_500_032);
        assert_eq!(did.timestamp(), 1_649_008_119);
        assert_eq!(did.chain_id(), ChainId(2));
        assert_eq!(did.tx_idx(), 0);
    }

    #[test]
    fn test_pack_orders_by_time_then_tx() {
        let a = Did::pack(100, ChainId(5), 3).unwrap();
        let b = Did::pack(100, ChainId(5), 4).unwrap();
        let c = Did::pack(101, ChainId(5), 0).unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_pack_rejects_oversized_fields() {
        assert_matches!(
            Did::pack(1 << 36, ChainId(1), 0),
            Err(RegistryError::Encoding { .. })
        );
        assert_matches!(
            Did::pack(1, ChainId(1 << 14), 0),
            Err(RegistryError::Encoding { .. })
        );
        assert_matches!(
            Did::pack(1, ChainId(1), 1 << 14),
            Err(RegistryError::Encoding { .. })
        );
    }

    #[test]
    fn test_pack_accepts_max_fields() {
        let did = Did::pack((1 << 36) - 1, ChainId((1 << 14) - 1), (1 << 14) - 1).unwrap();
        assert_eq!(did.get(), u64::MAX);
        assert_eq!(did.timestamp(), (1 << 36) - 1);
    }

    #[test]
    fn test_display_round_trip() {
        let did = Did::pack(1_231_003_770, ChainId(3), 1722).unwrap();
        let parsed: Did = did.to_string().parse().unwrap();
        assert_eq!(parsed, did);
    }
}
