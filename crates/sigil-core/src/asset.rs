//! Asset identifier text forms and deterministic minting
//!
//! # Text Forms
//!
//! Both the declared descriptor and the minted asset id use the RFC 4648
//! base32 alphabet (`A-Z2-7`, upper case, no padding):
//!
//! ```text
//! descriptor: 15-73 characters, supplied by the declarer
//! asset id:   base32_no_pad(blake3(domain || fields)[..10]) — 16 characters
//! ```
//!
//! # Candidate Derivation
//!
//! `mint_candidate` hashes the descriptor, chain id, declarer wallet, and a
//! collision counter under a domain-separation prefix. Variable-length
//! fields are length-prefixed so distinct inputs can never produce the same
//! hash preimage. Same inputs always yield the same candidate; bumping the
//! counter yields a different one. The registry probes counters upward until
//! it finds a candidate that is free or updatable.
//!
//! Unknown characters and wrong lengths are rejected at parse time
//! (fail-closed).

use crate::did::ChainId;
use crate::error::{RegistryError, Result};
use crate::record::Wallet;
use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Domain separation string for asset-id hashing
const MINT_DOMAIN: &[u8] = b"sigil:asset-id:v1\0";

/// Digest bytes kept for the asset-id text form (16 base32 characters)
const ASSET_ID_DIGEST_LEN: usize = 10;

/// Length of the asset-id text form
pub const ASSET_ID_LEN: usize = 16;

/// Minimum descriptor length
pub const DESCRIPTOR_MIN_LEN: usize = 15;
/// Maximum descriptor length
pub const DESCRIPTOR_MAX_LEN: usize = 73;

fn is_base32_alphabet(s: &str) -> bool {
    s.bytes()
        .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b))
}

/// Content-derived code describing the declared asset
///
/// Supplied by the declarer; the registry treats it as an opaque,
/// fixed-alphabet string and only validates its shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Descriptor(String);

impl Descriptor {
    /// Validate and wrap a descriptor code
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        if code.len() < DESCRIPTOR_MIN_LEN || code.len() > DESCRIPTOR_MAX_LEN {
            return Err(RegistryError::encoding(format!(
                "descriptor length {} outside {DESCRIPTOR_MIN_LEN}..={DESCRIPTOR_MAX_LEN}",
                code.len()
            )));
        }
        if !is_base32_alphabet(&code) {
            return Err(RegistryError::encoding(format!(
                "descriptor {code:?} contains characters outside A-Z2-7"
            )));
        }
        Ok(Self(code))
    }

    /// Get the descriptor text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Descriptor {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Descriptor {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Descriptor> for String {
    fn from(descriptor: Descriptor) -> Self {
        descriptor.0
    }
}

/// Globally unique minted identifier for a declared asset/wallet pairing
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(String);

impl AssetId {
    /// Validate and wrap an asset-id text form
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.len() != ASSET_ID_LEN {
            return Err(RegistryError::encoding(format!(
                "asset id length {} is not {ASSET_ID_LEN}",
                id.len()
            )));
        }
        if !is_base32_alphabet(&id) {
            return Err(RegistryError::encoding(format!(
                "asset id {id:?} contains characters outside A-Z2-7"
            )));
        }
        Ok(Self(id))
    }

    /// Get the asset-id text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AssetId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for AssetId {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<AssetId> for String {
    fn from(asset_id: AssetId) -> Self {
        asset_id.0
    }
}

/// Derive the candidate asset id for a declaration and collision counter
///
/// Pure and deterministic: the same `(descriptor, chain_id, wallet, counter)`
/// always produces the same candidate, and different counters diverge with
/// overwhelming probability.
pub fn mint_candidate(
    descriptor: &Descriptor,
    chain_id: ChainId,
    wallet: &Wallet,
    counter: u32,
) -> AssetId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(MINT_DOMAIN);
    hasher.update(&(descriptor.as_str().len() as u32).to_be_bytes());
    hasher.update(descriptor.as_str().as_bytes());
    hasher.update(&chain_id.get().to_be_bytes());
    hasher.update(&(wallet.as_str().len() as u32).to_be_bytes());
    hasher.update(wallet.as_str().as_bytes());
    hasher.update(&counter.to_be_bytes());
    let digest = hasher.finalize();
    AssetId(BASE32_NOPAD.encode(&digest.as_bytes()[..ASSET_ID_DIGEST_LEN]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn descriptor() -> Descriptor {
        Descriptor::new("KACT4EBWRBH5I5VGXTVS3YGXPOTQ").unwrap()
    }

    fn wallet() -> Wallet {
        Wallet::new("0x1ad91ee08f21be3de0ba2ba6918e714da6b45836")
    }

    #[test]
    fn test_descriptor_rejects_bad_shapes() {
        assert_matches!(
            Descriptor::new("SHORT"),
            Err(RegistryError::Encoding { .. })
        );
        assert_matches!(
            Descriptor::new("kact4ebwrbh5i5vgxtvs3ygxpotq"),
            Err(RegistryError::Encoding { .. })
        );
        assert_matches!(
            Descriptor::new("KACT4EBWRBH5I0VGXTVS3YGXPOTQ"),
            Err(RegistryError::Encoding { .. })
        );
        assert_matches!(
            Descriptor::new("A".repeat(74)),
            Err(RegistryError::Encoding { .. })
        );
    }

    #[test]
    fn test_mint_is_deterministic() {
        let a = mint_candidate(&descriptor(), ChainId(2), &wallet(), 0);
        let b = mint_candidate(&descriptor(), ChainId(2), &wallet(), 0);
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), ASSET_ID_LEN);
    }

    #[test]
    fn test_mint_counter_diverges() {
        let a = mint_candidate(&descriptor(), ChainId(2), &wallet(), 0);
        let b = mint_candidate(&descriptor(), ChainId(2), &wallet(), 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_mint_output_parses_back() {
        let minted = mint_candidate(&descriptor(), ChainId(2), &wallet(), 7);
        let parsed: AssetId = minted.as_str().parse().unwrap();
        assert_eq!(parsed, minted);
    }

    #[test]
    fn test_mint_sensitive_to_every_field() {
        let base = mint_candidate(&descriptor(), ChainId(2), &wallet(), 0);
        let other_chain = mint_candidate(&descriptor(), ChainId(3), &wallet(), 0);
        let other_wallet = mint_candidate(
            &descriptor(),
            ChainId(2),
            &Wallet::new("0x0000000000000000000000000000000000000000"),
            0,
        );
        assert_ne!(base, other_chain);
        assert_ne!(base, other_wallet);
    }
}
