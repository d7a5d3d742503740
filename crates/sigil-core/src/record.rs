//! Ledger records, actors, and chain reference data
//!
//! An [`IdentifierRecord`] is one append-only ledger entry: a registration
//! event together with the asset id it minted or superseded. Records are
//! never updated in place except for the `active` flag (flipped by a later
//! registration or by rollback) and the `metadata` blob (attached once,
//! asynchronously). Deletion happens only during rollback.

use crate::asset::{AssetId, Descriptor};
use crate::did::{ChainId, Did};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Wallet address identifying an actor
///
/// Compared byte-for-byte; the registry does not normalize casing or
/// checksum formats, matching how declarations are reported on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wallet(String);

impl Wallet {
    /// Wrap a wallet address
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Get the address text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Wallet {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

/// Role an actor holds within the registry
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ActorRole {
    /// Party that declared an asset on-chain
    Declarer,
    /// Party that relayed the declaration to the ledger
    Registrar,
}

/// Wallet identity referenced by ledger records
///
/// Created lazily on first reference and never deleted. Roles are additive:
/// an actor may hold both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Wallet address (primary key)
    pub wallet: Wallet,
    /// Roles this wallet has appeared in
    pub roles: BTreeSet<ActorRole>,
}

impl Actor {
    /// Create an actor holding a single role
    pub fn with_role(wallet: Wallet, role: ActorRole) -> Self {
        let mut roles = BTreeSet::new();
        roles.insert(role);
        Self { wallet, roles }
    }
}

/// Static reference data for an observed blockchain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    /// Numeric chain identifier
    pub chain_id: ChainId,
    /// Short display name
    pub name: String,
    /// Explorer URL template for ledger references
    pub url_template: Option<String>,
}

/// One append-only ledger entry for a registration event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierRecord {
    /// Declaration identifier (primary key)
    pub did: Did,
    /// Minted asset id for this event; repeats across revisions of the same
    /// logical asset
    pub asset_id: AssetId,
    /// Declared asset descriptor code
    pub descriptor: Descriptor,
    /// Wallet that made the declaration
    pub declarer: Wallet,
    /// Wallet that currently controls the asset id
    pub owner: Wallet,
    /// Optional relaying registrar
    pub registrar: Option<Wallet>,
    /// Whether this is the authoritative record for its asset id
    pub active: bool,
    /// Updates permanently disabled by the freeze sentinel
    pub frozen: bool,
    /// Soft-deleted by the delete sentinel
    pub deleted: bool,
    /// 1 + number of prior records sharing this asset id
    pub revision: u32,
    /// Source chain
    pub chain_id: ChainId,
    /// Block height on the source chain
    pub block_height: u64,
    /// Hash of the block containing the declaration
    pub block_hash: String,
    /// Transaction index within the block
    pub tx_idx: u16,
    /// Hash of the declaring transaction
    pub tx_hash: String,
    /// Block timestamp in seconds since the unix epoch
    pub timestamp: u64,
    /// Optional URL with off-chain metadata
    pub meta_url: Option<String>,
    /// Metadata blob attached asynchronously after registration
    pub metadata: Option<serde_json::Value>,
}

impl IdentifierRecord {
    /// May `declarer` overwrite this record with a new revision?
    ///
    /// True iff the declarer owns the record, the record is neither frozen
    /// nor deleted, and the descriptor matches. When false, the minting
    /// resolver advances its counter instead of superseding.
    pub fn can_update(&self, declarer: &Wallet, descriptor: &Descriptor) -> bool {
        self.owner == *declarer
            && !self.frozen
            && !self.deleted
            && self.descriptor == *descriptor
    }

    /// Project the ledger reference fields
    pub fn head(&self) -> Head {
        Head {
            chain_id: self.chain_id,
            block_height: self.block_height,
            block_hash: self.block_hash.clone(),
            tx_idx: self.tx_idx,
            tx_hash: self.tx_hash.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// Ledger reference fields of the latest registration event for a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Head {
    /// Source chain
    pub chain_id: ChainId,
    /// Block height on the source chain
    pub block_height: u64,
    /// Hash of the block
    pub block_hash: String,
    /// Transaction index within the block
    pub tx_idx: u16,
    /// Hash of the transaction
    pub tx_hash: String,
    /// Block timestamp in seconds since the unix epoch
    pub timestamp: u64,
}

impl From<&IdentifierRecord> for Head {
    fn from(record: &IdentifierRecord) -> Self {
        record.head()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::mint_candidate;

    fn record() -> IdentifierRecord {
        let descriptor = Descriptor::new("KACT4EBWRBH5I5VGXTVS3YGXPOTQ").unwrap();
        let wallet = Wallet::new("0x1ad91ee08f21be3de0ba2ba6918e714da6b45836");
        IdentifierRecord {
            did: Did::pack(1_649_008_119, ChainId(2), 0).unwrap(),
            asset_id: mint_candidate(&descriptor, ChainId(2), &wallet, 0),
            descriptor,
            declarer: wallet.clone(),
            owner: wallet,
            registrar: None,
            active: true,
            frozen: false,
            deleted: false,
            revision: 1,
            chain_id: ChainId(2),
            block_height: 14_500_000,
            block_hash: "0xaa".to_string(),
            tx_idx: 0,
            tx_hash: "0xbb".to_string(),
            timestamp: 1_649_008_119,
            meta_url: None,
            metadata: None,
        }
    }

    #[test]
    fn test_can_update_requires_all_clauses() {
        let r = record();
        let owner = r.owner.clone();
        let descriptor = r.descriptor.clone();
        assert!(r.can_update(&owner, &descriptor));

        let stranger = Wallet::new("0x0000000000000000000000000000000000000000");
        assert!(!r.can_update(&stranger, &descriptor));

        let other_code = Descriptor::new("KACYPXW445FTYNJ3CYSXHAFJMA2").unwrap();
        assert!(!r.can_update(&owner, &other_code));

        let mut frozen = record();
        frozen.frozen = true;
        assert!(!frozen.can_update(&owner, &descriptor));

        let mut deleted = record();
        deleted.deleted = true;
        assert!(!deleted.can_update(&owner, &descriptor));
    }

    #[test]
    fn test_head_projection() {
        let r = record();
        let head = r.head();
        assert_eq!(head.chain_id, r.chain_id);
        assert_eq!(head.block_hash, r.block_hash);
        assert_eq!(head.timestamp, r.timestamp);
    }
}
