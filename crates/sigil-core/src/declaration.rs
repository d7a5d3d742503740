//! Observer-reported declaration events
//!
//! A declaration is the input to registration: one wallet declaring
//! ownership of a content-identified asset at a specific chain, block, and
//! transaction. It is immutable once received and never persisted verbatim —
//! the registration transaction turns it into an [`IdentifierRecord`].
//!
//! [`IdentifierRecord`]: crate::record::IdentifierRecord

use crate::asset::Descriptor;
use crate::did::{ChainId, Did};
use crate::error::Result;
use crate::record::Wallet;
use serde::{Deserialize, Serialize};

/// Processing message requesting a permanent update freeze
pub const FREEZE_MESSAGE: &str = "frz:";
/// Processing message requesting a soft delete
pub const DELETE_MESSAGE: &str = "del:";

/// An on-chain asset declaration reported by a blockchain observer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Block timestamp in seconds since the unix epoch
    pub timestamp: u64,
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
    /// Wallet of the declaring party
    pub declarer: Wallet,
    /// Content-derived asset descriptor code
    pub descriptor: Descriptor,
    /// Optional processing message (freeze/delete sentinels)
    #[serde(default)]
    pub message: Option<String>,
    /// Optional URL with off-chain metadata
    #[serde(default)]
    pub meta_url: Option<String>,
    /// Optional wallet of the relaying registrar
    #[serde(default)]
    pub registrar: Option<Wallet>,
}

impl Declaration {
    /// Derive the declaration identifier for this event
    ///
    /// Fails with an encoding error before any store interaction when a
    /// field exceeds its bit width.
    pub fn did(&self) -> Result<Did> {
        Did::pack(self.timestamp, self.chain_id, self.tx_idx)
    }

    /// True iff the processing message is the literal freeze sentinel
    pub fn freeze_requested(&self) -> bool {
        self.message.as_deref() == Some(FREEZE_MESSAGE)
    }

    /// True iff the processing message is the literal delete sentinel
    pub fn delete_requested(&self) -> bool {
        self.message.as_deref() == Some(DELETE_MESSAGE)
    }
}
