//! Fork rollback
//!
//! Undoes every registration event from a reported fork block onward, across
//! all chains, restoring the prior active record for each affected asset id.

use serde::{Deserialize, Serialize};
use sigil_core::{ChainId, Head, RegistryError, Result};
use sigil_store::StoreTransaction;

/// Result of a rollback: how much was undone and the restored chain head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackOutcome {
    /// Chain of the threshold record the rollback was anchored on
    pub chain_id: ChainId,
    /// Number of ledger records deleted
    pub undone: usize,
    /// Latest active (or, absent one, most recent) record for the chain;
    /// `None` when no record survives
    pub head: Option<Head>,
}

/// Roll the registry back to its state before `block_hash`
///
/// Records are unwound in descending DID order so that, for an asset id with
/// several superseding records inside the window, each is undone before its
/// predecessor is considered. Reactivation targets the highest-DID record
/// for the asset outside the window; the flag flips are idempotent, so a
/// partially rolled back window can be re-applied safely.
pub(crate) fn rollback_in(tx: &mut dyn StoreTransaction, block_hash: &str) -> Result<RollbackOutcome> {
    let threshold = tx
        .earliest_for_block(block_hash)?
        .ok_or_else(|| RegistryError::not_found(format!("block {block_hash} is unknown")))?;

    let window = tx.records_at_or_after(threshold.did)?;
    let mut undone = 0usize;
    for record in window {
        tx.set_active(record.did, false)?;
        if let Some(ancestor) = tx.latest_for_asset_below(&record.asset_id, threshold.did)? {
            tx.set_active(ancestor.did, true)?;
        }
        tx.delete_record(record.did)?;
        undone += 1;
    }

    let head = match tx.latest_active_for_chain(threshold.chain_id)? {
        Some(record) => Some(record.head()),
        None => tx.latest_for_chain(threshold.chain_id)?.map(|r| r.head()),
    };

    Ok(RollbackOutcome {
        chain_id: threshold.chain_id,
        undone,
        head,
    })
}
