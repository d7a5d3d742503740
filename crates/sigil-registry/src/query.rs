//! Read-only registry queries

use sigil_core::{ChainId, Head, RegistryError, Result};
use sigil_store::StoreTransaction;

/// Ledger reference of the `offset`-th latest registration for a chain
pub(crate) fn head_in(tx: &dyn StoreTransaction, chain_id: ChainId, offset: usize) -> Result<Head> {
    let mut page = tx.chain_records_desc(chain_id, offset, 1)?;
    if let Some(record) = page.pop() {
        return Ok(record.head());
    }
    if tx.latest_for_chain(chain_id)?.is_none() {
        return Err(RegistryError::not_found(format!(
            "no registrations found for chain {chain_id}"
        )));
    }
    Err(RegistryError::not_found(format!(
        "no registration at offset {offset} for chain {chain_id}"
    )))
}
