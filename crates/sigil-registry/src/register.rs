//! Registration transaction
//!
//! Turns a declaration into a new ledger record inside one atomic unit of
//! work: ordering check, actor bookkeeping, minting, supersede, insert.

use crate::config::RegistryConfig;
use crate::resolver::resolve_mint;
use sigil_core::{ActorRole, Declaration, IdentifierRecord, RegistryError, Result};
use sigil_store::StoreTransaction;

/// Register a declaration inside an open transaction
///
/// The caller owns the transaction and commits on success; any error leaves
/// it to be dropped, which aborts with no partial writes.
pub(crate) fn register_in(
    tx: &mut dyn StoreTransaction,
    declaration: &Declaration,
    config: &RegistryConfig,
) -> Result<IdentifierRecord> {
    let did = declaration.did()?;

    // Serialize against other registrations for this chain, then enforce
    // strict per-chain monotonicity: a DID at or above ours must not exist.
    tx.lock_chain(declaration.chain_id)?;
    if let Some(existing) = tx.first_did_at_or_after(declaration.chain_id, did)? {
        if existing == did {
            return Err(RegistryError::duplicate(format!(
                "declaration {did} already registered"
            )));
        }
        return Err(RegistryError::out_of_order(format!(
            "declaration {did} precedes already-registered {existing} on chain {}",
            declaration.chain_id
        )));
    }

    tx.ensure_actor(&declaration.declarer, ActorRole::Declarer)?;
    if let Some(registrar) = &declaration.registrar {
        tx.ensure_actor(registrar, ActorRole::Registrar)?;
    }

    let asset_id = resolve_mint(
        tx,
        &declaration.descriptor,
        declaration.chain_id,
        &declaration.declarer,
        config,
    )?;

    let revision = tx.revision_count(&asset_id)? + 1;
    if let Some(prior) = tx.active_for_asset(&asset_id)? {
        tx.set_active(prior.did, false)?;
    }

    let record = IdentifierRecord {
        did,
        asset_id,
        descriptor: declaration.descriptor.clone(),
        declarer: declaration.declarer.clone(),
        owner: declaration.declarer.clone(),
        registrar: declaration.registrar.clone(),
        active: true,
        frozen: declaration.freeze_requested(),
        deleted: declaration.delete_requested(),
        revision,
        chain_id: declaration.chain_id,
        block_height: declaration.block_height,
        block_hash: declaration.block_hash.clone(),
        tx_idx: declaration.tx_idx,
        tx_hash: declaration.tx_hash.clone(),
        timestamp: declaration.timestamp,
        meta_url: declaration.meta_url.clone(),
        metadata: None,
    };
    tx.insert_record(record.clone())?;
    Ok(record)
}
