//! In-memory reference store
//!
//! Keeps the whole ledger in ordered maps guarded by one mutex. A
//! transaction clones the tables on begin, mutates the working copy, and
//! swaps it back on commit; dropping the transaction discards the copy. The
//! guard is held for the transaction's lifetime, so units of work are fully
//! serialized and the per-row lock points are no-ops here.

use crate::store::{RegistryStore, StoreTransaction};
use parking_lot::{Mutex, MutexGuard};
use sigil_core::{
    Actor, ActorRole, AssetId, Chain, ChainId, Did, IdentifierRecord, RegistryError, Result,
    Wallet,
};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default, Clone)]
struct Tables {
    records: BTreeMap<Did, IdentifierRecord>,
    by_asset: BTreeSet<(AssetId, Did)>,
    by_chain: BTreeSet<(ChainId, Did)>,
    actors: BTreeMap<Wallet, Actor>,
    chains: BTreeMap<ChainId, Chain>,
}

impl Tables {
    fn asset_dids(&self, asset_id: &AssetId) -> impl DoubleEndedIterator<Item = Did> + '_ {
        let lo = (asset_id.clone(), Did::from_raw(0));
        let hi = (asset_id.clone(), Did::from_raw(u64::MAX));
        self.by_asset.range(lo..=hi).map(|(_, did)| *did)
    }

    fn chain_dids(&self, chain_id: ChainId) -> impl DoubleEndedIterator<Item = Did> + '_ {
        let lo = (chain_id, Did::from_raw(0));
        let hi = (chain_id, Did::from_raw(u64::MAX));
        self.by_chain.range(lo..=hi).map(|(_, did)| *did)
    }

    fn get(&self, did: Did) -> Result<&IdentifierRecord> {
        self.records
            .get(&did)
            .ok_or_else(|| RegistryError::not_found(format!("record {did}")))
    }
}

/// In-memory [`RegistryStore`] backed by ordered maps
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegistryStore for MemoryStore {
    fn begin(&self) -> Result<Box<dyn StoreTransaction + '_>> {
        let guard = self.tables.lock();
        let work = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, work }))
    }
}

/// One unit of work against a [`MemoryStore`]
pub struct MemoryTransaction<'a> {
    guard: MutexGuard<'a, Tables>,
    work: Tables,
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn lock_chain(&mut self, _chain_id: ChainId) -> Result<()> {
        // The store-wide mutex already serializes this unit of work.
        Ok(())
    }

    fn lock_asset(&mut self, _asset_id: &AssetId) -> Result<()> {
        Ok(())
    }

    fn record(&self, did: Did) -> Result<Option<IdentifierRecord>> {
        Ok(self.work.records.get(&did).cloned())
    }

    fn first_did_at_or_after(&self, chain_id: ChainId, did: Did) -> Result<Option<Did>> {
        let lo = (chain_id, did);
        let hi = (chain_id, Did::from_raw(u64::MAX));
        Ok(self.work.by_chain.range(lo..=hi).map(|(_, d)| *d).next())
    }

    fn latest_for_asset(&self, asset_id: &AssetId) -> Result<Option<IdentifierRecord>> {
        match self.work.asset_dids(asset_id).next_back() {
            Some(did) => Ok(Some(self.work.get(did)?.clone())),
            None => Ok(None),
        }
    }

    fn latest_for_asset_below(
        &self,
        asset_id: &AssetId,
        below: Did,
    ) -> Result<Option<IdentifierRecord>> {
        let lo = (asset_id.clone(), Did::from_raw(0));
        let hi = (asset_id.clone(), below);
        let found = self.work.by_asset.range(lo..hi).map(|(_, d)| *d).next_back();
        match found {
            Some(did) => Ok(Some(self.work.get(did)?.clone())),
            None => Ok(None),
        }
    }

    fn active_for_asset(&self, asset_id: &AssetId) -> Result<Option<IdentifierRecord>> {
        for did in self.work.asset_dids(asset_id) {
            let record = self.work.get(did)?;
            if record.active {
                return Ok(Some(record.clone()));
            }
        }
        Ok(None)
    }

    fn revision_count(&self, asset_id: &AssetId) -> Result<u32> {
        Ok(self.work.asset_dids(asset_id).count() as u32)
    }

    fn records_at_or_after(&self, did: Did) -> Result<Vec<IdentifierRecord>> {
        Ok(self
            .work
            .records
            .range(did..)
            .rev()
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn earliest_for_block(&self, block_hash: &str) -> Result<Option<IdentifierRecord>> {
        Ok(self
            .work
            .records
            .values()
            .find(|record| record.block_hash == block_hash)
            .cloned())
    }

    fn chain_records_desc(
        &self,
        chain_id: ChainId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<IdentifierRecord>> {
        self.work
            .chain_dids(chain_id)
            .rev()
            .skip(offset)
            .take(limit)
            .map(|did| self.work.get(did).cloned())
            .collect()
    }

    fn latest_active_for_chain(&self, chain_id: ChainId) -> Result<Option<IdentifierRecord>> {
        for did in self.work.chain_dids(chain_id).rev() {
            let record = self.work.get(did)?;
            if record.active {
                return Ok(Some(record.clone()));
            }
        }
        Ok(None)
    }

    fn latest_for_chain(&self, chain_id: ChainId) -> Result<Option<IdentifierRecord>> {
        match self.work.chain_dids(chain_id).next_back() {
            Some(did) => Ok(Some(self.work.get(did)?.clone())),
            None => Ok(None),
        }
    }

    fn all_records(&self) -> Result<Vec<IdentifierRecord>> {
        Ok(self.work.records.values().cloned().collect())
    }

    fn insert_record(&mut self, record: IdentifierRecord) -> Result<()> {
        if self.work.records.contains_key(&record.did) {
            return Err(RegistryError::integrity(format!(
                "record {} already exists",
                record.did
            )));
        }
        if record.active {
            if let Some(other) = self.active_for_asset(&record.asset_id)? {
                return Err(RegistryError::integrity(format!(
                    "asset {} already active at {}",
                    record.asset_id, other.did
                )));
            }
        }
        self.work
            .by_asset
            .insert((record.asset_id.clone(), record.did));
        self.work.by_chain.insert((record.chain_id, record.did));
        self.work.records.insert(record.did, record);
        Ok(())
    }

    fn set_active(&mut self, did: Did, active: bool) -> Result<()> {
        if active {
            let asset_id = self.work.get(did)?.asset_id.clone();
            if let Some(other) = self.active_for_asset(&asset_id)? {
                if other.did != did {
                    return Err(RegistryError::integrity(format!(
                        "asset {asset_id} already active at {}",
                        other.did
                    )));
                }
            }
        }
        let record = self
            .work
            .records
            .get_mut(&did)
            .ok_or_else(|| RegistryError::not_found(format!("record {did}")))?;
        record.active = active;
        Ok(())
    }

    fn set_metadata(&mut self, did: Did, metadata: serde_json::Value) -> Result<bool> {
        let record = self
            .work
            .records
            .get_mut(&did)
            .ok_or_else(|| RegistryError::not_found(format!("record {did}")))?;
        if record.metadata.is_some() {
            return Ok(false);
        }
        record.metadata = Some(metadata);
        Ok(true)
    }

    fn delete_record(&mut self, did: Did) -> Result<()> {
        let record = self
            .work
            .records
            .remove(&did)
            .ok_or_else(|| RegistryError::not_found(format!("record {did}")))?;
        self.work.by_asset.remove(&(record.asset_id, did));
        self.work.by_chain.remove(&(record.chain_id, did));
        Ok(())
    }

    fn ensure_actor(&mut self, wallet: &Wallet, role: ActorRole) -> Result<Actor> {
        let actor = self
            .work
            .actors
            .entry(wallet.clone())
            .or_insert_with(|| Actor::with_role(wallet.clone(), role));
        actor.roles.insert(role);
        Ok(actor.clone())
    }

    fn actor(&self, wallet: &Wallet) -> Result<Option<Actor>> {
        Ok(self.work.actors.get(wallet).cloned())
    }

    fn upsert_chain(&mut self, chain: Chain) -> Result<()> {
        self.work.chains.insert(chain.chain_id, chain);
        Ok(())
    }

    fn chain(&self, chain_id: ChainId) -> Result<Option<Chain>> {
        Ok(self.work.chains.get(&chain_id).cloned())
    }

    fn commit(self: Box<Self>) -> Result<()> {
        tracing::trace!(records = self.work.records.len(), "committing unit of work");
        let mut guard = self.guard;
        *guard = self.work;
        Ok(())
    }
}
