//! Store and transaction traits
//!
//! The query surface mirrors the indexes a relational layout would carry:
//! records keyed by DID, a secondary index on `(asset_id, did)` for revision
//! chains, a secondary index on `(chain_id, did)` for ordering checks and
//! heads, and an actor table keyed by wallet address.

use sigil_core::{
    Actor, ActorRole, AssetId, Chain, ChainId, Did, IdentifierRecord, Result, Wallet,
};

/// Handle to an ordered, indexed, transactional record store
pub trait RegistryStore: Send + Sync {
    /// Begin one atomic unit of work
    ///
    /// Dropping the returned transaction without calling
    /// [`StoreTransaction::commit`] aborts it with no partial writes.
    fn begin(&self) -> Result<Box<dyn StoreTransaction + '_>>;
}

/// One atomic unit of work against the store
///
/// Implementations must serialize concurrent transactions that touch the
/// same chain (DID ordering checks) or the same asset id (active-record
/// uniqueness), holding those locks until commit or abort.
pub trait StoreTransaction {
    /// Acquire the ordering lock for a chain
    fn lock_chain(&mut self, chain_id: ChainId) -> Result<()>;

    /// Acquire the mint/supersede lock for an asset id
    fn lock_asset(&mut self, asset_id: &AssetId) -> Result<()>;

    /// Look up a record by DID
    fn record(&self, did: Did) -> Result<Option<IdentifierRecord>>;

    /// Smallest stored DID on `chain_id` that is `>= did`
    ///
    /// Drives the registration ordering check: equality means a duplicate,
    /// anything greater means the declaration arrived too late.
    fn first_did_at_or_after(&self, chain_id: ChainId, did: Did) -> Result<Option<Did>>;

    /// Highest-DID record carrying `asset_id`
    fn latest_for_asset(&self, asset_id: &AssetId) -> Result<Option<IdentifierRecord>>;

    /// Highest-DID record carrying `asset_id` with a DID strictly below `below`
    ///
    /// The ancestor lookup of the rollback handler: a range scan over the
    /// `(asset_id, did)` index.
    fn latest_for_asset_below(
        &self,
        asset_id: &AssetId,
        below: Did,
    ) -> Result<Option<IdentifierRecord>>;

    /// The active record carrying `asset_id`, if any
    fn active_for_asset(&self, asset_id: &AssetId) -> Result<Option<IdentifierRecord>>;

    /// Number of records ever stored for `asset_id`
    fn revision_count(&self, asset_id: &AssetId) -> Result<u32>;

    /// All records with DID `>= did` across every chain, descending by DID
    ///
    /// Descending order is load-bearing for rollback: a superseding record
    /// must be unwound before its predecessor is considered.
    fn records_at_or_after(&self, did: Did) -> Result<Vec<IdentifierRecord>>;

    /// Record with the smallest DID whose block hash equals `block_hash`
    fn earliest_for_block(&self, block_hash: &str) -> Result<Option<IdentifierRecord>>;

    /// Records for a chain in descending DID order, paged
    fn chain_records_desc(
        &self,
        chain_id: ChainId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<IdentifierRecord>>;

    /// Highest-DID active record for a chain
    fn latest_active_for_chain(&self, chain_id: ChainId) -> Result<Option<IdentifierRecord>>;

    /// Highest-DID record for a chain regardless of active state
    fn latest_for_chain(&self, chain_id: ChainId) -> Result<Option<IdentifierRecord>>;

    /// Every stored record in ascending DID order
    fn all_records(&self) -> Result<Vec<IdentifierRecord>>;

    /// Insert a new ledger record
    ///
    /// Fails with an integrity error when the DID already exists or the
    /// record is active while another active record carries the same asset
    /// id.
    fn insert_record(&mut self, record: IdentifierRecord) -> Result<()>;

    /// Flip the active flag of a record
    ///
    /// Activating a record fails with an integrity error when a different
    /// active record already carries the same asset id.
    fn set_active(&mut self, did: Did, active: bool) -> Result<()>;

    /// Attach the metadata blob to a record, set-once
    ///
    /// Returns `false` without modifying anything when metadata is already
    /// present.
    fn set_metadata(&mut self, did: Did, metadata: serde_json::Value) -> Result<bool>;

    /// Remove a record from the ledger
    fn delete_record(&mut self, did: Did) -> Result<()>;

    /// Fetch or lazily create the actor for a wallet, adding `role`
    fn ensure_actor(&mut self, wallet: &Wallet, role: ActorRole) -> Result<Actor>;

    /// Look up an actor by wallet address
    fn actor(&self, wallet: &Wallet) -> Result<Option<Actor>>;

    /// Insert or replace chain reference data
    fn upsert_chain(&mut self, chain: Chain) -> Result<()>;

    /// Look up chain reference data
    fn chain(&self, chain_id: ChainId) -> Result<Option<Chain>>;

    /// Commit the unit of work
    fn commit(self: Box<Self>) -> Result<()>;
}
