//! Declaration registration, minting, and rollback engine
//!
//! The [`Registry`] ties the pure codecs from `sigil-core` to a
//! [`RegistryStore`] implementation and exposes the four operations the
//! observer API is built on:
//!
//! - [`Registry::register`] — mint or supersede an identifier record for an
//!   on-chain declaration, atomically
//! - [`Registry::rollback`] — undo all events from a forked block onward
//! - [`Registry::head`] — latest registration event for a chain
//! - [`Registry::forecast`] — predict the asset id a declaration would mint
//!
//! Each operation runs as one atomic unit of work; expected failures
//! (duplicate, out-of-order, not-found, encoding) come back as typed errors,
//! while integrity violations abort loudly. The engine holds no mutable
//! state of its own between calls.

pub mod config;
pub mod metadata;
pub mod rollback;

mod query;
mod register;
mod resolver;

pub use config::RegistryConfig;
pub use metadata::{resolve_meta_url, MetadataFetch};
pub use rollback::RollbackOutcome;

use serde::{Deserialize, Serialize};
use sigil_core::{
    AssetId, ChainId, Descriptor, Did, Head, IdentifierRecord, RegistryError, Result, Wallet,
};
use sigil_store::RegistryStore;

/// Successful registration: the minted identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    /// Declaration identifier of the new ledger record
    pub did: Did,
    /// Asset id minted or superseded by the declaration
    pub asset_id: AssetId,
}

/// The registration, minting, and rollback engine
#[derive(Debug)]
pub struct Registry<S> {
    store: S,
    config: RegistryConfig,
}

impl<S: RegistryStore> Registry<S> {
    /// Create an engine with default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, RegistryConfig::default())
    }

    /// Create an engine with explicit configuration
    pub fn with_config(store: S, config: RegistryConfig) -> Self {
        Self { store, config }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Access the engine configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register an on-chain declaration and mint its identifier record
    pub fn register(&self, declaration: &sigil_core::Declaration) -> Result<RegistrationOutcome> {
        let mut tx = self.store.begin()?;
        let record = register::register_in(tx.as_mut(), declaration, &self.config)?;
        tx.commit()?;
        tracing::info!(
            did = %record.did,
            asset_id = %record.asset_id,
            revision = record.revision,
            "declaration registered"
        );
        Ok(RegistrationOutcome {
            did: record.did,
            asset_id: record.asset_id,
        })
    }

    /// Undo all registration events from `block_hash` onward
    pub fn rollback(&self, block_hash: &str) -> Result<RollbackOutcome> {
        let mut tx = self.store.begin()?;
        let outcome = rollback::rollback_in(tx.as_mut(), block_hash)?;
        tx.commit()?;
        tracing::info!(
            chain_id = %outcome.chain_id,
            undone = outcome.undone,
            "rolled back past forked block"
        );
        Ok(outcome)
    }

    /// Ledger reference of the `offset`-th latest registration for a chain
    pub fn head(&self, chain_id: ChainId, offset: usize) -> Result<Head> {
        let tx = self.store.begin()?;
        query::head_in(tx.as_ref(), chain_id, offset)
    }

    /// Predict the asset id the next declaration would mint
    ///
    /// Runs the minting resolver read-only; the transaction is aborted, so
    /// nothing is written and no counters are consumed.
    pub fn forecast(
        &self,
        descriptor: &Descriptor,
        chain_id: ChainId,
        declarer: &Wallet,
    ) -> Result<AssetId> {
        let mut tx = self.store.begin()?;
        resolver::resolve_mint(tx.as_mut(), descriptor, chain_id, declarer, &self.config)
    }

    /// Look up a ledger record by DID
    pub fn record(&self, did: Did) -> Result<Option<IdentifierRecord>> {
        let tx = self.store.begin()?;
        tx.record(did)
    }

    /// Look up the active record for an asset id
    pub fn active_record(&self, asset_id: &AssetId) -> Result<Option<IdentifierRecord>> {
        let tx = self.store.begin()?;
        tx.active_for_asset(asset_id)
    }

    /// Fetch and attach off-chain metadata for a registered record
    ///
    /// Intended to run asynchronously after [`Registry::register`] returns.
    /// Fetch failures and missing records are logged and swallowed;
    /// attachment is set-once.
    pub async fn attach_metadata(&self, did: Did, fetcher: &dyn MetadataFetch) -> Result<()> {
        let meta_url = {
            let tx = self.store.begin()?;
            match tx.record(did)? {
                Some(record) => record.meta_url,
                None => {
                    tracing::warn!(%did, "metadata fetch skipped; record is gone");
                    return Ok(());
                }
            }
        };
        let Some(meta_url) = meta_url else {
            return Ok(());
        };

        let url = resolve_meta_url(&meta_url, &self.config.ipfs_gateway);
        tracing::debug!(%did, url = %url, "fetching metadata");
        match fetcher.fetch(&url).await {
            Ok(value) => {
                let mut tx = self.store.begin()?;
                match tx.set_metadata(did, value) {
                    Ok(attached) => {
                        tx.commit()?;
                        if !attached {
                            tracing::debug!(%did, "metadata already attached");
                        }
                    }
                    Err(RegistryError::NotFound { .. }) => {
                        tracing::warn!(%did, "record vanished before metadata attach");
                    }
                    Err(err) => return Err(err),
                }
            }
            Err(err) => {
                tracing::warn!(%did, error = %err, "metadata fetch failed");
            }
        }
        Ok(())
    }
}
