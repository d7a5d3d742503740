//! Minting resolver
//!
//! Probes candidate asset ids until one is free or updatable by the
//! declarer. The loop terminates in practice because the declarer's own
//! prior record for the descriptor becomes reachable, or an unused candidate
//! is found; the configured ceiling guards against adversarial input.

use crate::config::RegistryConfig;
use sigil_core::{mint_candidate, AssetId, ChainId, Descriptor, RegistryError, Result, Wallet};
use sigil_store::StoreTransaction;

/// Find an asset id the declarer can mint right now
///
/// Counters advance past candidates held by other wallets, frozen records,
/// deleted records, and descriptor mismatches. A candidate whose latest
/// record is inactive indicates broken bookkeeping and fails fatally.
pub(crate) fn resolve_mint(
    tx: &mut dyn StoreTransaction,
    descriptor: &Descriptor,
    chain_id: ChainId,
    declarer: &Wallet,
    config: &RegistryConfig,
) -> Result<AssetId> {
    for counter in 0..config.mint_retry_ceiling {
        let candidate = mint_candidate(descriptor, chain_id, declarer, counter);
        tx.lock_asset(&candidate)?;
        let Some(latest) = tx.latest_for_asset(&candidate)? else {
            tracing::debug!(%candidate, counter, "minting free asset id");
            return Ok(candidate);
        };
        if !latest.active {
            tracing::error!(
                %candidate,
                did = %latest.did,
                "latest record for asset id is inactive; registry state is corrupt"
            );
            return Err(RegistryError::integrity(format!(
                "latest record {} for asset {candidate} is not active",
                latest.did
            )));
        }
        if latest.can_update(declarer, descriptor) {
            tracing::debug!(%candidate, counter, superseding = %latest.did, "reusing asset id");
            return Ok(candidate);
        }
    }
    Err(RegistryError::integrity(format!(
        "mint retry ceiling {} exhausted for descriptor {descriptor} on chain {chain_id}",
        config.mint_retry_ceiling
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use sigil_core::{Did, IdentifierRecord};
    use sigil_store::{MemoryStore, RegistryStore};

    fn descriptor() -> Descriptor {
        Descriptor::new("KACT4EBWRBH5I5VGXTVS3YGXPOTQ").unwrap()
    }

    fn seeded(asset_id: AssetId, owner: Wallet, active: bool, frozen: bool) -> IdentifierRecord {
        IdentifierRecord {
            did: Did::pack(1_000_000, ChainId(2), 0).unwrap(),
            asset_id,
            descriptor: descriptor(),
            declarer: owner.clone(),
            owner,
            registrar: None,
            active,
            frozen,
            deleted: false,
            revision: 1,
            chain_id: ChainId(2),
            block_height: 1,
            block_hash: "0xaa".to_string(),
            tx_idx: 0,
            tx_hash: "0xbb".to_string(),
            timestamp: 1_000_000,
            meta_url: None,
            metadata: None,
        }
    }

    #[test]
    fn test_free_candidate_is_counter_zero() {
        let store = MemoryStore::new();
        let mut tx = store.begin().unwrap();
        let wallet = Wallet::new("0xw1");
        let asset = resolve_mint(
            tx.as_mut(),
            &descriptor(),
            ChainId(2),
            &wallet,
            &RegistryConfig::default(),
        )
        .unwrap();
        assert_eq!(asset, mint_candidate(&descriptor(), ChainId(2), &wallet, 0));
    }

    #[test]
    fn test_own_active_record_is_reused() {
        let store = MemoryStore::new();
        let mut tx = store.begin().unwrap();
        let wallet = Wallet::new("0xw1");
        let candidate = mint_candidate(&descriptor(), ChainId(2), &wallet, 0);
        tx.insert_record(seeded(candidate.clone(), wallet.clone(), true, false))
            .unwrap();
        let asset = resolve_mint(
            tx.as_mut(),
            &descriptor(),
            ChainId(2),
            &wallet,
            &RegistryConfig::default(),
        )
        .unwrap();
        assert_eq!(asset, candidate);
    }

    #[test]
    fn test_foreign_and_frozen_records_advance_counter() {
        let store = MemoryStore::new();
        let mut tx = store.begin().unwrap();
        let declarer = Wallet::new("0xw1");

        // counter 0 held by another wallet, counter 1 frozen by the declarer
        let zero = mint_candidate(&descriptor(), ChainId(2), &declarer, 0);
        let one = mint_candidate(&descriptor(), ChainId(2), &declarer, 1);
        tx.insert_record(seeded(zero, Wallet::new("0xother"), true, false))
            .unwrap();
        let mut frozen = seeded(one, declarer.clone(), true, true);
        frozen.did = Did::pack(1_000_001, ChainId(2), 0).unwrap();
        tx.insert_record(frozen).unwrap();

        let asset = resolve_mint(
            tx.as_mut(),
            &descriptor(),
            ChainId(2),
            &declarer,
            &RegistryConfig::default(),
        )
        .unwrap();
        assert_eq!(asset, mint_candidate(&descriptor(), ChainId(2), &declarer, 2));
    }

    #[test]
    fn test_inactive_latest_is_fatal() {
        let store = MemoryStore::new();
        let mut tx = store.begin().unwrap();
        let wallet = Wallet::new("0xw1");
        let candidate = mint_candidate(&descriptor(), ChainId(2), &wallet, 0);
        tx.insert_record(seeded(candidate, wallet.clone(), false, false))
            .unwrap();
        assert_matches!(
            resolve_mint(
                tx.as_mut(),
                &descriptor(),
                ChainId(2),
                &wallet,
                &RegistryConfig::default(),
            ),
            Err(RegistryError::Integrity { .. })
        );
    }

    #[test]
    fn test_ceiling_exhaustion_is_fatal() {
        let store = MemoryStore::new();
        let mut tx = store.begin().unwrap();
        let declarer = Wallet::new("0xw1");
        let other = Wallet::new("0xother");
        for counter in 0..3 {
            let mut record = seeded(
                mint_candidate(&descriptor(), ChainId(2), &declarer, counter),
                other.clone(),
                true,
                false,
            );
            record.did = Did::pack(1_000_000 + u64::from(counter), ChainId(2), 0).unwrap();
            tx.insert_record(record).unwrap();
        }
        let config = RegistryConfig {
            mint_retry_ceiling: 3,
            ..RegistryConfig::default()
        };
        assert_matches!(
            resolve_mint(tx.as_mut(), &descriptor(), ChainId(2), &declarer, &config),
            Err(RegistryError::Integrity { .. })
        );
    }
}
