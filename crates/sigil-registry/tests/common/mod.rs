//! Synthetic declaration generator for integration tests.
//!
//! Explicitly seeded and passed by value — no global state. Timestamps and
//! block heights only ever advance, so generated events respect the per-chain
//! ordering the registry enforces.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sigil_core::{ChainId, Declaration, Descriptor, Wallet};
use std::collections::BTreeMap;

const DESCRIPTOR_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Deterministic generator of plausible declaration events
pub struct Forge {
    rng: ChaCha8Rng,
    time: u64,
    block_heights: BTreeMap<u16, u64>,
}

impl Forge {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            time: 1_231_002_905,
            block_heights: BTreeMap::new(),
        }
    }

    pub fn descriptor(&mut self) -> Descriptor {
        let code: String = (0..28)
            .map(|_| {
                let idx = self.rng.gen_range(0..DESCRIPTOR_ALPHABET.len());
                DESCRIPTOR_ALPHABET[idx] as char
            })
            .collect();
        Descriptor::new(code).expect("generated code uses the descriptor alphabet")
    }

    pub fn wallet(&mut self) -> Wallet {
        let mut bytes = [0u8; 20];
        self.rng.fill(&mut bytes);
        Wallet::new(format!("0x{}", hex::encode(bytes)))
    }

    pub fn hash(&mut self) -> String {
        let mut bytes = [0u8; 32];
        self.rng.fill(&mut bytes);
        format!("0x{}", hex::encode(bytes))
    }

    /// Next declaration for `chain`, strictly later than any prior one
    pub fn declaration(
        &mut self,
        chain: u16,
        declarer: &Wallet,
        descriptor: &Descriptor,
    ) -> Declaration {
        self.time += self.rng.gen_range(1..=1000);
        let height = self
            .block_heights
            .entry(chain)
            .and_modify(|h| *h += 1)
            .or_insert(1);
        let height = *height;
        Declaration {
            timestamp: self.time,
            chain_id: ChainId(chain),
            block_height: height,
            block_hash: self.hash(),
            tx_idx: self.rng.gen_range(0..3000),
            tx_hash: self.hash(),
            declarer: declarer.clone(),
            descriptor: descriptor.clone(),
            message: None,
            meta_url: None,
            registrar: None,
        }
    }
}
