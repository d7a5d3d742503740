//! Core types and codecs for the sigil registry
//!
//! This crate is the single source of truth for the registry's domain types:
//! declaration identifiers (DIDs), minted asset identifiers, declarations,
//! identifier records, actors, and chains. Everything here is pure — no
//! storage, no I/O — so the minting and rollback engine in `sigil-registry`
//! can be exercised against any store implementation.
//!
//! # Modules
//!
//! - `did`: bit-packed 64-bit declaration identifiers
//! - `asset`: asset-id text forms and the deterministic mint function
//! - `declaration`: observer-reported declaration events
//! - `record`: the append-only ledger entry and its authorization rule
//! - `error`: the unified error type shared across the workspace

pub mod asset;
pub mod declaration;
pub mod did;
pub mod error;
pub mod record;

pub use asset::{mint_candidate, AssetId, Descriptor};
pub use declaration::{Declaration, DELETE_MESSAGE, FREEZE_MESSAGE};
pub use did::{ChainId, Did};
pub use error::{RegistryError, Result};
pub use record::{Actor, ActorRole, Chain, Head, IdentifierRecord, Wallet};
