//! Metadata-fetch collaborator boundary
//!
//! After a successful registration the caller hands the new record's DID to
//! [`Registry::attach_metadata`] together with a [`MetadataFetch`]
//! implementation. Fetching happens outside any registry transaction;
//! failures are logged and swallowed so they can never affect a committed
//! registration. The blob is attached set-once — a re-run against a record
//! that already carries metadata is a no-op.
//!
//! [`Registry::attach_metadata`]: crate::Registry::attach_metadata

use async_trait::async_trait;
use sigil_core::Result;

/// Collaborator that retrieves the metadata blob behind a URL
#[async_trait]
pub trait MetadataFetch: Send + Sync {
    /// Fetch and decode the JSON document at `url`
    async fn fetch(&self, url: &str) -> Result<serde_json::Value>;
}

/// Rewrite `ipfs://` URLs through the configured gateway
pub fn resolve_meta_url(meta_url: &str, ipfs_gateway: &str) -> String {
    match meta_url.strip_prefix("ipfs://") {
        Some(path) => format!("{ipfs_gateway}{path}"),
        None => meta_url.to_string(),
    }
}
