//! Content fingerprint for loaded datasets.

use sha2::{Digest, Sha256};

use super::RawFeeds;

/// Calculate the SHA-256 fingerprint of the three raw feeds.
///
/// Object keys serialize in sorted order, so the fingerprint only changes when
/// the feed content does.
pub fn calculate_fingerprint(raw: &RawFeeds) -> String {
    let mut hasher = Sha256::new();
    for payload in [&raw.capacity, &raw.sites, &raw.travel] {
        hasher.update(payload.to_string().as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}
