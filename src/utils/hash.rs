//! Build identifiers.
//!
//! Every build gets a short hex id that is stamped into emitted file names
//! (e.g. `guide/install.3f9a0c1d2b4e5f60.js`), so browsers never reuse a
//! stale script from an earlier build.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Length of a build id in hex characters.
pub const BUILD_ID_LEN: usize = 16;

/// Disambiguates ids generated within the same clock tick.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh build id from the clock, process id and a sequence number.
pub fn build_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    let mut hasher = blake3::Hasher::new();
    hasher.update(&nanos.to_le_bytes());
    hasher.update(&std::process::id().to_le_bytes());
    hasher.update(&SEQUENCE.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    fingerprint(hasher.finalize().as_bytes())
}

/// Hex fingerprint of `BUILD_ID_LEN` characters.
#[inline]
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hex = hex::encode(bytes);
    hex.truncate(BUILD_ID_LEN);
    hex
}
