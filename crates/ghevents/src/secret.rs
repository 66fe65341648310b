//! HMAC secret callbacks.
//!
//! A [`SecretProvider`] is asked for the token each time a payload is
//! verified, so a rotated secret takes effect without restarting the server.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;
use zeroize::Zeroizing;

/// Returns the current HMAC token. Called concurrently from request handlers.
pub type SecretProvider = Arc<dyn Fn() -> Zeroizing<Vec<u8>> + Send + Sync>;

/// A provider that always hands out the same token.
pub fn from_bytes(token: impl Into<Vec<u8>>) -> SecretProvider {
    let token = Arc::new(Zeroizing::new(token.into()));
    Arc::new(move || Zeroizing::new(token.to_vec()))
}

/// A provider that re-reads `path` on every call.
///
/// Trailing whitespace (including the final newline most editors add) is
/// stripped. A read failure is logged and yields an empty token, which no
/// signature will verify against.
pub fn from_file(path: impl Into<PathBuf>) -> SecretProvider {
    let path = path.into();
    Arc::new(move || match std::fs::read(&path) {
        Ok(bytes) => {
            let mut token = Zeroizing::new(bytes);
            let len = token
                .iter()
                .rposition(|b| !b.is_ascii_whitespace())
                .map_or(0, |i| i + 1);
            token.truncate(len);
            token
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read hmac secret file");
            Zeroizing::new(Vec::new())
        }
    })
}
