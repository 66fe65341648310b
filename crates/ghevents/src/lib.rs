//! Startup options for a GitHub webhook event server.
//!
//! The server itself lives elsewhere; this crate owns the values it is started
//! with (listen path and port), the HMAC secret callback it verifies payloads
//! against, and the shared metrics and logging handles it reports through.

pub mod metrics;
pub mod options;
pub mod secret;

pub use metrics::Metrics;
pub use options::{Options, OptionsError, DEFAULT_ENDPOINT, DEFAULT_PORT};
pub use secret::SecretProvider;
