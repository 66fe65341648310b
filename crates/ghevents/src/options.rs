use std::fmt;
use std::sync::Arc;

use clap::{ArgMatches, Args, Command, FromArgMatches};
use tracing::Span;
use zeroize::Zeroizing;

use crate::{metrics::Metrics, secret::SecretProvider};

/// Path the server listens on when `--endpoint` is not given.
pub const DEFAULT_ENDPOINT: &str = "/hook";

/// Port the server listens on when `--port` is not given.
pub const DEFAULT_PORT: i64 = 8888;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("endpoint {0} is not a valid url path")]
    InvalidEndpoint(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
struct Flags {
    /// The endpoint path where the http server will listen to
    #[arg(long, value_name = "PATH", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
    /// Port to listen on.
    #[arg(
        long,
        value_name = "PORT",
        default_value_t = DEFAULT_PORT,
        allow_negative_numbers = true
    )]
    port: i64,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

/// Everything a GitHub event server needs to start.
///
/// Built once at startup: construct with the collaborators, register the flags
/// with [`Options::bind`], parse, [`Options::apply`] the matches, then
/// [`Options::validate`] before handing the value to the server.
#[derive(Clone)]
pub struct Options {
    secret: SecretProvider,
    metrics: Arc<Metrics>,
    logger: Span,
    flags: Flags,
}

impl Options {
    pub fn new(secret: SecretProvider, metrics: Arc<Metrics>, logger: Span) -> Self {
        Self {
            secret,
            metrics,
            logger,
            flags: Flags::default(),
        }
    }

    /// Registers `--endpoint` and `--port` on `cmd`.
    ///
    /// Nothing is parsed here; run the returned command and pass its matches to
    /// [`Options::apply`].
    pub fn bind(cmd: Command) -> Command {
        Flags::augment_args(cmd)
    }

    /// Copies the values parsed for the flags registered by [`Options::bind`].
    pub fn apply(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        self.flags.update_from_arg_matches(matches)
    }

    /// Checks that the endpoint is an absolute url path.
    ///
    /// The port is deliberately left unchecked.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.flags.endpoint.starts_with('/') {
            return Err(OptionsError::InvalidEndpoint(self.flags.endpoint.clone()));
        }
        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        &self.flags.endpoint
    }

    pub fn port(&self) -> i64 {
        self.flags.port
    }

    /// The HMAC secret callback, for handing to a payload verifier.
    pub fn secret(&self) -> SecretProvider {
        Arc::clone(&self.secret)
    }

    /// Fetches the current HMAC token. Wiped from memory when dropped.
    pub fn hmac_token(&self) -> Zeroizing<Vec<u8>> {
        (self.secret)()
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn logger(&self) -> &Span {
        &self.logger
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("endpoint", &self.flags.endpoint)
            .field("port", &self.flags.port)
            .field("secret", &"<redacted>")
            .field("logger", &self.logger)
            .finish_non_exhaustive()
    }
}
