use crate::domain::value_objects::PayloadSource;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while resolving, building, executing or persisting a call.
///
/// Configuration variants are terminal and never retried. Transport and 5xx
/// failures only surface as `RetriesExhausted` once the attempt budget is spent.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("profile {0:?} not found")]
    ProfileNotFound(String),

    #[error("cannot resolve URL {0:?}: use an absolute http(s) URL or a profile with a base URL")]
    MissingUrl(String),

    #[error("unknown auth type: {0}")]
    InvalidAuthType(String),

    #[error("parsing {origin} JSON: {error}")]
    PayloadParse {
        origin: PayloadSource,
        #[source]
        error: serde_json::Error,
    },

    #[error("reading json-file {}: {source}", path.display())]
    PayloadRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("serializing request body: {0}")]
    BodySerialization(#[source] serde_json::Error),

    #[error("invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("request failed after {attempts} attempt(s): {reason}")]
    RetriesExhausted { attempts: u32, reason: String },

    #[error("failed to write response to file {}: {source}", path.display())]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Network-level failure of a single attempt. Always retryable.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("HTTP request execution failed: {0}")]
    Request(String),

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Failures of the profile file backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not determine a configuration directory")]
    NoConfigDir,

    #[error("load config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("save config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("encode config: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CallError {
    /// True for failures caused by user-supplied configuration rather than the network.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CallError::ProfileNotFound(_)
                | CallError::MissingUrl(_)
                | CallError::InvalidAuthType(_)
                | CallError::PayloadParse { .. }
                | CallError::PayloadRead { .. }
                | CallError::InvalidMethod(_)
                | CallError::InvalidUrl { .. }
                | CallError::InvalidHeader { .. }
        )
    }
}
