//! Error types for request setup and transfer.
//!
//! The queue matches on these to decide what to log; neither kind ever stops
//! a drain.

use std::io;
use std::path::PathBuf;

use url::Url;

use crate::request::TlsVersion;

/// Request aborted before any network activity.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("could not ensure {0} support, aborting request")]
    TlsUnavailable(TlsVersion),
    #[error("request was already set up")]
    AlreadyPrepared,
    #[error("request factory failed: {0:#}")]
    Factory(anyhow::Error),
    #[error("refusing non-HTTPS URL {0}")]
    InsecureScheme(Url),
    #[error("URL has no host: {0}")]
    MissingHost(Url),
}

/// Failure while opening the response or copying its body to disk.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The handshake failed on the server certificate: broken chain, unpinned
    /// thumbprint, or host outside the pin set.
    #[error("server certificate rejected: {0}")]
    Certificate(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("could not build HTTPS client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("TLS configuration: {0}")]
    Tls(#[from] rustls::Error),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("reading response body: {0}")]
    Body(#[source] io::Error),
    #[error("writing {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TransferError {
    /// True for failures of the pinning or chain checks.
    pub fn is_certificate(&self) -> bool {
        matches!(self, TransferError::Certificate(_))
    }
}
