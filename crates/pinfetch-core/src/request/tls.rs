//! Protocol selectors and the TLS environment capability check.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use rustls::SupportedProtocolVersion;

/// Minimum TLS version a request may negotiate. Later versions are always allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TlsVersion {
    #[default]
    #[serde(rename = "1.2")]
    Tls12,
    #[serde(rename = "1.3")]
    Tls13,
}

impl TlsVersion {
    /// rustls protocol versions enabled by this selector, newest first.
    pub fn protocol_versions(self) -> &'static [&'static SupportedProtocolVersion] {
        static TLS12_AND_LATER: &[&SupportedProtocolVersion] =
            &[&rustls::version::TLS13, &rustls::version::TLS12];
        static TLS13_ONLY: &[&SupportedProtocolVersion] = &[&rustls::version::TLS13];
        match self {
            TlsVersion::Tls12 => TLS12_AND_LATER,
            TlsVersion::Tls13 => TLS13_ONLY,
        }
    }
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TlsVersion::Tls12 => write!(f, "TLS 1.2+"),
            TlsVersion::Tls13 => write!(f, "TLS 1.3"),
        }
    }
}

/// HTTP protocol version sent on the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HttpVersion {
    #[serde(rename = "1.0")]
    Http10,
    #[default]
    #[serde(rename = "1.1")]
    Http11,
}

impl HttpVersion {
    /// ALPN protocol id offered during the handshake.
    pub fn alpn(self) -> &'static [u8] {
        match self {
            HttpVersion::Http10 => b"http/1.0",
            HttpVersion::Http11 => b"http/1.1",
        }
    }
}

impl From<HttpVersion> for reqwest::Version {
    fn from(v: HttpVersion) -> Self {
        match v {
            HttpVersion::Http10 => reqwest::Version::HTTP_10,
            HttpVersion::Http11 => reqwest::Version::HTTP_11,
        }
    }
}

/// Answers "is strong TLS usable in this environment?" before a request is built.
///
/// A `false` answer aborts that request only; the queue moves on.
pub trait TlsEnvironment {
    fn ensure_strong_tls(&self, minimum: TlsVersion) -> bool;
}

impl<F> TlsEnvironment for F
where
    F: Fn(TlsVersion) -> bool,
{
    fn ensure_strong_tls(&self, minimum: TlsVersion) -> bool {
        self(minimum)
    }
}

/// Default environment check: the linked rustls provider can build a client
/// configuration restricted to the selected protocol versions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustlsEnvironment;

impl TlsEnvironment for RustlsEnvironment {
    fn ensure_strong_tls(&self, minimum: TlsVersion) -> bool {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        match rustls::ClientConfig::builder_with_provider(provider)
            .with_protocol_versions(minimum.protocol_versions())
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(%minimum, error = %e, "TLS provider cannot negotiate selected versions");
                false
            }
        }
    }
}
