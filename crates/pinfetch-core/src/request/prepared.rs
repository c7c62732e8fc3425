//! Per-request transfer configuration produced by `setup()`.

use std::sync::Arc;

use url::Url;

use super::tls::{HttpVersion, TlsVersion};
use crate::pinning::PinSet;

/// TLS settings a transport must apply to the connection for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSettings {
    pub min_version: TlsVersion,
    pub pins: Arc<PinSet>,
    /// Scheme + authority the pins are checked against, e.g. `https://github.com`.
    pub request_host: String,
}

/// A request ready to send. Carries everything the transfer needs, so no
/// process-wide TLS state is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub url: Url,
    pub tls: TlsSettings,
    pub http_version: HttpVersion,
    pub user_agent: String,
}

impl PreparedRequest {
    pub fn request_host(&self) -> &str {
        &self.tls.request_host
    }
}

/// Fixed identifying user agent, e.g. `pinfetch/0.1.0 (linux; x86_64)`.
pub fn user_agent() -> String {
    format!(
        "pinfetch/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
