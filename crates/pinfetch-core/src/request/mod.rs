//! Download requests.
//!
//! A [`DownloadRequest`] is a tagged variant over request kinds. Each kind
//! exposes a destination filename, a completion callback and a `setup` step
//! that produces a [`PreparedRequest`] for the transport. HTTPS with
//! thumbprint pinning is the only kind so far.

mod https;
mod prepared;
mod tls;

pub use https::{FinishCallback, HttpsDownload, RequestFactory};
pub use prepared::{user_agent, PreparedRequest, TlsSettings};
pub use tls::{HttpVersion, RustlsEnvironment, TlsEnvironment, TlsVersion};

use url::Url;

use crate::error::SetupError;

#[derive(Debug)]
pub enum DownloadRequest {
    Https(HttpsDownload),
}

impl DownloadRequest {
    /// HTTPS request with the compiled-in pins and default protocol selectors.
    pub fn https<F, C>(filename: impl Into<String>, factory: F, on_finish: C) -> Self
    where
        F: FnOnce() -> anyhow::Result<Url> + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        DownloadRequest::Https(HttpsDownload::new(filename, factory, on_finish))
    }

    pub fn filename(&self) -> &str {
        match self {
            DownloadRequest::Https(r) => r.filename(),
        }
    }

    pub fn setup(&mut self, env: &dyn TlsEnvironment) -> Result<&PreparedRequest, SetupError> {
        match self {
            DownloadRequest::Https(r) => r.setup(env),
        }
    }

    pub fn prepared(&self) -> Option<&PreparedRequest> {
        match self {
            DownloadRequest::Https(r) => r.prepared(),
        }
    }

    /// Fires the completion callback; returns false if it already ran.
    pub fn finish(&mut self) -> bool {
        match self {
            DownloadRequest::Https(r) => r.finish(),
        }
    }
}

impl From<HttpsDownload> for DownloadRequest {
    fn from(r: HttpsDownload) -> Self {
        DownloadRequest::Https(r)
    }
}
