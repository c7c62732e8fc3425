//! HTTPS download request: lazy request factory plus pinned TLS settings.

use std::fmt;
use std::sync::Arc;

use url::Url;

use super::prepared::{user_agent, PreparedRequest, TlsSettings};
use super::tls::{HttpVersion, TlsEnvironment, TlsVersion};
use crate::error::SetupError;
use crate::pinning::{default_pins, PinSet};

/// Builds the target URL. Invoked once, inside `setup()`, after the TLS
/// environment has been checked.
pub type RequestFactory = Box<dyn FnOnce() -> anyhow::Result<Url> + Send>;

/// Runs once after the file has been written completely.
pub type FinishCallback = Box<dyn FnOnce() + Send>;

pub struct HttpsDownload {
    filename: String,
    factory: Option<RequestFactory>,
    on_finish: Option<FinishCallback>,
    min_tls: TlsVersion,
    http_version: HttpVersion,
    pins: Arc<PinSet>,
    prepared: Option<PreparedRequest>,
}

impl HttpsDownload {
    pub fn new<F, C>(filename: impl Into<String>, factory: F, on_finish: C) -> Self
    where
        F: FnOnce() -> anyhow::Result<Url> + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        Self {
            filename: filename.into(),
            factory: Some(Box::new(factory)),
            on_finish: Some(Box::new(on_finish)),
            min_tls: TlsVersion::default(),
            http_version: HttpVersion::default(),
            pins: Arc::new(default_pins()),
            prepared: None,
        }
    }

    /// Convenience for callers that already hold a parsed URL.
    pub fn for_url<C>(filename: impl Into<String>, url: Url, on_finish: C) -> Self
    where
        C: FnOnce() + Send + 'static,
    {
        Self::new(filename, move || Ok(url), on_finish)
    }

    pub fn with_min_tls(mut self, min_tls: TlsVersion) -> Self {
        self.min_tls = min_tls;
        self
    }

    pub fn with_http_version(mut self, http_version: HttpVersion) -> Self {
        self.http_version = http_version;
        self
    }

    pub fn with_pins(mut self, pins: Arc<PinSet>) -> Self {
        self.pins = pins;
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn prepared(&self) -> Option<&PreparedRequest> {
        self.prepared.as_ref()
    }

    /// Checks the TLS environment, then builds the request through the factory.
    ///
    /// The factory is consumed on the first call, so a second call fails with
    /// [`SetupError::AlreadyPrepared`] even if the first one failed.
    pub fn setup(&mut self, env: &dyn TlsEnvironment) -> Result<&PreparedRequest, SetupError> {
        if !env.ensure_strong_tls(self.min_tls) {
            return Err(SetupError::TlsUnavailable(self.min_tls));
        }

        let factory = self.factory.take().ok_or(SetupError::AlreadyPrepared)?;
        let url = factory().map_err(SetupError::Factory)?;
        if url.scheme() != "https" {
            return Err(SetupError::InsecureScheme(url));
        }
        if url.host_str().is_none() {
            return Err(SetupError::MissingHost(url));
        }

        let request_host = url.origin().ascii_serialization();
        tracing::debug!(filename = %self.filename, %url, host = %request_host, tls = %self.min_tls, "request prepared");

        let prepared = self.prepared.insert(PreparedRequest {
            tls: TlsSettings {
                min_version: self.min_tls,
                pins: Arc::clone(&self.pins),
                request_host,
            },
            http_version: self.http_version,
            user_agent: user_agent(),
            url,
        });
        Ok(prepared)
    }

    /// Fires the completion callback. Returns false if it already ran.
    pub fn finish(&mut self) -> bool {
        match self.on_finish.take() {
            Some(cb) => {
                cb();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for HttpsDownload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpsDownload")
            .field("filename", &self.filename)
            .field("factory_pending", &self.factory.is_some())
            .field("finish_pending", &self.on_finish.is_some())
            .field("min_tls", &self.min_tls)
            .field("http_version", &self.http_version)
            .field("pins", &self.pins.len())
            .field("prepared", &self.prepared)
            .finish()
    }
}
