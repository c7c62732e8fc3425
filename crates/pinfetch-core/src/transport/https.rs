//! reqwest (blocking) transport with a per-connection rustls configuration.

use std::error::Error as StdError;
use std::io::{self, Read};
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header;
use rustls::RootCertStore;

use super::Transport;
use crate::error::TransferError;
use crate::pinning::{mozilla_roots, PinningVerifier};
use crate::request::{HttpVersion, PreparedRequest, TlsSettings};

/// What a client is built for; a cached client is reused only for an equal key.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ConnectionKey {
    tls: TlsSettings,
    http_version: HttpVersion,
    user_agent: String,
}

impl ConnectionKey {
    fn of(request: &PreparedRequest) -> Self {
        Self {
            tls: request.tls.clone(),
            http_version: request.http_version,
            user_agent: request.user_agent.clone(),
        }
    }
}

struct CachedClient {
    key: ConnectionKey,
    client: Client,
}

/// HTTPS transport. Redirects are not followed and no timeout is applied.
///
/// When a request asks for keep-alive, its client (and pooled connection) is
/// kept for the next request with the same origin and TLS settings. A
/// request without keep-alive still reuses a matching kept client, sends
/// `Connection: close` and releases the client afterwards, so the pooled
/// connection ends with it. A freshly built client for such a request keeps
/// no idle connections at all.
pub struct HttpsTransport {
    cached: Option<CachedClient>,
    roots: Arc<RootCertStore>,
}

impl Default for HttpsTransport {
    fn default() -> Self {
        Self::with_roots(Arc::new(mozilla_roots()))
    }
}

impl HttpsTransport {
    /// Transport trusting the bundled Mozilla roots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose chain validation trusts only `roots`. Pinning still
    /// applies on top.
    pub fn with_roots(roots: Arc<RootCertStore>) -> Self {
        Self {
            cached: None,
            roots,
        }
    }

    /// True if a client is being held for reuse.
    pub fn has_cached_connection(&self) -> bool {
        self.cached.is_some()
    }

    fn client_for(
        &mut self,
        request: &PreparedRequest,
        keep_alive: bool,
    ) -> Result<Client, TransferError> {
        let key = ConnectionKey::of(request);
        if let Some(cached) = self.cached.take() {
            if cached.key == key {
                tracing::debug!(host = %request.request_host(), "reusing connection");
                let client = cached.client.clone();
                if keep_alive {
                    self.cached = Some(cached);
                }
                return Ok(client);
            }
        }

        let client = build_client(request, keep_alive, Arc::clone(&self.roots))?;
        if keep_alive {
            self.cached = Some(CachedClient {
                key,
                client: client.clone(),
            });
        }
        Ok(client)
    }
}

impl Transport for HttpsTransport {
    fn open(
        &mut self,
        request: &PreparedRequest,
        keep_alive: bool,
    ) -> Result<Box<dyn Read + '_>, TransferError> {
        let client = self.client_for(request, keep_alive)?;

        let mut builder = client
            .get(request.url.clone())
            .version(request.http_version.into());
        if !keep_alive {
            builder = builder.header(header::CONNECTION, "close");
        }

        tracing::info!(url = %request.url, keep_alive, "starting HTTPS download request");
        let response = builder.send().map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Status(status.as_u16()));
        }
        Ok(Box::new(response))
    }
}

/// Client whose TLS config carries only the selected protocol versions and a
/// pinning verifier bound to the request's host.
fn build_client(
    request: &PreparedRequest,
    keep_alive: bool,
    roots: Arc<RootCertStore>,
) -> Result<Client, TransferError> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let verifier = PinningVerifier::with_roots(
        Arc::clone(&request.tls.pins),
        request.tls.request_host.clone(),
        roots,
        Arc::clone(&provider),
    )?;

    let mut tls = rustls::ClientConfig::builder_with_provider(provider)
        .with_protocol_versions(request.tls.min_version.protocol_versions())?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(verifier))
        .with_no_client_auth();
    tls.alpn_protocols = vec![request.http_version.alpn().to_vec()];

    let mut builder = Client::builder()
        .use_preconfigured_tls(tls)
        .user_agent(request.user_agent.clone())
        .redirect(reqwest::redirect::Policy::none())
        .timeout(None::<Duration>)
        .http1_only();
    if !keep_alive {
        builder = builder.pool_max_idle_per_host(0);
    }
    builder.build().map_err(TransferError::Client)
}

fn classify(err: reqwest::Error) -> TransferError {
    if is_certificate_error(&err) {
        TransferError::Certificate(err)
    } else {
        TransferError::Network(err)
    }
}

/// Walks the source chain looking for a rustls certificate rejection.
/// rustls errors travel inside (possibly nested) `io::Error`s, whose
/// `source()` skips the wrapped value, so every layer is unwrapped explicitly.
fn is_certificate_error(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let mut layer = e;
        loop {
            if is_rustls_certificate_error(layer) {
                return true;
            }
            match layer.downcast_ref::<io::Error>().and_then(|io| io.get_ref()) {
                Some(inner) => layer = inner as &(dyn StdError + 'static),
                None => break,
            }
        }
        current = e.source();
    }
    false
}

fn is_rustls_certificate_error(e: &(dyn StdError + 'static)) -> bool {
    matches!(
        e.downcast_ref::<rustls::Error>(),
        Some(rustls::Error::InvalidCertificate(_)) | Some(rustls::Error::NoCertificatesPresented)
    )
}
