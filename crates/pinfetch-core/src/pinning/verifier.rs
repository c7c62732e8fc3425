//! rustls adapter: WebPKI chain validation first, thumbprint pinning on top.

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{CertificateError, DigitallySignedStruct, Error, RootCertStore, SignatureScheme};

use super::PinSet;

/// Mozilla trust anchors bundled through `webpki-roots`.
pub fn mozilla_roots() -> RootCertStore {
    RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.into(),
    }
}

/// Server certificate verifier bound to one request host.
///
/// The end-entity certificate is accepted only if WebPKI validation against
/// the trust anchors succeeds *and* [`PinSet::validate`] accepts it.
/// Pinning never repairs a broken chain.
#[derive(Debug)]
pub struct PinningVerifier {
    chain: Arc<WebPkiServerVerifier>,
    pins: Arc<PinSet>,
    request_host: String,
}

impl PinningVerifier {
    /// Verifier over the bundled Mozilla roots. `request_host` is the
    /// scheme + authority of the request, e.g. `https://github.com`.
    pub fn new(
        pins: Arc<PinSet>,
        request_host: impl Into<String>,
        provider: Arc<CryptoProvider>,
    ) -> Result<Self, Error> {
        Self::with_roots(pins, request_host, Arc::new(mozilla_roots()), provider)
    }

    /// Verifier whose chain check trusts only `roots`.
    pub fn with_roots(
        pins: Arc<PinSet>,
        request_host: impl Into<String>,
        roots: Arc<RootCertStore>,
        provider: Arc<CryptoProvider>,
    ) -> Result<Self, Error> {
        let chain = WebPkiServerVerifier::builder_with_provider(roots, provider)
            .build()
            .map_err(|e| Error::General(format!("webpki verifier: {}", e)))?;
        Ok(Self {
            chain,
            pins,
            request_host: request_host.into(),
        })
    }

    pub fn request_host(&self) -> &str {
        &self.request_host
    }
}

impl ServerCertVerifier for PinningVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, Error> {
        let chain_error = self
            .chain
            .verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now)
            .err();
        if let Some(e) = &chain_error {
            tracing::warn!(host = %self.request_host, ?server_name, error = %e, "certificate chain validation failed");
        }

        // rustls always hands us an end-entity certificate, so the chain is present.
        if self.pins.validate(
            Some(end_entity.as_ref()),
            chain_error.is_some(),
            true,
            &self.request_host,
        ) {
            return Ok(ServerCertVerified::assertion());
        }

        Err(chain_error.unwrap_or(Error::InvalidCertificate(
            CertificateError::ApplicationVerificationFailure,
        )))
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, Error> {
        self.chain.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, Error> {
        self.chain.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.chain.supported_verify_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pinning::{thumbprint, Pin};

    fn verifier_for(der: &[u8], host: &str) -> PinningVerifier {
        let pins = PinSet::new([Pin::new(host, thumbprint(der))]);
        PinningVerifier::new(
            Arc::new(pins),
            host,
            Arc::new(rustls::crypto::ring::default_provider()),
        )
        .unwrap()
    }

    #[test]
    fn pinned_thumbprint_does_not_override_broken_chain() {
        let der = b"not a certificate".to_vec();
        let verifier = verifier_for(&der, "https://github.com");
        let name = ServerName::try_from("github.com").unwrap();

        let result = verifier.verify_server_cert(
            &CertificateDer::from(der),
            &[],
            &name,
            &[],
            UnixTime::now(),
        );
        let err = result.unwrap_err();
        assert!(
            !matches!(
                err,
                Error::InvalidCertificate(CertificateError::ApplicationVerificationFailure)
            ),
            "chain error must be reported, got {err:?}"
        );
    }

    #[test]
    fn empty_root_store_is_rejected() {
        let result = PinningVerifier::with_roots(
            Arc::new(PinSet::default()),
            "https://github.com",
            Arc::new(RootCertStore::empty()),
            Arc::new(rustls::crypto::ring::default_provider()),
        );
        assert!(matches!(result, Err(Error::General(_))));
    }

    #[test]
    fn exposes_bound_host_and_schemes() {
        let verifier = verifier_for(b"x", "https://github.com");
        assert_eq!(verifier.request_host(), "https://github.com");
        assert!(!verifier.supported_verify_schemes().is_empty());
    }
}
