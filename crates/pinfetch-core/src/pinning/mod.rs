//! Certificate thumbprint pinning.
//!
//! A [`PinSet`] is a host-scoped allow-list of SHA-1 certificate thumbprints.
//! [`PinSet::validate`] is the trust decision itself and is a pure function of
//! its inputs. [`PinningVerifier`] applies it inside the rustls handshake,
//! always after standard WebPKI chain validation and never in place of it.

mod pins;
mod thumbprint;
mod verifier;

pub use pins::{default_pins, Pin, PinSet};
pub use thumbprint::{fingerprint_file, sha256_fingerprint, thumbprint, CertFingerprints};
pub use verifier::{mozilla_roots, PinningVerifier};
