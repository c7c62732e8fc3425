//! Certificate thumbprints (SHA-1) and fingerprints (SHA-256).

use anyhow::{Context, Result};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 16 * 1024;

/// Uppercase hex SHA-1 of the DER-encoded certificate, the value pins are compared against.
pub fn thumbprint(der: &[u8]) -> String {
    hex::encode_upper(Sha1::digest(der))
}

/// Uppercase hex SHA-256 of the DER-encoded certificate, as shown by crt.sh.
pub fn sha256_fingerprint(der: &[u8]) -> String {
    hex::encode_upper(Sha256::digest(der))
}

/// Both digests of a certificate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertFingerprints {
    pub sha1: String,
    pub sha256: String,
}

/// Hashes a DER certificate file on disk. Used when preparing new pins.
pub fn fingerprint_file(path: &Path) -> Result<CertFingerprints> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut sha1 = Sha1::new();
    let mut sha256 = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        sha1.update(&buf[..n]);
        sha256.update(&buf[..n]);
    }
    Ok(CertFingerprints {
        sha1: hex::encode_upper(sha1.finalize()),
        sha256: hex::encode_upper(sha256.finalize()),
    })
}
