//! Thumbprint command: fingerprints of a DER certificate, for updating pins.

use anyhow::Result;
use pinfetch_core::pinning;
use std::path::Path;

pub fn run_thumbprint(path: &Path) -> Result<()> {
    let fp = pinning::fingerprint_file(path)?;
    println!("SHA-1   {}", fp.sha1);
    println!("SHA-256 {}", fp.sha256);
    Ok(())
}
