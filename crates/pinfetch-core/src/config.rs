use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::request::{HttpVersion, TlsVersion};
use crate::storage::PartialFilePolicy;

/// Global configuration loaded from `~/.config/pinfetch/config.toml`.
///
/// Pins are compiled in and deliberately absent from this file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinfetchConfig {
    /// Where downloads are written; the current working directory if unset.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// What to do with a destination file when its transfer fails midway.
    #[serde(default)]
    pub partial_files: PartialFilePolicy,
    /// Lowest TLS version a request may negotiate: "1.2" (default) or "1.3".
    #[serde(default)]
    pub min_tls_version: TlsVersion,
    /// HTTP version for requests: "1.1" (default) or "1.0".
    #[serde(default)]
    pub http_version: HttpVersion,
}

impl PinfetchConfig {
    /// Configured download directory, or the current working directory.
    pub fn download_dir(&self) -> Result<PathBuf> {
        match &self.download_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pinfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PinfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PinfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PinfetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = PinfetchConfig::default();
        assert!(cfg.download_dir.is_none());
        assert_eq!(cfg.partial_files, PartialFilePolicy::Keep);
        assert_eq!(cfg.min_tls_version, TlsVersion::Tls12);
        assert_eq!(cfg.http_version, HttpVersion::Http11);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = PinfetchConfig {
            download_dir: Some(PathBuf::from("/srv/downloads")),
            partial_files: PartialFilePolicy::Remove,
            min_tls_version: TlsVersion::Tls13,
            http_version: HttpVersion::Http10,
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: PinfetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: PinfetchConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, PinfetchConfig::default());
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            download_dir = "/tmp/pinned"
            partial_files = "remove"
            min_tls_version = "1.3"
        "#;
        let cfg: PinfetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.download_dir.as_deref(), Some(std::path::Path::new("/tmp/pinned")));
        assert_eq!(cfg.partial_files, PartialFilePolicy::Remove);
        assert_eq!(cfg.min_tls_version, TlsVersion::Tls13);
        assert_eq!(cfg.http_version, HttpVersion::Http11);
    }

    #[test]
    fn unknown_tls_version_rejected() {
        assert!(toml::from_str::<PinfetchConfig>("min_tls_version = \"1.0\"").is_err());
    }

    #[test]
    fn download_dir_falls_back_to_cwd() {
        let cfg = PinfetchConfig::default();
        assert_eq!(cfg.download_dir().unwrap(), std::env::current_dir().unwrap());
    }
}
