//! Logging init: append to a file under the XDG state dir, falling back to
//! stderr when that directory cannot be used.

use anyhow::Result;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset. Handshake internals stay quiet unless asked for.
const DEFAULT_FILTER: &str = "info,pinfetch_core=debug,pinfetch=debug,rustls=warn";
/// `--verbose` adds rustls handshake tracing on top of the default.
const VERBOSE_FILTER: &str = "debug,rustls=debug,hyper=info,hyper_util=info";

/// Where log output ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Hands each event a clone of the log file handle, or stderr if cloning fails.
struct SharedFile(File);

enum FileOrStderr {
    File(File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for SharedFile {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER })
    })
}

/// `~/.local/state/pinfetch/pinfetch.log`.
pub fn default_log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pinfetch")?;
    Ok(xdg_dirs.get_state_home().join("pinfetch.log"))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    Ok(fs::OpenOptions::new().create(true).append(true).open(path)?)
}

/// Installs the global subscriber. Tries the XDG log file first and falls
/// back to stderr, so this never fails. Call once, early in `main`.
pub fn init(verbose: bool) -> LogTarget {
    let file = default_log_path().and_then(|p| open_log_file(&p).map(|f| (p, f)));
    match file {
        Ok((path, file)) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(verbose))
                .with_writer(BoxMakeWriter::new(SharedFile(file)))
                .with_ansi(false)
                .init();
            tracing::info!("pinfetch logging initialized at {}", path.display());
            LogTarget::File(path)
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(verbose))
                .with_writer(io::stderr)
                .with_ansi(false)
                .init();
            tracing::debug!(error = %e, "log file unavailable, logging to stderr");
            LogTarget::Stderr
        }
    }
}
