//! Destination files.
//!
//! Response bodies are streamed straight into `<dir>/<filename>`. The
//! filename is trusted as given. What happens to a file left half-written by
//! a failed transfer is decided by [`PartialFilePolicy`].

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::TransferError;

const BUF_SIZE: usize = 64 * 1024;

/// Fate of a destination file whose body copy failed midway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialFilePolicy {
    /// Leave whatever was written on disk.
    #[default]
    Keep,
    /// Delete the file.
    Remove,
}

/// Directory downloads are written into.
#[derive(Debug, Clone)]
pub struct OutputDir {
    dir: PathBuf,
    partial_files: PartialFilePolicy,
}

impl OutputDir {
    pub fn new(dir: impl Into<PathBuf>, partial_files: PartialFilePolicy) -> Self {
        Self {
            dir: dir.into(),
            partial_files,
        }
    }

    /// Output into the process's current working directory.
    pub fn current_dir(partial_files: PartialFilePolicy) -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?, partial_files))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn partial_files(&self) -> PartialFilePolicy {
        self.partial_files
    }

    pub fn set_partial_files(&mut self, policy: PartialFilePolicy) {
        self.partial_files = policy;
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Creates (or truncates) the destination and copies `body` into it.
    /// Returns the number of bytes written. Both the body and the file are
    /// released before this returns, on every path.
    pub fn write_body<R: Read + ?Sized>(
        &self,
        filename: &str,
        body: &mut R,
    ) -> Result<u64, TransferError> {
        let path = self.path_for(filename);
        let file = File::create(&path).map_err(|source| TransferError::Storage {
            path: path.clone(),
            source,
        })?;

        let result = copy_and_sync(body, file, &path);
        if result.is_err() {
            self.discard_partial(&path);
        }
        result
    }

    fn discard_partial(&self, path: &Path) {
        match self.partial_files {
            PartialFilePolicy::Keep => {
                tracing::debug!(path = %path.display(), "keeping partial file");
            }
            PartialFilePolicy::Remove => match fs::remove_file(path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed partial file"),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "could not remove partial file")
                }
            },
        }
    }
}

/// Takes the file by value so it is closed before the caller touches the path.
fn copy_and_sync<R: Read + ?Sized>(
    body: &mut R,
    mut file: File,
    path: &Path,
) -> Result<u64, TransferError> {
    let storage = |source: io::Error| TransferError::Storage {
        path: path.to_path_buf(),
        source,
    };

    let mut buf = vec![0u8; BUF_SIZE];
    let mut written = 0u64;
    loop {
        let n = match body.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(TransferError::Body(e)),
        };
        file.write_all(&buf[..n]).map_err(storage)?;
        written += n as u64;
    }
    file.flush().map_err(storage)?;
    file.sync_all().map_err(storage)?;
    Ok(written)
}
