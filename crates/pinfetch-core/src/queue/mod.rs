//! Download queue and sequential executor.
//!
//! Requests run in insertion order, one at a time, on the calling thread.
//! The head is inspected in place and popped only after its attempt has
//! finished, whatever the outcome. A request whose transfer never returns
//! blocks [`DownloadQueue::drain_all`] indefinitely: there is no timeout or
//! cancellation.
//!
//! The queue needs `&mut self` for every mutation; callers that submit from
//! several threads must wrap it in their own lock.

mod execute;
mod report;

pub use report::{DrainReport, RequestOutcome};

use anyhow::Result;
use std::collections::VecDeque;
use std::path::PathBuf;

use crate::config::PinfetchConfig;
use crate::request::{DownloadRequest, RustlsEnvironment, TlsEnvironment};
use crate::storage::{OutputDir, PartialFilePolicy};
use crate::transport::{HttpsTransport, Transport};

pub struct DownloadQueue<T: Transport = HttpsTransport> {
    requests: VecDeque<DownloadRequest>,
    transport: T,
    tls_env: Box<dyn TlsEnvironment + Send>,
    output: OutputDir,
}

impl DownloadQueue<HttpsTransport> {
    /// HTTPS queue writing into `download_dir`, keeping partial files.
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self::with_transport(HttpsTransport::new(), download_dir)
    }

    /// HTTPS queue using the configured directory (or the current working
    /// directory) and partial-file policy.
    pub fn from_config(cfg: &PinfetchConfig) -> Result<Self> {
        let dir = cfg.download_dir()?;
        Ok(Self::new(dir).with_partial_files(cfg.partial_files))
    }
}

impl<T: Transport> DownloadQueue<T> {
    pub fn with_transport(transport: T, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            requests: VecDeque::new(),
            transport,
            tls_env: Box::new(RustlsEnvironment),
            output: OutputDir::new(download_dir, PartialFilePolicy::default()),
        }
    }

    /// Replaces the TLS capability check consulted by every `setup()`.
    pub fn with_tls_environment(mut self, env: impl TlsEnvironment + Send + 'static) -> Self {
        self.tls_env = Box::new(env);
        self
    }

    pub fn with_partial_files(mut self, policy: PartialFilePolicy) -> Self {
        self.output.set_partial_files(policy);
        self
    }

    pub fn output(&self) -> &OutputDir {
        &self.output
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Appends to the tail. The request is not inspected.
    pub fn enqueue(&mut self, request: impl Into<DownloadRequest>) {
        self.requests.push_back(request.into());
    }

    /// Drops all pending requests without running setup or callbacks.
    pub fn clear(&mut self) {
        let dropped = self.requests.len();
        self.requests.clear();
        if dropped > 0 {
            tracing::debug!(dropped, "cleared pending downloads");
        }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Keep-alive is wanted while another request waits behind the head.
    pub fn should_use_keepalive(&self) -> bool {
        self.requests.len() > 1
    }

    /// Processes every pending request in order. Individual failures are
    /// logged and recorded in the report; they never stop the loop. A
    /// completion callback that panics is caught and logged, and its request
    /// still counts as completed.
    pub fn drain_all(&mut self) -> DrainReport {
        let mut report = DrainReport::default();
        while !self.requests.is_empty() {
            let keep_alive = self.should_use_keepalive();
            let Some(head) = self.requests.front_mut() else {
                break;
            };
            let outcome = execute::process_request(
                head,
                keep_alive,
                self.tls_env.as_ref(),
                &mut self.transport,
                &self.output,
            );
            report.push(head.filename(), outcome);
            self.requests.pop_front();
        }
        tracing::info!(
            completed = report.completed(),
            setup_failed = report.setup_failed(),
            transfer_failed = report.transfer_failed(),
            "download queue drained"
        );
        report
    }
}
