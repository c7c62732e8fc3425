//! One pass over the head request: setup, transfer, callback.

use std::panic::{self, AssertUnwindSafe};

use crate::request::{DownloadRequest, TlsEnvironment};
use crate::storage::OutputDir;
use crate::transport::Transport;

use super::RequestOutcome;

pub(super) fn process_request<T: Transport + ?Sized>(
    request: &mut DownloadRequest,
    keep_alive: bool,
    tls_env: &dyn TlsEnvironment,
    transport: &mut T,
    output: &OutputDir,
) -> RequestOutcome {
    let filename = request.filename().to_owned();

    let prepared = match request.setup(tls_env) {
        Ok(prepared) => prepared,
        Err(e) => {
            tracing::warn!(%filename, error = %e, "setup failed, skipping request");
            return RequestOutcome::SetupFailed(e);
        }
    };
    let url = prepared.url.clone();

    let result = transport
        .open(prepared, keep_alive)
        .and_then(|mut body| output.write_body(&filename, &mut *body));

    match result {
        Ok(bytes) => {
            tracing::info!(%filename, %url, bytes, "download finished");
            if panic::catch_unwind(AssertUnwindSafe(|| request.finish())).is_err() {
                tracing::error!(%filename, "completion callback panicked");
            }
            RequestOutcome::Completed { bytes }
        }
        Err(e) => {
            tracing::warn!(%filename, %url, error = %e, "download failed");
            RequestOutcome::TransferFailed(e)
        }
    }
}
