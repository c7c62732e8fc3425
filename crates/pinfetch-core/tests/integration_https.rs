//! Integration test: the real HTTPS transport against local listeners that
//! never complete a TLS handshake.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use pinfetch_core::queue::{DownloadQueue, RequestOutcome};
use pinfetch_core::request::HttpsDownload;
use tempfile::tempdir;
use url::Url;

fn counted(url: &str, name: &str, finished: &Arc<AtomicUsize>) -> HttpsDownload {
    let finished = Arc::clone(finished);
    HttpsDownload::for_url(name, Url::parse(url).unwrap(), move || {
        finished.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn failed_handshake_is_reported_and_drain_continues() {
    let base = common::tcp_server::start_closing();
    let dir = tempdir().unwrap();
    let finished = Arc::new(AtomicUsize::new(0));

    let mut queue = DownloadQueue::new(dir.path());
    queue.enqueue(counted(&format!("{base}first.bin"), "first.bin", &finished));
    queue.enqueue(counted(&format!("{base}second.bin"), "second.bin", &finished));

    let report = queue.drain_all();

    assert!(queue.is_empty());
    assert_eq!(report.len(), 2);
    assert_eq!(report.transfer_failed(), 2);
    for (_, outcome) in &report.entries {
        match outcome {
            RequestOutcome::TransferFailed(e) => assert!(!e.is_certificate(), "{e}"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
    assert_eq!(finished.load(Ordering::SeqCst), 0);
    assert!(!dir.path().join("first.bin").exists());
    assert!(!dir.path().join("second.bin").exists());
}

#[test]
fn silent_server_blocks_drain() {
    let base = common::tcp_server::start_silent();
    let dir = tempdir().unwrap();
    let finished = Arc::new(AtomicUsize::new(0));

    let mut queue = DownloadQueue::new(dir.path().to_path_buf());
    queue.enqueue(counted(&format!("{base}stuck.bin"), "stuck.bin", &finished));

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let report = queue.drain_all();
        let _ = tx.send(report.len());
    });

    assert_eq!(
        rx.recv_timeout(Duration::from_secs(3)),
        Err(mpsc::RecvTimeoutError::Timeout)
    );
    assert_eq!(finished.load(Ordering::SeqCst), 0);
}
