//! Minimal HTTPS/1.1 server on a self-signed certificate, for running real
//! handshakes against the pinning verifier.
//!
//! Answers every GET with 200 and a single static body, then closes.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::{RootCertStore, ServerConfig, ServerConnection, StreamOwned};

pub struct TlsServer {
    /// e.g. "https://127.0.0.1:12345/"
    pub base_url: String,
    /// The server's self-signed certificate.
    pub cert: CertificateDer<'static>,
}

impl TlsServer {
    /// Trust store holding only this server's certificate.
    pub fn roots(&self) -> Arc<RootCertStore> {
        let mut roots = RootCertStore::empty();
        roots.add(self.cert.clone()).expect("add test root");
        Arc::new(roots)
    }
}

/// Starts a server in a background thread serving `body`. Runs until the
/// process exits.
pub fn start(body: Vec<u8>) -> TlsServer {
    let rcgen::CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["127.0.0.1".to_string(), "localhost".to_string()])
            .expect("generate certificate");
    let cert = cert.der().clone();
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .expect("protocol versions")
        .with_no_client_auth()
        .with_single_cert(vec![cert.clone()], key)
        .expect("server certificate");
    let config = Arc::new(config);

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let config = Arc::clone(&config);
            let body = Arc::clone(&body);
            thread::spawn(move || handle(stream, config, &body));
        }
    });

    TlsServer {
        base_url: format!("https://127.0.0.1:{}/", port),
        cert,
    }
}

fn handle(stream: TcpStream, config: Arc<ServerConfig>, body: &[u8]) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let Ok(conn) = ServerConnection::new(config) else {
        return;
    };
    let mut tls = StreamOwned::new(conn, stream);

    // A rejected handshake surfaces here as a read error.
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match tls.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    if tls.write_all(head.as_bytes()).is_err() || tls.write_all(body).is_err() {
        return;
    }
    tls.conn.send_close_notify();
    let _ = tls.flush();
}
