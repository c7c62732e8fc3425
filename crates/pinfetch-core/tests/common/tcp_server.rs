//! Bare TCP listeners that misbehave at the TLS layer, for driving the real
//! HTTPS transport without a certificate.

use std::net::{TcpListener, TcpStream};
use std::thread;

/// Accepts connections and immediately drops them. Returns the base URL
/// (e.g. "https://127.0.0.1:12345/"). Runs until the process exits.
pub fn start_closing() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            drop(stream);
        }
    });
    format!("https://127.0.0.1:{}/", port)
}

/// Accepts connections and never answers, holding each socket open so the
/// client waits on its handshake forever.
pub fn start_silent() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        let mut held: Vec<TcpStream> = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });
    format!("https://127.0.0.1:{}/", port)
}
