#![allow(dead_code)]

pub mod tcp_server;
pub mod tls_server;
