pub mod config;
pub mod error;
pub mod logging;

pub mod pinning;
pub mod queue;
pub mod request;
pub mod storage;
pub mod transport;
pub mod url_model;
