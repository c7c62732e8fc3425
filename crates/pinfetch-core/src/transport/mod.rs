//! Transport abstraction: open a response body for a prepared request.
//!
//! The queue owns one transport and drives it sequentially. Implementations
//! may keep a connection around between calls when `keep_alive` is set.

mod https;

pub use https::HttpsTransport;

use std::io::Read;

use crate::error::TransferError;
use crate::request::PreparedRequest;

pub trait Transport {
    /// Sends `request` and returns its body once the status is known to be
    /// successful. Handshake and pin failures surface here, before any file
    /// is created. Blocks for as long as the network does.
    fn open(
        &mut self,
        request: &PreparedRequest,
        keep_alive: bool,
    ) -> Result<Box<dyn Read + '_>, TransferError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn open(
        &mut self,
        request: &PreparedRequest,
        keep_alive: bool,
    ) -> Result<Box<dyn Read + '_>, TransferError> {
        (**self).open(request, keep_alive)
    }
}
