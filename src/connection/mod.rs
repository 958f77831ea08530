pub mod http;

use crate::error::Result;
use bytes::Bytes;

pub type HttpRequest = ::http::Request<Vec<u8>>;
pub type HttpResponse = ::http::Response<Bytes>;

pub trait SendMessage<T, R> {
    fn send(&self, data: T) -> R;
}

/// Anything able to carry a TestRail call: the blocking client in
/// production, recording fakes in tests.
pub trait Transport: SendMessage<HttpRequest, Result<HttpResponse>> {}

impl<T> Transport for T where T: SendMessage<HttpRequest, Result<HttpResponse>> {}

#[cfg(test)]
pub(crate) mod fake;
