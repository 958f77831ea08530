use crate::connection::{HttpRequest, HttpResponse, SendMessage};
use ::http::Response;
use crate::error::Result;
use reqwest::blocking::{Client, Request};
use std::convert::TryFrom;
use std::time::Duration;

pub fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

impl SendMessage<HttpRequest, Result<HttpResponse>> for Client {
    fn send(&self, data: HttpRequest) -> Result<HttpResponse> {
        let request = Request::try_from(data)?;
        trace!("Sending {} {}", request.method(), request.url());
        let response = self.execute(request)?;
        let status = response.status();
        let body = response.bytes()?;
        debug!("Received {} with {} bytes", status, body.len());
        Ok(Response::builder().status(status).body(body)?)
    }
}
