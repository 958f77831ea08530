use crate::connection::{HttpRequest, HttpResponse, SendMessage};
use crate::error::Result;
use bytes::Bytes;
use http::{HeaderMap, Method, Response};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

/// Answers TestRail calls from canned bodies keyed by endpoint name and keeps
/// every request it saw. Several bodies for one endpoint are served in order,
/// the last one repeating; unknown endpoints get `200 {}`.
#[derive(Default)]
pub struct RecordingTransport {
    routes: RefCell<HashMap<String, VecDeque<(u16, Value)>>>,
    calls: RefCell<Vec<Call>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, endpoint: &str, body: Value) -> Self {
        self.respond(endpoint, 200, body)
    }

    pub fn failing(self, endpoint: &str, status: u16, body: Value) -> Self {
        self.respond(endpoint, status, body)
    }

    fn respond(self, endpoint: &str, status: u16, body: Value) -> Self {
        self.routes
            .borrow_mut()
            .entry(endpoint.to_owned())
            .or_default()
            .push_back((status, body));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Endpoint names in call order, e.g. `["get_runs", "get_run"]`.
    pub fn operations(&self) -> Vec<String> {
        self.calls.borrow().iter().map(Call::endpoint).collect()
    }
}

impl Call {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    pub fn endpoint(&self) -> String {
        let path = self.uri.splitn(2, "/api/v2/").nth(1).unwrap_or("");
        path.split(|c| c == '/' || c == '&')
            .next()
            .unwrap_or("")
            .to_owned()
    }
}

impl SendMessage<HttpRequest, Result<HttpResponse>> for RecordingTransport {
    fn send(&self, data: HttpRequest) -> Result<HttpResponse> {
        let body = if data.body().is_empty() {
            None
        } else {
            Some(serde_json::from_slice(data.body()).expect("request body is not JSON"))
        };
        let call = Call {
            method: data.method().clone(),
            uri: data.uri().to_string(),
            headers: data.headers().clone(),
            body,
        };
        let endpoint = call.endpoint();
        self.calls.borrow_mut().push(call);

        let (status, body) = match self.routes.borrow_mut().get_mut(&endpoint) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or((200, json!({}))),
            None => (200, json!({})),
        };
        Ok(Response::builder()
            .status(status)
            .body(Bytes::from(body.to_string()))
            .unwrap())
    }
}
