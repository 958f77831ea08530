//! Model of the JSON summary Newman exports at the end of a collection run.
//!
//! Only the parts the reporter reads are modelled. Newman serializes some
//! collection types differently depending on the SDK version (`header` vs
//! `headers`, lists vs `{ "members": [...] }`, hosts as strings or segments),
//! so those fields accept every shape seen in the wild.

use crate::error::{Error, Result};
use serde_derive::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Summary {
    pub run: SummaryRun,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryRun {
    #[serde(default)]
    pub executions: Vec<Execution>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub item: Item,
    #[serde(default)]
    pub request: Option<Request>,
    #[serde(default)]
    pub response: Option<Response>,
    #[serde(default)]
    pub assertions: Vec<Assertion>,
    #[serde(default)]
    pub request_error: Option<RequestError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Assertion {
    pub assertion: String,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default)]
    pub error: Option<AssertionFailure>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AssertionFailure {
    Detail {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
    Flag(bool),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default = "default_method")]
    pub method: String,
    pub url: Url,
    #[serde(default, alias = "header")]
    pub headers: PropertyList,
    #[serde(default)]
    pub body: Option<Body>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub status: String,
    #[serde(default, alias = "header")]
    pub headers: PropertyList,
    #[serde(default)]
    pub stream: Option<Stream>,
    #[serde(default)]
    pub response_time: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Url {
    Raw(String),
    Parts {
        #[serde(default)]
        protocol: Option<String>,
        #[serde(default)]
        host: Segments,
        #[serde(default)]
        port: Option<String>,
        #[serde(default)]
        path: Segments,
        #[serde(default)]
        query: PropertyList,
    },
}

/// Host or path, either pre-joined or split into segments.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Segments {
    Joined(String),
    Parts(Vec<String>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PropertyList {
    List(Vec<Property>),
    Members { members: Vec<Property> },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Property {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Body {
    Text(String),
    Structured {
        #[serde(default)]
        raw: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Stream {
    Buffer { data: Vec<u8> },
    Text(String),
}

fn default_method() -> String {
    "GET".to_owned()
}

impl Summary {
    pub fn from_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader).map_err(Error::Summary)
    }
}

impl Execution {
    pub fn name(&self) -> &str {
        &self.item.name
    }

    pub fn response_time(&self) -> Option<f64> {
        self.response.as_ref().and_then(|r| r.response_time)
    }
}

impl Assertion {
    pub fn is_failed(&self) -> bool {
        match &self.error {
            Some(AssertionFailure::Flag(flag)) => *flag,
            Some(AssertionFailure::Detail { .. }) => true,
            None => false,
        }
    }

    /// `name: message` of the assertion error, when newman recorded one.
    pub fn failure_message(&self) -> Option<String> {
        match &self.error {
            Some(AssertionFailure::Detail { name, message }) => match (name, message) {
                (Some(name), Some(message)) => Some(format!("{}: {}", name, message)),
                (Some(text), None) | (None, Some(text)) => Some(text.clone()),
                (None, None) => None,
            },
            _ => None,
        }
    }
}

impl Url {
    /// Renders the url as `protocol://host[:port]/path[?query]`.
    pub fn render(&self) -> String {
        match self {
            Url::Raw(raw) => raw.clone(),
            Url::Parts {
                protocol,
                host,
                port,
                path,
                query,
            } => {
                let mut url = format!(
                    "{}://{}",
                    protocol.as_deref().unwrap_or("http"),
                    host.join(".")
                );
                if let Some(port) = port {
                    url.push(':');
                    url.push_str(port);
                }
                url.push('/');
                url.push_str(path.join("/").trim_start_matches('/'));
                let params: Vec<String> = query
                    .enabled()
                    .map(|p| format!("{}={}", p.key, p.value.as_deref().unwrap_or("")))
                    .collect();
                if !params.is_empty() {
                    url.push('?');
                    url.push_str(&params.join("&"));
                }
                url
            }
        }
    }
}

impl Segments {
    pub fn join(&self, separator: &str) -> String {
        match self {
            Segments::Joined(joined) => joined.clone(),
            Segments::Parts(parts) => parts.join(separator),
        }
    }
}

impl Default for Segments {
    fn default() -> Self {
        Segments::Parts(Vec::new())
    }
}

impl PropertyList {
    pub fn enabled(&self) -> impl Iterator<Item = &Property> {
        let properties = match self {
            PropertyList::List(list) => list,
            PropertyList::Members { members } => members,
        };
        properties.iter().filter(|p| !p.disabled)
    }
}

impl Default for PropertyList {
    fn default() -> Self {
        PropertyList::List(Vec::new())
    }
}

impl Body {
    pub fn text(&self) -> &str {
        match self {
            Body::Text(text) => text,
            Body::Structured { raw } => raw.as_deref().unwrap_or(""),
        }
    }
}

impl Stream {
    pub fn text(&self) -> String {
        match self {
            Stream::Buffer { data } => String::from_utf8_lossy(data).into_owned(),
            Stream::Text(text) => text.clone(),
        }
    }
}
