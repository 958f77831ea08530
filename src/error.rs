use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Required configuration missing: {}", .0.join(", "))]
    MissingOptions(Vec<&'static str>),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to send request: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error("TestRail responded with {status} to {operation}: {body}")]
    Api {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Malformed response to {operation}: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response to {operation} is missing '{field}'")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("Failed to read run summary: {0}")]
    Summary(#[source] serde_json::Error),

    #[error("Failed to export results: {0}")]
    Export(#[source] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
