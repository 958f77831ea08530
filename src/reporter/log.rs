use crate::configuration::LoggingMode;
use crate::newman::{Execution, PropertyList};

/// Request and response of one execution, rendered for a case comment.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestLog {
    pub url: String,
    pub request: String,
    pub response: String,
}

impl RequestLog {
    pub fn of(execution: &Execution, mode: LoggingMode) -> Self {
        let url = match &execution.request {
            Some(request) => format!("Request: {} {}", request.method, request.url.render()),
            None => "Request:".to_owned(),
        };
        if mode == LoggingMode::None {
            return Self {
                url,
                request: String::new(),
                response: String::new(),
            };
        }

        let request = match &execution.request {
            Some(request) => {
                let mut text = headers(&request.headers);
                if mode == LoggingMode::Full {
                    let body = request.body.as_ref().map_or("", |b| b.text());
                    text.push_str(&format!("\nBody: {}", body));
                }
                text
            }
            None => String::new(),
        };

        let response = if let Some(error) = &execution.request_error {
            format!("A request error has occurred.\n{}", error.message)
        } else {
            match (&execution.response, mode) {
                (Some(response), LoggingMode::Full) => format!(
                    "Response: {} {}\n{}\nBody: {}",
                    response.code,
                    response.status,
                    headers(&response.headers),
                    response.stream.as_ref().map(|s| s.text()).unwrap_or_default()
                ),
                _ => String::new(),
            }
        };

        Self {
            url,
            request,
            response,
        }
    }

    /// Text appended to the assertion title in a comment.
    pub fn block(&self) -> String {
        format!("\n{}\n\n{}\n\n{}", self.url, self.request, self.response)
    }
}

fn headers(list: &PropertyList) -> String {
    let lines: Vec<String> = list
        .enabled()
        .map(|h| format!("{}: {}", h.key, h.value.as_deref().unwrap_or("")))
        .collect();
    format!("Headers:\n{}", lines.join("\n"))
}
