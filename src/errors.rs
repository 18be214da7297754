use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Argument error: {0} was not supplied")]
    Argument(String),

    #[error("Unexpected outcome from {location}: expected status {expected} but received {actual}")]
    UnexpectedOutcome {
        expected: StatusCode,
        actual: StatusCode,
        location: Url,
    },

    #[error("Unsupported element: {}", describe_element(.tag, .attribute.as_deref()))]
    UnsupportedElement {
        tag: String,
        attribute: Option<String>,
    },

    #[error("Too many redirects: more than {limit} hops while requesting {location}")]
    TooManyRedirects { limit: usize, location: Url },

    #[error("The browser session has been disposed")]
    SessionDisposed,

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Transport failed: {0}")]
    TransportFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BrowserError>;

fn describe_element(tag: &str, attribute: Option<&str>) -> String {
    match attribute {
        Some(value) => format!("<{}> with type '{}'", tag, value),
        None => format!("<{}>", tag),
    }
}

impl BrowserError {
    /// Wraps a failure from a non-reqwest transport.
    pub fn from_transport_error<E: std::fmt::Display>(err: E) -> Self {
        BrowserError::TransportFailed(err.to_string())
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            BrowserError::UnexpectedOutcome { actual, .. } => Some(*actual),
            BrowserError::Transport(err) => err.status(),
            _ => None,
        }
    }
}
