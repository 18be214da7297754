use crate::errors::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{Method, StatusCode};
use url::Url;

/// A single request handed to a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    /// Form-url-encoded body for POST requests.
    pub body: Option<String>,
}

impl TransportRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            body: None,
        }
    }

    pub fn post(url: Url, body: String) -> Self {
        Self {
            method: Method::POST,
            url,
            body: Some(body),
        }
    }
}

/// The raw response of one round trip, fully read.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub url: Url,
    /// The method the transport actually used for the request.
    pub method: Method,
    pub status: StatusCode,
    pub reason_phrase: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl TransportResponse {
    pub fn location_header(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// Send a request and hand back the response.
///
/// Implementations must not follow redirects; the navigation engine walks
/// the redirect chain itself so every hop is recorded.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;

    /// Drop every cookie held for the session.
    fn clear_cookies(&self) -> Result<()> {
        Ok(())
    }
}
