//! Scripted transport for exercising navigations without a network.

use crate::core::{Transport, TransportRequest, TransportResponse};
use crate::errors::{BrowserError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, LOCATION};
use reqwest::{Method, StatusCode};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use url::Url;

/// A canned response replayed by [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl ScriptedResponse {
    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Some(Vec::new()),
        }
    }

    pub fn redirect(status: StatusCode, location: &str) -> Self {
        Self::status(status).with_header(LOCATION.as_str(), location)
    }

    pub fn html(markup: &str) -> Self {
        Self::bytes(markup.as_bytes().to_vec()).with_header(CONTENT_TYPE.as_str(), "text/html")
    }

    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Some(body),
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Headers that are not valid HTTP are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }

    pub fn into_response(self, url: Url, method: Method) -> TransportResponse {
        TransportResponse {
            url,
            method,
            status: self.status,
            reason_phrase: self.status.canonical_reason().unwrap_or_default().to_string(),
            headers: self.headers,
            body: self.body,
        }
    }
}

/// Transport that answers requests from a queue of scripted responses and
/// remembers every request it was sent.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    requests: Mutex<Vec<TransportRequest>>,
    cookie_clears: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: ScriptedResponse) {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(response);
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn cookie_clears(&self) -> usize {
        self.cookie_clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let next = self
            .responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();

        match next {
            Some(response) => Ok(response.into_response(request.url, request.method)),
            None => Err(BrowserError::from_transport_error(format!(
                "no scripted response left for {} {}",
                request.method, request.url
            ))),
        }
    }

    fn clear_cookies(&self) -> Result<()> {
        self.cookie_clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_responses_in_order() {
        let transport = ScriptedTransport::new();
        transport.push(ScriptedResponse::redirect(StatusCode::FOUND, "/next"));
        transport.push(ScriptedResponse::html("<p>done</p>").without_body());

        let url = Url::parse("http://localhost/start").unwrap();
        let first = transport.send(TransportRequest::get(url.clone())).await.unwrap();
        let second = transport
            .send(TransportRequest::post(url.clone(), "a=1".to_string()))
            .await
            .unwrap();

        assert_eq!(first.status, StatusCode::FOUND);
        assert_eq!(first.location_header(), Some("/next"));
        assert_eq!(first.reason_phrase, "Found");
        assert_eq!(second.method, Method::POST);
        assert_eq!(second.content_type(), Some("text/html"));
        assert!(second.body.is_none());
        assert_eq!(transport.remaining(), 0);
        assert_eq!(transport.requests().len(), 2);
    }
}
