use crate::core::{BrowserConfig, Transport, TransportRequest, TransportResponse};
use crate::errors::Result;
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::debug;

/// Transport backed by a reqwest client with redirects disabled.
pub struct HttpTransport {
    config: BrowserConfig,
    client: RwLock<Client>,
}

impl HttpTransport {
    pub fn new(config: &BrowserConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            client: RwLock::new(build_client(config)?),
        })
    }

    fn client(&self) -> Client {
        // Client is a cheap handle around a shared pool
        self.client
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

fn build_client(config: &BrowserConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_millis(config.timeout_ms));

    if let Some(ref user_agent) = config.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }

    if config.use_cookies {
        builder = builder.cookie_provider(Arc::new(Jar::default()));
    }

    Ok(builder.build()?)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let client = self.client();
        let mut builder = client.request(request.method.clone(), request.url.clone());

        if let Some(body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = if request.method == Method::HEAD {
            None
        } else {
            Some(response.bytes().await?.to_vec())
        };

        debug!(%url, %status, bytes = body.as_ref().map_or(0, Vec::len), "received response");

        Ok(TransportResponse {
            url,
            method: request.method,
            status,
            reason_phrase: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }

    fn clear_cookies(&self) -> Result<()> {
        // The jar cannot be emptied in place, so swap in a client with a fresh one
        let client = build_client(&self.config)?;
        *self
            .client
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = client;
        debug!("cookie jar cleared");
        Ok(())
    }
}
