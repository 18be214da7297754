use super::http::HttpTransport;
use super::navigation::{NavigationEngine, RequestAction};
use super::outcome::HttpResult;
use super::parameters::FormParameters;
use crate::core::{Config, Page, Transport, TransportResponse};
use crate::errors::{BrowserError, Result};
use reqwest::StatusCode;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::debug;
use url::Url;

/// State shared by a browser and the pages it produced.
pub(crate) struct Session {
    id: String,
    transport: Arc<dyn Transport>,
    config: Config,
}

impl Session {
    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn handle(self: &Arc<Self>) -> SessionRef {
        SessionRef {
            id: self.id.clone(),
            inner: Arc::downgrade(self),
        }
    }
}

/// A browsing session: one transport, one cookie store.
///
/// Navigations on the same browser must not overlap. Dropping the browser
/// (or calling [`Browser::dispose`]) releases the transport; pages that are
/// still alive can no longer navigate afterwards.
pub struct Browser {
    id: String,
    session: Option<Arc<Session>>,
}

impl Browser {
    /// Create a browser backed by [`HttpTransport`].
    pub fn new(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.browser)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, config: Config) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        debug!(session = %id, "browser session created");

        Self {
            id: id.clone(),
            session: Some(Arc::new(Session {
                id,
                transport,
                config,
            })),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.id
    }

    pub fn is_disposed(&self) -> bool {
        self.session.is_none()
    }

    /// A non-owning handle to this session.
    pub fn handle(&self) -> Result<SessionRef> {
        Ok(self.session()?.handle())
    }

    pub fn clear_cookies(&self) -> Result<()> {
        self.session()?.transport().clear_cookies()
    }

    pub async fn browse_to<P, F>(
        &self,
        location: &Url,
        expected_status: StatusCode,
        page_factory: F,
    ) -> Result<P>
    where
        P: Page,
        F: FnOnce(SessionRef, TransportResponse, HttpResult) -> Result<P>,
    {
        self.navigate(Some(location), expected_status, RequestAction::Get, page_factory)
            .await
    }

    pub async fn post_to<P, F>(
        &self,
        parameters: &FormParameters,
        location: &Url,
        expected_status: StatusCode,
        page_factory: F,
    ) -> Result<P>
    where
        P: Page,
        F: FnOnce(SessionRef, TransportResponse, HttpResult) -> Result<P>,
    {
        self.navigate(
            Some(location),
            expected_status,
            RequestAction::Post(parameters.clone()),
            page_factory,
        )
        .await
    }

    pub async fn navigate<P, F>(
        &self,
        location: Option<&Url>,
        expected_status: StatusCode,
        action: RequestAction,
        page_factory: F,
    ) -> Result<P>
    where
        P: Page,
        F: FnOnce(SessionRef, TransportResponse, HttpResult) -> Result<P>,
    {
        let session = self.session()?;
        NavigationEngine::execute(session, location, expected_status, action, page_factory).await
    }

    /// Release the transport. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.session.take().is_some() {
            debug!(session = %self.id, "browser session disposed");
        }
    }

    fn session(&self) -> Result<&Arc<Session>> {
        self.session.as_ref().ok_or(BrowserError::SessionDisposed)
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Browser")
            .field("id", &self.id)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Back-reference from a page to the browser that produced it.
///
/// The handle does not keep the session alive.
#[derive(Clone)]
pub struct SessionRef {
    id: String,
    inner: Weak<Session>,
}

impl SessionRef {
    pub fn session_id(&self) -> &str {
        &self.id
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub async fn browse_to<P, F>(
        &self,
        location: &Url,
        expected_status: StatusCode,
        page_factory: F,
    ) -> Result<P>
    where
        P: Page,
        F: FnOnce(SessionRef, TransportResponse, HttpResult) -> Result<P>,
    {
        let session = self.upgrade()?;
        NavigationEngine::execute(
            &session,
            Some(location),
            expected_status,
            RequestAction::Get,
            page_factory,
        )
        .await
    }

    pub async fn post_to<P, F>(
        &self,
        parameters: &FormParameters,
        location: &Url,
        expected_status: StatusCode,
        page_factory: F,
    ) -> Result<P>
    where
        P: Page,
        F: FnOnce(SessionRef, TransportResponse, HttpResult) -> Result<P>,
    {
        let session = self.upgrade()?;
        NavigationEngine::execute(
            &session,
            Some(location),
            expected_status,
            RequestAction::Post(parameters.clone()),
            page_factory,
        )
        .await
    }

    fn upgrade(&self) -> Result<Arc<Session>> {
        self.inner.upgrade().ok_or(BrowserError::SessionDisposed)
    }
}

impl fmt::Debug for SessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRef")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}
