use crate::browser::{HttpResult, SessionRef};
use crate::core::{Page, TransportResponse};
use crate::errors::{BrowserError, Result};
use reqwest::StatusCode;
use url::Url;

/// A page whose body is kept as raw bytes (downloads, images, PDFs).
#[derive(Debug)]
pub struct BinaryPage {
    session: SessionRef,
    location: Url,
    status: StatusCode,
    result: HttpResult,
    content_type: Option<String>,
    content: Option<Vec<u8>>,
}

impl BinaryPage {
    pub fn new(session: SessionRef, location: Url, status: StatusCode, result: HttpResult) -> Self {
        Self {
            session,
            location,
            status,
            result,
            content_type: None,
            content: None,
        }
    }

    pub fn from_response(
        session: SessionRef,
        response: TransportResponse,
        result: HttpResult,
    ) -> Result<Self> {
        let mut page = Self::new(session, response.url.clone(), response.status, result);
        page.content_type = response.content_type().map(str::to_string);
        page.set_content(response.body)?;
        Ok(page)
    }

    pub fn session(&self) -> &SessionRef {
        &self.session
    }

    pub fn content(&self) -> &[u8] {
        self.content.as_deref().unwrap_or_default()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

impl Page for BinaryPage {
    fn location(&self) -> &Url {
        &self.location
    }

    fn status(&self) -> StatusCode {
        self.status
    }

    fn result(&self) -> &HttpResult {
        &self.result
    }

    fn set_content(&mut self, body: Option<Vec<u8>>) -> Result<()> {
        let body = body.ok_or_else(|| BrowserError::Argument("content".to_string()))?;
        if self.content.is_some() {
            return Err(BrowserError::Configuration(format!(
                "content of {} has already been set",
                self.location
            )));
        }
        self.content = Some(body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::Browser;
    use crate::core::Config;
    use crate::testing::{ScriptedResponse, ScriptedTransport};
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn keeps_body_bytes_and_type() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(
            ScriptedResponse::bytes(vec![0x25, 0x50, 0x44, 0x46])
                .with_header("content-type", "application/pdf"),
        );
        let browser = Browser::with_transport(transport, Config::default());
        let location = Url::parse("http://localhost/report.pdf").unwrap();

        let page = browser
            .browse_to(&location, StatusCode::OK, BinaryPage::from_response)
            .await
            .unwrap();

        assert_eq!(page.content(), b"%PDF");
        assert_eq!(page.content_type(), Some("application/pdf"));
        assert!(page.is_on(&location));
    }

    #[test]
    fn missing_body_is_an_argument_error() {
        let transport = Arc::new(ScriptedTransport::new());
        let browser = Browser::with_transport(transport, Config::default());
        let mut page = BinaryPage::new(
            browser.handle().unwrap(),
            Url::parse("http://localhost/empty").unwrap(),
            StatusCode::NO_CONTENT,
            HttpResult::default(),
        );

        assert_err!(page.set_content(None));
        assert_eq!(page.content(), b"");
        assert_ok!(page.set_content(Some(Vec::new())));
        assert_err!(page.set_content(Some(vec![1])));
    }
}
