use super::outcome::{HttpOutcome, HttpResult};
use super::parameters::FormParameters;
use super::session::{Session, SessionRef};
use crate::core::{Page, TransportRequest, TransportResponse};
use crate::errors::{BrowserError, Result};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// The request issued against every location in a redirect chain.
#[derive(Debug, Clone)]
pub enum RequestAction {
    Get,
    Post(FormParameters),
}

impl RequestAction {
    fn request(&self, location: &Url) -> TransportRequest {
        match self {
            RequestAction::Get => TransportRequest::get(location.clone()),
            RequestAction::Post(parameters) => {
                TransportRequest::post(location.clone(), parameters.encode())
            }
        }
    }
}

/// Statuses that send the browser on to the `Location` header.
const REDIRECT_STATUSES: [StatusCode; 6] = [
    StatusCode::MULTIPLE_CHOICES,
    StatusCode::MOVED_PERMANENTLY,
    StatusCode::FOUND,
    StatusCode::SEE_OTHER,
    StatusCode::TEMPORARY_REDIRECT,
    StatusCode::PERMANENT_REDIRECT,
];

pub fn is_redirect(response: &TransportResponse) -> bool {
    response.location_header().is_some() && REDIRECT_STATUSES.contains(&response.status)
}

pub struct NavigationEngine;

impl NavigationEngine {
    /// Run one navigation: follow redirects, build the page from the
    /// terminal response and validate it.
    pub(crate) async fn execute<P, F>(
        session: &Arc<Session>,
        location: Option<&Url>,
        expected_status: StatusCode,
        action: RequestAction,
        page_factory: F,
    ) -> Result<P>
    where
        P: Page,
        F: FnOnce(SessionRef, TransportResponse, HttpResult) -> Result<P>,
    {
        let location = location.ok_or_else(|| {
            BrowserError::Configuration(
                "No location has been specified for the browser to request".to_string(),
            )
        })?;

        let config = &session.config().navigation;
        let mut current_location = location.clone();
        let mut outcomes = HttpResult::new();
        let mut redirects = 0usize;

        let response = loop {
            let started = Instant::now();
            let response = session
                .transport()
                .send(action.request(&current_location))
                .await?;
            let elapsed = started.elapsed();

            let outcome = HttpOutcome::record(
                current_location.clone(),
                response.method.clone(),
                response.status,
                response.reason_phrase.clone(),
                elapsed,
            );
            if config.log_outcomes {
                debug!(session = %session.id(), %outcome, "recorded outcome");
            }
            outcomes.push(outcome);

            if !is_redirect(&response) {
                break response;
            }

            if let Some(limit) = config.max_redirects {
                if redirects >= limit {
                    warn!(%location, limit, "redirect limit reached");
                    return Err(BrowserError::TooManyRedirects {
                        limit,
                        location: location.clone(),
                    });
                }
            }
            redirects += 1;

            // is_redirect guarantees the header
            let target = response.location_header().unwrap_or_default();
            current_location = current_location.join(target)?;
            debug!(to = %current_location, status = %response.status, "following redirect");
        };

        let actual_status = outcomes
            .last()
            .map(HttpOutcome::status)
            .unwrap_or(response.status);

        let page = page_factory(session.handle(), response, outcomes)?;

        if actual_status != expected_status {
            warn!(%current_location, %expected_status, %actual_status, "unexpected outcome");
            return Err(BrowserError::UnexpectedOutcome {
                expected: expected_status,
                actual: actual_status,
                location: current_location,
            });
        }

        if !page.is_on(&current_location) {
            return Err(BrowserError::Configuration(format!(
                "The url requested is {} which does not match the location of {} defined by page {}.",
                current_location,
                page.location(),
                page.type_name()
            )));
        }

        info!(
            location = %current_location,
            status = %actual_status,
            redirects,
            "navigation complete"
        );

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::Browser;
    use crate::core::Config;
    use crate::pages::BinaryPage;
    use crate::testing::{ScriptedResponse, ScriptedTransport};
    use reqwest::Method;

    fn url(path: &str) -> Url {
        Url::parse("http://localhost/").unwrap().join(path).unwrap()
    }

    fn browser(transport: &Arc<ScriptedTransport>) -> Browser {
        Browser::with_transport(transport.clone(), Config::default())
    }

    #[test]
    fn redirect_requires_location_header() {
        let redirect = ScriptedResponse::redirect(StatusCode::FOUND, "/next")
            .into_response(url("/"), Method::GET);
        let bare = ScriptedResponse::status(StatusCode::FOUND).into_response(url("/"), Method::GET);
        let use_proxy = ScriptedResponse::redirect(StatusCode::USE_PROXY, "/proxy")
            .into_response(url("/"), Method::GET);

        assert!(is_redirect(&redirect));
        for status in REDIRECT_STATUSES {
            let response = ScriptedResponse::redirect(status, "/next").into_response(url("/"), Method::GET);
            assert!(is_redirect(&response), "{status} should redirect");
        }
        assert!(!is_redirect(&bare));
        assert!(!is_redirect(&use_proxy));
    }

    #[tokio::test]
    async fn single_response_records_one_outcome() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(ScriptedResponse::bytes(b"data".to_vec()));

        let page = browser(&transport)
            .browse_to(&url("/file"), StatusCode::OK, BinaryPage::from_response)
            .await
            .unwrap();

        assert_eq!(page.result().len(), 1);
        assert_eq!(page.content(), b"data");
    }

    #[tokio::test]
    async fn redirect_chain_records_every_hop() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(ScriptedResponse::redirect(StatusCode::MOVED_PERMANENTLY, "/b"));
        transport.push(ScriptedResponse::redirect(StatusCode::SEE_OTHER, "http://localhost/c"));
        transport.push(ScriptedResponse::redirect(StatusCode::TEMPORARY_REDIRECT, "/d"));
        transport.push(ScriptedResponse::redirect(StatusCode::MULTIPLE_CHOICES, "/e"));
        transport.push(ScriptedResponse::redirect(StatusCode::PERMANENT_REDIRECT, "/f"));
        transport.push(ScriptedResponse::bytes(vec![1, 2, 3]).with_status(StatusCode::ACCEPTED));

        let page = browser(&transport)
            .browse_to(&url("/a"), StatusCode::ACCEPTED, BinaryPage::from_response)
            .await
            .unwrap();

        let result = page.result();
        assert_eq!(result.len(), 6);
        assert_eq!(result.outcomes()[3].status(), StatusCode::MULTIPLE_CHOICES);
        assert_eq!(result.outcomes()[4].status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(result.last().unwrap().status(), StatusCode::ACCEPTED);
        assert_eq!(page.location(), &url("/f"));

        let requested: Vec<String> = transport.requests().iter().map(|r| r.url.path().to_string()).collect();
        assert_eq!(requested, vec!["/a", "/b", "/c", "/d", "/e", "/f"]);
    }

    #[tokio::test]
    async fn relative_redirects_resolve_against_previous_hop() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(ScriptedResponse::redirect(StatusCode::FOUND, "account/"));
        transport.push(ScriptedResponse::redirect(StatusCode::FOUND, "login"));
        transport.push(ScriptedResponse::bytes(Vec::new()));

        let page = browser(&transport)
            .browse_to(&url("/app/home"), StatusCode::OK, BinaryPage::from_response)
            .await
            .unwrap();

        assert_eq!(page.location(), &url("/app/account/login"));
    }

    #[tokio::test]
    async fn status_mismatch_is_unexpected_outcome() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(ScriptedResponse::redirect(StatusCode::FOUND, "/missing"));
        transport.push(ScriptedResponse::status(StatusCode::NOT_FOUND));

        let err = browser(&transport)
            .browse_to(&url("/start"), StatusCode::FOUND, BinaryPage::from_response)
            .await
            .unwrap_err();

        match err {
            BrowserError::UnexpectedOutcome { expected, actual, location } => {
                assert_eq!(expected, StatusCode::FOUND);
                assert_eq!(actual, StatusCode::NOT_FOUND);
                assert_eq!(location, url("/missing"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn page_on_other_location_is_configuration_error() {
        struct Elsewhere(BinaryPage);

        impl Page for Elsewhere {
            fn location(&self) -> &Url {
                self.0.location()
            }
            fn status(&self) -> StatusCode {
                self.0.status()
            }
            fn result(&self) -> &HttpResult {
                self.0.result()
            }
            fn set_content(&mut self, body: Option<Vec<u8>>) -> Result<()> {
                self.0.set_content(body)
            }
            fn is_on(&self, location: &Url) -> bool {
                location.path() == "/elsewhere"
            }
        }

        let transport = Arc::new(ScriptedTransport::new());
        transport.push(ScriptedResponse::bytes(Vec::new()));

        let err = browser(&transport)
            .browse_to(&url("/here"), StatusCode::OK, |session, response, result| {
                BinaryPage::from_response(session, response, result).map(Elsewhere)
            })
            .await
            .err()
            .unwrap();

        match err {
            BrowserError::Configuration(message) => {
                assert!(message.contains("http://localhost/here"));
                assert!(message.contains("Elsewhere"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_location_is_configuration_error() {
        let transport = Arc::new(ScriptedTransport::new());

        let err = browser(&transport)
            .navigate(None, StatusCode::OK, RequestAction::Get, BinaryPage::from_response)
            .await
            .unwrap_err();

        assert!(matches!(err, BrowserError::Configuration(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn redirect_limit_stops_loops() {
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..4 {
            transport.push(ScriptedResponse::redirect(StatusCode::FOUND, "/loop"));
        }
        let mut config = Config::default();
        config.navigation.max_redirects = Some(2);
        let browser = Browser::with_transport(transport.clone(), config);

        let err = browser
            .browse_to(&url("/loop"), StatusCode::OK, BinaryPage::from_response)
            .await
            .unwrap_err();

        assert!(matches!(err, BrowserError::TooManyRedirects { limit: 2, .. }));
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn post_sends_encoded_parameters_on_each_hop() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(ScriptedResponse::redirect(StatusCode::TEMPORARY_REDIRECT, "/saved"));
        transport.push(ScriptedResponse::bytes(Vec::new()));

        let parameters = FormParameters::new().with("name", "value");
        browser(&transport)
            .post_to(&parameters, &url("/save"), StatusCode::OK, BinaryPage::from_response)
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.method == Method::POST));
        assert_eq!(requests[1].body.as_deref(), Some("name=value"));
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let transport = Arc::new(ScriptedTransport::new());

        let err = browser(&transport)
            .browse_to(&url("/"), StatusCode::OK, BinaryPage::from_response)
            .await
            .unwrap_err();

        assert!(matches!(err, BrowserError::TransportFailed(_)));
    }
}
