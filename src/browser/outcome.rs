use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Record of one HTTP round trip.
#[derive(Debug, Clone)]
pub struct HttpOutcome {
    location: Url,
    method: Method,
    status: StatusCode,
    reason_phrase: String,
    elapsed: Duration,
    started_at: DateTime<Utc>,
}

impl HttpOutcome {
    pub fn record(
        location: Url,
        method: Method,
        status: StatusCode,
        reason_phrase: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        let offset = chrono::Duration::from_std(elapsed).unwrap_or_else(|_| chrono::Duration::zero());
        Self {
            location,
            method,
            status,
            reason_phrase: reason_phrase.into(),
            elapsed,
            started_at: Utc::now() - offset,
        }
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason_phrase
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl fmt::Display for HttpOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {} {} ({}ms)",
            self.method,
            self.location,
            self.status.as_u16(),
            self.reason_phrase,
            self.elapsed.as_millis()
        )
    }
}

/// The ordered outcomes of a navigation, oldest first.
#[derive(Debug, Clone, Default)]
pub struct HttpResult {
    outcomes: Vec<HttpOutcome>,
}

impl HttpResult {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, outcome: HttpOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[HttpOutcome] {
        &self.outcomes
    }

    /// The authoritative outcome of the navigation.
    pub fn last(&self) -> Option<&HttpOutcome> {
        self.outcomes.last()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn redirect_count(&self) -> usize {
        self.outcomes.len().saturating_sub(1)
    }

    pub fn total_elapsed(&self) -> Duration {
        self.outcomes.iter().map(HttpOutcome::elapsed).sum()
    }
}

impl fmt::Display for HttpResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, outcome) in self.outcomes.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}. {}", index + 1, outcome)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(path: &str, status: StatusCode, millis: u64) -> HttpOutcome {
        HttpOutcome::record(
            Url::parse("http://localhost/").unwrap().join(path).unwrap(),
            Method::GET,
            status,
            status.canonical_reason().unwrap_or(""),
            Duration::from_millis(millis),
        )
    }

    #[test]
    fn record_keeps_round_trip_details() {
        let outcome = outcome("/login", StatusCode::FOUND, 12);

        assert_eq!(outcome.location().path(), "/login");
        assert_eq!(outcome.method(), &Method::GET);
        assert_eq!(outcome.status(), StatusCode::FOUND);
        assert_eq!(outcome.reason_phrase(), "Found");
        assert_eq!(outcome.elapsed(), Duration::from_millis(12));
        assert!(outcome.started_at() <= Utc::now());
        assert_eq!(outcome.to_string(), "GET http://localhost/login - 302 Found (12ms)");
    }

    #[test]
    fn result_preserves_request_order() {
        let mut result = HttpResult::new();
        result.push(outcome("/a", StatusCode::MOVED_PERMANENTLY, 5));
        result.push(outcome("/b", StatusCode::OK, 7));

        assert_eq!(result.len(), 2);
        assert_eq!(result.redirect_count(), 1);
        assert_eq!(result.outcomes()[0].location().path(), "/a");
        assert_eq!(result.last().map(|o| o.status()), Some(StatusCode::OK));
        assert_eq!(result.total_elapsed(), Duration::from_millis(12));
        assert!(result.to_string().starts_with("1. GET http://localhost/a"));
    }
}
