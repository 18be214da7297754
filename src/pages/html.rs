use crate::browser::{HttpResult, SessionRef};
use crate::core::{Page, TransportResponse};
use crate::dom::{Document, Element, ElementRegistry, Form, HtmlElement, NodeId};
use crate::errors::{BrowserError, Result};
use reqwest::StatusCode;
use std::fmt;
use std::sync::RwLock;
use url::Url;

/// A page whose body is HTML markup.
pub struct HtmlPage {
    session: SessionRef,
    location: Url,
    status: StatusCode,
    result: HttpResult,
    document: RwLock<Document>,
    populated: bool,
}

impl HtmlPage {
    pub fn new(session: SessionRef, location: Url, status: StatusCode, result: HttpResult) -> Self {
        Self {
            session,
            location,
            status,
            result,
            document: RwLock::new(Document::default()),
            populated: false,
        }
    }

    /// Page factory for [`crate::Browser::browse_to`] and friends.
    pub fn from_response(
        session: SessionRef,
        response: TransportResponse,
        result: HttpResult,
    ) -> Result<Self> {
        let mut page = Self::new(session, response.url, response.status, result);
        page.set_content(response.body)?;
        Ok(page)
    }

    pub fn session(&self) -> &SessionRef {
        &self.session
    }

    pub(crate) fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        let document = self
            .document
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&document)
    }

    pub(crate) fn with_document_mut<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        let mut document = self
            .document
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut document)
    }

    /// Wrap `node` in the most specific element type the registry knows.
    pub fn resolve(&self, node: NodeId) -> Result<HtmlElement<'_>> {
        ElementRegistry::builtin().resolve(self, node)
    }

    pub fn root_element(&self) -> Option<Element<'_>> {
        self.with_document(|d| d.root())
            .map(|node| Element::new(self, node))
    }

    pub fn title(&self) -> String {
        self.with_document(|d| {
            d.elements()
                .into_iter()
                .find(|n| d.tag_name(*n) == Some("title"))
                .map(|n| d.text(n).trim().to_string())
                .unwrap_or_default()
        })
    }

    fn nodes_where(&self, predicate: impl Fn(&Document, NodeId) -> bool) -> Vec<NodeId> {
        self.with_document(|d| {
            d.elements()
                .into_iter()
                .filter(|n| predicate(d, *n))
                .collect()
        })
    }

    /// Every element with the given tag, in document order.
    pub fn find_all(&self, tag: &str) -> Result<Vec<HtmlElement<'_>>> {
        self.nodes_where(|d, n| d.tag_name(n).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
            .into_iter()
            .map(|n| self.resolve(n))
            .collect()
    }

    pub fn element_by_id(&self, id: &str) -> Result<HtmlElement<'_>> {
        let node = self
            .nodes_where(|d, n| d.attribute(n, "id") == Some(id))
            .into_iter()
            .next()
            .ok_or_else(|| BrowserError::ElementNotFound(format!("element with id '{}'", id)))?;
        self.resolve(node)
    }

    pub fn elements_by_name(&self, name: &str) -> Result<Vec<HtmlElement<'_>>> {
        self.nodes_where(|d, n| d.attribute(n, "name") == Some(name))
            .into_iter()
            .map(|n| self.resolve(n))
            .collect()
    }

    pub fn forms(&self) -> Result<Vec<Form<'_>>> {
        Ok(self
            .find_all("form")?
            .iter()
            .filter_map(HtmlElement::as_form)
            .collect())
    }

    /// The form with the given `name` or `id`.
    pub fn form(&self, name: &str) -> Result<Form<'_>> {
        self.forms()?
            .into_iter()
            .find(|f| f.name() == name || f.element().id() == name)
            .ok_or_else(|| BrowserError::ElementNotFound(format!("form '{}'", name)))
    }
}

impl Page for HtmlPage {
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
        if self.populated {
            return Err(BrowserError::Configuration(format!(
                "content of {} has already been set",
                self.location
            )));
        }

        let markup = String::from_utf8_lossy(&body);
        *self
            .document
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Document::parse(&markup);
        self.populated = true;
        Ok(())
    }
}

impl fmt::Debug for HtmlPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlPage")
            .field("location", &self.location)
            .field("status", &self.status)
            .field("outcomes", &self.result.len())
            .finish()
    }
}
