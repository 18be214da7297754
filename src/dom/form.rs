use super::element::{Element, HtmlElement};
use super::fields::{Button, FormField};
use crate::browser::FormParameters;
use crate::core::Page;
use crate::errors::{BrowserError, Result};
use crate::pages::HtmlPage;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

const FIELD_TAGS: [&str; 4] = ["input", "select", "textarea", "button"];

/// A `<form>` and the fields below it.
#[derive(Debug, Clone, Copy)]
pub struct Form<'p> {
    base: Element<'p>,
}

impl<'p> Form<'p> {
    pub(crate) fn new(base: Element<'p>) -> Self {
        Self { base }
    }

    pub fn element(&self) -> &Element<'p> {
        &self.base
    }

    pub fn action(&self) -> String {
        self.base.attribute("action")
    }

    pub fn method(&self) -> String {
        self.base.attribute("method")
    }

    pub fn name(&self) -> String {
        self.base.attribute("name")
    }

    pub fn target(&self) -> String {
        self.base.attribute("target")
    }

    /// Where the form posts to: the page itself when `action` is blank,
    /// otherwise `action` resolved against the page location.
    pub fn post_location(&self) -> Result<Url> {
        let action = self.action();
        let page_location = self.base.page().location();

        if action.trim().is_empty() {
            return Ok(page_location.clone());
        }

        Ok(page_location.join(action.trim())?)
    }

    /// Every typed field below the form, in document order.
    ///
    /// Controls the registry does not know (file uploads, for one) are not
    /// fields and are skipped.
    pub fn fields(&self) -> Result<Vec<HtmlElement<'p>>> {
        let page = self.base.page();
        let mut fields = Vec::new();

        for node in self.base.descendant_nodes() {
            let candidate = Element::new(page, node);
            if !FIELD_TAGS.contains(&candidate.tag_name().as_str()) {
                continue;
            }
            match page.resolve(node) {
                Ok(element) if element.as_field().is_some() => fields.push(element),
                Ok(_) => {}
                Err(BrowserError::UnsupportedElement { tag, attribute }) => {
                    debug!(%tag, ?attribute, "skipping unsupported form control");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(fields)
    }

    pub fn field(&self, name: &str) -> Result<HtmlElement<'p>> {
        self.fields()?
            .into_iter()
            .find(|f| f.as_field().is_some_and(|field| field.name() == name))
            .ok_or_else(|| BrowserError::ElementNotFound(format!("field '{}'", name)))
    }

    pub fn buttons(&self) -> Result<Vec<Button<'p>>> {
        Ok(self
            .fields()?
            .iter()
            .filter_map(HtmlElement::as_button)
            .collect())
    }

    /// Name/value pairs posted when `source` submits the form.
    pub fn build_parameters(&self, source: Option<&Button<'_>>) -> Result<FormParameters> {
        let mut parameters = FormParameters::new();

        for field in self.fields()? {
            if let Some((name, value)) = field.as_field().and_then(|f| f.submission()) {
                parameters.insert(name, value);
            }
        }

        if let Some((name, value)) = source.and_then(Button::as_source) {
            parameters.insert(name, value);
        }

        Ok(parameters)
    }

    /// Post the form as if `source` had been clicked, expecting `200 OK`.
    pub async fn submit(&self, source: Option<&Button<'_>>) -> Result<HtmlPage> {
        let source =
            source.ok_or_else(|| BrowserError::Argument("source control".to_string()))?;

        let parameters = self.build_parameters(Some(source))?;
        let location = self.post_location()?;
        debug!(%location, fields = parameters.len(), "submitting form");

        self.base
            .page()
            .session()
            .post_to(&parameters, &location, StatusCode::OK, HtmlPage::from_response)
            .await
    }
}
