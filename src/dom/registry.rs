use super::document::{Document, NodeId};
use super::element::{Element, HtmlElement};
use super::fields::{Button, CheckBox, Input, Link, RadioButton, Select};
use super::form::Form;
use crate::errors::{BrowserError, Result};
use crate::pages::HtmlPage;
use std::sync::OnceLock;

/// Wrapper type built for a matched node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Element,
    Form,
    Input,
    Select,
    CheckBox,
    RadioButton,
    Button,
    Link,
}

impl ElementKind {
    fn construct(self, base: Element<'_>) -> HtmlElement<'_> {
        match self {
            ElementKind::Element => HtmlElement::Element(base),
            ElementKind::Form => HtmlElement::Form(Form::new(base)),
            ElementKind::Input => HtmlElement::Input(Input::new(base)),
            ElementKind::Select => HtmlElement::Select(Select::new(base)),
            ElementKind::CheckBox => HtmlElement::CheckBox(CheckBox::new(base)),
            ElementKind::RadioButton => HtmlElement::RadioButton(RadioButton::new(base)),
            ElementKind::Button => HtmlElement::Button(Button::new(base)),
            ElementKind::Link => HtmlElement::Link(Link::new(base)),
        }
    }
}

/// One registry row: a tag, optionally narrowed by an attribute value.
///
/// An empty attribute value matches nodes where the attribute is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedTag {
    pub tag: &'static str,
    pub attribute: Option<(&'static str, &'static str)>,
    pub kind: ElementKind,
}

impl SupportedTag {
    pub const fn tag(tag: &'static str, kind: ElementKind) -> Self {
        Self {
            tag,
            attribute: None,
            kind,
        }
    }

    pub const fn with_attribute(
        tag: &'static str,
        name: &'static str,
        value: &'static str,
        kind: ElementKind,
    ) -> Self {
        Self {
            tag,
            attribute: Some((name, value)),
            kind,
        }
    }

    fn same_key(&self, other: &SupportedTag) -> bool {
        self.tag.eq_ignore_ascii_case(other.tag)
            && match (self.attribute, other.attribute) {
                (None, None) => true,
                (Some((n1, v1)), Some((n2, v2))) => {
                    n1.eq_ignore_ascii_case(n2) && v1.eq_ignore_ascii_case(v2)
                }
                _ => false,
            }
    }
}

const fn input(value: &'static str, kind: ElementKind) -> SupportedTag {
    SupportedTag::with_attribute("input", "type", value, kind)
}

const BUILTIN_TAGS: &[SupportedTag] = &[
    SupportedTag::tag("form", ElementKind::Form),
    // text-like inputs; an input without a type is a text input
    input("", ElementKind::Input),
    input("color", ElementKind::Input),
    input("date", ElementKind::Input),
    input("datetime", ElementKind::Input),
    input("datetime-local", ElementKind::Input),
    input("email", ElementKind::Input),
    input("hidden", ElementKind::Input),
    input("month", ElementKind::Input),
    input("number", ElementKind::Input),
    input("password", ElementKind::Input),
    input("range", ElementKind::Input),
    input("search", ElementKind::Input),
    input("tel", ElementKind::Input),
    input("text", ElementKind::Input),
    input("time", ElementKind::Input),
    input("url", ElementKind::Input),
    input("week", ElementKind::Input),
    SupportedTag::tag("textarea", ElementKind::Input),
    SupportedTag::tag("select", ElementKind::Select),
    input("checkbox", ElementKind::CheckBox),
    input("radio", ElementKind::RadioButton),
    SupportedTag::tag("button", ElementKind::Button),
    input("submit", ElementKind::Button),
    input("button", ElementKind::Button),
    input("image", ElementKind::Button),
    input("reset", ElementKind::Button),
    SupportedTag::tag("a", ElementKind::Link),
    SupportedTag::tag("html", ElementKind::Element),
    SupportedTag::tag("head", ElementKind::Element),
    SupportedTag::tag("title", ElementKind::Element),
    SupportedTag::tag("body", ElementKind::Element),
    SupportedTag::tag("div", ElementKind::Element),
    SupportedTag::tag("span", ElementKind::Element),
    SupportedTag::tag("p", ElementKind::Element),
    SupportedTag::tag("label", ElementKind::Element),
    SupportedTag::tag("fieldset", ElementKind::Element),
    SupportedTag::tag("legend", ElementKind::Element),
    SupportedTag::tag("option", ElementKind::Element),
    SupportedTag::tag("h1", ElementKind::Element),
    SupportedTag::tag("h2", ElementKind::Element),
    SupportedTag::tag("h3", ElementKind::Element),
    SupportedTag::tag("ul", ElementKind::Element),
    SupportedTag::tag("ol", ElementKind::Element),
    SupportedTag::tag("li", ElementKind::Element),
    SupportedTag::tag("table", ElementKind::Element),
    SupportedTag::tag("tr", ElementKind::Element),
    SupportedTag::tag("td", ElementKind::Element),
    SupportedTag::tag("th", ElementKind::Element),
    SupportedTag::tag("img", ElementKind::Element),
];

/// Maps markup nodes to element wrappers.
#[derive(Debug, Clone)]
pub struct ElementRegistry {
    entries: Vec<SupportedTag>,
}

impl ElementRegistry {
    /// Build a registry, rejecting rows that repeat a tag/attribute key.
    pub fn new(entries: impl IntoIterator<Item = SupportedTag>) -> Result<Self> {
        let mut accepted: Vec<SupportedTag> = Vec::new();
        for entry in entries {
            if accepted.iter().any(|e| e.same_key(&entry)) {
                return Err(BrowserError::Configuration(format!(
                    "element registry declares <{}> {:?} more than once",
                    entry.tag, entry.attribute
                )));
            }
            accepted.push(entry);
        }
        Ok(Self { entries: accepted })
    }

    /// The process-wide registry of supported HTML elements.
    pub fn builtin() -> &'static ElementRegistry {
        static BUILTIN: OnceLock<ElementRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| ElementRegistry {
            entries: BUILTIN_TAGS.to_vec(),
        })
    }

    pub fn entries(&self) -> &[SupportedTag] {
        &self.entries
    }

    /// Pick the most specific kind for `node`.
    pub fn kind_of(&self, document: &Document, node: NodeId) -> Result<ElementKind> {
        let tag = document.tag_name(node).ok_or_else(|| {
            BrowserError::Configuration("cannot resolve a text node to an element".to_string())
        })?;

        let candidates: Vec<&SupportedTag> = self
            .entries
            .iter()
            .filter(|e| e.tag.eq_ignore_ascii_case(tag))
            .collect();

        let qualified: Vec<&SupportedTag> = candidates
            .iter()
            .copied()
            .filter(|e| match e.attribute {
                Some((name, value)) => document
                    .attribute(node, name)
                    .unwrap_or_default()
                    .trim()
                    .eq_ignore_ascii_case(value),
                None => false,
            })
            .collect();

        match qualified.as_slice() {
            [entry] => return Ok(entry.kind),
            [] => {}
            [first, second, ..] => {
                return Err(BrowserError::Configuration(format!(
                    "<{}> matches both {:?} and {:?}",
                    tag, first.attribute, second.attribute
                )));
            }
        }

        if let Some(entry) = candidates.iter().find(|e| e.attribute.is_none()) {
            return Ok(entry.kind);
        }

        let attribute = candidates
            .iter()
            .filter_map(|e| e.attribute.map(|(name, _)| name))
            .find_map(|name| document.attribute(node, name))
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Err(BrowserError::UnsupportedElement {
            tag: tag.to_string(),
            attribute,
        })
    }

    pub fn resolve<'p>(&self, page: &'p HtmlPage, node: NodeId) -> Result<HtmlElement<'p>> {
        let kind = page.with_document(|d| self.kind_of(d, node))?;
        Ok(kind.construct(Element::new(page, node)))
    }
}
