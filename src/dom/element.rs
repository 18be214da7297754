use super::document::NodeId;
use super::fields::{Button, CheckBox, FormField, Input, Link, RadioButton, Select};
use super::form::Form;
use crate::errors::Result;
use crate::pages::HtmlPage;
use std::fmt;

/// A view over one node of a page's markup.
///
/// Elements are recreated on every lookup and never cached; reads and
/// writes go straight to the page's document.
#[derive(Clone, Copy)]
pub struct Element<'p> {
    page: &'p HtmlPage,
    node: NodeId,
}

impl<'p> Element<'p> {
    pub(crate) fn new(page: &'p HtmlPage, node: NodeId) -> Self {
        Self { page, node }
    }

    pub fn page(&self) -> &'p HtmlPage {
        self.page
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn tag_name(&self) -> String {
        self.page
            .with_document(|d| d.tag_name(self.node).unwrap_or_default().to_string())
    }

    /// Attribute value, or an empty string when the attribute is absent.
    pub fn attribute(&self, name: &str) -> String {
        self.page
            .with_document(|d| d.attribute(self.node, name).unwrap_or_default().to_string())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.page
            .with_document(|d| d.attribute(self.node, name).is_some())
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.page
            .with_document_mut(|d| d.set_attribute(self.node, name, value));
    }

    pub fn remove_attribute(&self, name: &str) {
        self.page
            .with_document_mut(|d| d.remove_attribute(self.node, name));
    }

    pub fn id(&self) -> String {
        self.attribute("id")
    }

    pub fn text(&self) -> String {
        self.page.with_document(|d| d.text(self.node))
    }

    pub(crate) fn set_text(&self, value: &str) {
        self.page.with_document_mut(|d| d.set_text(self.node, value));
    }

    /// The generic value of the element: its `value` attribute.
    pub fn value(&self) -> String {
        self.attribute("value")
    }

    pub(crate) fn ancestor(&self, tag: &str) -> Option<Element<'p>> {
        self.page
            .with_document(|d| d.ancestor(self.node, tag))
            .map(|node| Element::new(self.page, node))
    }

    pub(crate) fn descendant_nodes(&self) -> Vec<NodeId> {
        self.page.with_document(|d| d.descendants(self.node))
    }

    /// Resolve every descendant with the given tag to its typed wrapper.
    pub fn find_all(&self, tag: &str) -> Result<Vec<HtmlElement<'p>>> {
        let nodes = self.page.with_document(|d| {
            d.descendants(self.node)
                .into_iter()
                .filter(|n| d.tag_name(*n).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
                .collect::<Vec<_>>()
        });
        nodes.into_iter().map(|n| self.page.resolve(n)).collect()
    }
}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag_name())
            .field("node", &self.node)
            .finish()
    }
}

/// Typed wrapper chosen for a node by the element registry.
#[derive(Debug, Clone, Copy)]
pub enum HtmlElement<'p> {
    Element(Element<'p>),
    Form(Form<'p>),
    Input(Input<'p>),
    Select(Select<'p>),
    CheckBox(CheckBox<'p>),
    RadioButton(RadioButton<'p>),
    Button(Button<'p>),
    Link(Link<'p>),
}

impl<'p> HtmlElement<'p> {
    pub fn element(&self) -> &Element<'p> {
        match self {
            HtmlElement::Element(element) => element,
            HtmlElement::Form(form) => form.element(),
            HtmlElement::Input(input) => input.element(),
            HtmlElement::Select(select) => select.element(),
            HtmlElement::CheckBox(check_box) => check_box.element(),
            HtmlElement::RadioButton(radio) => radio.element(),
            HtmlElement::Button(button) => button.element(),
            HtmlElement::Link(link) => link.element(),
        }
    }

    /// The element as a submittable field, if it is one.
    pub fn as_field(&self) -> Option<&dyn FormField<'p>> {
        match self {
            HtmlElement::Input(input) => Some(input),
            HtmlElement::Select(select) => Some(select),
            HtmlElement::CheckBox(check_box) => Some(check_box),
            HtmlElement::RadioButton(radio) => Some(radio),
            HtmlElement::Button(button) => Some(button),
            HtmlElement::Element(_) | HtmlElement::Form(_) | HtmlElement::Link(_) => None,
        }
    }

    pub fn as_form(&self) -> Option<Form<'p>> {
        match self {
            HtmlElement::Form(form) => Some(*form),
            _ => None,
        }
    }

    pub fn as_button(&self) -> Option<Button<'p>> {
        match self {
            HtmlElement::Button(button) => Some(*button),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<Link<'p>> {
        match self {
            HtmlElement::Link(link) => Some(*link),
            _ => None,
        }
    }

    /// Field value for fields, the `value` attribute otherwise.
    pub fn value(&self) -> String {
        match self.as_field() {
            Some(field) => field.value(),
            None => self.element().value(),
        }
    }
}
