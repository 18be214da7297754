use super::element::Element;
use super::form::Form;
use crate::core::Page;
use crate::errors::{BrowserError, Result};
use crate::pages::HtmlPage;
use reqwest::StatusCode;
use url::Url;

/// A submittable value inside a form.
pub trait FormField<'p> {
    fn element(&self) -> &Element<'p>;

    fn name(&self) -> String {
        self.element().attribute("name")
    }

    fn value(&self) -> String;

    fn set_value(&self, value: &str) -> Result<()>;

    /// The name/value pair this field adds to a form submission.
    fn submission(&self) -> Option<(String, String)> {
        let name = self.name();
        if name.is_empty() {
            None
        } else {
            Some((name, self.value()))
        }
    }
}

/// Text-like inputs and text areas.
#[derive(Debug, Clone, Copy)]
pub struct Input<'p> {
    base: Element<'p>,
}

impl<'p> Input<'p> {
    pub(crate) fn new(base: Element<'p>) -> Self {
        Self { base }
    }

    pub fn is_text_area(&self) -> bool {
        self.base.tag_name().eq_ignore_ascii_case("textarea")
    }

    pub fn input_type(&self) -> String {
        self.base.attribute("type")
    }
}

impl<'p> FormField<'p> for Input<'p> {
    fn element(&self) -> &Element<'p> {
        &self.base
    }

    fn value(&self) -> String {
        if self.is_text_area() {
            // markup puts a line break after <textarea> that is not part of the value
            let content = self.base.text();
            return content
                .strip_prefix("\r\n")
                .or_else(|| content.strip_prefix('\n'))
                .unwrap_or(content.as_str())
                .to_string();
        }
        self.base.value()
    }

    fn set_value(&self, value: &str) -> Result<()> {
        if self.is_text_area() {
            self.base.set_text(&format!("\n{}", value));
        } else {
            self.base.set_attribute("value", value);
        }
        Ok(())
    }
}

/// A `<select>` list.
#[derive(Debug, Clone, Copy)]
pub struct Select<'p> {
    base: Element<'p>,
}

impl<'p> Select<'p> {
    pub(crate) fn new(base: Element<'p>) -> Self {
        Self { base }
    }

    pub fn options(&self) -> Vec<Element<'p>> {
        let page = self.base.page();
        self.base
            .descendant_nodes()
            .into_iter()
            .map(|node| Element::new(page, node))
            .filter(|e| e.tag_name() == "option")
            .collect()
    }

    pub fn selected(&self) -> Option<Element<'p>> {
        let options = self.options();
        options
            .iter()
            .find(|o| o.has_attribute("selected"))
            .or_else(|| options.first())
            .copied()
    }
}

fn option_value(option: &Element<'_>) -> String {
    if option.has_attribute("value") {
        option.attribute("value")
    } else {
        option.text().trim().to_string()
    }
}

impl<'p> FormField<'p> for Select<'p> {
    fn element(&self) -> &Element<'p> {
        &self.base
    }

    fn value(&self) -> String {
        self.selected().map(|o| option_value(&o)).unwrap_or_default()
    }

    fn set_value(&self, value: &str) -> Result<()> {
        let options = self.options();
        let chosen = options
            .iter()
            .position(|o| option_value(o) == value)
            .ok_or_else(|| {
                BrowserError::ElementNotFound(format!(
                    "option '{}' in select '{}'",
                    value,
                    self.name()
                ))
            })?;

        for (index, option) in options.iter().enumerate() {
            if index == chosen {
                option.set_attribute("selected", "selected");
            } else {
                option.remove_attribute("selected");
            }
        }
        Ok(())
    }
}

/// An `<input type="checkbox">`.
#[derive(Debug, Clone, Copy)]
pub struct CheckBox<'p> {
    base: Element<'p>,
}

impl<'p> CheckBox<'p> {
    pub(crate) fn new(base: Element<'p>) -> Self {
        Self { base }
    }

    pub fn checked(&self) -> bool {
        self.base.has_attribute("checked")
    }

    pub fn set_checked(&self, checked: bool) {
        if checked {
            self.base.set_attribute("checked", "checked");
        } else {
            self.base.remove_attribute("checked");
        }
    }
}

impl<'p> FormField<'p> for CheckBox<'p> {
    fn element(&self) -> &Element<'p> {
        &self.base
    }

    fn value(&self) -> String {
        if self.base.has_attribute("value") {
            self.base.value()
        } else {
            "on".to_string()
        }
    }

    fn set_value(&self, value: &str) -> Result<()> {
        self.base.set_attribute("value", value);
        Ok(())
    }

    fn submission(&self) -> Option<(String, String)> {
        let name = self.name();
        if self.checked() && !name.is_empty() {
            Some((name, self.value()))
        } else {
            None
        }
    }
}

/// An `<input type="radio">`. Checking one clears the others in its group.
#[derive(Debug, Clone, Copy)]
pub struct RadioButton<'p> {
    base: Element<'p>,
}

impl<'p> RadioButton<'p> {
    pub(crate) fn new(base: Element<'p>) -> Self {
        Self { base }
    }

    pub fn checked(&self) -> bool {
        self.base.has_attribute("checked")
    }

    pub fn set_checked(&self, checked: bool) {
        if checked {
            let name = self.name();
            let page = self.base.page();
            let scope = self.base.ancestor("form").or_else(|| page.root_element());
            for node in scope.map(|s| s.descendant_nodes()).unwrap_or_default() {
                let other = Element::new(page, node);
                if other.tag_name() == "input"
                    && other.attribute("type").eq_ignore_ascii_case("radio")
                    && other.attribute("name") == name
                {
                    other.remove_attribute("checked");
                }
            }
            self.base.set_attribute("checked", "checked");
        } else {
            self.base.remove_attribute("checked");
        }
    }
}

impl<'p> FormField<'p> for RadioButton<'p> {
    fn element(&self) -> &Element<'p> {
        &self.base
    }

    fn value(&self) -> String {
        if self.base.has_attribute("value") {
            self.base.value()
        } else {
            "on".to_string()
        }
    }

    fn set_value(&self, value: &str) -> Result<()> {
        self.base.set_attribute("value", value);
        Ok(())
    }

    fn submission(&self) -> Option<(String, String)> {
        let name = self.name();
        if self.checked() && !name.is_empty() {
            Some((name, self.value()))
        } else {
            None
        }
    }
}

/// A control that can submit its form.
///
/// Buttons only contribute to a submission when they are the control that
/// triggered it.
#[derive(Debug, Clone, Copy)]
pub struct Button<'p> {
    base: Element<'p>,
}

impl<'p> Button<'p> {
    pub(crate) fn new(base: Element<'p>) -> Self {
        Self { base }
    }

    /// The name/value pair sent when this button submits the form.
    pub fn as_source(&self) -> Option<(String, String)> {
        let name = self.name();
        if name.is_empty() {
            None
        } else {
            Some((name, self.value()))
        }
    }

    /// The form this button belongs to.
    pub fn form(&self) -> Result<Form<'p>> {
        let form_id = self.base.attribute("form");
        if !form_id.is_empty() {
            return self
                .base
                .page()
                .element_by_id(&form_id)?
                .as_form()
                .ok_or_else(|| BrowserError::ElementNotFound(format!("form '{}'", form_id)));
        }

        self.base
            .ancestor("form")
            .map(Form::new)
            .ok_or_else(|| BrowserError::ElementNotFound("form enclosing button".to_string()))
    }

    pub async fn click(&self) -> Result<HtmlPage> {
        self.form()?.submit(Some(self)).await
    }
}

impl<'p> FormField<'p> for Button<'p> {
    fn element(&self) -> &Element<'p> {
        &self.base
    }

    fn value(&self) -> String {
        self.base.value()
    }

    fn set_value(&self, value: &str) -> Result<()> {
        self.base.set_attribute("value", value);
        Ok(())
    }

    fn submission(&self) -> Option<(String, String)> {
        None
    }
}

/// An `<a>` element.
#[derive(Debug, Clone, Copy)]
pub struct Link<'p> {
    base: Element<'p>,
}

impl<'p> Link<'p> {
    pub(crate) fn new(base: Element<'p>) -> Self {
        Self { base }
    }

    pub fn element(&self) -> &Element<'p> {
        &self.base
    }

    pub fn href(&self) -> String {
        self.base.attribute("href")
    }

    pub fn location(&self) -> Result<Url> {
        Ok(self.base.page().location().join(self.href().trim())?)
    }

    pub async fn click(&self) -> Result<HtmlPage> {
        let location = self.location()?;
        self.base
            .page()
            .session()
            .browse_to(&location, StatusCode::OK, HtmlPage::from_response)
            .await
    }
}
