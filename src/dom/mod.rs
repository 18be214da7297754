pub mod document;
pub mod element;
pub mod fields;
pub mod form;
pub mod registry;

pub use document::{Document, NodeId};
pub use element::{Element, HtmlElement};
pub use fields::{Button, CheckBox, FormField, Input, Link, RadioButton, Select};
pub use form::Form;
pub use registry::{ElementKind, ElementRegistry, SupportedTag};
