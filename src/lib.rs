pub mod browser;
pub mod core;
pub mod dom;
pub mod errors;
pub mod pages;
pub mod testing;

pub use browser::{Browser, FormParameters, HttpOutcome, HttpResult, RequestAction, SessionRef};
pub use crate::core::{Config, Page, Transport};
pub use dom::{Element, ElementRegistry, Form, FormField, HtmlElement};
pub use errors::{BrowserError, Result};
pub use pages::{BinaryPage, HtmlPage};
