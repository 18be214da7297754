pub mod binary;
pub mod html;

pub use binary::BinaryPage;
pub use html::HtmlPage;
