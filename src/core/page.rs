use crate::browser::HttpResult;
use crate::errors::Result;
use reqwest::StatusCode;
use url::Url;

/// The classified result of a navigation.
///
/// Pages are only ever built by the factory handed to the navigation
/// engine. The factory constructs the page and calls [`Page::set_content`]
/// once with the body of the terminal response before returning it.
pub trait Page {
    /// The final location after all redirects were followed.
    fn location(&self) -> &Url;

    fn status(&self) -> StatusCode;

    /// Every round trip that produced this page, oldest first.
    fn result(&self) -> &HttpResult;

    /// Populate the page from the raw response body.
    fn set_content(&mut self, body: Option<Vec<u8>>) -> Result<()>;

    /// Whether `location` identifies this page.
    fn is_on(&self, location: &Url) -> bool {
        same_location(self.location(), location)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Two urls address the same resource when they only differ by fragment.
pub fn same_location(left: &Url, right: &Url) -> bool {
    left[..url::Position::AfterQuery] == right[..url::Position::AfterQuery]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_does_not_change_location() {
        let page = Url::parse("http://localhost/form/index?id=3").unwrap();
        let anchor = Url::parse("http://localhost/form/index?id=3#top").unwrap();
        let other = Url::parse("http://localhost/form/index?id=4").unwrap();

        assert!(same_location(&page, &anchor));
        assert!(!same_location(&page, &other));
    }
}
