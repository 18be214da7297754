pub mod http;
pub mod navigation;
pub mod outcome;
pub mod parameters;
pub mod session;

pub use http::HttpTransport;
pub use navigation::{is_redirect, NavigationEngine, RequestAction};
pub use outcome::{HttpOutcome, HttpResult};
pub use parameters::FormParameters;
pub use session::{Browser, SessionRef};
