pub mod config;
pub mod page;
pub mod transport;

pub use config::{BrowserConfig, Config, NavigationConfig};
pub use page::{same_location, Page};
pub use transport::{Transport, TransportRequest, TransportResponse};
