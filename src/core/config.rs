use crate::errors::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserConfig,
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub user_agent: Option<String>,
    pub timeout_ms: u64,
    pub use_cookies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Maximum number of redirect hops followed by one navigation.
    /// `None` follows redirects until a terminal response arrives.
    pub max_redirects: Option<usize>,
    pub log_outcomes: bool,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_ms: 30000,
            use_cookies: true,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_redirects: Some(50),
            log_outcomes: true,
        }
    }
}
