//! Backend base address for the running session.

use std::fmt;

/// Loopback address of a locally running agent backend.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

/// The single mutable backend address of a session.
///
/// The value is opaque: it is never validated or normalized, and request
/// paths are appended to it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Overwrite the address. Only affects requests dispatched afterwards.
    pub fn set(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
        tracing::info!(endpoint = %self.base_url, "backend endpoint updated");
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url)
    }
}

/// Join a base address and a route the same way for every request.
pub(crate) fn route(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url, path)
}
