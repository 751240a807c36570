use std::time::Duration;

/// Multi-code results form on the carrier site.
pub const DEFAULT_ENDPOINT: &str = "http://www2.correios.com.br/sistemas/rastreamento/multResultado.cfm";

/// The carrier rejects form posts that don't look like they came from its own page.
pub const DEFAULT_REFERER: &str = "http://www.correios.com.br/para-voce";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// TrackerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub endpoint: String,
    pub referer: String,
    pub timeout: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl TrackerConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
