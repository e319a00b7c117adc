//! Client configuration.
//!
//! Configuration is environment-driven with sensible defaults; the values
//! are treated as immutable for the duration of an invocation and are
//! rendered into transport diagnostics.

/// Endpoint and region configuration for service clients.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Explicit endpoint URL override, if any.
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: String,
    /// Log level.
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            region: "us-east-1".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// `OPKIT_ENDPOINT_URL` overrides the endpoint; `AWS_REGION` (or
    /// `DEFAULT_REGION`) overrides the region.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("OPKIT_ENDPOINT_URL") {
            if !v.is_empty() {
                config.endpoint_url = Some(v);
            }
        }
        if let Ok(v) = std::env::var("AWS_REGION") {
            config.region = v;
        } else if let Ok(v) = std::env::var("DEFAULT_REGION") {
            config.region = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Human-readable description of the resolved endpoint, used in
    /// transport diagnostics.
    #[must_use]
    pub fn endpoint_description(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("{url} (region {})", self.region),
            None => format!("default endpoint for region {}", self.region),
        }
    }
}
