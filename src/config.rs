use std::{sync::Arc, time::Duration};

use url::Url;

use crate::{
    dispatcher::{self, Dispatcher},
    transport::{HttpTransport, Transport},
    Client, ConfigError,
};

/// Configuration for [`Client`].
///
/// # Examples
/// ```
/// # use outbound::ClientConfig;
/// # use std::time::Duration;
/// let client = ClientConfig::from_api_key("api-key")
///     .timeout(Duration::from_secs(5))
///     .to_client()
///     .unwrap();
/// ```
pub struct ClientConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) transport: Option<Arc<dyn Transport>>,
}

impl ClientConfig {
    /// Default base URL for API calls.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.outbound.io/v2";

    /// Default request timeout of the built-in HTTP transport.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a default Outbound configuration using the specified API key.
    ///
    /// ```
    /// # use outbound::ClientConfig;
    /// ClientConfig::from_api_key("api-key");
    /// ```
    pub fn from_api_key(api_key: impl Into<String>) -> Self {
        ClientConfig {
            api_key: api_key.into(),
            base_url: ClientConfig::DEFAULT_BASE_URL.to_owned(),
            timeout: ClientConfig::DEFAULT_TIMEOUT,
            transport: None,
        }
    }

    /// Override base URL for API calls. Clients should use the default setting in most cases.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout of the built-in HTTP transport. Ignored when a custom
    /// [`transport`](ClientConfig::transport) is set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send requests through `transport` instead of the built-in `reqwest` client.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Create a new [`Client`] using the specified configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidBaseUrl`] or [`ConfigError::UnsupportedBaseUrl`] if the base URL
    ///   is not an absolute http(s) URL.
    /// - [`ConfigError::InvalidApiKey`] if the API key cannot be sent as a header.
    /// - [`ConfigError::HttpClient`] if the built-in HTTP client failed to initialize.
    pub fn to_client(self) -> Result<Client, ConfigError> {
        let base_url = Url::parse(&self.base_url).map_err(ConfigError::InvalidBaseUrl)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedBaseUrl);
        }

        let headers = dispatcher::headers(&self.api_key)?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(self.timeout).map_err(ConfigError::HttpClient)?),
        };

        log::debug!(target: "outbound", base_url = self.base_url.as_str(); "client initialized");

        Ok(Client::new(Dispatcher::new(
            &self.base_url,
            headers,
            transport,
        )))
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("transport", &self.transport.as_ref().map(|_| "<custom>"))
            .finish()
    }
}
