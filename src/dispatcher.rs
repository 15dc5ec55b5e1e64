//! Sends one payload to one endpoint and classifies the outcome. This is the only place where
//! requests leave the process.
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Serialize;

use crate::{transport::Transport, ConfigError, Error, Platform, Result};

const CLIENT_HEADER: &str = "x-outbound-client";
const CLIENT_VERSION_HEADER: &str = "x-outbound-client-version";
const KEY_HEADER: &str = "x-outbound-key";

const CLIENT_NAME: &str = "rust";

/// Server endpoints, one per operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Identify,
    Track,
    Subscribe { all: bool },
    Unsubscribe { all: bool },
    Register(Platform),
    Disable(Platform),
}

impl Endpoint {
    pub fn path(&self) -> String {
        fn scope(all: bool) -> &'static str {
            if all {
                "all"
            } else {
                "campaigns"
            }
        }

        match self {
            Endpoint::Identify => "/identify".to_owned(),
            Endpoint::Track => "/track".to_owned(),
            Endpoint::Subscribe { all } => format!("/subscribe/{}", scope(*all)),
            Endpoint::Unsubscribe { all } => format!("/unsubscribe/{}", scope(*all)),
            Endpoint::Register(platform) => format!("/{}/register", platform.as_str()),
            Endpoint::Disable(platform) => format!("/{}/disable", platform.as_str()),
        }
    }
}

/// Builds the header set sent with every request.
pub(crate) fn headers(api_key: &str) -> std::result::Result<HeaderMap, ConfigError> {
    let mut key = HeaderValue::from_str(api_key).map_err(ConfigError::InvalidApiKey)?;
    key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(CLIENT_HEADER, HeaderValue::from_static(CLIENT_NAME));
    headers.insert(
        CLIENT_VERSION_HEADER,
        HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
    );
    headers.insert(KEY_HEADER, key);
    Ok(headers)
}

pub(crate) struct Dispatcher {
    /// Base URL without a trailing slash.
    base_url: String,
    headers: HeaderMap,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(base_url: &str, headers: HeaderMap, transport: Arc<dyn Transport>) -> Dispatcher {
        Dispatcher {
            base_url: base_url.trim_end_matches('/').to_owned(),
            headers,
            transport,
        }
    }

    /// POST `payload` to `endpoint`. A single attempt; no retries.
    ///
    /// Payloads hold only strings, numbers and JSON values, so serializing them never fails. The
    /// `expect` below guards that invariant and is unreachable for any caller input.
    pub fn dispatch<P: Serialize>(&self, endpoint: Endpoint, payload: &P) -> Result<()> {
        let path = endpoint.path();
        let url = format!("{}{}", self.base_url, path);
        let body = serde_json::to_vec(payload)
            .expect("payloads are built from JSON values and always serialize");

        log::debug!(target: "outbound", path = path.as_str(); "sending request");

        let response = self
            .transport
            .post(&url, &self.headers, body)
            .map_err(|err| {
                log::warn!(target: "outbound", path = path.as_str(); "unable to reach server: {err}");
                Error::from(err)
            })?;

        if (200..400).contains(&response.status) {
            log::debug!(target: "outbound", path = path.as_str(), status = response.status; "request succeeded");
            Ok(())
        } else {
            log::warn!(target: "outbound", path = path.as_str(), status = response.status; "server rejected request");
            Err(Error::Server {
                status: response.status,
                body: response.body,
            })
        }
    }
}
