//! A process-wide client for applications that prefer `outbound::init(key)` once at startup over
//! passing a [`Client`] around.
//!
//! Requests created before [`init`] report [`Error::NotInitialized`](crate::Error::NotInitialized)
//! through the normal error channel. Each request takes a snapshot of the current client when it
//! is created, so a later `init` never affects a request that is already being built.
use std::sync::RwLock;

use serde_json::Value;

use crate::{
    Alias, Client, ClientConfig, ConfigError, DeviceToken, Identify, Platform, Subscription, Track,
};

/// `ClientStore` provides a thread-safe (`Sync`) slot for a [`Client`].
///
/// The client itself is immutable and can only be replaced completely.
#[derive(Debug, Default)]
pub(crate) struct ClientStore {
    client: RwLock<Option<Client>>,
}

impl ClientStore {
    pub const fn new() -> Self {
        ClientStore {
            client: RwLock::new(None),
        }
    }

    /// Returns the current client, or `None` before the first [`set`](ClientStore::set).
    pub fn get(&self) -> Option<Client> {
        // A poisoned lock means a writer panicked while swapping an `Option`, which cannot leave it
        // half-written. Keep serving the stored value.
        let client = self
            .client
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        client.clone()
    }

    pub fn set(&self, client: Client) {
        let mut slot = self
            .client
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(client);
    }
}

static GLOBAL: ClientStore = ClientStore::new();

/// Initialize the process-wide client with `api_key` and default settings.
///
/// ```no_run
/// outbound::init("api-key").unwrap();
/// outbound::identify(42).email("ada@example.com").send();
/// ```
///
/// # Errors
///
/// Returns [`ConfigError::InvalidApiKey`] if the key cannot be sent as a header, or
/// [`ConfigError::HttpClient`] if the HTTP client failed to initialize. The previous client, if
/// any, stays in place on error.
pub fn init(api_key: impl Into<String>) -> Result<(), ConfigError> {
    init_with_config(ClientConfig::from_api_key(api_key))
}

/// Initialize the process-wide client from a full [`ClientConfig`].
///
/// Calling this again replaces the client for requests created afterwards.
pub fn init_with_config(config: ClientConfig) -> Result<(), ConfigError> {
    GLOBAL.set(config.to_client()?);
    Ok(())
}

/// Returns `true` once [`init`] or [`init_with_config`] has succeeded.
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

/// [`Client::identify`] on the process-wide client.
pub fn identify<'a>(user_id: impl Into<Value>) -> Identify<'a> {
    Identify::new(GLOBAL.get(), user_id.into())
}

/// [`Client::track`] on the process-wide client.
pub fn track<'a>(user_id: impl Into<Value>, event: impl Into<Value>) -> Track<'a> {
    Track::new(GLOBAL.get(), user_id.into(), event.into())
}

/// [`Client::alias`] on the process-wide client.
pub fn alias<'a>(user_id: impl Into<Value>, previous_id: impl Into<Value>) -> Alias<'a> {
    Alias::new(GLOBAL.get(), user_id.into(), previous_id.into())
}

/// [`Client::subscribe`] on the process-wide client.
pub fn subscribe<'a>(user_id: impl Into<Value>) -> Subscription<'a> {
    Subscription::new(GLOBAL.get(), true, user_id.into())
}

/// [`Client::unsubscribe`] on the process-wide client.
pub fn unsubscribe<'a>(user_id: impl Into<Value>) -> Subscription<'a> {
    Subscription::new(GLOBAL.get(), false, user_id.into())
}

/// [`Client::register_token`] on the process-wide client.
pub fn register_token<'a>(
    platform: Platform,
    user_id: impl Into<Value>,
    token: impl Into<Value>,
) -> DeviceToken<'a> {
    DeviceToken::register(GLOBAL.get(), platform, user_id.into(), token.into())
}

/// [`Client::disable_token`] on the process-wide client.
pub fn disable_token<'a>(
    platform: Platform,
    user_id: impl Into<Value>,
    token: impl Into<Value>,
) -> DeviceToken<'a> {
    DeviceToken::disable(GLOBAL.get(), platform, user_id.into(), token.into())
}

/// [`Client::disable_all_tokens`] on the process-wide client.
pub fn disable_all_tokens<'a>(platform: Platform, user_id: impl Into<Value>) -> DeviceToken<'a> {
    DeviceToken::disable_all(GLOBAL.get(), platform, user_id.into())
}
