use std::str::FromStr;

use serde_json::Value;

use crate::{dispatcher::Endpoint, payload, reporter::Reporter, Client, Operation, Result};

use super::{execute, Prepared};

/// Push notification platform a device token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Apple Push Notification service.
    Apns,
    /// Google Cloud Messaging.
    Gcm,
}

impl Platform {
    /// Returns the platform name used in endpoint paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Apns => "apns",
            Platform::Gcm => "gcm",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a [`Platform`] from a string other than `"apns"` or `"gcm"`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown platform {0:?}, expected \"apns\" or \"gcm\"")]
pub struct UnknownPlatform(String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> std::result::Result<Platform, UnknownPlatform> {
        match s {
            "apns" => Ok(Platform::Apns),
            "gcm" => Ok(Platform::Gcm),
            other => Err(UnknownPlatform(other.to_owned())),
        }
    }
}

/// Registers or disables device tokens of a user.
///
/// ```no_run
/// # use outbound::{ClientConfig, Platform};
/// # let client = ClientConfig::from_api_key("api-key").to_client().unwrap();
/// client.register_token(Platform::Apns, "user-1", "tok-abc").send();
/// client.disable_all_tokens(Platform::Gcm, "user-1").send();
/// ```
#[must_use = "requests do nothing until `send()` is called"]
#[derive(Debug)]
pub struct DeviceToken<'a> {
    client: Option<Client>,
    platform: Platform,
    register: bool,
    user_id: Value,
    all: bool,
    token: Value,
    reporter: Reporter<'a>,
}

impl<'a> DeviceToken<'a> {
    pub(crate) fn register(
        client: Option<Client>,
        platform: Platform,
        user_id: Value,
        token: Value,
    ) -> Self {
        DeviceToken::new(client, platform, true, user_id, false, token)
    }

    pub(crate) fn disable(
        client: Option<Client>,
        platform: Platform,
        user_id: Value,
        token: Value,
    ) -> Self {
        DeviceToken::new(client, platform, false, user_id, false, token)
    }

    pub(crate) fn disable_all(client: Option<Client>, platform: Platform, user_id: Value) -> Self {
        DeviceToken::new(client, platform, false, user_id, true, Value::Null)
    }

    fn new(
        client: Option<Client>,
        platform: Platform,
        register: bool,
        user_id: Value,
        all: bool,
        token: Value,
    ) -> Self {
        DeviceToken {
            client,
            platform,
            register,
            user_id,
            all,
            token,
            reporter: Reporter::default(),
        }
    }

    /// Validate and send the request, then report the outcome to the handlers.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`](crate::Error::NotInitialized) if there is no client.
    /// - [`Error::InvalidUserId`](crate::Error::InvalidUserId) for a bad user id.
    /// - [`Error::InvalidToken`](crate::Error::InvalidToken) if a single token was expected and
    ///   it is not a string.
    /// - [`Error::Connection`](crate::Error::Connection) or [`Error::Server`](crate::Error::Server)
    ///   if delivery failed.
    pub fn send(self) -> Result<()> {
        let DeviceToken {
            client,
            platform,
            register,
            user_id,
            all,
            token,
            reporter,
        } = self;

        execute(client, Operation::DeviceToken, reporter, || {
            let payload = payload::device_token(user_id, all, token)?;
            let endpoint = if register {
                Endpoint::Register(platform)
            } else {
                Endpoint::Disable(platform)
            };
            Ok(Prepared::new(endpoint, payload))
        })
    }
}

handler_methods!(DeviceToken);
