use std::sync::Arc;

use serde::Serialize;

use crate::transport::TransportError;

/// Result type for Outbound operations.
///
/// The error variant is the Outbound-specific [`Error`] enum.
pub type Result<T> = std::result::Result<T, Error>;

/// The kind of operation that was attempted. Used to phrase [`Error::NotInitialized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// [`Client::identify`](crate::Client::identify).
    Identify,
    /// [`Client::track`](crate::Client::track).
    Track,
    /// [`Client::alias`](crate::Client::alias).
    Alias,
    /// [`Client::subscribe`](crate::Client::subscribe) and
    /// [`Client::unsubscribe`](crate::Client::unsubscribe).
    Subscription,
    /// Device token registration and disabling.
    DeviceToken,
}

impl Operation {
    fn not_initialized_message(self) -> &'static str {
        match self {
            Operation::Identify => "init() must be called before identifying any users.",
            Operation::Track => "init() must be called before tracking any events.",
            Operation::Alias => "init() must be called before aliasing any users.",
            Operation::Subscription => "init() must be called before changing subscriptions.",
            Operation::DeviceToken => "init() must be called before managing device tokens.",
        }
    }
}

/// Stable identifiers for every failure an operation can report.
///
/// These are what an error handler matches on. The set is closed; new failure modes map onto one
/// of the existing codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// An operation was issued before the client was initialized.
    NotInitialized,
    /// The user id is neither a string nor a number.
    InvalidUserId,
    /// The event name is missing, empty, or not a string.
    InvalidEventName,
    /// The request could not be delivered to the server.
    ConnectionError,
    /// The server answered with a status outside of `200..400`.
    UnknownError,
    /// The device token is not a string.
    InvalidToken,
    /// A campaign subscription change was requested without any campaign ids.
    MissingCampaignIds,
    /// The previous user id is neither a string nor a number.
    InvalidPreviousId,
}

impl ErrorCode {
    /// Returns the stable snake_case identifier of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotInitialized => "not_initialized",
            ErrorCode::InvalidUserId => "invalid_user_id",
            ErrorCode::InvalidEventName => "invalid_event_name",
            ErrorCode::ConnectionError => "connection_error",
            ErrorCode::UnknownError => "unknown_error",
            ErrorCode::InvalidToken => "invalid_token",
            ErrorCode::MissingCampaignIds => "missing_campaign_ids",
            ErrorCode::InvalidPreviousId => "invalid_previous_id",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl log::kv::ToValue for ErrorCode {
    fn to_value(&self) -> log::kv::Value {
        log::kv::Value::from(self.as_str())
    }
}

/// Enum representing the failures an Outbound operation can report.
///
/// The `Display` implementation yields the human-readable message passed to error handlers.
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// The operation was issued before `init()`.
    #[error("{}", .0.not_initialized_message())]
    NotInitialized(Operation),

    /// The user id is neither a string nor a number.
    #[error("User ID must be a string or a number.")]
    InvalidUserId,

    /// The previous user id is neither a string nor a number.
    #[error("Previous ID must be a string or a number.")]
    InvalidPreviousId,

    /// The event name is missing, empty, or not a string.
    #[error("Event name must be a non-empty string.")]
    InvalidEventName,

    /// The device token is not a string.
    #[error("Token must be a string.")]
    InvalidToken,

    /// Campaign ids were required but none were given.
    #[error("At least one campaign ID is required.")]
    MissingCampaignIds,

    /// The transport failed before a response was received.
    #[error("Unable to connect to Outbound.")]
    Connection(#[source] Arc<TransportError>),

    /// The server answered with a status outside of `200..400`. The message is the response body.
    #[error("{body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },
}

impl Error {
    /// Returns the stable code of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::NotInitialized(_) => ErrorCode::NotInitialized,
            Error::InvalidUserId => ErrorCode::InvalidUserId,
            Error::InvalidPreviousId => ErrorCode::InvalidPreviousId,
            Error::InvalidEventName => ErrorCode::InvalidEventName,
            Error::InvalidToken => ErrorCode::InvalidToken,
            Error::MissingCampaignIds => ErrorCode::MissingCampaignIds,
            Error::Connection(_) => ErrorCode::ConnectionError,
            Error::Server { .. } => ErrorCode::UnknownError,
        }
    }

    /// Returns the HTTP status if the server rejected the request.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(value: TransportError) -> Self {
        Error::Connection(Arc::new(value))
    }
}

/// Errors raised while turning a [`ClientConfig`](crate::ClientConfig) into a
/// [`Client`](crate::Client).
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// Invalid base URL configuration.
    #[error("invalid base_url configuration")]
    InvalidBaseUrl(#[source] url::ParseError),

    /// The base URL cannot carry a path (e.g., `mailto:` or `data:` URLs).
    #[error("base_url must be an http or https URL")]
    UnsupportedBaseUrl,

    /// The API key contains characters that are not allowed in an HTTP header.
    #[error("api_key is not a valid header value")]
    InvalidApiKey(#[source] reqwest::header::InvalidHeaderValue),

    /// The HTTP client could not be built (e.g., TLS backend initialization failed).
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}
