use serde_json::Value;

use crate::{
    dispatcher::Endpoint,
    payload::{self, TrackFields},
    reporter::Reporter,
    Client, Operation, Result, UserTraits,
};

use super::{execute, Prepared};

/// Records an event triggered by a user.
///
/// User traits may be attached to identify and track in a single call.
///
/// ```no_run
/// # use outbound::{ClientConfig, UserTraits};
/// # use serde_json::json;
/// # let client = ClientConfig::from_api_key("api-key").to_client().unwrap();
/// client
///     .track("user-1", "added item to cart")
///     .properties(json!({ "item": "book" }))
///     .user(UserTraits::new().email("ada@example.com"))
///     .send();
/// ```
#[must_use = "requests do nothing until `send()` is called"]
#[derive(Debug)]
pub struct Track<'a> {
    client: Option<Client>,
    fields: TrackFields,
    reporter: Reporter<'a>,
}

impl<'a> Track<'a> {
    pub(crate) fn new(client: Option<Client>, user_id: Value, event: Value) -> Self {
        Track {
            client,
            fields: TrackFields {
                user_id,
                event,
                ..Default::default()
            },
            reporter: Reporter::default(),
        }
    }

    /// Descriptive fields of the user who triggered the event. Sent as a nested `user` object if
    /// any of them survive normalization.
    pub fn user(mut self, traits: UserTraits) -> Self {
        self.fields.traits = traits;
        self
    }

    /// Freeform attributes describing the event. Must be a JSON object.
    pub fn properties(mut self, properties: impl Into<Value>) -> Self {
        self.fields.properties = properties.into();
        self
    }

    /// When the event happened, in Unix seconds. Defaults to the time `send()` is called.
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.fields.timestamp = Some(timestamp);
        self
    }

    /// Validate and send the request, then report the outcome to the handlers.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`](crate::Error::NotInitialized) if there is no client.
    /// - [`Error::InvalidUserId`](crate::Error::InvalidUserId) for a bad user id.
    /// - [`Error::InvalidEventName`](crate::Error::InvalidEventName) if the event is not a
    ///   non-empty string.
    /// - [`Error::Connection`](crate::Error::Connection) or [`Error::Server`](crate::Error::Server)
    ///   if delivery failed.
    pub fn send(self) -> Result<()> {
        let Track {
            client,
            fields,
            reporter,
        } = self;

        execute(client, Operation::Track, reporter, || {
            let built = payload::track(fields)?;
            Ok(Prepared::new(Endpoint::Track, built.payload).with_warnings(built.warnings))
        })
    }
}

handler_methods!(Track);
