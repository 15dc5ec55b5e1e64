use serde_json::Value;

use crate::{
    dispatcher::Endpoint,
    payload::{self, IdentifyFields},
    reporter::Reporter,
    Client, Operation, Result, UserTraits,
};

use super::{execute, Prepared};

/// Creates or updates the record of a user. Identify a user before sending events for them.
///
/// Created by [`Client::identify`](crate::Client::identify) or [`identify`](crate::identify).
///
/// ```no_run
/// # use outbound::ClientConfig;
/// # use serde_json::json;
/// # let client = ClientConfig::from_api_key("api-key").to_client().unwrap();
/// client
///     .identify(42)
///     .email("ada@example.com")
///     .apns_tokens("device-token")
///     .attributes(json!({ "plan": "pro" }))
///     .on_error(|code, message| eprintln!("{code}: {message}"))
///     .send();
/// ```
#[must_use = "requests do nothing until `send()` is called"]
#[derive(Debug)]
pub struct Identify<'a> {
    client: Option<Client>,
    fields: IdentifyFields,
    reporter: Reporter<'a>,
}

impl<'a> Identify<'a> {
    pub(crate) fn new(client: Option<Client>, user_id: Value) -> Self {
        Identify {
            client,
            fields: IdentifyFields {
                user_id,
                ..Default::default()
            },
            reporter: Reporter::default(),
        }
    }

    /// Replace all descriptive fields at once.
    pub fn traits(mut self, traits: UserTraits) -> Self {
        self.fields.traits = traits;
        self
    }

    /// The user's first name.
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.fields.traits = self.fields.traits.first_name(first_name);
        self
    }

    /// The user's last name.
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.fields.traits = self.fields.traits.last_name(last_name);
        self
    }

    /// The user's email address.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.fields.traits = self.fields.traits.email(email);
        self
    }

    /// The user's phone number.
    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.fields.traits = self.fields.traits.phone_number(phone_number);
        self
    }

    /// Device tokens for the user's iOS devices. A single string is put into a list.
    pub fn apns_tokens(mut self, tokens: impl Into<Value>) -> Self {
        self.fields.traits = self.fields.traits.apns_tokens(tokens);
        self
    }

    /// Device tokens for the user's Android devices. A single string is put into a list.
    pub fn gcm_tokens(mut self, tokens: impl Into<Value>) -> Self {
        self.fields.traits = self.fields.traits.gcm_tokens(tokens);
        self
    }

    /// Freeform attributes describing the user. Must be a JSON object.
    pub fn attributes(mut self, attributes: impl Into<Value>) -> Self {
        self.fields.traits = self.fields.traits.attributes(attributes);
        self
    }

    /// A previous id of this user, such as an anonymous id. Must be a string or a number.
    pub fn previous_id(mut self, previous_id: impl Into<Value>) -> Self {
        self.fields.previous_id = previous_id.into();
        self
    }

    /// The group (e.g., company or team) the user belongs to.
    pub fn group_id(mut self, group_id: impl Into<Value>) -> Self {
        self.fields.group_id = group_id.into();
        self
    }

    /// Freeform attributes describing the group. Must be a JSON object.
    pub fn group_attributes(mut self, attributes: impl Into<Value>) -> Self {
        self.fields.group_attributes = attributes.into();
        self
    }

    /// Validate and send the request, then report the outcome to the handlers.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`](crate::Error::NotInitialized) if there is no client.
    /// - [`Error::InvalidUserId`](crate::Error::InvalidUserId) or
    ///   [`Error::InvalidPreviousId`](crate::Error::InvalidPreviousId) for bad ids.
    /// - [`Error::Connection`](crate::Error::Connection) or [`Error::Server`](crate::Error::Server)
    ///   if delivery failed.
    pub fn send(self) -> Result<()> {
        let Identify {
            client,
            fields,
            reporter,
        } = self;

        execute(client, Operation::Identify, reporter, || {
            let built = payload::identify(fields)?;
            Ok(Prepared::new(Endpoint::Identify, built.payload).with_warnings(built.warnings))
        })
    }
}

handler_methods!(Identify);
