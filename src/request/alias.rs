use serde_json::Value;

use crate::{dispatcher::Endpoint, payload, reporter::Reporter, Client, Operation, Result};

use super::{execute, Prepared};

/// Links a previous id (e.g., an anonymous id) to a user. Sent to the identify endpoint.
#[must_use = "requests do nothing until `send()` is called"]
#[derive(Debug)]
pub struct Alias<'a> {
    client: Option<Client>,
    user_id: Value,
    previous_id: Value,
    reporter: Reporter<'a>,
}

impl<'a> Alias<'a> {
    pub(crate) fn new(client: Option<Client>, user_id: Value, previous_id: Value) -> Self {
        Alias {
            client,
            user_id,
            previous_id,
            reporter: Reporter::default(),
        }
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
        let Alias {
            client,
            user_id,
            previous_id,
            reporter,
        } = self;

        execute(client, Operation::Alias, reporter, || {
            let payload = payload::alias(user_id, previous_id)?;
            Ok(Prepared::new(Endpoint::Identify, payload))
        })
    }
}

handler_methods!(Alias);
