use serde_json::Value;

use crate::{dispatcher::Endpoint, payload, reporter::Reporter, Client, Operation, Result};

use super::{execute, Prepared};

/// Subscribes a user to, or unsubscribes a user from, campaigns.
///
/// Either target every campaign with [`all_campaigns`](Subscription::all_campaigns) or list
/// specific ones with [`campaign_ids`](Subscription::campaign_ids). If both are given, all
/// campaigns wins and the list is ignored.
///
/// ```no_run
/// # use outbound::ClientConfig;
/// # let client = ClientConfig::from_api_key("api-key").to_client().unwrap();
/// client.unsubscribe("user-1").campaign_ids(vec![12, 34]).send();
/// client.subscribe("user-1").all_campaigns().send();
/// ```
#[must_use = "requests do nothing until `send()` is called"]
#[derive(Debug)]
pub struct Subscription<'a> {
    client: Option<Client>,
    subscribe: bool,
    user_id: Value,
    all: bool,
    campaign_ids: Value,
    reporter: Reporter<'a>,
}

impl<'a> Subscription<'a> {
    pub(crate) fn new(client: Option<Client>, subscribe: bool, user_id: Value) -> Self {
        Subscription {
            client,
            subscribe,
            user_id,
            all: false,
            campaign_ids: Value::Null,
            reporter: Reporter::default(),
        }
    }

    /// Target every campaign.
    pub fn all_campaigns(mut self) -> Self {
        self.all = true;
        self
    }

    /// Target the listed campaigns. Must be a non-empty list unless
    /// [`all_campaigns`](Subscription::all_campaigns) is set.
    pub fn campaign_ids(mut self, campaign_ids: impl Into<Value>) -> Self {
        self.campaign_ids = campaign_ids.into();
        self
    }

    /// Validate and send the request, then report the outcome to the handlers.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`](crate::Error::NotInitialized) if there is no client.
    /// - [`Error::InvalidUserId`](crate::Error::InvalidUserId) for a bad user id.
    /// - [`Error::MissingCampaignIds`](crate::Error::MissingCampaignIds) if neither all campaigns
    ///   nor a non-empty list was given.
    /// - [`Error::Connection`](crate::Error::Connection) or [`Error::Server`](crate::Error::Server)
    ///   if delivery failed.
    pub fn send(self) -> Result<()> {
        let Subscription {
            client,
            subscribe,
            user_id,
            all,
            campaign_ids,
            reporter,
        } = self;

        execute(client, Operation::Subscription, reporter, || {
            let payload = payload::subscription(user_id, all, campaign_ids)?;
            let endpoint = if subscribe {
                Endpoint::Subscribe { all }
            } else {
                Endpoint::Unsubscribe { all }
            };
            Ok(Prepared::new(endpoint, payload))
        })
    }
}

handler_methods!(Subscription);
