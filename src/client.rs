use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::{
    dispatcher::{Dispatcher, Endpoint},
    Alias, DeviceToken, Identify, Platform, Result, Subscription, Track,
};

/// A client for the Outbound API.
///
/// In order to create a client instance, first create [`ClientConfig`](crate::ClientConfig).
/// The client is immutable once built. It is cheap to clone, and clones share one connection pool.
///
/// Every operation returns a request builder. Optional fields and the error and success handlers
/// are set on the builder, and `send()` performs the call. `send()` never panics for invalid input
/// or delivery failures: the outcome goes to exactly one of the handlers and is also returned.
///
/// # Examples
/// ```no_run
/// # use outbound::{ClientConfig, Platform};
/// let client = ClientConfig::from_api_key("api-key").to_client().unwrap();
///
/// client.identify(42).email("ada@example.com").send();
/// client
///     .track(42, "signed up")
///     .on_success(|| println!("tracked"))
///     .on_error(|code, message| eprintln!("{code}: {message}"))
///     .send();
/// ```
#[derive(Clone)]
pub struct Client {
    dispatcher: Arc<Dispatcher>,
}

impl Client {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Client {
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub(crate) fn dispatch<P: Serialize>(&self, endpoint: Endpoint, payload: &P) -> Result<()> {
        self.dispatcher.dispatch(endpoint, payload)
    }

    /// Create or update a user. `user_id` must be a string or a number and should stay the same for
    /// the lifetime of the user.
    pub fn identify<'a>(&self, user_id: impl Into<Value>) -> Identify<'a> {
        Identify::new(Some(self.clone()), user_id.into())
    }

    /// Record that the user `user_id` triggered `event`. `event` must be a non-empty string.
    pub fn track<'a>(&self, user_id: impl Into<Value>, event: impl Into<Value>) -> Track<'a> {
        Track::new(Some(self.clone()), user_id.into(), event.into())
    }

    /// Link `previous_id` to `user_id`. Both must be strings or numbers.
    pub fn alias<'a>(&self, user_id: impl Into<Value>, previous_id: impl Into<Value>) -> Alias<'a> {
        Alias::new(Some(self.clone()), user_id.into(), previous_id.into())
    }

    /// Subscribe the user to campaigns.
    pub fn subscribe<'a>(&self, user_id: impl Into<Value>) -> Subscription<'a> {
        Subscription::new(Some(self.clone()), true, user_id.into())
    }

    /// Unsubscribe the user from campaigns.
    pub fn unsubscribe<'a>(&self, user_id: impl Into<Value>) -> Subscription<'a> {
        Subscription::new(Some(self.clone()), false, user_id.into())
    }

    /// Register a device token for the user. `token` must be a string.
    pub fn register_token<'a>(
        &self,
        platform: Platform,
        user_id: impl Into<Value>,
        token: impl Into<Value>,
    ) -> DeviceToken<'a> {
        DeviceToken::register(Some(self.clone()), platform, user_id.into(), token.into())
    }

    /// Disable one device token of the user. `token` must be a string.
    pub fn disable_token<'a>(
        &self,
        platform: Platform,
        user_id: impl Into<Value>,
        token: impl Into<Value>,
    ) -> DeviceToken<'a> {
        DeviceToken::disable(Some(self.clone()), platform, user_id.into(), token.into())
    }

    /// Disable every device token the user has on `platform`.
    pub fn disable_all_tokens<'a>(
        &self,
        platform: Platform,
        user_id: impl Into<Value>,
    ) -> DeviceToken<'a> {
        DeviceToken::disable_all(Some(self.clone()), platform, user_id.into())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        sync::Arc,
    };

    use serde_json::json;

    use crate::{
        dispatcher::testing::FakeTransport, Client, ClientConfig, ErrorCode, Platform, UserTraits,
    };

    const BASE_URL: &str = "https://api.example.com/v2";

    fn client(transport: &Arc<FakeTransport>) -> Client {
        ClientConfig::from_api_key("key123")
            .base_url(BASE_URL)
            .transport(transport.clone())
            .to_client()
            .unwrap()
    }

    /// Collects every handler invocation of one request.
    #[derive(Default)]
    struct Outcome {
        successes: Cell<usize>,
        errors: RefCell<Vec<(ErrorCode, String)>>,
    }

    impl Outcome {
        fn error_codes(&self) -> Vec<ErrorCode> {
            self.errors.borrow().iter().map(|(code, _)| *code).collect()
        }
    }

    #[test]
    fn identify_posts_to_identify_endpoint() {
        let transport = Arc::new(FakeTransport::ok());
        let outcome = Outcome::default();

        client(&transport)
            .identify(42)
            .email("a@b.com")
            .on_success(|| outcome.successes.set(outcome.successes.get() + 1))
            .on_error(|code, message| outcome.errors.borrow_mut().push((code, message.to_owned())))
            .send()
            .unwrap();

        assert_eq!(outcome.successes.get(), 1);
        assert!(outcome.errors.borrow().is_empty());

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, format!("{BASE_URL}/identify"));
        assert_eq!(requests[0].body, json!({"user_id": 42, "email": "a@b.com"}));
        assert_eq!(requests[0].headers["x-outbound-key"], "key123");
    }

    #[test]
    fn invalid_user_id_makes_no_request() {
        let transport = Arc::new(FakeTransport::ok());
        let client = client(&transport);
        let outcome = Outcome::default();
        let on_error =
            |code: ErrorCode, message: &str| outcome.errors.borrow_mut().push((code, message.to_owned()));

        for user_id in [json!(null), json!(true), json!([1]), json!({"id": 1})] {
            let _ = client.identify(user_id.clone()).on_error(on_error).send();
            let _ = client.track(user_id.clone(), "event").on_error(on_error).send();
            let _ = client.alias(user_id.clone(), "old").on_error(on_error).send();
            let _ = client.subscribe(user_id.clone()).all_campaigns().on_error(on_error).send();
            let _ = client.unsubscribe(user_id.clone()).all_campaigns().on_error(on_error).send();
            let _ = client
                .register_token(Platform::Apns, user_id.clone(), "tok")
                .on_error(on_error)
                .send();
            let _ = client
                .disable_token(Platform::Gcm, user_id.clone(), "tok")
                .on_error(on_error)
                .send();
            let _ = client
                .disable_all_tokens(Platform::Gcm, user_id)
                .on_error(on_error)
                .send();
        }

        assert_eq!(outcome.error_codes(), vec![ErrorCode::InvalidUserId; 32]);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn track_rejects_missing_or_empty_event() {
        let transport = Arc::new(FakeTransport::ok());
        let client = client(&transport);

        let err = client.track(1, serde_json::Value::Null).send().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidEventName);
        let err = client.track(1, "").send().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidEventName);

        assert!(transport.requests().is_empty());
    }

    #[test]
    fn track_defaults_timestamp_to_call_time() {
        let transport = Arc::new(FakeTransport::ok());
        let now = chrono::Utc::now().timestamp();

        client(&transport).track("u1", "login").send().unwrap();

        let body = &transport.requests()[0].body;
        assert_eq!(body["event"], "login");
        let timestamp = body["timestamp"].as_i64().unwrap();
        assert!((timestamp - now).abs() <= 2, "{timestamp} vs {now}");
    }

    #[test]
    fn track_sends_user_and_properties() {
        let transport = Arc::new(FakeTransport::ok());

        client(&transport)
            .track("u1", "purchase")
            .user(UserTraits::new().apns_tokens("tok").attributes(json!({})))
            .properties(json!({"amount": 10}))
            .timestamp(1_500_000_000)
            .send()
            .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.url, format!("{BASE_URL}/track"));
        assert_eq!(
            request.body,
            json!({
                "user_id": "u1",
                "event": "purchase",
                "user": {"apns": ["tok"]},
                "properties": {"amount": 10},
                "timestamp": 1_500_000_000,
            })
        );
    }

    #[test]
    fn malformed_optional_field_still_sends() {
        let transport = Arc::new(FakeTransport::ok());

        client(&transport)
            .identify("u1")
            .apns_tokens(17)
            .attributes(json!(["not", "a", "map"]))
            .send()
            .unwrap();

        assert_eq!(transport.requests()[0].body, json!({"user_id": "u1"}));
    }

    #[test]
    fn alias_posts_both_ids_to_identify() {
        let transport = Arc::new(FakeTransport::ok());
        let client = client(&transport);

        client.alias("new-id", 77).send().unwrap();
        let err = client.alias("new-id", json!({})).send().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPreviousId);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, format!("{BASE_URL}/identify"));
        assert_eq!(requests[0].body, json!({"user_id": "new-id", "previous_id": 77}));
    }

    #[test]
    fn unsubscribe_without_campaigns_fails_locally() {
        let transport = Arc::new(FakeTransport::ok());
        let outcome = Outcome::default();

        let _ = client(&transport)
            .unsubscribe("u1")
            .campaign_ids(Vec::<i64>::new())
            .on_error(|code, message| outcome.errors.borrow_mut().push((code, message.to_owned())))
            .send();

        assert_eq!(
            *outcome.errors.borrow(),
            [(
                ErrorCode::MissingCampaignIds,
                "At least one campaign ID is required.".to_owned()
            )]
        );
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn subscription_endpoints() {
        let transport = Arc::new(FakeTransport::ok());
        let client = client(&transport);

        client.subscribe("u1").campaign_ids(vec![1, 2]).send().unwrap();
        client.unsubscribe("u1").all_campaigns().send().unwrap();
        // "all" wins over an explicit list.
        client
            .subscribe("u1")
            .campaign_ids(vec![3])
            .all_campaigns()
            .send()
            .unwrap();

        let requests = transport.requests();
        let urls: Vec<_> = requests.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            [
                format!("{BASE_URL}/subscribe/campaigns"),
                format!("{BASE_URL}/unsubscribe/all"),
                format!("{BASE_URL}/subscribe/all"),
            ]
        );
        assert_eq!(requests[0].body, json!({"user_id": "u1", "campaign_ids": [1, 2]}));
        assert_eq!(requests[1].body, json!({"user_id": "u1"}));
        assert_eq!(requests[2].body, json!({"user_id": "u1"}));
    }

    #[test]
    fn register_token_posts_to_platform_endpoint() {
        let transport = Arc::new(FakeTransport::ok());

        client(&transport)
            .register_token(Platform::Apns, "u1", "tok-abc")
            .send()
            .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.url, format!("{BASE_URL}/apns/register"));
        assert_eq!(request.body, json!({"user_id": "u1", "token": "tok-abc"}));
    }

    #[test]
    fn disable_tokens() {
        let transport = Arc::new(FakeTransport::ok());
        let client = client(&transport);

        client.disable_token(Platform::Gcm, 5, "tok").send().unwrap();
        client.disable_all_tokens(Platform::Apns, 5).send().unwrap();
        let err = client
            .register_token(Platform::Gcm, 5, json!(["tok"]))
            .send()
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidToken);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url, format!("{BASE_URL}/gcm/disable"));
        assert_eq!(requests[0].body, json!({"user_id": 5, "token": "tok"}));
        assert_eq!(requests[1].url, format!("{BASE_URL}/apns/disable"));
        assert_eq!(requests[1].body, json!({"user_id": 5, "all": true}));
    }

    #[test]
    fn connection_failure_reaches_error_handler() {
        let transport = Arc::new(FakeTransport::unreachable());
        let outcome = Outcome::default();

        let result = client(&transport)
            .track("u1", "login")
            .on_success(|| outcome.successes.set(outcome.successes.get() + 1))
            .on_error(|code, message| outcome.errors.borrow_mut().push((code, message.to_owned())))
            .send();

        assert!(result.is_err());
        assert_eq!(outcome.successes.get(), 0);
        assert_eq!(
            *outcome.errors.borrow(),
            [(
                ErrorCode::ConnectionError,
                "Unable to connect to Outbound.".to_owned()
            )]
        );
    }

    #[test]
    fn server_rejection_reports_body() {
        let transport = Arc::new(FakeTransport::responding(401, "invalid api key"));
        let outcome = Outcome::default();

        let _ = client(&transport)
            .identify("u1")
            .on_error(|code, message| outcome.errors.borrow_mut().push((code, message.to_owned())))
            .send();

        assert_eq!(
            *outcome.errors.borrow(),
            [(ErrorCode::UnknownError, "invalid api key".to_owned())]
        );
    }

    #[test]
    fn send_without_handlers_is_fire_and_forget() {
        // Neither handler is set: failures are only visible through the returned value.
        let transport = Arc::new(FakeTransport::unreachable());
        let client = client(&transport);

        assert!(client.identify(json!(null)).send().is_err());
        assert!(client.identify(1).send().is_err());
    }

    #[test]
    fn clones_share_configuration() {
        let transport = Arc::new(FakeTransport::ok());
        let client = client(&transport);
        let clone = client.clone();

        std::thread::spawn(move || clone.identify(1).send().unwrap())
            .join()
            .unwrap();
        client.identify(2).send().unwrap();

        assert_eq!(transport.requests().len(), 2);
    }
}
