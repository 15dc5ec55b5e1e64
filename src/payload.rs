//! Request bodies and the pure functions that build them from caller input.
//!
//! Absent and empty fields are omitted from the serialized body; nothing is ever sent as `null`,
//! `""`, `[]` or `{}`.
use serde::Serialize;
use serde_json::Value;

use crate::{
    validate::{self, Attributes, FieldWarning, UserId, Warnings},
    Result,
};

/// Descriptive fields of a user, shared by identify calls and the `user` object of track calls.
///
/// Token lists and attributes are accepted loosely: token lists may be a single string or a list of
/// strings, attributes must be a JSON object. Values of any other shape are dropped with a logged
/// warning instead of failing the call.
///
/// ```
/// # use outbound::UserTraits;
/// # use serde_json::json;
/// let traits = UserTraits::new()
///     .first_name("Ada")
///     .email("ada@example.com")
///     .apns_tokens("device-token")
///     .attributes(json!({ "plan": "pro" }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct UserTraits {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone_number: Option<String>,
    apns_tokens: Value,
    gcm_tokens: Value,
    attributes: Value,
}

impl UserTraits {
    /// Create an empty set of traits.
    pub fn new() -> Self {
        UserTraits::default()
    }

    /// The user's first name.
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// The user's last name.
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// The user's email address.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// The user's phone number.
    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Device tokens for the user's iOS devices. A single string is put into a list.
    pub fn apns_tokens(mut self, tokens: impl Into<Value>) -> Self {
        self.apns_tokens = tokens.into();
        self
    }

    /// Device tokens for the user's Android devices. A single string is put into a list.
    pub fn gcm_tokens(mut self, tokens: impl Into<Value>) -> Self {
        self.gcm_tokens = tokens.into();
        self
    }

    /// Freeform attributes describing the user. Must be a JSON object.
    pub fn attributes(mut self, attributes: impl Into<Value>) -> Self {
        self.attributes = attributes.into();
        self
    }

    fn normalize(self, warnings: &mut Warnings) -> UserPayload {
        UserPayload {
            first_name: validate::non_empty(self.first_name),
            last_name: validate::non_empty(self.last_name),
            email: validate::non_empty(self.email),
            phone_number: validate::non_empty(self.phone_number),
            apns: validate::token_list("apns", self.apns_tokens, warnings),
            gcm: validate::token_list("gcm", self.gcm_tokens, warnings),
            attributes: validate::attributes("attributes", self.attributes, warnings),
        }
    }
}

/// A payload together with the warnings produced while building it.
#[derive(Debug)]
pub(crate) struct Built<P> {
    pub payload: P,
    pub warnings: Vec<FieldWarning>,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub(crate) struct UserPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gcm: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attributes: Option<Attributes>,
}

impl UserPayload {
    fn is_empty(&self) -> bool {
        *self == UserPayload::default()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct IdentifyPayload {
    user_id: UserId,
    #[serde(flatten)]
    user: UserPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_attributes: Option<Attributes>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TrackPayload {
    user_id: UserId,
    event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<UserPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<Attributes>,
    timestamp: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct AliasPayload {
    user_id: UserId,
    previous_id: UserId,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubscriptionPayload {
    user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    campaign_ids: Option<Vec<Value>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenPayload {
    user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    all: Option<bool>,
}

/// Raw identify input, as collected by the request builder.
#[derive(Debug, Default)]
pub(crate) struct IdentifyFields {
    pub user_id: Value,
    pub previous_id: Value,
    pub group_id: Value,
    pub group_attributes: Value,
    pub traits: UserTraits,
}

/// Raw track input, as collected by the request builder.
#[derive(Debug, Default)]
pub(crate) struct TrackFields {
    pub user_id: Value,
    pub event: Value,
    pub traits: UserTraits,
    pub properties: Value,
    pub timestamp: Option<i64>,
}

pub(crate) fn identify(fields: IdentifyFields) -> Result<Built<IdentifyPayload>> {
    let user_id = validate::user_id(fields.user_id)?;
    let previous_id = validate::optional_previous_id(fields.previous_id)?;

    let mut warnings = Warnings::default();
    let payload = IdentifyPayload {
        user_id,
        user: fields.traits.normalize(&mut warnings),
        previous_id,
        group_id: validate::group_id(fields.group_id, &mut warnings),
        group_attributes: validate::attributes(
            "group_attributes",
            fields.group_attributes,
            &mut warnings,
        ),
    };

    Ok(Built {
        payload,
        warnings: warnings.into_vec(),
    })
}

pub(crate) fn track(fields: TrackFields) -> Result<Built<TrackPayload>> {
    let user_id = validate::user_id(fields.user_id)?;
    let event = validate::event_name(fields.event)?;

    let mut warnings = Warnings::default();
    let user = fields.traits.normalize(&mut warnings);
    let payload = TrackPayload {
        user_id,
        event,
        user: (!user.is_empty()).then_some(user),
        properties: validate::attributes("properties", fields.properties, &mut warnings),
        timestamp: fields
            .timestamp
            .unwrap_or_else(|| chrono::Utc::now().timestamp()),
    };

    Ok(Built {
        payload,
        warnings: warnings.into_vec(),
    })
}

pub(crate) fn alias(user_id: Value, previous_id: Value) -> Result<AliasPayload> {
    Ok(AliasPayload {
        user_id: validate::user_id(user_id)?,
        previous_id: validate::previous_id(previous_id)?,
    })
}

/// `all` wins over an explicit campaign list; the list is not even validated in that case.
pub(crate) fn subscription(
    user_id: Value,
    all: bool,
    campaign_ids: Value,
) -> Result<SubscriptionPayload> {
    let user_id = validate::user_id(user_id)?;
    let campaign_ids = if all {
        None
    } else {
        Some(validate::campaign_ids(campaign_ids)?)
    };
    Ok(SubscriptionPayload {
        user_id,
        campaign_ids,
    })
}

/// `token` is ignored when `all` is set.
pub(crate) fn device_token(user_id: Value, all: bool, token: Value) -> Result<TokenPayload> {
    let user_id = validate::user_id(user_id)?;
    let (token, all) = if all {
        (None, Some(true))
    } else {
        (Some(validate::token(token)?), None)
    };
    Ok(TokenPayload {
        user_id,
        token,
        all,
    })
}
