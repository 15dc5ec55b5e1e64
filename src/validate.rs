//! Normalization of loosely-typed caller input.
//!
//! Two policies live here side by side. Identity fields, event names, tokens and campaign lists
//! are *required*: a wrong value fails the whole operation with an [`Error`]. Free-form fields
//! (token lists, attribute maps, properties, group ids) are *permissive*: a wrong value is
//! recorded as a [`FieldWarning`] and the field is dropped, while the operation proceeds.
use derive_more::From;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::{Error, Result};

/// Free-form key/value attributes attached to a user, an event, or a group.
pub(crate) type Attributes = Map<String, Value>;

/// A validated user identifier: either a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, From)]
#[serde(untagged)]
pub(crate) enum UserId {
    /// A string identifier.
    String(String),
    /// A numeric identifier.
    Number(Number),
}

impl UserId {
    fn parse(value: Value) -> Option<UserId> {
        match value {
            Value::String(s) => Some(s.into()),
            Value::Number(n) => Some(n.into()),
            _ => None,
        }
    }
}

/// A dropped optional field. Emitted when a permissive field had the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldWarning {
    /// Name of the field as it would appear in the payload.
    pub field: &'static str,
    /// Shape the field was expected to have.
    pub expected: &'static str,
    /// JSON type of the value that was received.
    pub received: &'static str,
}

impl std::fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid {} given. Expected {}. Got {}",
            self.field, self.expected, self.received
        )
    }
}

/// Collects [`FieldWarning`]s produced while normalizing one operation.
#[derive(Debug, Default)]
pub(crate) struct Warnings(Vec<FieldWarning>);

impl Warnings {
    fn push(&mut self, field: &'static str, expected: &'static str, value: &Value) {
        self.0.push(FieldWarning {
            field,
            expected,
            received: json_type(value),
        });
    }

    pub fn into_vec(self) -> Vec<FieldWarning> {
        self.0
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate the primary user id.
pub(crate) fn user_id(value: Value) -> Result<UserId> {
    UserId::parse(value).ok_or(Error::InvalidUserId)
}

/// Validate a required previous id (alias).
pub(crate) fn previous_id(value: Value) -> Result<UserId> {
    UserId::parse(value).ok_or(Error::InvalidPreviousId)
}

/// Validate an optional previous id (identify). `null` means absent.
pub(crate) fn optional_previous_id(value: Value) -> Result<Option<UserId>> {
    match value {
        Value::Null => Ok(None),
        value => previous_id(value).map(Some),
    }
}

/// Validate an event name: a non-empty string.
pub(crate) fn event_name(value: Value) -> Result<String> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(s),
        _ => Err(Error::InvalidEventName),
    }
}

/// Validate a single device token.
pub(crate) fn token(value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(Error::InvalidToken),
    }
}

/// Validate a campaign id list: a non-empty array.
pub(crate) fn campaign_ids(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(ids) if !ids.is_empty() => Ok(ids),
        _ => Err(Error::MissingCampaignIds),
    }
}

/// Normalize a device token list. A single string becomes a one-element list.
///
/// Empty values (`null`, `""`, `[]`) are absent without a warning.
pub(crate) fn token_list(
    field: &'static str,
    value: Value,
    warnings: &mut Warnings,
) -> Option<Vec<String>> {
    const EXPECTED: &str = "string or list of strings";
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(vec![s]),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => {
            let mut tokens = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => tokens.push(s),
                    other => {
                        warnings.push(field, EXPECTED, &other);
                        return None;
                    }
                }
            }
            Some(tokens)
        }
        other => {
            warnings.push(field, EXPECTED, &other);
            None
        }
    }
}

/// Normalize a free-form attribute map. Empty maps are absent without a warning.
pub(crate) fn attributes(
    field: &'static str,
    value: Value,
    warnings: &mut Warnings,
) -> Option<Attributes> {
    match value {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Object(map) => Some(map),
        other => {
            warnings.push(field, "dictionary", &other);
            None
        }
    }
}

/// Normalize an optional group id. Wrong shapes are dropped rather than failing the operation.
pub(crate) fn group_id(value: Value, warnings: &mut Warnings) -> Option<UserId> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => {
            let shown = other.clone();
            UserId::parse(other).or_else(|| {
                warnings.push("group_id", "string or number", &shown);
                None
            })
        }
    }
}

/// Keep a plain string field only if it is non-empty.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
