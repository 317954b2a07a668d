//! CloudTrail activity event model

use chrono::{SecondsFormat, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};

/// Placeholder for identity and address fields the record does not carry
pub const UNKNOWN: &str = "Unknown";

/// Identity that made the API call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Identity kind ("Root", "IAMUser", "AssumedRole", ...)
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,

    /// Identity ARN
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub arn: Option<String>,
}

impl UserIdentity {
    /// ARN of the caller, or "Unknown"
    pub fn arn_or_unknown(&self) -> &str {
        self.arn.as_deref().unwrap_or(UNKNOWN)
    }
}

/// A single API call recorded against the account
///
/// Every field is optional on the wire. Missing, null or mistyped values
/// fall back to placeholders instead of failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    /// API action name, e.g. "RunInstances"
    #[serde(default, deserialize_with = "lenient_string")]
    pub event_name: String,

    /// Service endpoint, e.g. "ec2.amazonaws.com"
    #[serde(default, deserialize_with = "lenient_string")]
    pub event_source: String,

    /// Caller identity
    #[serde(default, deserialize_with = "object_or_default")]
    pub user_identity: UserIdentity,

    /// Originating network address
    #[serde(rename = "sourceIPAddress", default, deserialize_with = "lenient_opt_string")]
    pub source_ip_address: Option<String>,

    /// Event time as recorded by CloudTrail
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub event_time: Option<String>,

    /// Request parameters; keys depend on the event name
    #[serde(default, deserialize_with = "object_or_default")]
    pub request_parameters: Map<String, Value>,
}

impl ActivityEvent {
    /// Build an event from raw JSON, unwrapping an EventBridge envelope if present
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut object) = value else {
            return Err(Error::invalid_event("expected a JSON object"));
        };

        let record = if let Some(detail) = object.remove("detail") {
            detail
        } else if object.contains_key("detail-type") {
            Value::Null
        } else {
            Value::Object(object)
        };

        match record {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => Ok(serde_json::from_value(record)?),
            _ => Err(Error::invalid_event("detail must be a JSON object")),
        }
    }

    /// Parse an event from a JSON string
    pub fn from_json(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    /// Source address, or "Unknown"
    pub fn source_ip_or_unknown(&self) -> &str {
        self.source_ip_address.as_deref().unwrap_or(UNKNOWN)
    }

    /// Recorded event time, or the current UTC time when the record has none
    pub fn timestamp(&self) -> String {
        self.event_time
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Read a request parameter as text
    ///
    /// Strings are returned as-is, other values as their JSON text, and a
    /// missing or null parameter as an empty string.
    pub fn parameter_str(&self, key: &str) -> String {
        value_text(self.request_parameters.get(key)).unwrap_or_default()
    }

    /// Read a request parameter as a JSON number, defaulting to 0
    ///
    /// Numbers keep their original value (integer or float); a string
    /// holding a number is parsed. Anything else is 0.
    pub fn parameter_number(&self, key: &str) -> Number {
        match self.request_parameters.get(key) {
            Some(Value::Number(n)) => n.clone(),
            Some(Value::String(s)) => s.trim().parse().unwrap_or_else(|_| Number::from(0)),
            _ => Number::from(0),
        }
    }
}

/// Whether a JSON number is strictly greater than an integer limit
pub fn number_exceeds(number: &Number, limit: i64) -> bool {
    if let Some(value) = number.as_i64() {
        value > limit
    } else if number.is_u64() {
        // above i64::MAX
        true
    } else {
        number.as_f64().is_some_and(|value| value > limit as f64)
    }
}

fn value_text(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_text(Some(&value)))
}

fn object_or_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        object @ Value::Object(_) => serde_json::from_value(object).map_err(D::Error::custom),
        _ => Ok(T::default()),
    }
}
