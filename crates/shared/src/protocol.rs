//! Wire payloads from the classification service and their normalization
//! into the display model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{domain::UNKNOWN_LABEL, error::UploadError};

/// Untyped JSON object returned by the service. Key names vary across
/// service versions (`label`/`prediction`, `prob`/`probability`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawResponsePayload(pub Map<String, Value>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    pub probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub votes: BTreeMap<String, u64>,
    pub raw: RawResponsePayload,
}

impl ClassificationResult {
    /// Probability as a whole percentage, rounded half up.
    pub fn percent(&self) -> u8 {
        (self.probability * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    Success(ClassificationResult),
    Failure { message: String },
}

impl ClassificationOutcome {
    pub fn into_result(self) -> Result<ClassificationResult, UploadError> {
        match self {
            Self::Success(result) => Ok(result),
            Self::Failure { message } => Err(UploadError::Service(message)),
        }
    }
}

impl RawResponsePayload {
    /// Parses a response body. Anything other than a JSON object is malformed.
    pub fn from_slice(body: &[u8]) -> Result<Self, UploadError> {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(other) => Err(UploadError::MalformedPayload(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(err) => Err(UploadError::MalformedPayload(err.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Message carried by an explicit `error` field, if the field is set to
    /// anything other than `null`, `false` or an empty string.
    pub fn error_message(&self) -> Option<String> {
        match self.get("error")? {
            Value::Null | Value::Bool(false) => None,
            Value::String(message) if message.is_empty() => None,
            Value::String(message) => Some(message.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Reason attached to a non-2xx response (`detail` or `error`).
    pub fn rejection_detail(&self) -> Option<String> {
        non_empty_str(self.get("detail"))
            .or_else(|| non_empty_str(self.get("error")))
            .map(str::to_string)
    }

    pub fn label(&self) -> String {
        non_empty_str(self.get("label"))
            .or_else(|| non_empty_str(self.get("prediction")))
            .unwrap_or(UNKNOWN_LABEL)
            .to_string()
    }

    /// `prob` wins over `probability`; numbers and numeric strings count,
    /// anything else falls through, ending at 0. Clamped into `[0, 1]`.
    pub fn probability(&self) -> f64 {
        as_probability(self.get("prob"))
            .or_else(|| as_probability(self.get("probability")))
            .unwrap_or(0.0)
            .clamp(0.0, 1.0)
    }

    pub fn subject(&self) -> Option<String> {
        match self.get("subject")? {
            Value::String(subject) if !subject.is_empty() => Some(subject.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    pub fn votes(&self) -> BTreeMap<String, u64> {
        self.get("votes")
            .and_then(Value::as_object)
            .map(|votes| {
                votes
                    .iter()
                    .filter_map(|(class, count)| Some((class.clone(), count.as_u64()?)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| format!("{:?}", self.0))
    }

    pub fn normalize(self) -> ClassificationOutcome {
        if let Some(message) = self.error_message() {
            return ClassificationOutcome::Failure { message };
        }

        ClassificationOutcome::Success(ClassificationResult {
            label: self.label(),
            probability: self.probability(),
            subject: self.subject(),
            votes: self.votes(),
            raw: self,
        })
    }
}

fn as_probability(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|p| p.is_finite()),
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
