use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Message fragment the judge backend uses while a submission is still being
/// evaluated. Such responses sometimes arrive with an error status but mean
/// the submission was accepted.
pub const JUDGING_IN_PROGRESS: &str = "正在评测";

pub const DEFAULT_FAILURE_MESSAGE: &str = "request failed";

/// Common shape of every backend response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Endpoint-specific payload fields.
    #[serde(flatten)]
    pub data: serde_json::Map<String, Value>,
}

impl ApiEnvelope {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn is_judging_in_progress(&self) -> bool {
        self.message
            .as_deref()
            .is_some_and(|message| message.contains(JUDGING_IN_PROGRESS))
    }

    /// Stand-in for a judging response that arrived shaped like an error.
    /// The submission id is a timestamp since the backend did not send one.
    pub fn judging_placeholder(message: impl Into<String>) -> Self {
        let mut data = serde_json::Map::new();
        data.insert(
            "submission_id".to_string(),
            Value::from(Utc::now().timestamp_millis()),
        );
        Self {
            code: None,
            status: Some("ok".to_string()),
            message: Some(message.into()),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeClass {
    Success,
    /// Session missing or expired.
    Unauthorized(String),
    Failure(String),
}

/// Classifies a response by HTTP status and body.
pub fn classify(http_status: u16, envelope: &ApiEnvelope) -> EnvelopeClass {
    if envelope.is_judging_in_progress() {
        return EnvelopeClass::Success;
    }
    let success_status = (200..300).contains(&http_status);
    if success_status && (envelope.code == Some(200) || envelope.status.as_deref() == Some("ok")) {
        return EnvelopeClass::Success;
    }
    let message = envelope
        .message
        .clone()
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            if success_status {
                DEFAULT_FAILURE_MESSAGE.to_string()
            } else {
                format!("HTTP {http_status}")
            }
        });
    if http_status == 401 || envelope.code == Some(401) {
        return EnvelopeClass::Unauthorized(message);
    }
    EnvelopeClass::Failure(message)
}
