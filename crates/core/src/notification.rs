//! Notification request and outcome types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::validation::{sanitize, validate, validate_str};

/// A notification to speak and display
///
/// Built from a request body by [`NotificationRequest::from_body`]. Once
/// constructed the title and message have passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub message: String,
    pub voice_enabled: bool,
    pub voice_id: Option<String>,
}

/// Fallback values applied when a body field is absent or falsy
#[derive(Debug, Clone, Copy)]
pub struct BodyDefaults {
    pub title: &'static str,
    pub message: &'static str,
}

/// How a body is interpreted for one endpoint
#[derive(Debug, Clone, Copy)]
pub struct BodyPolicy {
    pub defaults: BodyDefaults,
    /// Honour `voice_enabled` and `voice_id`/`voice_name` from the body
    pub accepts_voice_options: bool,
}

impl NotificationRequest {
    /// Interpret a JSON body under `policy` and validate it
    ///
    /// Missing or falsy `title`/`message` take the policy defaults. Voice is
    /// only disabled by a literal `false`. A falsy voice id means "use the
    /// default voice", while a truthy non-string is rejected.
    pub fn from_body(body: &Value, policy: BodyPolicy) -> Result<Self, ValidationError> {
        let title = field_or(body, "title", policy.defaults.title);
        let message = field_or(body, "message", policy.defaults.message);

        let (voice_enabled, voice_id) = if policy.accepts_voice_options {
            let voice_enabled = !matches!(body.get("voice_enabled"), Some(Value::Bool(false)));
            let voice_id = match first_truthy(body, &["voice_id", "voice_name"]) {
                None => None,
                Some(Value::String(id)) => Some(validate_str(id, "voice_id")?.to_string()),
                Some(_) => return Err(ValidationError::TypeMismatch { field: "voice_id" }),
            };
            (voice_enabled, voice_id)
        } else {
            (true, None)
        };

        let title = validate(&title, "title")?.to_string();
        let message = validate(&message, "message")?.to_string();

        Ok(Self {
            title,
            message,
            voice_enabled,
            voice_id,
        })
    }

    /// Title reduced to the interpolation-safe alphabet
    pub fn safe_title(&self) -> String {
        sanitize(&self.title)
    }

    /// Message reduced to the interpolation-safe alphabet
    pub fn safe_message(&self) -> String {
        sanitize(&self.message)
    }
}

/// Whether a JSON value counts as "set" (anything but null, false, 0, "")
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn field_or(body: &Value, key: &str, default: &str) -> Value {
    match body.get(key) {
        Some(value) if is_truthy(value) => value.clone(),
        _ => Value::String(default.to_string()),
    }
}

fn first_truthy<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| body.get(*key))
        .find(|value| is_truthy(value))
}

/// Result status reported to the HTTP caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Error,
}

/// Response body for notification endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOutcome {
    pub status: OutcomeStatus,
    pub message: String,
}

impl NotificationOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOTIFY: BodyPolicy = BodyPolicy {
        defaults: BodyDefaults {
            title: "PAI Notification",
            message: "Task completed",
        },
        accepts_voice_options: true,
    };

    const PAI: BodyPolicy = BodyPolicy {
        defaults: BodyDefaults {
            title: "PAI Assistant",
            message: "Task completed",
        },
        accepts_voice_options: false,
    };

    #[test]
    fn test_defaults_for_missing_and_falsy_fields() {
        let req = NotificationRequest::from_body(&json!({}), NOTIFY).unwrap();
        assert_eq!(req.title, "PAI Notification");
        assert_eq!(req.message, "Task completed");
        assert!(req.voice_enabled);
        assert_eq!(req.voice_id, None);

        let req =
            NotificationRequest::from_body(&json!({"title": "", "message": null}), NOTIFY).unwrap();
        assert_eq!(req.title, "PAI Notification");
        assert_eq!(req.message, "Task completed");
    }

    #[test]
    fn test_voice_disabled_only_by_literal_false() {
        let req = NotificationRequest::from_body(&json!({"voice_enabled": false}), NOTIFY).unwrap();
        assert!(!req.voice_enabled);

        for value in [json!(0), json!(null), json!("false"), json!(true)] {
            let req =
                NotificationRequest::from_body(&json!({ "voice_enabled": value }), NOTIFY).unwrap();
            assert!(req.voice_enabled);
        }
    }

    #[test]
    fn test_voice_name_alias() {
        let req = NotificationRequest::from_body(&json!({"voice_name": "abc"}), NOTIFY).unwrap();
        assert_eq!(req.voice_id.as_deref(), Some("abc"));

        let req = NotificationRequest::from_body(
            &json!({"voice_id": "primary", "voice_name": "alias"}),
            NOTIFY,
        )
        .unwrap();
        assert_eq!(req.voice_id.as_deref(), Some("primary"));

        let req = NotificationRequest::from_body(&json!({"voice_id": "", "voice_name": "alias"}), NOTIFY)
            .unwrap();
        assert_eq!(req.voice_id.as_deref(), Some("alias"));
    }

    #[test]
    fn test_non_string_voice_id_rejected() {
        let err = NotificationRequest::from_body(&json!({"voice_id": 42}), NOTIFY).unwrap_err();
        assert_eq!(err, ValidationError::TypeMismatch { field: "voice_id" });
        assert_eq!(err.to_string(), "Invalid voice_id: Invalid input type");
    }

    #[test]
    fn test_voice_id_checked_against_denylist() {
        let err = NotificationRequest::from_body(&json!({"voice_id": "../../v1/user"}), NOTIFY)
            .unwrap_err();
        assert_eq!(err, ValidationError::UnsafeContent { field: "voice_id" });
    }

    #[test]
    fn test_pai_policy_ignores_voice_options() {
        let req = NotificationRequest::from_body(
            &json!({"voice_enabled": false, "voice_id": 42}),
            PAI,
        )
        .unwrap();
        assert!(req.voice_enabled);
        assert_eq!(req.voice_id, None);
        assert_eq!(req.title, "PAI Assistant");
    }

    #[test]
    fn test_invalid_title_reported_before_message() {
        let err = NotificationRequest::from_body(
            &json!({"title": "a;b", "message": 7}),
            NOTIFY,
        )
        .unwrap_err();
        assert_eq!(err.field(), "title");

        let err = NotificationRequest::from_body(&json!({"message": 7}), NOTIFY).unwrap_err();
        assert_eq!(err, ValidationError::TypeMismatch { field: "message" });
    }

    #[test]
    fn test_safe_text() {
        let req = NotificationRequest::from_body(
            &json!({"title": "Build #12", "message": "Done @ 5pm"}),
            NOTIFY,
        )
        .unwrap();
        assert_eq!(req.safe_title(), "Build 12");
        assert_eq!(req.safe_message(), "Done  5pm");
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = NotificationOutcome::success("Notification sent");
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"status": "success", "message": "Notification sent"})
        );
    }
}
