use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MailAppError, Result};

/// Message data supplied by the caller of a compose operation.
///
/// Recipient lists default to empty when absent; `subject` and `body` are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContent {
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl EmailContent {
    /// Decode from a JSON document (the transport sends content as a string).
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| MailAppError::MissingRequiredField(e.to_string()))
    }

    /// Decode from an already parsed argument: either a JSON string or an object.
    pub fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::String(s) => Self::from_json(s),
            Value::Object(_) => Self::deserialize(v)
                .map_err(|e| MailAppError::MissingRequiredField(e.to_string())),
            Value::Null => Err(MailAppError::MissingRequiredField("emailContent".into())),
            other => Err(MailAppError::MissingRequiredField(format!(
                "emailContent must be an object or a JSON string, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recipients_default_to_empty() {
        let c = EmailContent::from_json(r#"{"subject":"S","body":"B"}"#).unwrap();
        assert!(c.to.is_empty() && c.cc.is_empty() && c.bcc.is_empty());
        assert_eq!(c.subject, "S");
    }

    #[test]
    fn missing_subject_is_rejected() {
        let err = EmailContent::from_json(r#"{"to":["a@x.com"],"body":"B"}"#).unwrap_err();
        assert!(matches!(err, MailAppError::MissingRequiredField(_)));
    }

    #[test]
    fn null_recipients_are_rejected_not_nulled() {
        let err = EmailContent::from_value(&json!({"to": null, "subject": "S", "body": "B"}))
            .unwrap_err();
        assert!(matches!(err, MailAppError::MissingRequiredField(_)));
    }

    #[test]
    fn accepts_string_and_object_arguments() {
        let obj = json!({"to": ["b@x.com", "a@x.com"], "subject": "S", "body": "B"});
        let from_obj = EmailContent::from_value(&obj).unwrap();
        let from_str = EmailContent::from_value(&Value::String(obj.to_string())).unwrap();
        assert_eq!(from_obj, from_str);
        assert_eq!(from_obj.to, vec!["b@x.com", "a@x.com"]);
    }

    #[test]
    fn rejects_non_object_arguments() {
        assert!(EmailContent::from_value(&json!(42)).is_err());
        assert!(EmailContent::from_value(&Value::Null).is_err());
        assert!(EmailContent::from_json("not json").is_err());
    }
}
