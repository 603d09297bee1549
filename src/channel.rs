use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::email::EmailContent;
use crate::error::MailAppError;
use crate::service::MailApps;

/// A call arriving from the host application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResult {
    Success { value: Value },
    NotImplemented { method: String },
}

impl MethodResult {
    fn success(value: impl Into<Value>) -> Self {
        Self::Success {
            value: value.into(),
        }
    }
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Map::new(),
        }
    }

    pub fn arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.to_string(), value.into());
        self
    }

    /// String argument; `null` counts as absent.
    fn string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }

    fn required_string(&self, key: &str) -> Result<&str, MailAppError> {
        self.string(key)
            .ok_or_else(|| MailAppError::MissingRequiredField(key.to_string()))
    }

    fn email_content(&self) -> Result<EmailContent, MailAppError> {
        match self.arguments.get("emailContent") {
            Some(v) => EmailContent::from_value(v),
            None => Err(MailAppError::MissingRequiredField("emailContent".into())),
        }
    }
}

/// Route one call to the façade.
pub fn handle_call(apps: &MailApps<'_>, call: &MethodCall) -> MethodResult {
    debug!("method call {}", call.method);
    match call.method.as_str() {
        "openMailApp" => {
            MethodResult::success(apps.open_mail_app(call.string("nativePickerTitle")))
        }
        "openSpecificMailApp" => match call.required_string("name") {
            Ok(name) => MethodResult::success(apps.open_specific_mail_app(name)),
            Err(e) => rejected(&call.method, e),
        },
        "composeNewEmailInMailApp" => match call.email_content() {
            Ok(content) => MethodResult::success(
                apps.compose_new_email_in_mail_app(call.string("nativePickerTitle"), &content),
            ),
            Err(e) => rejected(&call.method, e),
        },
        "composeNewEmailInSpecificMailApp" => {
            let args = call
                .required_string("name")
                .and_then(|name| Ok((name, call.email_content()?)));
            match args {
                Ok((name, content)) => MethodResult::success(
                    apps.compose_new_email_in_specific_mail_app(name, &content),
                ),
                Err(e) => rejected(&call.method, e),
            }
        }
        "getMainApps" => MethodResult::success(apps.get_main_apps()),
        other => MethodResult::NotImplemented {
            method: other.to_string(),
        },
    }
}

fn rejected(method: &str, e: MailAppError) -> MethodResult {
    warn!("{method}: {e}");
    MethodResult::success(false)
}
