/// Failures of the mail-app operations.
///
/// None of these cross the façade boundary: `service::MailApps` logs them and
/// reports `false` to its caller.
#[derive(Debug, thiserror::Error)]
pub enum MailAppError {
    #[error("no mail handler found: {0}")]
    NoHandlerFound(String),

    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    #[error("app registry query failed: {0}")]
    Registry(#[source] anyhow::Error),

    #[error("launch failed: {0}")]
    Launch(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MailAppError>;
