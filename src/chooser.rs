use crate::domain::intent::{ActionDescriptor, ChooserRequest};
use crate::error::{MailAppError, Result};

/// Selection surface over `descriptors`: the first is the primary target, the rest
/// are extra choices in input order. Always launched as a new task.
pub fn build_chooser(descriptors: Vec<ActionDescriptor>, caption: &str) -> Result<ChooserRequest> {
    let mut it = descriptors.into_iter();
    let primary = it
        .next()
        .ok_or_else(|| MailAppError::NoHandlerFound("nothing to choose from".into()))?;

    Ok(ChooserRequest {
        title: caption.to_string(),
        primary,
        initial_choices: it.collect(),
        new_task: true,
    })
}
