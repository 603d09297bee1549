use crate::domain::app::{Component, MailApp};
use crate::domain::email::EmailContent;
use crate::domain::intent::{ActionDescriptor, EmailExtras};

/// A bare `mailto:` send with no extras. Unbound when `target` is `None`.
pub fn compose_generic(target: Option<&MailApp>) -> ActionDescriptor {
    bind(ActionDescriptor::send_to_mail(), target)
}

/// A `mailto:` send carrying `content` as extras. Recipient lists pass through unchanged.
pub fn compose_with_content(target: Option<&MailApp>, content: &EmailContent) -> ActionDescriptor {
    let mut d = ActionDescriptor::send_to_mail();
    d.extras = Some(EmailExtras {
        to: content.to.clone(),
        cc: content.cc.clone(),
        bcc: content.bcc.clone(),
        subject: content.subject.clone(),
        body: content.body.clone(),
    });
    bind(d, target)
}

/// Opens the main screen of the component the registry reported for a package.
pub fn compose_launch(component: Component) -> ActionDescriptor {
    ActionDescriptor::main(component)
}

fn bind(d: ActionDescriptor, target: Option<&MailApp>) -> ActionDescriptor {
    match target {
        Some(app) => d.bound_to(app.component()),
        None => d,
    }
}
