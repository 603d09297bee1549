use serde::{Deserialize, Serialize};

use crate::domain::app::Component;

pub const MAILTO: &str = "mailto:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Open the target's main screen.
    Main,
    /// Send to the address in `data` (always `mailto:` here).
    SendTo,
}

/// Structured email extras carried by a compose descriptor.
///
/// Empty recipient lists are kept as empty arrays; handlers treat them as "no recipients".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailExtras {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// A request naming an action, optional extras and an optional explicit target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub action: Action,
    pub data: Option<String>,
    pub target: Option<Component>,
    pub extras: Option<EmailExtras>,
    /// Launch detached from the caller's lifecycle.
    pub new_task: bool,
}

impl ActionDescriptor {
    pub fn send_to_mail() -> Self {
        Self {
            action: Action::SendTo,
            data: Some(MAILTO.to_string()),
            target: None,
            extras: None,
            new_task: false,
        }
    }

    pub fn main(target: Component) -> Self {
        Self {
            action: Action::Main,
            data: None,
            target: Some(target),
            extras: None,
            new_task: false,
        }
    }

    /// Copy of this descriptor bound to `target`.
    pub fn bound_to(&self, target: Component) -> Self {
        Self {
            target: Some(target),
            ..self.clone()
        }
    }

    pub fn with_new_task(mut self) -> Self {
        self.new_task = true;
        self
    }

    pub fn is_bound(&self) -> bool {
        self.target.is_some()
    }

    /// URI scheme of `data`, without the trailing colon.
    pub fn scheme(&self) -> Option<&str> {
        self.data.as_deref()?.split_once(':').map(|(s, _)| s)
    }
}

/// A selection surface over several descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChooserRequest {
    pub title: String,
    /// Default target of the surface.
    pub primary: ActionDescriptor,
    /// Alternatives appended to the surface, in input order.
    pub initial_choices: Vec<ActionDescriptor>,
    pub new_task: bool,
}

impl ChooserRequest {
    /// Primary first, then the alternatives.
    pub fn entries(&self) -> impl Iterator<Item = &ActionDescriptor> {
        std::iter::once(&self.primary).chain(self.initial_choices.iter())
    }

    pub fn choice_count(&self) -> usize {
        1 + self.initial_choices.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaunchRequest {
    Chooser(ChooserRequest),
    Direct(ActionDescriptor),
}
