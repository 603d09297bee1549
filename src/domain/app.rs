use serde::{Deserialize, Serialize};

/// One registered handler capable of sending email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailApp {
    pub display_name: String,
    pub package_identifier: String,
    /// Component inside the package that handles `mailto:` (activity name, `Exec` line, ...)
    pub entry_point: String,
}

impl MailApp {
    pub fn component(&self) -> Component {
        Component {
            package: self.package_identifier.clone(),
            entry_point: Some(self.entry_point.clone()),
        }
    }
}

/// Explicit target of a descriptor. `entry_point: None` means "the package's default component".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub package: String,
    pub entry_point: Option<String>,
}

/// Listing record returned by `getMainApps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
}

impl From<&MailApp> for AppInfo {
    fn from(app: &MailApp) -> Self {
        Self {
            name: app.display_name.clone(),
        }
    }
}
