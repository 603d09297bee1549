use anyhow::Result;
use log::debug;

use crate::domain::app::MailApp;
use crate::domain::intent::ActionDescriptor;
use crate::registry::AppRegistry;

/// Every app registered for `mailto:` sends, in registry order.
///
/// Queried fresh on each call; no filtering, deduplication or sorting.
pub fn discover(registry: &dyn AppRegistry) -> Result<Vec<MailApp>> {
    discover_for(registry, &ActionDescriptor::send_to_mail())
}

/// Like [`discover`], for an arbitrary `mailto:` descriptor (e.g. one carrying content).
pub fn discover_for(registry: &dyn AppRegistry, descriptor: &ActionDescriptor) -> Result<Vec<MailApp>> {
    let apps: Vec<MailApp> = registry
        .query_activities(descriptor)?
        .into_iter()
        .map(|a| MailApp {
            display_name: a.label,
            package_identifier: a.package,
            entry_point: a.entry_point,
        })
        .collect();
    debug!("discovered {} mail app(s)", apps.len());
    Ok(apps)
}

/// First app whose display name equals `name` exactly.
pub fn resolve_by_name<'a>(name: &str, apps: &'a [MailApp]) -> Option<&'a MailApp> {
    apps.iter().find(|a| a.display_name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryRegistry;

    fn apps() -> Vec<MailApp> {
        let reg = MemoryRegistry::new()
            .with_mail_handler("Gmail", "com.google.gmail", "first")
            .with_mail_handler("Outlook", "com.microsoft.outlook", "outlook")
            .with_mail_handler("Gmail", "com.google.gmail.lite", "second");
        discover(&reg).unwrap()
    }

    #[test]
    fn empty_registry_discovers_nothing() {
        assert!(discover(&MemoryRegistry::new()).unwrap().is_empty());
    }

    #[test]
    fn keeps_registry_order_and_duplicates() {
        let names: Vec<_> = apps().into_iter().map(|a| a.display_name).collect();
        assert_eq!(names, ["Gmail", "Outlook", "Gmail"]);
    }

    #[test]
    fn duplicate_labels_resolve_to_first() {
        let apps = apps();
        let hit = resolve_by_name("Gmail", &apps).unwrap();
        assert_eq!(hit.package_identifier, "com.google.gmail");
        assert_eq!(hit.entry_point, "first");
    }

    #[test]
    fn exact_case_sensitive_match_only() {
        let apps = apps();
        assert!(resolve_by_name("gmail", &apps).is_none());
        assert!(resolve_by_name("Gmail ", &apps).is_none());
        assert!(resolve_by_name("Out", &apps).is_none());
        assert!(resolve_by_name("Outlook", &apps).is_some());
    }
}
