use log::{error, info, warn};

use crate::chooser::build_chooser;
use crate::composer::{compose_launch, compose_with_content};
use crate::domain::app::{AppInfo, MailApp};
use crate::domain::email::EmailContent;
use crate::domain::intent::LaunchRequest;
use crate::error::{MailAppError, Result};
use crate::launcher::Launcher;
use crate::registry::AppRegistry;
use crate::resolver::{discover, discover_for, resolve_by_name};

pub const DEFAULT_PICKER_TITLE: &str = "Choose Mail App";
pub const DEFAULT_COMPOSE_TITLE: &str = "Compose Email";

/// The five mail-app operations. Every failure is reported as `false`.
pub struct MailApps<'a> {
    registry: &'a dyn AppRegistry,
    launcher: &'a dyn Launcher,
    picker_title: String,
    compose_title: String,
}

impl<'a> MailApps<'a> {
    pub fn new(registry: &'a dyn AppRegistry, launcher: &'a dyn Launcher) -> Self {
        Self {
            registry,
            launcher,
            picker_title: DEFAULT_PICKER_TITLE.to_string(),
            compose_title: DEFAULT_COMPOSE_TITLE.to_string(),
        }
    }

    /// Override the captions used when the caller gives none.
    pub fn with_titles(mut self, picker: Option<String>, compose: Option<String>) -> Self {
        if let Some(t) = picker {
            self.picker_title = t;
        }
        if let Some(t) = compose {
            self.compose_title = t;
        }
        self
    }

    /// Chooser over the main screens of every mail app.
    pub fn open_mail_app(&self, title: Option<&str>) -> bool {
        let title = title.unwrap_or(&self.picker_title);
        report("openMailApp", self.try_open_mail_app(title))
    }

    /// Main screen of the first app labelled `name`.
    pub fn open_specific_mail_app(&self, name: &str) -> bool {
        report("openSpecificMailApp", self.try_open_specific(name))
    }

    /// Chooser over every mail app, each bound to a compose request carrying `content`.
    pub fn compose_new_email_in_mail_app(&self, title: Option<&str>, content: &EmailContent) -> bool {
        let title = title.unwrap_or(&self.compose_title);
        report("composeNewEmailInMailApp", self.try_compose(title, content))
    }

    /// Compose request carrying `content`, sent straight to the first app labelled `name`.
    pub fn compose_new_email_in_specific_mail_app(&self, name: &str, content: &EmailContent) -> bool {
        report(
            "composeNewEmailInSpecificMailApp",
            self.try_compose_specific(name, content),
        )
    }

    /// `[{"name": ...}]` for every discovered app, as a JSON string.
    pub fn get_main_apps(&self) -> String {
        let apps: Vec<AppInfo> = match discover(self.registry) {
            Ok(apps) => apps.iter().map(AppInfo::from).collect(),
            Err(e) => {
                error!("getMainApps: {}", MailAppError::Registry(e));
                vec![]
            }
        };
        serde_json::to_string(&apps).unwrap_or_else(|_| "[]".to_string())
    }

    fn discover(&self) -> Result<Vec<MailApp>> {
        discover(self.registry).map_err(MailAppError::Registry)
    }

    fn launch(&self, request: LaunchRequest) -> Result<()> {
        self.launcher.start(&request).map_err(MailAppError::Launch)
    }

    fn try_open_mail_app(&self, title: &str) -> Result<()> {
        let apps = self.discover()?;
        let packages: Vec<&str> = apps.iter().map(|a| a.package_identifier.as_str()).collect();
        let components = self
            .registry
            .launch_components(&packages)
            .map_err(MailAppError::Registry)?;

        let mut descriptors = Vec::new();
        for (app, component) in apps.iter().zip(components) {
            match component {
                Some(component) => descriptors.push(compose_launch(component)),
                None => info!("{} has no main screen, leaving it out", app.display_name),
            }
        }
        let chooser = build_chooser(descriptors, title)?;
        self.launch(LaunchRequest::Chooser(chooser))
    }

    fn try_open_specific(&self, name: &str) -> Result<()> {
        let apps = self.discover()?;
        let app = resolve_by_name(name, &apps)
            .ok_or_else(|| MailAppError::NoHandlerFound(format!("no app labelled {name:?}")))?;
        let component = self
            .registry
            .launch_component(&app.package_identifier)
            .map_err(MailAppError::Registry)?
            .ok_or_else(|| {
                MailAppError::NoHandlerFound(format!("{name:?} has no main screen"))
            })?;
        self.launch(LaunchRequest::Direct(compose_launch(component).with_new_task()))
    }

    fn try_compose(&self, title: &str, content: &EmailContent) -> Result<()> {
        let unbound = compose_with_content(None, content);
        let apps = discover_for(self.registry, &unbound).map_err(MailAppError::Registry)?;
        let descriptors = apps
            .iter()
            .map(|app| compose_with_content(Some(app), content))
            .collect();
        let chooser = build_chooser(descriptors, title)?;
        self.launch(LaunchRequest::Chooser(chooser))
    }

    fn try_compose_specific(&self, name: &str, content: &EmailContent) -> Result<()> {
        let apps = self.discover()?;
        let app = resolve_by_name(name, &apps)
            .ok_or_else(|| MailAppError::NoHandlerFound(format!("no app labelled {name:?}")))?;
        let d = compose_with_content(Some(app), content).with_new_task();
        self.launch(LaunchRequest::Direct(d))
    }
}

fn report(op: &str, outcome: Result<()>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(e @ (MailAppError::Registry(_) | MailAppError::Launch(_))) => {
            error!("{op}: {e}");
            false
        }
        Err(e) => {
            warn!("{op}: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::app::Component;
    use crate::domain::intent::{Action, ActionDescriptor};
    use crate::launcher::DryRunLauncher;
    use crate::registry::{MemoryRegistry, ResolvedActivity};
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct BrokenRegistry;

    impl AppRegistry for BrokenRegistry {
        fn query_activities(&self, _: &ActionDescriptor) -> anyhow::Result<Vec<ResolvedActivity>> {
            Err(anyhow!("registry unavailable"))
        }
        fn launch_component(&self, _: &str) -> anyhow::Result<Option<Component>> {
            Err(anyhow!("registry unavailable"))
        }
    }

    struct FailingLauncher;

    impl Launcher for FailingLauncher {
        fn start(&self, _: &LaunchRequest) -> anyhow::Result<()> {
            Err(anyhow!("no display"))
        }
    }

    #[test]
    fn registry_failure_is_false_not_a_panic() {
        let l = DryRunLauncher::quiet();
        let svc = MailApps::new(&BrokenRegistry, &l);
        assert!(!svc.open_mail_app(None));
        assert!(!svc.open_specific_mail_app("Gmail"));
        assert_eq!(svc.get_main_apps(), "[]");
        assert!(l.started().is_empty());
    }

    #[test]
    fn launch_failure_is_false() {
        let reg = MemoryRegistry::new().with_mail_handler("Mail", "mail", "mail %u");
        let svc = MailApps::new(&reg, &FailingLauncher);
        assert!(!svc.open_mail_app(None));
        assert!(!svc.compose_new_email_in_specific_mail_app("Mail", &EmailContent::default()));
    }

    #[test]
    fn configured_titles_apply_when_caller_gives_none() {
        let reg = MemoryRegistry::new().with_mail_handler("Mail", "mail", "mail %u");
        let l = DryRunLauncher::quiet();
        let svc = MailApps::new(&reg, &l).with_titles(Some("Pick".into()), None);
        assert!(svc.open_mail_app(None));
        assert!(svc.compose_new_email_in_mail_app(None, &EmailContent::default()));
        assert!(svc.open_mail_app(Some("Explicit")));

        let titles: Vec<_> = l
            .started()
            .into_iter()
            .map(|r| match r {
                LaunchRequest::Chooser(c) => c.title,
                LaunchRequest::Direct(_) => panic!("expected a chooser"),
            })
            .collect();
        assert_eq!(titles, ["Pick", DEFAULT_COMPOSE_TITLE, "Explicit"]);
    }

    #[test]
    fn apps_without_main_screen_are_left_out_of_open() {
        let reg = MemoryRegistry::new()
            .with_headless_handler("Relay", "relay", "relay %u")
            .with_mail_handler("Mail", "mail", "mail %u");
        let l = DryRunLauncher::quiet();
        assert!(MailApps::new(&reg, &l).open_mail_app(None));

        let started = l.started();
        let LaunchRequest::Chooser(c) = &started[0] else {
            panic!("expected a chooser");
        };
        assert_eq!(c.choice_count(), 1);
        assert_eq!(c.primary.action, Action::Main);
        assert_eq!(c.primary.target.as_ref().unwrap().package, "mail");
    }

    /// Counts lookups; `launch_component` must not be hit per app.
    struct CountingRegistry {
        inner: MemoryRegistry,
        single: AtomicUsize,
        batch: AtomicUsize,
    }

    impl AppRegistry for CountingRegistry {
        fn query_activities(&self, d: &ActionDescriptor) -> anyhow::Result<Vec<ResolvedActivity>> {
            self.inner.query_activities(d)
        }
        fn launch_component(&self, package: &str) -> anyhow::Result<Option<Component>> {
            self.single.fetch_add(1, Ordering::SeqCst);
            self.inner.launch_component(package)
        }
        fn launch_components(&self, packages: &[&str]) -> anyhow::Result<Vec<Option<Component>>> {
            self.batch.fetch_add(1, Ordering::SeqCst);
            packages.iter().map(|p| self.inner.launch_component(p)).collect()
        }
    }

    #[test]
    fn open_looks_up_all_main_screens_in_one_batch() {
        let reg = CountingRegistry {
            inner: MemoryRegistry::new()
                .with_mail_handler("A", "a", "a %u")
                .with_headless_handler("B", "b", "b %u")
                .with_mail_handler("C", "c", "c %u"),
            single: AtomicUsize::new(0),
            batch: AtomicUsize::new(0),
        };
        let l = DryRunLauncher::quiet();
        assert!(MailApps::new(&reg, &l).open_mail_app(None));
        assert_eq!(reg.batch.load(Ordering::SeqCst), 1);
        assert_eq!(reg.single.load(Ordering::SeqCst), 0);

        let started = l.started();
        let LaunchRequest::Chooser(c) = &started[0] else {
            panic!("expected a chooser");
        };
        let packages: Vec<_> = c
            .entries()
            .map(|d| d.target.as_ref().unwrap().package.as_str())
            .collect();
        assert_eq!(packages, ["a", "c"]);
    }

    #[test]
    fn only_headless_apps_means_false() {
        let reg = MemoryRegistry::new().with_headless_handler("Relay", "relay", "relay %u");
        let l = DryRunLauncher::quiet();
        let svc = MailApps::new(&reg, &l);
        assert!(!svc.open_mail_app(None));
        assert!(!svc.open_specific_mail_app("Relay"));
        assert!(l.started().is_empty());
    }
}
