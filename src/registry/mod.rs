pub mod desktop;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::app::Component;
use crate::domain::intent::{Action, ActionDescriptor};

/// One registry entry able to handle a queried descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedActivity {
    pub label: String,
    pub package: String,
    pub entry_point: String,
}

/// The installed-application registry. Implementations read live state on every call.
pub trait AppRegistry: Send + Sync {
    /// Every handler registered for `descriptor`, in registry order.
    fn query_activities(&self, descriptor: &ActionDescriptor) -> Result<Vec<ResolvedActivity>>;

    /// Component that opens the main screen of `package`, if it has one.
    fn launch_component(&self, package: &str) -> Result<Option<Component>>;

    /// [`launch_component`](Self::launch_component) for several packages, same order.
    /// Registries that rescan on every call override this to scan once.
    fn launch_components(&self, packages: &[&str]) -> Result<Vec<Option<Component>>> {
        packages.iter().map(|p| self.launch_component(p)).collect()
    }
}

/// A fixed set of handlers. Backs config-declared handlers.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    entries: Vec<MemoryEntry>,
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    activity: ResolvedActivity,
    schemes: Vec<String>,
    launchable: bool,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a `mailto:` handler that can also be launched on its own.
    pub fn with_mail_handler(
        mut self,
        label: impl Into<String>,
        package: impl Into<String>,
        entry_point: impl Into<String>,
    ) -> Self {
        self.push(label, package, entry_point, true);
        self
    }

    /// Registers a `mailto:` handler that has no main screen.
    pub fn with_headless_handler(
        mut self,
        label: impl Into<String>,
        package: impl Into<String>,
        entry_point: impl Into<String>,
    ) -> Self {
        self.push(label, package, entry_point, false);
        self
    }

    fn push(
        &mut self,
        label: impl Into<String>,
        package: impl Into<String>,
        entry_point: impl Into<String>,
        launchable: bool,
    ) {
        self.entries.push(MemoryEntry {
            activity: ResolvedActivity {
                label: label.into(),
                package: package.into(),
                entry_point: entry_point.into(),
            },
            schemes: vec!["mailto".to_string()],
            launchable,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AppRegistry for MemoryRegistry {
    fn query_activities(&self, descriptor: &ActionDescriptor) -> Result<Vec<ResolvedActivity>> {
        if descriptor.action != Action::SendTo {
            return Ok(vec![]);
        }
        let Some(scheme) = descriptor.scheme() else {
            return Ok(vec![]);
        };
        Ok(self
            .entries
            .iter()
            .filter(|e| e.schemes.iter().any(|s| s == scheme))
            .filter(|e| match &descriptor.target {
                Some(t) => t.package == e.activity.package,
                None => true,
            })
            .map(|e| e.activity.clone())
            .collect())
    }

    fn launch_component(&self, package: &str) -> Result<Option<Component>> {
        Ok(self
            .entries
            .iter()
            .find(|e| e.launchable && e.activity.package == package)
            .map(|e| Component {
                package: e.activity.package.clone(),
                entry_point: Some(e.activity.entry_point.clone()),
            }))
    }
}

/// Several registries queried in order, results concatenated.
#[derive(Default)]
pub struct ChainRegistry {
    inner: Vec<Box<dyn AppRegistry>>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, registry: impl AppRegistry + 'static) -> Self {
        self.inner.push(Box::new(registry));
        self
    }
}

impl AppRegistry for ChainRegistry {
    fn query_activities(&self, descriptor: &ActionDescriptor) -> Result<Vec<ResolvedActivity>> {
        let mut out = Vec::new();
        for r in &self.inner {
            out.append(&mut r.query_activities(descriptor)?);
        }
        Ok(out)
    }

    fn launch_component(&self, package: &str) -> Result<Option<Component>> {
        for r in &self.inner {
            if let Some(c) = r.launch_component(package)? {
                return Ok(Some(c));
            }
        }
        Ok(None)
    }

    fn launch_components(&self, packages: &[&str]) -> Result<Vec<Option<Component>>> {
        let mut out: Vec<Option<Component>> = vec![None; packages.len()];
        for r in &self.inner {
            let (idx, missing): (Vec<usize>, Vec<&str>) = out
                .iter()
                .zip(packages)
                .enumerate()
                .filter(|(_, (found, _))| found.is_none())
                .map(|(i, (_, p))| (i, *p))
                .unzip();
            if missing.is_empty() {
                break;
            }
            for (i, c) in idx.into_iter().zip(r.launch_components(&missing)?) {
                out[i] = c;
            }
        }
        Ok(out)
    }
}
