use anyhow::Result;
use log::{debug, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::app::Component;
use crate::domain::intent::{Action, ActionDescriptor};
use crate::registry::{AppRegistry, ResolvedActivity};

const DEFAULT_DATA_DIRS: &str = "/usr/local/share:/usr/share";

/// A parsed `[Desktop Entry]` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    pub id: String,
    pub name: String,
    pub exec: Option<String>,
    pub mime_types: Vec<String>,
    pub is_application: bool,
    pub hidden: bool,
    pub no_display: bool,
}

impl DesktopEntry {
    pub fn handles_scheme(&self, scheme: &str) -> bool {
        let wanted = format!("x-scheme-handler/{scheme}");
        self.mime_types.iter().any(|m| m.eq_ignore_ascii_case(&wanted))
    }

    fn usable(&self) -> bool {
        self.is_application && !self.hidden && self.exec.is_some()
    }
}

/// Parse the text of a `.desktop` file. Returns `None` without a `[Desktop Entry]` group or `Name`.
pub fn parse_desktop_entry(id: &str, text: &str) -> Option<DesktopEntry> {
    let mut in_main = false;
    let mut seen_main = false;
    let mut name = None;
    let mut exec = None;
    let mut mime_types = Vec::new();
    let mut kind = None;
    let mut hidden = false;
    let mut no_display = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            in_main = line == "[Desktop Entry]";
            seen_main |= in_main;
            continue;
        }
        if !in_main {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        // localized keys (Name[de]=...) are skipped
        match key.trim() {
            "Name" => name = Some(unescape(value)),
            "Exec" => exec = Some(value.to_string()),
            "Type" => kind = Some(value.to_string()),
            "MimeType" => {
                mime_types = value
                    .split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            "Hidden" => hidden = value == "true",
            "NoDisplay" => no_display = value == "true",
            _ => {}
        }
    }

    if !seen_main {
        return None;
    }
    Some(DesktopEntry {
        id: id.to_string(),
        name: name?,
        exec,
        mime_types,
        is_application: kind.as_deref().is_none_or(|k| k == "Application"),
        hidden,
        no_display,
    })
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// freedesktop.org application registry: `.desktop` files under the XDG data dirs.
#[derive(Debug, Clone)]
pub struct DesktopRegistry {
    dirs: Vec<PathBuf>,
}

impl DesktopRegistry {
    /// Scan exactly `dirs`, highest precedence first.
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// `extra` first, then `$XDG_DATA_HOME/applications` and `$XDG_DATA_DIRS/*/applications`.
    pub fn from_environment(extra: &[PathBuf], scan_system_dirs: bool) -> Self {
        let mut dirs = extra.to_vec();
        if scan_system_dirs {
            dirs.extend(xdg_application_dirs());
        }
        Self::new(dirs)
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Reads every directory again; the install state can change between calls.
    pub fn entries(&self) -> Result<Vec<DesktopEntry>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for dir in &self.dirs {
            for path in desktop_files(dir) {
                let Some(id) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if seen.contains(id) {
                    continue;
                }
                let text = match fs::read_to_string(&path) {
                    Ok(t) => t,
                    Err(e) => {
                        warn!("skipping unreadable desktop entry {}: {e}", path.display());
                        continue;
                    }
                };
                // only a parsed entry shadows lower-precedence dirs
                match parse_desktop_entry(id, &text) {
                    Some(entry) => {
                        seen.insert(id.to_string());
                        out.push(entry);
                    }
                    None => debug!("no [Desktop Entry] in {}", path.display()),
                }
            }
        }
        Ok(out)
    }
}

fn desktop_files(dir: &Path) -> Vec<PathBuf> {
    let rd = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            debug!("skipping application dir {}: {e}", dir.display());
            return vec![];
        }
    };
    let mut files: Vec<PathBuf> = rd
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|x| x == "desktop"))
        .collect();
    files.sort();
    files
}

fn xdg_application_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let data_home = std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(dirs::data_dir);
    if let Some(home) = data_home {
        dirs.push(home.join("applications"));
    }

    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_DIRS.to_string());
    dirs.extend(
        data_dirs
            .split(':')
            .filter(|s| !s.is_empty())
            .map(|s| Path::new(s).join("applications")),
    );
    dirs
}

impl AppRegistry for DesktopRegistry {
    fn query_activities(&self, descriptor: &ActionDescriptor) -> Result<Vec<ResolvedActivity>> {
        if descriptor.action != Action::SendTo {
            return Ok(vec![]);
        }
        let Some(scheme) = descriptor.scheme() else {
            return Ok(vec![]);
        };

        Ok(self
            .entries()?
            .into_iter()
            .filter(|e| e.usable() && e.handles_scheme(scheme))
            .filter(|e| match &descriptor.target {
                Some(t) => t.package == e.id,
                None => true,
            })
            .filter_map(|e| {
                Some(ResolvedActivity {
                    label: e.name,
                    package: e.id,
                    entry_point: e.exec?,
                })
            })
            .collect())
    }

    fn launch_component(&self, package: &str) -> Result<Option<Component>> {
        Ok(self.launch_components(&[package])?.pop().flatten())
    }

    fn launch_components(&self, packages: &[&str]) -> Result<Vec<Option<Component>>> {
        let entries = self.entries()?;
        Ok(packages
            .iter()
            .map(|p| {
                entries
                    .iter()
                    .find(|e| e.id == *p && e.usable() && !e.no_display)
                    .map(|e| Component {
                        package: e.id.clone(),
                        entry_point: e.exec.clone(),
                    })
            })
            .collect())
    }
}
