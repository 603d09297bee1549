use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::registry::desktop::DesktopRegistry;
use crate::registry::{ChainRegistry, MemoryRegistry};

const TEMPLATE: &str = r#"# mail_launcher configuration

# Caption of the chooser opened by `open` (default "Choose Mail App")
# picker_title = "Choose Mail App"

# Caption of the chooser opened by `compose` (default "Compose Email")
# compose_picker_title = "Compose Email"

# Scan $XDG_DATA_HOME and $XDG_DATA_DIRS for .desktop mail handlers
scan_system_dirs = true

# Extra directories with .desktop files, searched before the system ones
application_dirs = []

# Handlers that have no .desktop file. Exec follows the desktop-entry rules (%u = mailto: URI)
# [[handlers]]
# name = "Webmail"
# id = "webmail"
# exec = "firefox --new-window %u"
"#;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub picker_title: Option<String>,
    pub compose_picker_title: Option<String>,
    #[serde(default = "default_true")]
    pub scan_system_dirs: bool,
    #[serde(default)]
    pub application_dirs: Vec<String>,
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

/// A statically declared mail handler.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HandlerConfig {
    pub name: String,
    pub id: String,
    pub exec: String,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            picker_title: None,
            compose_picker_title: None,
            scan_system_dirs: true,
            application_dirs: vec![],
            handlers: vec![],
        }
    }
}

impl Config {
    /// Desktop entries first, then declared handlers.
    pub fn registry(&self) -> ChainRegistry {
        let extra: Vec<PathBuf> = self.application_dirs.iter().map(PathBuf::from).collect();
        let declared = self
            .handlers
            .iter()
            .fold(MemoryRegistry::new(), |reg, h| {
                reg.with_mail_handler(&h.name, &h.id, &h.exec)
            });

        let chain = ChainRegistry::new()
            .push(DesktopRegistry::from_environment(&extra, self.scan_system_dirs));
        if declared.is_empty() {
            chain
        } else {
            chain.push(declared)
        }
    }
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("mail_launcher"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

/// Load the default config file, writing a template on first use.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, TEMPLATE)?;
        info!("created template config at {}", path.display());
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&s)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?;
    Ok(cfg)
}
