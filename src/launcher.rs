use anyhow::{Result, anyhow, bail};
use log::info;
use std::process::{Command, Stdio};
use std::sync::Mutex;
use url::Url;

use crate::domain::intent::{Action, ActionDescriptor, EmailExtras, LaunchRequest, MAILTO};

/// Hands a built request to whatever actually starts applications.
pub trait Launcher: Send + Sync {
    fn start(&self, request: &LaunchRequest) -> Result<()>;
}

/// Full `mailto:` URI for a descriptor (RFC 6068): recipients in the path, the rest as query fields.
pub fn mailto_uri(extras: Option<&EmailExtras>) -> Result<Url> {
    let Some(x) = extras else {
        return Ok(Url::parse(MAILTO)?);
    };

    let mut uri = Url::parse(&format!("{MAILTO}{}", encode_addresses(&x.to)))?;
    let mut fields = Vec::new();
    if !x.cc.is_empty() {
        fields.push(format!("cc={}", encode_addresses(&x.cc)));
    }
    if !x.bcc.is_empty() {
        fields.push(format!("bcc={}", encode_addresses(&x.bcc)));
    }
    if !x.subject.is_empty() {
        fields.push(format!("subject={}", encode(&x.subject)));
    }
    if !x.body.is_empty() {
        fields.push(format!("body={}", encode(&x.body)));
    }
    if !fields.is_empty() {
        uri.set_query(Some(&fields.join("&")));
    }
    Ok(uri)
}

fn encode(s: &str) -> String {
    // mail clients read '+' literally; a real '+' is already %2B here
    url::form_urlencoded::byte_serialize(s.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Each address escaped on its own (`?`, `#`, `,` ... are legal in local parts), joined by `,`.
fn encode_addresses(addrs: &[String]) -> String {
    addrs
        .iter()
        .map(|a| encode(a).replace("%40", "@"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split an `Exec` line into argv, expanding field codes.
///
/// `%u %U %f %F` become `uri`; an argument holding one is dropped when there is no `uri`.
/// Other codes are removed, and an argument left empty by that is dropped.
pub fn exec_argv(exec: &str, uri: Option<&str>) -> Result<Vec<String>> {
    let argv: Vec<String> = shell_words::split(exec)
        .map_err(|e| anyhow!("invalid Exec line {exec:?}: {e}"))?
        .iter()
        .filter_map(|arg| expand_field_codes(arg, uri))
        .collect();
    if argv.is_empty() {
        bail!("empty Exec line");
    }
    Ok(argv)
}

fn expand_field_codes(arg: &str, uri: Option<&str>) -> Option<String> {
    let mut out = String::with_capacity(arg.len());
    let mut chars = arg.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('u' | 'U' | 'f' | 'F') => out.push_str(uri?),
            _ => {}
        }
    }
    (!out.is_empty()).then_some(out)
}

/// Starts apps on a freedesktop-style desktop.
///
/// There is no native chooser surface here: the alternatives are logged and the
/// primary entry is started.
#[derive(Debug, Default)]
pub struct DesktopLauncher;

impl DesktopLauncher {
    pub fn new() -> Self {
        Self
    }

    fn start_descriptor(&self, d: &ActionDescriptor, new_task: bool) -> Result<()> {
        let uri = match d.action {
            Action::SendTo => Some(mailto_uri(d.extras.as_ref())?),
            Action::Main => None,
        };

        let Some(target) = &d.target else {
            let uri = uri.ok_or_else(|| anyhow!("unbound descriptor without data"))?;
            info!("handing {uri} to the default mail handler");
            open::that(uri.as_str())?;
            return Ok(());
        };

        let exec = target
            .entry_point
            .as_deref()
            .ok_or_else(|| anyhow!("{} has no entry point", target.package))?;
        let argv = exec_argv(exec, uri.as_ref().map(Url::as_str))?;
        info!("starting {} via {:?}", target.package, argv);

        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]);
        if new_task {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
            // own process group: Ctrl-C in the caller's terminal does not reach it
            #[cfg(unix)]
            std::os::unix::process::CommandExt::process_group(&mut cmd, 0);
        }
        // not waited on: the started app outlives this call
        cmd.spawn()
            .map_err(|e| anyhow!("failed to start {}: {e}", target.package))?;
        Ok(())
    }
}

impl Launcher for DesktopLauncher {
    fn start(&self, request: &LaunchRequest) -> Result<()> {
        match request {
            LaunchRequest::Direct(d) => self.start_descriptor(d, d.new_task),
            LaunchRequest::Chooser(c) => {
                let names: Vec<_> = c
                    .entries()
                    .filter_map(|d| d.target.as_ref().map(|t| t.package.as_str()))
                    .collect();
                info!("{}: {}", c.title, names.join(", "));
                self.start_descriptor(&c.primary, c.new_task || c.primary.new_task)
            }
        }
    }
}

/// Records requests and prints them as JSON instead of starting anything.
#[derive(Debug, Default)]
pub struct DryRunLauncher {
    quiet: bool,
    started: Mutex<Vec<LaunchRequest>>,
}

impl DryRunLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record without printing.
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }

    pub fn started(&self) -> Vec<LaunchRequest> {
        self.started
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Launcher for DryRunLauncher {
    fn start(&self, request: &LaunchRequest) -> Result<()> {
        if !self.quiet {
            println!("{}", serde_json::to_string_pretty(request)?);
        }
        self.started
            .lock()
            .map_err(|_| anyhow!("dry-run log poisoned"))?
            .push(request.clone());
        Ok(())
    }
}
