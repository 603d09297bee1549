use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use mail_launcher::channel::{MethodCall, handle_call};
use mail_launcher::config::{load_config, load_config_from};
use mail_launcher::domain::email::EmailContent;
use mail_launcher::launcher::{DesktopLauncher, DryRunLauncher, Launcher};
use mail_launcher::service::MailApps;

#[derive(Parser)]
#[command(name = "mail_launcher")]
#[command(about = "Open or compose email in the installed mail apps", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/mail_launcher/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print launch requests instead of starting apps
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Choose among all mail apps
    Open {
        #[arg(long)]
        title: Option<String>,
    },

    /// Open the mail app with this exact name
    OpenApp { name: String },

    /// Compose a new email, in a chooser or in one app
    Compose {
        /// Chooser caption (ignored with --app)
        #[arg(long)]
        title: Option<String>,

        /// Exact name of the app to compose in
        #[arg(long)]
        app: Option<String>,

        #[arg(long)]
        to: Vec<String>,

        #[arg(long)]
        cc: Vec<String>,

        #[arg(long)]
        bcc: Vec<String>,

        #[arg(long, default_value = "")]
        subject: String,

        #[arg(long, default_value = "")]
        body: String,
    },

    /// List mail app names as JSON
    Apps,

    /// Read a method call ({"method": ..., "arguments": {...}}) from stdin
    Call,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(p) => load_config_from(p),
        None => load_config(),
    }
    .map_err(|e| anyhow!("Configuration error: {e}"))?;

    let registry = cfg.registry();
    let launcher: Box<dyn Launcher> = if cli.dry_run {
        Box::new(DryRunLauncher::new())
    } else {
        Box::new(DesktopLauncher::new())
    };
    let apps = MailApps::new(&registry, launcher.as_ref())
        .with_titles(cfg.picker_title.clone(), cfg.compose_picker_title.clone());

    let ok = match cli.cmd {
        Command::Open { title } => apps.open_mail_app(title.as_deref()),

        Command::OpenApp { name } => apps.open_specific_mail_app(&name),

        Command::Compose {
            title,
            app,
            to,
            cc,
            bcc,
            subject,
            body,
        } => {
            let content = EmailContent {
                to,
                cc,
                bcc,
                subject,
                body,
            };
            match app {
                Some(name) => apps.compose_new_email_in_specific_mail_app(&name, &content),
                None => apps.compose_new_email_in_mail_app(title.as_deref(), &content),
            }
        }

        Command::Apps => {
            println!("{}", apps.get_main_apps());
            true
        }

        Command::Call => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            let call: MethodCall = serde_json::from_str(&input)?;
            println!("{}", serde_json::to_string(&handle_call(&apps, &call))?);
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
