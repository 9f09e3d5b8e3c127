use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::time::Duration;

use gmail_assist::config::{Config, Flow, load_config, resolve_socket_path};
use gmail_assist::host::{HostConfig, run_host};
use gmail_assist::inject::Locator;
use gmail_assist::popup::run_popup;
use gmail_assist::store::HttpStore;
use gmail_assist::tab::bridge::SocketTabHost;

#[derive(Parser)]
#[command(name = "gmail_assist")]
#[command(about = "Gmail templates and contacts (popup + tab host)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the popup (default)
    Popup {
        /// Override the configured flow
        #[arg(long, value_parser = parse_flow)]
        flow: Option<Flow>,
    },

    /// Host a Gmail tab for the popup to inject into
    Host {
        #[arg(long, default_value = "https://mail.google.com/mail/u/0/#inbox")]
        url: String,

        /// Milliseconds before the compose window's Send button appears
        #[arg(long, default_value_t = 300)]
        compose_delay_ms: u64,

        /// Start without a compose window
        #[arg(long)]
        no_compose: bool,
    },
}

fn parse_flow(s: &str) -> std::result::Result<Flow, String> {
    match s {
        "wizard" => Ok(Flow::Wizard),
        "template-only" | "template_only" => Ok(Flow::TemplateOnly),
        other => Err(format!("unknown flow '{other}' (wizard, template-only)")),
    }
}

fn config() -> Result<Config> {
    load_config().map_err(|e| anyhow!("Configuration error: {e}"))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.cmd.unwrap_or(Command::Popup { flow: None }) {
        Command::Popup { flow } => {
            let mut cfg = config()?;
            if let Some(flow) = flow {
                cfg.flow = flow;
            }
            let store = HttpStore::new(&cfg.api_base_url, cfg.request_timeout())?;
            let host = SocketTabHost::new(resolve_socket_path(&cfg)?);
            run_popup(&cfg, &store, &host).map_err(|e| anyhow!("{e}"))
        }

        Command::Host {
            url,
            compose_delay_ms,
            no_compose,
        } => {
            let cfg = config()?;
            run_host(HostConfig {
                url,
                socket: resolve_socket_path(&cfg)?,
                locator: Locator::new(cfg.locator_attempts, cfg.locator_interval()),
                compose: !no_compose,
                compose_delay: Duration::from_millis(compose_delay_ms),
            })
        }
    }
}
