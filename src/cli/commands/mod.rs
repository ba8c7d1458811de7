//! CLI parser and command dispatch.

mod classify;
mod config_cmd;
mod scrape;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use courtslots::config::Settings;

#[derive(Parser)]
#[command(name = "courtslots")]
#[command(about = "Scrape court slot availability from venue booking pages")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true, env = "COURTSLOTS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check for the verbose flag before the parser runs, so logging can be set up first.
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a venue's courts and print the result as JSON
    Scrape {
        /// Venue page URL
        url: String,

        /// Venue name recorded on every slot (defaults to the URL's host)
        #[arg(short, long)]
        name: Option<String>,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,

        /// Print the scrape events to stderr after the result
        #[arg(long)]
        events: bool,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Attach to a running browser's DevTools endpoint instead of launching one
        #[arg(long, env = "BROWSER_URL")]
        remote_url: Option<String>,
    },

    /// Classify one cell's text and attributes
    Classify {
        /// Visible cell text
        text: String,

        /// Cell class attribute
        #[arg(long, default_value = "")]
        classes: String,

        /// Cell inline style
        #[arg(long, default_value = "")]
        style: String,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn load_settings(path: Option<&std::path::Path>) -> anyhow::Result<Settings> {
    Settings::load(path).context("Failed to load configuration")
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            text,
            classes,
            style,
        } => classify::cmd_classify(&text, &classes, &style),
        Commands::Config => {
            let settings = load_settings(cli.config.as_deref())?;
            config_cmd::cmd_config_show(&settings, cli.config.as_deref())
        }
        Commands::Scrape {
            url,
            name,
            pretty,
            events,
            headed,
            remote_url,
        } => {
            let mut settings = load_settings(cli.config.as_deref())?;
            if headed {
                settings.browser.headless = false;
            }
            if remote_url.is_some() {
                settings.browser.remote_url = remote_url;
            }
            let options = scrape::ScrapeOptions { pretty, events };
            scrape::cmd_scrape(&settings, &url, name.as_deref(), options).await
        }
    }
}
