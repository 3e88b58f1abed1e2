mod api;
mod cli;
mod config;
mod logging;
mod search;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use dotenvy::dotenv;
use tracing::info;

use crate::api::{DriveApi, DriveClient};
use crate::config::AppConfig;
use crate::tui::TuiApp;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "dsearch",
    version,
    about = "Search a cloud drive index site from the terminal"
)]
pub struct Cli {
    /// Base URL of the index site
    #[arg(long)]
    site_url: Option<String>,

    /// Published base directory of the drive ("/" for the whole drive)
    #[arg(long)]
    base_directory: Option<String>,

    /// Quiet period before a search is sent, in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Run one search, print the results and exit
    #[arg(long, short)]
    query: Option<String>,

    /// Use plain CLI mode (disable TUI)
    #[arg(long, action = ArgAction::SetTrue)]
    no_tui: bool,

    /// Log level (error,warn,info,debug,trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Log file used while the TUI is running
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Color theme (dark, light)
    #[arg(long)]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    let cfg = AppConfig::from_cli(cli)?;

    if cfg.no_tui {
        logging::init_stderr_logging(&cfg.log_level)?;
    } else {
        logging::init_file_logging(&cfg.log_level, &cfg.log_file)?;
    }
    info!(?cfg, "app config");

    let client = DriveClient::new(cfg.site_url.clone())
        .context("build http client")?
        .with_http_config(cfg.http.clone());
    let api: Arc<dyn DriveApi> = Arc::new(client);

    if cfg.no_tui {
        run_cli(api, &cfg).await
    } else {
        run_tui(api, &cfg)
    }
}

async fn run_cli(api: Arc<dyn DriveApi>, cfg: &AppConfig) -> Result<()> {
    let query = cfg.query.clone().unwrap_or_default();
    let lines = cli::search_once(api, &query, &cfg.site_url, &cfg.base_directory)
        .await
        .with_context(|| format!("search for {query:?}"))?;
    if lines.is_empty() && !query.is_empty() {
        eprintln!("No results");
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn run_tui(api: Arc<dyn DriveApi>, cfg: &AppConfig) -> Result<()> {
    let mut app = TuiApp::new(format!("dsearch - {}", cfg.site_url), api, cfg);
    app.run()?;
    // Picked links go to stdout once the terminal is restored.
    for url in &app.navigated {
        println!("{url}");
    }
    Ok(())
}
