mod page;
mod runner;
mod script;
mod settings;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use interaction_core::{Dispatcher, PreferenceStore, SingleFlightGuard};
use storage::SqlitePreferenceStore;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use crate::{
    page::build_demo_page,
    runner::{print_events, FixedAnswer, Shell},
    settings::load_settings,
};

/// Replays an interaction script against the exam-administration page.
#[derive(Parser, Debug)]
struct Cli {
    /// Settings file; `admin_shell.toml` in the working directory when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    database_url: Option<String>,
    /// Script to replay; read from stdin when omitted.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Emit step reports and notifications as JSON lines.
    #[arg(long)]
    json: bool,
    /// Answer "no" to every delete confirmation.
    #[arg(long)]
    decline_deletes: bool,
    #[arg(long)]
    speedup: Option<u32>,
    /// Run with no operation provider; every action reports a failure.
    #[arg(long)]
    offline: bool,
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(database_url) = cli.database_url {
        settings.database_url = database_url;
    }
    if let Some(speedup) = cli.speedup {
        settings.speedup = speedup;
    }
    if cli.offline {
        settings.offline = true;
    }

    let source = match &cli.script {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read script '{}'", path.display()))?,
        None => {
            let mut source = String::new();
            tokio::io::stdin().read_to_string(&mut source).await?;
            source
        }
    };
    let steps = script::parse(&source)?;

    let preferences = SqlitePreferenceStore::new(&settings.database_url).await?;
    let preferences = PreferenceStore::new(Arc::new(preferences));

    let dispatcher = Dispatcher::with_collaborators(
        build_demo_page()?,
        settings.backend(),
        Arc::new(SingleFlightGuard::new()),
        Arc::new(FixedAnswer(!cli.decline_deletes)),
        settings.interaction_config(),
    );
    let printer = tokio::spawn(print_events(
        dispatcher.notifications().subscribe(),
        cli.json,
    ));
    tracing::info!(steps = steps.len(), database_url = %settings.database_url, "replaying script");

    let shell = Shell::new(dispatcher, preferences, cli.json);
    let reports = shell.run(&steps, &mut std::io::stdout()).await?;
    drop(shell);

    if tokio::time::timeout(Duration::from_secs(1), printer).await.is_err() {
        tracing::warn!("notification printer did not drain");
    }
    tracing::info!(steps = reports.len(), "script finished");
    Ok(())
}
