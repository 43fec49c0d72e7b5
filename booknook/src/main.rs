// Book Nook - cozy personal book tracker
// Entry point and application setup

use booknook::app::{data_dir_from_env, AppState};
use booknook::commands::{self, Cli};
use clap::Parser;
use std::io::Write;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "booknook=debug,info"
    } else {
        "booknook=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Book Nook");

    let data_dir = cli.data_dir.unwrap_or_else(data_dir_from_env);
    let state = AppState::initialize(data_dir).await?;

    let mut stdout = std::io::stdout().lock();
    let report = commands::run(&state, cli.command, &mut stdout).await;

    match report {
        Ok(Some(toast)) => writeln!(stdout, "{}", toast)?,
        Ok(None) => {}
        Err(toast) => {
            stdout.flush()?;
            eprintln!("{}", toast);
            std::process::exit(1);
        }
    }

    Ok(())
}
