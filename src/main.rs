//! ClinSight: clinical sign-up, profile and diagnostic-support terminal app.
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clinsight::adapters::sanitize::SanitizingMakeWriter;
use clinsight::config::{AppConfig, LogMode};
use clinsight::tui::App;

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Writing logs to the terminal would corrupt the TUI (alternate screen),
    // so an interactive session logs to a file.
    let use_file = match config.log_mode {
        LogMode::File => true,
        LogMode::Stdout => false,
        LogMode::Auto => std::io::stdout().is_terminal(),
    };

    let (writer, _guard) = if use_file {
        tracing_appender::non_blocking(config.open_log_file()?)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!(db = %config.db_path.display(), "Starting ClinSight...");

    let mut app = App::new(&config)?;
    app.run()?;

    tracing::info!("ClinSight shutdown complete.");
    Ok(())
}
