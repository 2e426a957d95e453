mod cli;
mod context;
mod handlers;
mod output;

use clap::Parser;
use cli::Cli;
use context::CliContext;
use tasks_core::AppConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = AppConfig::load();

    if let Err(e) = run(cli, &config) {
        output::output_failure(&e);
    }
    Ok(())
}

fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let mut ctx = CliContext::load(cli.file.as_deref(), config)?;
    handlers::task::handle(&mut ctx, cli.command)
}

/// Logs go to stderr (or the debug file) so stdout stays pure JSON.
fn init_tracing() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("TASKS_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_env_filter(env_filter(LevelFilter::DEBUG))
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter(LevelFilter::WARN))
            .init();
    }
    Ok(())
}

fn env_filter(default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}
