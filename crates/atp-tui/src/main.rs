// ATP dashboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config (copying defaults on first run)
// 3. Load every table into the cache and build page state
// 4. Run the TUI until the user quits

use atp_tui::app::Dashboard;
use atp_tui::tui;

use anyhow::Context;
use atp_core::config;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("ATP dashboard starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: cache ttl {}s, {} default players, min matches {}, min decisions {}",
        config.cache.ttl_secs,
        config.defaults.players.len(),
        config.thresholds.min_matches,
        config.thresholds.min_decisions
    );

    let dashboard = Dashboard::load(config).context("failed to load data tables")?;
    info!("Tables loaded at {}", dashboard.loaded_at());

    if let Err(e) = tui::run(dashboard).await {
        error!("TUI error: {:#}", e);
        return Err(e);
    }

    info!("ATP dashboard shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (the terminal belongs to the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("atp-dash.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("atp_tui=info,atp_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
