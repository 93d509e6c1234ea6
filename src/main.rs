//! Service Status Dashboard Binary

use status_dashboard::html::render_page;
use status_dashboard::{
    Config, Dashboard, DashboardError, DataSource, InMemorySurface, JsonFileSource, Result,
    Snapshot, StaticSource, SyntheticHistory,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    initialize_tracing();

    info!("Starting status dashboard v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env();

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(DashboardError::Config(e));
    }

    let snapshot = load_snapshot(&config).await?;

    let history = match config.history_seed {
        Some(seed) => SyntheticHistory::seeded(seed),
        None => SyntheticHistory::new(),
    };
    let surface = InMemorySurface::new(config.viewport_width);
    let mut dashboard = Dashboard::new(snapshot, surface, history, config.resize_debounce);

    let overview = dashboard.initialize();
    info!(
        "Overall status: {} ({} active incidents)",
        overview.overall.status_label, overview.overall.active_incidents_count
    );

    if config.follow_resize_events {
        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(read_widths_from_stdin(tx));
        dashboard.run(rx).await?;
    }

    let stats = dashboard.stats();
    info!(
        "Dashboard {} rendered {} services over a {} day window",
        stats.instance_id, stats.services, stats.window_days
    );

    let page = render_page(dashboard.surface(), &config.page_title);
    match &config.output_path {
        Some(path) => {
            tokio::fs::write(path, page).await?;
            info!("Wrote dashboard to {}", path);
        }
        None => print!("{}", page),
    }

    Ok(())
}

async fn load_snapshot(config: &Config) -> Result<Snapshot> {
    match &config.data_path {
        Some(path) => JsonFileSource::new(path).load().await,
        None => StaticSource::default().load().await,
    }
}

/// Forward one viewport width per stdin line until EOF
async fn read_widths_from_stdin(tx: mpsc::Sender<u32>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match line.parse::<u32>() {
                    Ok(width) => {
                        if tx.send(width).await.is_err() {
                            break;
                        }
                    }
                    Err(_) => warn!("Ignoring non-numeric viewport width: {}", line),
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read resize events: {}", e);
                break;
            }
        }
    }
}

/// Initialize structured logging
fn initialize_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
