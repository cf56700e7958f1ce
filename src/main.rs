use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod utils;
mod view;

use api::coingecko::CoinGeckoClient;
use config::AppConfig;
use services::canvas::PlottersCanvas;
use services::chart_service::ChartRenderer;
use services::notifier::ConsoleNotifier;
use services::Dashboard;

fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    for directive in ["cryptodash=info", "reqwest=warn", "hyper=warn"] {
        match directive.parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("Ignoring log directive {}: {}", directive, e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();
}

fn prompt(out: &mut impl Write) {
    let _ = write!(out, "> ");
    let _ = out.flush();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    info!("📈 Starting cryptodash v{}", env!("CARGO_PKG_VERSION"));

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("Using market data API at {}", config.api.base_url);

    let charts = match ChartRenderer::new(&config.chart_output_dir, Box::new(PlottersCanvas::default())) {
        Ok(c) => c,
        Err(e) => {
            error!("Cannot use chart directory {}: {}", config.chart_output_dir.display(), e);
            std::process::exit(1);
        }
    };
    info!("Charts are written to {}", config.chart_output_dir.display());

    let client = CoinGeckoClient::new(Arc::new(config.api));
    let mut dashboard = Dashboard::new(
        Arc::new(client),
        charts,
        Box::new(ConsoleNotifier),
        Box::new(StdRng::from_entropy()),
    );

    dashboard.load_initial().await;

    let mut stdout = std::io::stdout();
    let _ = writeln!(stdout, "{}", dashboard.render().await);
    let _ = writeln!(stdout, "Type a coin name to search, or $help for commands.");
    prompt(&mut stdout);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if commands::handle_line(&mut dashboard, &mut stdout, &line).await.is_break() {
                    break;
                }
                prompt(&mut stdout);
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        }
    }

    info!("👋 cryptodash stopped");
}
