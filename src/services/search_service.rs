use tracing::{debug, info, warn};

use super::session::Dashboard;
use crate::api::coingecko::FetchOutcome;
use crate::models::coin::normalize_query;
use crate::models::{CoinId, PortfolioSet};
use crate::view::binder;

/// Trailing window of the price chart
pub const PRICE_WINDOW_DAYS: u32 = 2;
pub const EMPTY_INPUT_ALERT: &str = "Please enter a cryptocurrency name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Resolving,
    Fetching,
    Rendering,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank input, nothing was fetched
    Rejected,
    Completed { coin: CoinId },
    /// No volume series came back; the user was alerted
    NotFound { coin: CoinId },
}

pub fn not_found_alert(input: &str) -> String {
    format!("Could not find data for \"{}\". Try Bitcoin, Ethereum, Solana, etc.", input)
}

fn transition(dashboard: &mut Dashboard, next: SearchState) {
    debug!("Search state {:?} -> {:?}", dashboard.state, next);
    dashboard.state = next;
}

async fn set_busy(dashboard: &Dashboard, busy: bool) {
    let mut surface = dashboard.surface.lock().await;
    binder::set_search_busy(&mut surface, busy);
}

/// Run one search from raw user input.
///
/// The search control is disabled for the whole call and always restored. Fetch
/// failures degrade silently except a missing volume series, which is reported
/// through the notifier.
pub async fn submit_search(dashboard: &mut Dashboard, raw: &str) -> SearchOutcome {
    let query = normalize_query(raw);
    if query.is_empty() {
        dashboard.notifier.alert(EMPTY_INPUT_ALERT);
        return SearchOutcome::Rejected;
    }

    set_busy(dashboard, true).await;
    let outcome = run_search(dashboard, raw.trim(), &query).await;
    set_busy(dashboard, false).await;
    transition(dashboard, SearchState::Idle);

    outcome
}

async fn run_search(dashboard: &mut Dashboard, input: &str, query: &str) -> SearchOutcome {
    transition(dashboard, SearchState::Resolving);
    let coin = CoinId::resolve(query);
    info!("🔍 Searching for {} (input {:?})", coin, input);

    transition(dashboard, SearchState::Fetching);
    let detail = dashboard.source.fetch_coin_detail(&coin).await;
    let global = dashboard.source.fetch_global_snapshot().await;
    let volume = dashboard.source.fetch_volume_series(&coin).await;

    transition(dashboard, SearchState::Rendering);

    match detail {
        FetchOutcome::Data(detail) if detail.market_data.is_some() => {
            {
                let mut surface = dashboard.surface.lock().await;
                binder::update_coin_view(&mut surface, &detail, &coin);
            }
            dashboard.current_coin = Some(coin.clone());
            render_price_chart(dashboard, &coin).await;
        }
        FetchOutcome::Data(_) => debug!("Coin detail for {} has no market data", coin),
        _ => debug!("No coin detail for {}", coin),
    }

    if let FetchOutcome::Data(snapshot) = global {
        {
            let mut surface = dashboard.surface.lock().await;
            binder::update_global_view(&mut surface, &snapshot);
        }
        let source = dashboard.source.clone();
        let surface = dashboard.surface.clone();
        dashboard.poller.start(source, surface);
    }

    // Only a failed volume request means the coin is unknown; an empty series is
    // a coin with no trading history yet.
    let outcome = match volume {
        FetchOutcome::Data(series) => {
            if let Err(e) = dashboard.charts.render_volume_chart(&coin, &series) {
                warn!("Volume chart for {} failed: {}", coin, e);
            }
            SearchOutcome::Completed { coin: coin.clone() }
        }
        FetchOutcome::Empty => {
            debug!("Empty volume series for {}, volume chart left as is", coin);
            SearchOutcome::Completed { coin: coin.clone() }
        }
        FetchOutcome::Failed(_) => {
            transition(dashboard, SearchState::Failed);
            dashboard.notifier.alert(&not_found_alert(input));
            SearchOutcome::NotFound { coin: coin.clone() }
        }
    };

    render_portfolio(dashboard, &coin).await;
    outcome
}

async fn render_price_chart(dashboard: &mut Dashboard, coin: &CoinId) {
    match dashboard.source.fetch_price_series(coin, PRICE_WINDOW_DAYS).await {
        FetchOutcome::Data(series) => {
            if let Err(e) = dashboard.charts.render_price_chart(coin, &series) {
                warn!("Price chart for {} failed: {}", coin, e);
            }
        }
        _ => debug!("No price series for {}, price chart left as is", coin),
    }
}

/// Pick a fresh portfolio around the searched coin and chart it; no-op on failure
async fn render_portfolio(dashboard: &mut Dashboard, coin: &CoinId) {
    let set = PortfolioSet::pick(coin, dashboard.rng.as_mut());
    debug!("Portfolio for {}: {:?}", coin, set.coins());

    match dashboard.source.fetch_portfolio_markets(set.coins()).await {
        FetchOutcome::Data(markets) => {
            if let Err(e) = dashboard.charts.render_portfolio_chart(coin, &markets) {
                warn!("Portfolio chart for {} failed: {}", coin, e);
            }
        }
        _ => debug!("No portfolio markets for {}", coin),
    }
    dashboard.portfolio = Some(set);
}
