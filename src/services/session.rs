//! The dashboard session: every piece of mutable state lives here

use rand::RngCore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::chart_service::ChartRenderer;
use super::notifier::Notifier;
use super::poller::Poller;
use super::search_service::SearchState;
use crate::api::coingecko::{FetchOutcome, MarketDataSource};
use crate::models::{CoinId, PortfolioSet, Theme};
use crate::view::binder;
use crate::view::ViewSurface;

/// Rows in the top-markets table
pub const TOP_MARKETS_LIMIT: usize = 5;

pub struct Dashboard {
    pub(crate) source: Arc<dyn MarketDataSource>,
    pub(crate) surface: Arc<Mutex<ViewSurface>>,
    pub(crate) charts: ChartRenderer,
    pub(crate) poller: Poller,
    pub(crate) notifier: Box<dyn Notifier>,
    pub(crate) rng: Box<dyn RngCore + Send>,
    pub(crate) portfolio: Option<PortfolioSet>,
    pub(crate) current_coin: Option<CoinId>,
    pub(crate) theme: Theme,
    pub(crate) state: SearchState,
}

impl Dashboard {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        charts: ChartRenderer,
        notifier: Box<dyn Notifier>,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        Dashboard {
            source,
            surface: Arc::new(Mutex::new(ViewSurface::dashboard())),
            charts,
            poller: Poller::default(),
            notifier,
            rng,
            portfolio: None,
            current_coin: None,
            theme: Theme::default(),
            state: SearchState::Idle,
        }
    }

    pub fn surface(&self) -> Arc<Mutex<ViewSurface>> {
        Arc::clone(&self.surface)
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn current_coin(&self) -> Option<&CoinId> {
        self.current_coin.as_ref()
    }

    pub fn portfolio(&self) -> Option<&PortfolioSet> {
        self.portfolio.as_ref()
    }

    pub fn charts(&self) -> &ChartRenderer {
        &self.charts
    }

    pub fn poller_active(&self) -> bool {
        self.poller.is_active()
    }

    /// Startup load: the top-markets table, a first global snapshot and the
    /// global poller. A later search replaces the poller.
    pub async fn load_initial(&mut self) {
        info!("Loading initial market overview");
        self.refresh_top().await;

        match self.source.fetch_global_snapshot().await {
            FetchOutcome::Data(snapshot) => {
                let mut surface = self.surface.lock().await;
                binder::update_global_view(&mut surface, &snapshot);
            }
            _ => warn!("Initial global snapshot unavailable"),
        }
        self.poller.start(Arc::clone(&self.source), Arc::clone(&self.surface));
    }

    /// Refill the top-markets table; on failure the old rows stay
    pub async fn refresh_top(&mut self) -> bool {
        match self.source.fetch_top_markets(TOP_MARKETS_LIMIT).await {
            FetchOutcome::Data(markets) => {
                let mut surface = self.surface.lock().await;
                binder::update_market_table(&mut surface, &markets);
                debug!("Top markets table filled with {} rows", markets.len());
                true
            }
            _ => {
                warn!("Top markets unavailable, keeping previous table");
                false
            }
        }
    }

    pub async fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.charts.set_theme(self.theme);
        let mut surface = self.surface.lock().await;
        binder::set_theme_label(&mut surface, self.theme);
        info!("Theme switched to {:?}", self.theme);
        self.theme
    }

    /// Text panel plus the chart files currently on disk
    pub async fn render(&self) -> String {
        let panel = self.surface.lock().await.render();
        let charts = self.charts.describe();
        if charts.is_empty() {
            panel
        } else {
            format!("{}\n{}", panel, charts)
        }
    }
}
