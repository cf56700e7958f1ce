//! Periodic refresh of the global market panel

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::api::coingecko::MarketDataSource;
use crate::view::binder;
use crate::view::ViewSurface;

pub const GLOBAL_REFRESH_PERIOD: Duration = Duration::from_secs(120);

/// Owns at most one running refresh task
pub struct Poller {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Default for Poller {
    fn default() -> Self {
        Poller::new(GLOBAL_REFRESH_PERIOD)
    }
}

impl Poller {
    pub fn new(period: Duration) -> Self {
        Poller { period, handle: None }
    }

    /// Arm the timer, aborting any task started earlier. The first tick fires one
    /// full period from now.
    pub fn start(&mut self, source: Arc<dyn MarketDataSource>, surface: Arc<Mutex<ViewSurface>>) {
        self.stop();

        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match source.fetch_global_snapshot().await.into_option() {
                    Some(snapshot) => {
                        let mut surface = surface.lock().await;
                        binder::update_global_view(&mut surface, &snapshot);
                        debug!("Global market panel refreshed");
                    }
                    None => debug!("Global refresh returned nothing, waiting for next tick"),
                }
            }
        }));
        debug!("Global poller armed every {:?}", period);
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Previous global poller cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::coingecko::source::testing::{global_snapshot, CallCounts, ScriptedSource};
    use crate::view::surface::TOTAL_MARKET_CAP;

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    fn surface() -> Arc<Mutex<ViewSurface>> {
        Arc::new(Mutex::new(ViewSurface::dashboard()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_leaves_single_timer() {
        let source = Arc::new(ScriptedSource::default().with_global(global_snapshot(2.5e12, 9.0e10, 1.0)));
        let surface = surface();
        let mut poller = Poller::default();

        poller.start(source.clone(), surface.clone());
        tokio::time::sleep(Duration::from_secs(30)).await;
        poller.start(source.clone(), surface.clone());
        assert!(poller.is_active());

        // The first timer would have fired at 120s, the second fires at 150s
        tokio::time::sleep(Duration::from_secs(100)).await;
        settle().await;
        assert_eq!(CallCounts::get(&source.calls.global), 0);

        tokio::time::sleep(Duration::from_secs(25)).await;
        settle().await;
        assert_eq!(CallCounts::get(&source.calls.global), 1);
        assert_eq!(surface.lock().await.get(TOTAL_MARKET_CAP).map(|e| e.text().to_string()), Some("$2.50 T".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_keeps_polling() {
        let source = Arc::new(ScriptedSource::default());
        let surface = surface();
        let before = surface.lock().await.render();
        let mut poller = Poller::default();
        poller.start(source.clone(), surface.clone());

        tokio::time::sleep(Duration::from_secs(241)).await;
        settle().await;

        assert_eq!(CallCounts::get(&source.calls.global), 2);
        assert_eq!(surface.lock().await.render(), before);
        assert!(poller.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_timer() {
        let source = Arc::new(ScriptedSource::default().with_global(global_snapshot(1.0e12, 1.0e9, -0.5)));
        let mut poller = Poller::new(Duration::from_secs(10));
        poller.start(source.clone(), surface());
        poller.stop();
        assert!(!poller.is_active());

        tokio::time::sleep(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(source.calls.total(), 0);
    }
}
