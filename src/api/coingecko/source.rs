use async_trait::async_trait;

use super::models::{CoinDetail, CoinMarket, FetchOutcome, GlobalSnapshot};
use crate::models::{CoinId, PricePoint, VolumePoint};

/// Everything the dashboard needs from the market-data API.
///
/// Implementations never return an error to the caller: failures are logged
/// and reported as [`FetchOutcome::Failed`].
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Trailing `days` of prices, ascending by time
    async fn fetch_price_series(&self, coin: &CoinId, days: u32) -> FetchOutcome<Vec<PricePoint>>;

    async fn fetch_global_snapshot(&self) -> FetchOutcome<GlobalSnapshot>;

    async fn fetch_coin_detail(&self, coin: &CoinId) -> FetchOutcome<CoinDetail>;

    /// 4-day volume series
    async fn fetch_volume_series(&self, coin: &CoinId) -> FetchOutcome<Vec<VolumePoint>>;

    /// Market rows for the given coins, at most five, largest market cap first
    async fn fetch_portfolio_markets(&self, coins: &[CoinId]) -> FetchOutcome<Vec<CoinMarket>>;

    /// The `limit` largest coins by market cap
    async fn fetch_top_markets(&self, limit: usize) -> FetchOutcome<Vec<CoinMarket>>;
}
