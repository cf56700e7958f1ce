pub mod client;
pub mod models;
pub mod source;

pub use client::CoinGeckoClient;
pub use models::{ApiError, CoinDetail, CoinMarket, FetchOutcome, GlobalSnapshot};
pub use source::MarketDataSource;
