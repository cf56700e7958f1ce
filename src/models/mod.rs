//! Domain models shared by the client, the view and the chart renderer

pub mod chart;
pub mod coin;
pub mod portfolio;
pub mod theme;

pub use chart::{PricePoint, VolumePoint};
pub use coin::CoinId;
pub use portfolio::PortfolioSet;
pub use theme::Theme;
