//! Portfolio composition for the pie chart

use crate::models::coin::CoinId;
use rand::Rng;

/// Candidate pool the other four slices are drawn from
pub const DEFAULT_POOL: [&str; 6] = ["bitcoin", "ethereum", "tether", "ripple", "binancecoin", "solana"];

pub const PORTFOLIO_SIZE: usize = 5;

/// The coins shown in the portfolio chart; the searched coin is always first
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSet {
    coins: Vec<CoinId>,
}

impl PortfolioSet {
    /// Searched coin plus up to four others drawn without replacement from
    /// [`DEFAULT_POOL`]. The randomness source is injected so callers can seed it.
    pub fn pick<R: Rng + ?Sized>(searched: &CoinId, rng: &mut R) -> Self {
        let mut coins = vec![searched.clone()];
        let mut remaining: Vec<&str> = DEFAULT_POOL
            .iter()
            .copied()
            .filter(|c| *c != searched.as_str())
            .collect();

        while coins.len() < PORTFOLIO_SIZE && !remaining.is_empty() {
            let index = rng.gen_range(0..remaining.len());
            coins.push(CoinId::new(remaining.remove(index)));
        }

        PortfolioSet { coins }
    }

    pub fn searched(&self) -> &CoinId {
        &self.coins[0]
    }

    pub fn coins(&self) -> &[CoinId] {
        &self.coins
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }
}
