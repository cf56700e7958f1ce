//! Coin identifiers and the alias table used to resolve search input

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

lazy_static! {
    /// Symbols and common names mapped to CoinGecko slugs
    static ref COIN_ALIASES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        for (alias, slug) in [
            ("btc", "bitcoin"), ("bitcoin", "bitcoin"),
            ("eth", "ethereum"), ("ethereum", "ethereum"),
            ("bnb", "binancecoin"), ("binance coin", "binancecoin"),
            ("xrp", "ripple"), ("ripple", "ripple"),
            ("sol", "solana"), ("solana", "solana"),
            ("doge", "dogecoin"), ("dogecoin", "dogecoin"),
            ("ada", "cardano"), ("cardano", "cardano"),
            ("dot", "polkadot"), ("polkadot", "polkadot"),
            ("matic", "matic-network"), ("polygon", "matic-network"),
            ("avax", "avalanche-2"), ("avalanche", "avalanche-2"),
            ("shib", "shiba-inu"), ("shiba inu", "shiba-inu"),
            ("trx", "tron"), ("tron", "tron"),
        ] {
            m.insert(alias, slug);
        }
        m
    };
}

/// Canonical lowercase slug understood by the market-data API
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoinId(String);

impl CoinId {
    pub fn new(slug: impl Into<String>) -> Self {
        CoinId(slug.into())
    }

    /// Resolve normalized search input to a slug.
    ///
    /// Unknown input passes through unchanged; the API decides whether it exists.
    pub fn resolve(query: &str) -> Self {
        match COIN_ALIASES.get(query) {
            Some(slug) => CoinId::new(*slug),
            None => CoinId::new(query),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Uppercase form used in chart captions
    pub fn upper(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase and trim raw search input
pub fn normalize_query(raw: &str) -> String {
    raw.to_lowercase().trim().to_string()
}
