//! Writes fetched snapshots into the view targets.
//!
//! Every function is a no-op for a target that is missing from the surface or
//! whose source field is absent, so a partial payload leaves the rest untouched.

use super::surface::*;
use crate::api::coingecko::{CoinDetail, CoinMarket, GlobalSnapshot};
use crate::models::{CoinId, Theme};
use crate::utils::format::{change_class, format_change_percent, format_number, format_price_inr, format_usd};

pub const SEARCH_LABEL: &str = "Search";
pub const SEARCHING_LABEL: &str = "🔍 Searching...";

/// Uppercase API symbol, or the first four letters of the id when it is missing
pub fn coin_symbol(detail: &CoinDetail, coin: &CoinId) -> String {
    match detail.symbol.as_deref().filter(|s| !s.is_empty()) {
        Some(symbol) => symbol.to_uppercase(),
        None => coin.upper().chars().take(4).collect(),
    }
}

fn set_indicator(element: &mut Element, change: f64) {
    element.set_text(format_change_percent(change));
    element.set_classes(&[INDICATOR_CLASS, change_class(change)]);
}

pub fn update_coin_view(surface: &mut ViewSurface, detail: &CoinDetail, coin: &CoinId) {
    let symbol = coin_symbol(detail, coin);
    for element in surface.by_class_mut(COIN_SYMBOL_CLASS) {
        element.set_text(symbol.clone());
    }
    if let Some(element) = surface.get_mut(SEARCH_COIN) {
        element.set_text(symbol.clone());
    }

    let Some(market) = detail.market_data.as_ref() else {
        return;
    };

    if let (Some(element), Some(price)) = (surface.get_mut(COIN_PRICE), market.current_price.get("inr")) {
        element.set_text(format_price_inr(price));
        element.remove_class(LOADING_CLASS);
    }

    if let (Some(element), Some(cap)) = (surface.get_mut(COIN_CHANGE), market.market_cap.get("usd")) {
        element.set_text(format!("Market Cap: ${}", format_number(cap)));
    }

    if let Some(element) = surface.get_mut(COIN_INDICATOR) {
        set_indicator(element, market.price_change_percentage_24h.unwrap_or(0.0));
    }
}

pub fn update_global_view(surface: &mut ViewSurface, snapshot: &GlobalSnapshot) {
    if let (Some(element), Some(cap)) = (surface.get_mut(TOTAL_MARKET_CAP), snapshot.total_market_cap.get("usd")) {
        element.set_text(format!("${}", format_number(cap)));
        element.remove_class(LOADING_CLASS);
    }

    if let (Some(element), Some(volume)) = (surface.get_mut(MARKET_CHANGE), snapshot.total_volume.get("usd")) {
        element.set_text(format!("24h Volume Trade: ${}", format_number(volume)));
        element.remove_class(LOADING_CLASS);
    }

    if let (Some(element), Some(change)) = (
        surface.get_mut(MARKET_INDICATOR),
        snapshot.market_cap_change_percentage_24h_usd,
    ) {
        set_indicator(element, change);
    }
}

/// Replace the top-markets table rows
pub fn update_market_table(surface: &mut ViewSurface, markets: &[CoinMarket]) {
    let Some(table) = surface.get_mut(CRYPTO_TABLE) else {
        return;
    };

    let usd = |value: Option<f64>| value.map(format_usd).unwrap_or_else(|| "--".to_string());
    let rows = markets
        .iter()
        .map(|m| {
            let change = match m.price_change_percentage_24h {
                Some(change) => Element::new(&format!("{:.2}%", change), &[change_class(change)]),
                None => Element::new("--", &[]),
            };
            vec![
                Element::new(&format!("{} ({})", m.name, m.symbol.to_uppercase()), &[]),
                Element::new(&usd(m.current_price), &[]),
                change,
                Element::new(&usd(m.market_cap), &[]),
                Element::new(&usd(m.total_volume), &[]),
            ]
        })
        .collect();
    table.set_rows(rows);
}

/// Disable the search control while a search runs, restore it afterwards
pub fn set_search_busy(surface: &mut ViewSurface, busy: bool) {
    if let Some(button) = surface.get_mut(SEARCH_BUTTON) {
        button.set_text(if busy { SEARCHING_LABEL } else { SEARCH_LABEL });
        button.disabled = busy;
    }
}

pub fn set_theme_label(surface: &mut ViewSurface, theme: Theme) {
    if let Some(element) = surface.get_mut(THEME_TEXT) {
        element.set_text(theme.control_label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::coingecko::source::testing::{coin_detail, global_snapshot, market};

    #[test]
    fn test_coin_view_fills_targets_and_clears_loading() {
        let mut surface = ViewSurface::dashboard();
        let detail = coin_detail("bitcoin", "btc", 5_400_000.0, 1.28e12, -2.346);
        update_coin_view(&mut surface, &detail, &CoinId::new("bitcoin"));

        assert!(surface.by_class(COIN_SYMBOL_CLASS).all(|e| e.text() == "BTC"));
        assert_eq!(surface.get(SEARCH_COIN).map(Element::text), Some("BTC"));
        let price = surface.get(COIN_PRICE).expect("price target");
        assert_eq!(price.text(), "₹54,00,000.000");
        assert!(!price.has_class(LOADING_CLASS));
        assert_eq!(surface.get(COIN_CHANGE).map(Element::text), Some("Market Cap: $1.28 T"));
        let indicator = surface.get(COIN_INDICATOR).expect("indicator target");
        assert_eq!(indicator.text(), "-2.35%");
        assert!(indicator.has_class("negative"));
        assert!(indicator.has_class(INDICATOR_CLASS));
        assert!(!indicator.has_class(LOADING_CLASS));
    }

    #[test]
    fn test_missing_symbol_falls_back_to_id_prefix() {
        let mut detail = coin_detail("avalanche-2", "", 1.0, 1.0, 0.0);
        detail.symbol = None;
        assert_eq!(coin_symbol(&detail, &CoinId::new("avalanche-2")), "AVAL");
    }

    #[test]
    fn test_missing_change_counts_as_zero() {
        let mut surface = ViewSurface::dashboard();
        let mut detail = coin_detail("tron", "trx", 10.0, 1.0e10, 0.0);
        if let Some(market) = detail.market_data.as_mut() {
            market.price_change_percentage_24h = None;
        }
        update_coin_view(&mut surface, &detail, &CoinId::new("tron"));
        let indicator = surface.get(COIN_INDICATOR).expect("indicator target");
        assert_eq!(indicator.text(), "+0.00%");
        assert!(indicator.has_class("positive"));
    }

    #[test]
    fn test_absent_targets_are_skipped() {
        let mut surface = ViewSurface::empty();
        surface.insert(COIN_PRICE, Element::new("--", &[LOADING_CLASS]));
        let detail = coin_detail("bitcoin", "btc", 0.5, 1.0, 1.0);
        update_coin_view(&mut surface, &detail, &CoinId::new("bitcoin"));
        update_global_view(&mut surface, &global_snapshot(1.0, 1.0, 1.0));
        update_market_table(&mut surface, &[market("bitcoin", "btc", 1.0)]);

        assert_eq!(surface.get(COIN_PRICE).map(Element::text), Some("₹0.50000000"));
        assert!(surface.get(TOTAL_MARKET_CAP).is_none());
    }

    #[test]
    fn test_global_view() {
        let mut surface = ViewSurface::dashboard();
        update_global_view(&mut surface, &global_snapshot(2.5e12, 9.1e10, 0.4));

        assert_eq!(surface.get(TOTAL_MARKET_CAP).map(Element::text), Some("$2.50 T"));
        assert_eq!(surface.get(MARKET_CHANGE).map(Element::text), Some("24h Volume Trade: $91.00 B"));
        let indicator = surface.get(MARKET_INDICATOR).expect("indicator target");
        assert_eq!(indicator.text(), "+0.40%");
        assert!(indicator.has_class("positive"));
        assert!(!indicator.has_class(LOADING_CLASS));
    }

    #[test]
    fn test_global_view_keeps_fields_missing_from_snapshot() {
        let mut surface = ViewSurface::dashboard();
        let mut snapshot = global_snapshot(2.5e12, 9.1e10, 0.4);
        snapshot.market_cap_change_percentage_24h_usd = None;
        update_global_view(&mut surface, &snapshot);
        let indicator = surface.get(MARKET_INDICATOR).expect("indicator target");
        assert_eq!(indicator.text(), "--");
        assert!(indicator.has_class(LOADING_CLASS));
    }

    #[test]
    fn test_market_table_rows() {
        let mut surface = ViewSurface::dashboard();
        let mut eth = market("ethereum", "eth", 4.0e11);
        eth.price_change_percentage_24h = Some(-1.5);
        update_market_table(&mut surface, &[market("bitcoin", "btc", 1.28e12), eth]);

        let rows = surface.get(CRYPTO_TABLE).map(|t| t.rows().to_vec()).unwrap_or_default();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].text(), "bitcoin (BTC)");
        assert_eq!(rows[0][3].text(), "$1,280,000,000,000");
        assert_eq!(rows[1][2].text(), "-1.50%");
        assert!(rows[1][2].has_class("negative"));
    }

    #[test]
    fn test_search_busy_toggle() {
        let mut surface = ViewSurface::dashboard();
        set_search_busy(&mut surface, true);
        let button = surface.get(SEARCH_BUTTON).expect("button");
        assert_eq!(button.text(), SEARCHING_LABEL);
        assert!(button.disabled);

        set_search_busy(&mut surface, false);
        let button = surface.get(SEARCH_BUTTON).expect("button");
        assert_eq!(button.text(), SEARCH_LABEL);
        assert!(!button.disabled);
    }
}
