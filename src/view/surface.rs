//! Named display targets, the terminal counterpart of the page markup

use std::collections::{BTreeMap, BTreeSet};

use crate::utils::Table;

pub const COIN_SYMBOL_CLASS: &str = "coin-symbol";
pub const LOADING_CLASS: &str = "loading";
pub const INDICATOR_CLASS: &str = "change-indicator";

pub const COIN_PRICE: &str = "coin-price";
pub const COIN_CHANGE: &str = "coin-change";
pub const COIN_INDICATOR: &str = "coin-indicator";
pub const SEARCH_COIN: &str = "search_coin";
pub const TOTAL_MARKET_CAP: &str = "total-market-cap";
pub const MARKET_CHANGE: &str = "market-change";
pub const MARKET_INDICATOR: &str = "market-indicator";
pub const CRYPTO_TABLE: &str = "crypto-table-body";
pub const SEARCH_BUTTON: &str = "searchBtn";
pub const THEME_TEXT: &str = "theme_text";

/// One target: text, state classes and, for the market table, row cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    text: String,
    classes: BTreeSet<String>,
    pub disabled: bool,
    rows: Vec<Vec<Element>>,
}

impl Element {
    pub fn new(text: &str, classes: &[&str]) -> Self {
        Element {
            text: text.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            disabled: false,
            rows: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    /// Replace every class, like assigning `className`
    pub fn set_classes(&mut self, classes: &[&str]) {
        self.classes = classes.iter().map(|c| c.to_string()).collect();
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn rows(&self) -> &[Vec<Element>] {
        &self.rows
    }

    pub fn set_rows(&mut self, rows: Vec<Vec<Element>>) {
        self.rows = rows;
    }
}

/// The set of targets the binder writes into, keyed by id
#[derive(Debug, Clone, Default)]
pub struct ViewSurface {
    elements: BTreeMap<String, Element>,
}

impl ViewSurface {
    pub fn empty() -> Self {
        ViewSurface::default()
    }

    /// The standard dashboard layout, every value still loading
    pub fn dashboard() -> Self {
        let mut surface = ViewSurface::empty();
        surface.insert("coin-symbol-title", Element::new("---", &[COIN_SYMBOL_CLASS]));
        surface.insert("coin-symbol-chart", Element::new("---", &[COIN_SYMBOL_CLASS]));
        surface.insert(COIN_PRICE, Element::new("--", &[LOADING_CLASS]));
        surface.insert(COIN_CHANGE, Element::new("Market Cap: --", &[]));
        surface.insert(COIN_INDICATOR, Element::new("--", &[INDICATOR_CLASS, LOADING_CLASS]));
        surface.insert(SEARCH_COIN, Element::new("---", &[]));
        surface.insert(TOTAL_MARKET_CAP, Element::new("--", &[LOADING_CLASS]));
        surface.insert(MARKET_CHANGE, Element::new("24h Volume Trade: --", &[LOADING_CLASS]));
        surface.insert(MARKET_INDICATOR, Element::new("--", &[INDICATOR_CLASS, LOADING_CLASS]));
        surface.insert(CRYPTO_TABLE, Element::new("", &[]));
        surface.insert(SEARCH_BUTTON, Element::new("Search", &[]));
        surface.insert(THEME_TEXT, Element::new("Dark Mode", &[]));
        surface
    }

    pub fn insert(&mut self, id: &str, element: Element) {
        self.elements.insert(id.to_string(), element);
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn by_class_mut<'a>(&'a mut self, class: &'a str) -> impl Iterator<Item = &'a mut Element> + 'a {
        self.elements.values_mut().filter(move |e| e.has_class(class))
    }

    pub fn by_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.values().filter(move |e| e.has_class(class))
    }

    /// Text panel of every target followed by the market table
    pub fn render(&self) -> String {
        let mut panel = Table::new(vec!["Target", "Value", "State"]);
        for (id, element) in &self.elements {
            if id == CRYPTO_TABLE {
                continue;
            }
            let mut state: Vec<&str> = element.classes().collect();
            if element.disabled {
                state.push("disabled");
            }
            let state = state.join(" ");
            panel.add_row(&[id.as_str(), element.text(), state.as_str()]);
        }

        let mut output = panel.render();
        if let Some(table) = self.get(CRYPTO_TABLE).filter(|t| !t.rows().is_empty()) {
            let mut markets = Table::new(vec!["Coin", "Price", "24h", "Market Cap", "Volume"]);
            for row in table.rows() {
                let cells: Vec<&str> = row.iter().map(Element::text).collect();
                markets.add_row(&cells);
            }
            output.push('\n');
            output.push_str(&markets.render());
        }
        output
    }
}
