use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use super::canvas::{ChartCanvas, ChartError};
use crate::api::coingecko::CoinMarket;
use crate::models::chart::{date_label, time_label};
use crate::models::portfolio::PORTFOLIO_SIZE;
use crate::models::{CoinId, PricePoint, Theme, VolumePoint};
use crate::utils::format::format_usd;

/// Slice colours; the first is the accent for the searched coin
pub const PORTFOLIO_COLORS: [(u8, u8, u8); 5] = [
    (0xff, 0x6b, 0x35),
    (0x4c, 0xaf, 0x50),
    (0x21, 0x96, 0xf3),
    (0xff, 0x98, 0x00),
    (0x9c, 0x27, 0xb0),
];
pub const SEARCHED_MARKER: &str = "⭐";

/// Line or bar chart over a labelled series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesChart {
    pub caption: String,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub tooltips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub labels: Vec<String>,
    /// Market-cap share in percent, rounded to 2 decimals per slice
    pub values: Vec<f64>,
    pub colors: Vec<(u8, u8, u8)>,
    pub tooltips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartModel {
    Line(SeriesChart),
    Bar(SeriesChart),
    Pie(PieChart),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSlot {
    Price,
    Volume,
    Portfolio,
}

impl ChartSlot {
    fn file_stem(self) -> &'static str {
        match self {
            ChartSlot::Price => "price",
            ChartSlot::Volume => "volume",
            ChartSlot::Portfolio => "portfolio",
        }
    }
}

/// A drawn chart occupying one slot
#[derive(Debug)]
pub struct ChartInstance {
    pub id: Uuid,
    pub slot: ChartSlot,
    pub path: PathBuf,
    pub model: ChartModel,
}

impl ChartInstance {
    /// Remove the rendered file
    fn destroy(self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Destroyed {:?} chart {}", self.slot, self.id),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to delete chart file {}: {}", self.path.display(), e),
        }
    }
}

pub fn price_chart_model(coin: &CoinId, series: &[PricePoint]) -> Option<ChartModel> {
    if series.is_empty() {
        return None;
    }
    Some(ChartModel::Line(SeriesChart {
        caption: format!("{} Price (USD)", coin.upper()),
        x_desc: "Time (IST)",
        y_desc: "Price (USD)",
        labels: series.iter().map(|p| time_label(&p.timestamp)).collect(),
        values: series.iter().map(|p| p.price).collect(),
        tooltips: series.iter().map(|p| format_usd(p.price)).collect(),
    }))
}

pub fn volume_chart_model(coin: &CoinId, series: &[VolumePoint]) -> Option<ChartModel> {
    if series.is_empty() {
        return None;
    }
    Some(ChartModel::Bar(SeriesChart {
        caption: format!("{} 4-day Volume (USD)", coin.upper()),
        x_desc: "Date",
        y_desc: "Volume (USD)",
        labels: series.iter().map(|v| date_label(&v.timestamp)).collect(),
        values: series.iter().map(|v| v.volume).collect(),
        tooltips: series.iter().map(|v| format_usd(v.volume)).collect(),
    }))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Pie of market-cap shares. The searched coin's row, when present, is moved to
/// the first slice and marked; the first colour is the accent. Shares are
/// rounded independently and may not add up to exactly 100.
pub fn portfolio_chart_model(searched: &CoinId, markets: &[CoinMarket]) -> Option<ChartModel> {
    let mut rows: Vec<&CoinMarket> = markets.iter().take(PORTFOLIO_SIZE).collect();
    let featured = match rows.iter().position(|m| m.id == searched.as_str()) {
        Some(pos) => {
            let row = rows.remove(pos);
            rows.insert(0, row);
            Some(row.name.clone())
        }
        None => None,
    };

    if rows.is_empty() {
        return None;
    }
    let total: f64 = rows.iter().map(|m| m.market_cap.unwrap_or(0.0)).sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }

    let values: Vec<f64> = rows
        .iter()
        .map(|m| round2(m.market_cap.unwrap_or(0.0) / total * 100.0))
        .collect();
    let labels = rows
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let symbol = m.symbol.to_uppercase();
            if i == 0 && featured.is_some() {
                format!("{} {}", SEARCHED_MARKER, symbol)
            } else {
                symbol
            }
        })
        .collect();
    let tooltips = rows
        .iter()
        .zip(&values)
        .map(|(m, v)| format!("{}: {:.2}% (Market Cap)", m.name, v))
        .collect();

    Some(ChartModel::Pie(PieChart {
        title: format!("Portfolio Distribution (featuring {})", featured.unwrap_or_else(|| searched.to_string())),
        labels,
        values,
        colors: PORTFOLIO_COLORS[..rows.len()].to_vec(),
        tooltips,
    }))
}

/// Owns the three chart slots; drawing into a slot first destroys its previous chart
pub struct ChartRenderer {
    output_dir: PathBuf,
    canvas: Box<dyn ChartCanvas>,
    theme: Theme,
    instances: HashMap<ChartSlot, ChartInstance>,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, canvas: Box<dyn ChartCanvas>) -> Result<Self, ChartError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(ChartRenderer {
            output_dir,
            canvas,
            theme: Theme::default(),
            instances: HashMap::new(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn instance(&self, slot: ChartSlot) -> Option<&ChartInstance> {
        self.instances.get(&slot)
    }

    /// Skipped entirely when the series is empty
    pub fn render_price_chart(&mut self, coin: &CoinId, series: &[PricePoint]) -> Result<Option<&ChartInstance>, ChartError> {
        match price_chart_model(coin, series) {
            Some(model) => self.replace(ChartSlot::Price, model).map(Some),
            None => Ok(None),
        }
    }

    pub fn render_volume_chart(&mut self, coin: &CoinId, series: &[VolumePoint]) -> Result<Option<&ChartInstance>, ChartError> {
        match volume_chart_model(coin, series) {
            Some(model) => self.replace(ChartSlot::Volume, model).map(Some),
            None => Ok(None),
        }
    }

    /// No-op when there is nothing to chart
    pub fn render_portfolio_chart(&mut self, searched: &CoinId, markets: &[CoinMarket]) -> Result<Option<&ChartInstance>, ChartError> {
        match portfolio_chart_model(searched, markets) {
            Some(model) => self.replace(ChartSlot::Portfolio, model).map(Some),
            None => Ok(None),
        }
    }

    fn replace(&mut self, slot: ChartSlot, model: ChartModel) -> Result<&ChartInstance, ChartError> {
        if let Some(previous) = self.instances.remove(&slot) {
            previous.destroy();
        }

        let id = Uuid::new_v4();
        let path = self.output_dir.join(format!("{}_{}.png", slot.file_stem(), id.simple()));
        self.canvas.draw(&model, &path, self.theme)?;
        debug!("Rendered {:?} chart to {}", slot, path.display());

        let instance = self.instances.entry(slot).or_insert(ChartInstance { id, slot, path, model });
        Ok(&*instance)
    }

    /// One line per occupied slot
    pub fn describe(&self) -> String {
        let mut lines = Vec::new();
        for slot in [ChartSlot::Price, ChartSlot::Volume, ChartSlot::Portfolio] {
            if let Some(instance) = self.instances.get(&slot) {
                lines.push(format!("{:?} chart: {}", slot, instance.path.display()));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every draw and writes a placeholder file instead of a PNG
    #[derive(Clone, Default)]
    pub struct RecordingCanvas {
        pub drawn: Arc<Mutex<Vec<(ChartModel, PathBuf, Theme)>>>,
    }

    impl ChartCanvas for RecordingCanvas {
        fn draw(&self, model: &ChartModel, path: &Path, theme: Theme) -> Result<(), ChartError> {
            fs::write(path, b"chart")?;
            self.drawn.lock().unwrap().push((model.clone(), path.to_path_buf(), theme));
            Ok(())
        }
    }

    impl RecordingCanvas {
        pub fn count(&self) -> usize {
            self.drawn.lock().unwrap().len()
        }
    }
}
