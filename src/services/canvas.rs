//! PNG drawing of chart models with plotters

use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

use super::chart_service::{ChartModel, PieChart, SeriesChart};
use crate::models::Theme;
use crate::utils::format::format_number;

/// Line and bar colour, `rgb(75,192,192)`
pub const SERIES_COLOR: RGBColor = RGBColor(75, 192, 192);
const DARK_BACKGROUND: RGBColor = RGBColor(24, 26, 32);
const DARK_FOREGROUND: RGBColor = RGBColor(230, 230, 230);

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Chart file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can turn a chart model into an image file
pub trait ChartCanvas: Send + Sync {
    fn draw(&self, model: &ChartModel, path: &Path, theme: Theme) -> Result<(), ChartError>;
}

/// Bitmap canvas writing PNG files
pub struct PlottersCanvas {
    pub width: u32,
    pub height: u32,
}

impl Default for PlottersCanvas {
    fn default() -> Self {
        PlottersCanvas {
            width: 1024,
            height: 768,
        }
    }
}

fn palette(theme: Theme) -> (RGBColor, RGBColor) {
    if theme.is_dark() {
        (DARK_BACKGROUND, DARK_FOREGROUND)
    } else {
        (WHITE, BLACK)
    }
}

fn draw_err<E: std::fmt::Display>(step: &'static str) -> impl Fn(E) -> ChartError {
    move |e| ChartError::Draw(format!("{}: {}", step, e))
}

/// Price range with 10% headroom, never below zero
fn padded_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = (max - min).max(1e-8);
    let padding = range * 0.1;
    ((min - padding).max(0.0), max + padding)
}

impl ChartCanvas for PlottersCanvas {
    fn draw(&self, model: &ChartModel, path: &Path, theme: Theme) -> Result<(), ChartError> {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        let (background, foreground) = palette(theme);
        root.fill(&background).map_err(draw_err("Failed to fill canvas"))?;

        match model {
            ChartModel::Line(chart) => draw_line(&root, chart, foreground)?,
            ChartModel::Bar(chart) => draw_bars(&root, chart, foreground)?,
            ChartModel::Pie(chart) => draw_pie(&root, chart, foreground)?,
        }

        root.present().map_err(draw_err("Failed to render chart"))?;
        Ok(())
    }
}

fn draw_line(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    chart: &SeriesChart,
    foreground: RGBColor,
) -> Result<(), ChartError> {
    let (y_min, y_max) = padded_range(&chart.values);
    let x_max = chart.values.len().saturating_sub(1).max(1) as f64;

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.caption, ("sans-serif", 30).into_font().color(&foreground))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)
        .map_err(draw_err("Failed to build chart"))?;

    let labels = &chart.labels;
    let x_formatter = |x: &f64| labels.get(x.round() as usize).cloned().unwrap_or_default();
    ctx.configure_mesh()
        .x_desc(chart.x_desc)
        .y_desc(chart.y_desc)
        .x_labels(8)
        .x_label_formatter(&x_formatter)
        .label_style(("sans-serif", 14).into_font().color(&foreground))
        .axis_desc_style(("sans-serif", 16).into_font().color(&foreground))
        .draw()
        .map_err(draw_err("Failed to draw mesh"))?;

    ctx.draw_series(
        AreaSeries::new(
            chart.values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
            y_min,
            SERIES_COLOR.mix(0.1),
        )
        .border_style(SERIES_COLOR.stroke_width(2)),
    )
    .map_err(draw_err("Failed to draw price line"))?;

    Ok(())
}

fn draw_bars(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    chart: &SeriesChart,
    foreground: RGBColor,
) -> Result<(), ChartError> {
    let max = chart.values.iter().copied().fold(0.0, f64::max).max(1e-8);
    let count = chart.values.len().max(1) as f64;

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.caption, ("sans-serif", 30).into_font().color(&foreground))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d(0f64..count, 0f64..max * 1.1)
        .map_err(draw_err("Failed to build chart"))?;

    let labels = &chart.labels;
    let x_formatter = |x: &f64| labels.get(x.floor() as usize).cloned().unwrap_or_default();
    let y_formatter = |y: &f64| format!("${}", format_number(*y));
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc(chart.x_desc)
        .y_desc(chart.y_desc)
        .x_labels(chart.labels.len().max(1))
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .label_style(("sans-serif", 14).into_font().color(&foreground))
        .axis_desc_style(("sans-serif", 16).into_font().color(&foreground))
        .draw()
        .map_err(draw_err("Failed to draw mesh"))?;

    ctx.draw_series(chart.values.iter().enumerate().map(|(i, v)| {
        let x = i as f64;
        Rectangle::new([(x + 0.1, 0.0), (x + 0.9, *v)], SERIES_COLOR.mix(0.6).filled())
    }))
    .map_err(draw_err("Failed to draw volume bars"))?;

    Ok(())
}

fn draw_pie(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    chart: &PieChart,
    foreground: RGBColor,
) -> Result<(), ChartError> {
    let area = root
        .titled(&chart.title, ("sans-serif", 28).into_font().color(&foreground))
        .map_err(draw_err("Failed to draw title"))?;

    let (width, height) = area.dim_in_pixel();
    let center = ((width / 2) as i32, (height / 2) as i32);
    let radius = f64::from(width.min(height)) * 0.35;
    let colors: Vec<RGBColor> = chart.colors.iter().map(|&(r, g, b)| RGBColor(r, g, b)).collect();
    let labels: Vec<String> = chart
        .labels
        .iter()
        .zip(&chart.values)
        .map(|(label, value)| format!("{} {:.2}%", label, value))
        .collect();

    let mut pie = Pie::new(&center, &radius, &chart.values, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 18).into_font().color(&foreground));
    area.draw(&pie).map_err(draw_err("Failed to draw portfolio pie"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range_adds_headroom() {
        let (min, max) = padded_range(&[100.0, 200.0]);
        assert!((min - 90.0).abs() < 1e-9);
        assert!((max - 210.0).abs() < 1e-9);
    }

    #[test]
    fn test_padded_range_flat_series_and_floor() {
        let (min, max) = padded_range(&[5.0, 5.0]);
        assert!(min < 5.0 && max > 5.0);
        let (min, _) = padded_range(&[0.0, 1.0]);
        assert_eq!(min, 0.0);
    }

    #[test]
    fn test_palette_follows_theme() {
        assert_eq!(palette(Theme::Light), (WHITE, BLACK));
        assert_eq!(palette(Theme::Dark).0, DARK_BACKGROUND);
    }
}
