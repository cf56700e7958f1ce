//! Time series samples and their display labels

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Asia/Kolkata, the fixed display timezone for chart labels
const DISPLAY_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// A single data point on a price chart
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// A single bar on the volume chart
#[derive(Debug, Clone, PartialEq)]
pub struct VolumePoint {
    pub timestamp: DateTime<Utc>,
    pub volume: f64,
}

impl PricePoint {
    /// Build from a raw `[millis, price]` pair
    pub fn from_pair((millis, price): (f64, f64)) -> Option<Self> {
        timestamp_from_millis(millis).map(|timestamp| PricePoint { timestamp, price })
    }
}

impl VolumePoint {
    /// Build from a raw `[millis, volume]` pair
    pub fn from_pair((millis, volume): (f64, f64)) -> Option<Self> {
        timestamp_from_millis(millis).map(|timestamp| VolumePoint { timestamp, volume })
    }
}

fn timestamp_from_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis as i64)
}

fn display_offset() -> FixedOffset {
    FixedOffset::east_opt(DISPLAY_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// `HH:MM`, 24h clock, display timezone
pub fn time_label(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&display_offset()).format("%H:%M").to_string()
}

/// `D/M/YYYY`, display timezone
pub fn date_label(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&display_offset()).format("%-d/%-m/%Y").to_string()
}
