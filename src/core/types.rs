//! Common types used across the application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conversion factor from mg/dL to mmol/L
pub const MMOL_L_CONVERSION_FACTOR: f64 = 0.0555;

/// A single glucose reading from the sensor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlucoseSample {
    /// Glucose value in mg/dL (the canonical unit)
    pub value_mg_dl: u16,
    /// When the sensor recorded this value
    pub timestamp: DateTime<Utc>,
    /// Trend direction reported by the sensor
    pub trend: TrendCode,
}

impl GlucoseSample {
    pub fn new(value_mg_dl: u16, trend: TrendCode) -> Self {
        Self {
            value_mg_dl,
            timestamp: Utc::now(),
            trend,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Glucose value in mmol/L, rounded to 1 decimal for display
    pub fn mmol_l(&self) -> f64 {
        (self.value_mg_dl as f64 * MMOL_L_CONVERSION_FACTOR * 10.0).round() / 10.0
    }
}

/// Trend direction as reported by Dexcom Share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendCode {
    DoubleUp,
    SingleUp,
    FortyFiveUp,
    Flat,
    FortyFiveDown,
    SingleDown,
    DoubleDown,
    Unknown,
}

impl TrendCode {
    /// All trend codes, for iteration in displays and tests
    pub const ALL: [TrendCode; 8] = [
        TrendCode::DoubleUp,
        TrendCode::SingleUp,
        TrendCode::FortyFiveUp,
        TrendCode::Flat,
        TrendCode::FortyFiveDown,
        TrendCode::SingleDown,
        TrendCode::DoubleDown,
        TrendCode::Unknown,
    ];

    /// Arrow glyph shown next to the glucose value
    pub fn arrow(&self) -> &'static str {
        match self {
            TrendCode::DoubleUp => "\u{2191}\u{2191}",
            TrendCode::SingleUp => "\u{2191}",
            TrendCode::FortyFiveUp => "\u{2197}",
            TrendCode::Flat => "\u{2192}",
            TrendCode::FortyFiveDown => "\u{2198}",
            TrendCode::SingleDown => "\u{2193}",
            TrendCode::DoubleDown => "\u{2193}\u{2193}",
            TrendCode::Unknown => "?",
        }
    }

    /// Human-readable trend description
    pub fn description(&self) -> &'static str {
        match self {
            TrendCode::DoubleUp => "rising quickly",
            TrendCode::SingleUp => "rising",
            TrendCode::FortyFiveUp => "rising slightly",
            TrendCode::Flat => "steady",
            TrendCode::FortyFiveDown => "falling slightly",
            TrendCode::SingleDown => "falling",
            TrendCode::DoubleDown => "falling quickly",
            TrendCode::Unknown => "unknown",
        }
    }

    /// Parse a trend string from the Share API.
    ///
    /// `None`, `NotComputable` and `RateOutOfRange` are valid responses that
    /// carry no usable direction; anything unrecognized also maps to Unknown.
    pub fn from_share(s: &str) -> Self {
        match s {
            "DoubleUp" => TrendCode::DoubleUp,
            "SingleUp" => TrendCode::SingleUp,
            "FortyFiveUp" => TrendCode::FortyFiveUp,
            "Flat" => TrendCode::Flat,
            "FortyFiveDown" => TrendCode::FortyFiveDown,
            "SingleDown" => TrendCode::SingleDown,
            "DoubleDown" => TrendCode::DoubleDown,
            _ => TrendCode::Unknown,
        }
    }
}

/// Unit preference for displayed glucose values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayUnit {
    #[serde(rename = "mg/dL")]
    MgDl,
    #[serde(rename = "mmol/L")]
    MmolL,
}

impl DisplayUnit {
    pub fn label(&self) -> &'static str {
        match self {
            DisplayUnit::MgDl => "mg/dL",
            DisplayUnit::MmolL => "mmol/L",
        }
    }
}

/// Severity of a classified glucose value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Normal,
    High,
    Unknown,
}

/// Result of classifying a glucose sample for display.
///
/// Recomputed on every refresh, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    /// Formatted text, e.g. `"5.6 mmol/L \u{2192}"`
    pub display_text: String,
    pub severity: Severity,
}

/// Shared state owned by the poll loop.
///
/// The poll thread replaces `last_sample` and `last_update` together under
/// one lock; readers get a cloned snapshot and never observe a mixed pair.
#[derive(Debug, Clone, Default)]
pub struct PollState {
    /// Most recent sample, if any fetch has succeeded yet
    pub last_sample: Option<GlucoseSample>,
    /// When the poll loop last stored a sample
    pub last_update: Option<DateTime<Utc>>,
}
