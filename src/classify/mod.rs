//! Glucose classification for display
//!
//! Maps a raw sample plus the unit preference to display text and a severity
//! level. Pure functions only: identical inputs always yield identical output,
//! and a missing sample is a handled case rather than an error.

use crate::core::{ClassificationResult, DisplayUnit, GlucoseSample, Severity};

/// Thresholds in mg/dL: below LOW is low, above HIGH is high
pub const LOW_MG_DL: u16 = 70;
pub const HIGH_MG_DL: u16 = 180;

/// Thresholds in mmol/L, applied to the rounded display value
pub const LOW_MMOL_L: f64 = 3.9;
pub const HIGH_MMOL_L: f64 = 10.0;

/// Placeholder shown when no sample is available
pub const NO_DATA_TEXT: &str = "No Data";

/// Classify a glucose sample for display in the requested unit.
///
/// The mmol/L branch classifies the rounded 1-decimal value so that the
/// severity always agrees with what the widget shows.
pub fn classify(sample: Option<&GlucoseSample>, unit: DisplayUnit) -> ClassificationResult {
    let sample = match sample {
        Some(s) => s,
        None => {
            return ClassificationResult {
                display_text: NO_DATA_TEXT.to_string(),
                severity: Severity::Unknown,
            }
        }
    };

    let arrow = sample.trend.arrow();

    match unit {
        DisplayUnit::MgDl => {
            let value = sample.value_mg_dl;
            let severity = if value < LOW_MG_DL {
                Severity::Low
            } else if value > HIGH_MG_DL {
                Severity::High
            } else {
                Severity::Normal
            };
            ClassificationResult {
                display_text: format!("{} {} {}", value, unit.label(), arrow),
                severity,
            }
        }
        DisplayUnit::MmolL => {
            let value = sample.mmol_l();
            let severity = if value < LOW_MMOL_L {
                Severity::Low
            } else if value > HIGH_MMOL_L {
                Severity::High
            } else {
                Severity::Normal
            };
            ClassificationResult {
                display_text: format!("{:.1} {} {}", value, unit.label(), arrow),
                severity,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TrendCode;

    fn sample(value_mg_dl: u16, trend: TrendCode) -> GlucoseSample {
        GlucoseSample::new(value_mg_dl, trend)
    }

    #[test]
    fn test_mg_dl_boundaries() {
        let cases = [
            (69, Severity::Low),
            (70, Severity::Normal),
            (180, Severity::Normal),
            (181, Severity::High),
        ];
        for (value, expected) in cases {
            let result = classify(Some(&sample(value, TrendCode::Flat)), DisplayUnit::MgDl);
            assert_eq!(result.severity, expected, "{} mg/dL", value);
        }
    }

    #[test]
    fn test_mg_dl_formatting() {
        let result = classify(Some(&sample(120, TrendCode::Flat)), DisplayUnit::MgDl);
        assert_eq!(result.display_text, "120 mg/dL \u{2192}");
    }

    #[test]
    fn test_mmol_boundaries_use_rounded_value() {
        // 70 mg/dL rounds to exactly 3.9 mmol/L, which is Normal
        let result = classify(Some(&sample(70, TrendCode::Flat)), DisplayUnit::MmolL);
        assert_eq!(result.severity, Severity::Normal);

        // 69 mg/dL rounds to 3.8 mmol/L, below the boundary
        let result = classify(Some(&sample(69, TrendCode::Flat)), DisplayUnit::MmolL);
        assert_eq!(result.severity, Severity::Low);

        // 181 mg/dL rounds to 10.0 mmol/L: High in mg/dL mode but Normal
        // here, because the displayed value sits on the boundary
        let result = classify(Some(&sample(181, TrendCode::Flat)), DisplayUnit::MmolL);
        assert_eq!(result.severity, Severity::Normal);

        let result = classify(Some(&sample(182, TrendCode::Flat)), DisplayUnit::MmolL);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn test_mmol_rounding_is_half_up() {
        // 100 * 0.0555 = 5.55, which rounds up to 5.6
        assert_eq!(sample(100, TrendCode::Flat).mmol_l(), 5.6);
        let result = classify(Some(&sample(100, TrendCode::SingleUp)), DisplayUnit::MmolL);
        assert_eq!(result.display_text, "5.6 mmol/L \u{2191}");
    }

    #[test]
    fn test_no_sample_is_unknown() {
        for unit in [DisplayUnit::MgDl, DisplayUnit::MmolL] {
            let result = classify(None, unit);
            assert_eq!(result.severity, Severity::Unknown);
            assert_eq!(result.display_text, NO_DATA_TEXT);
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let s = sample(154, TrendCode::FortyFiveDown);
        let first = classify(Some(&s), DisplayUnit::MmolL);
        let second = classify(Some(&s), DisplayUnit::MmolL);
        assert_eq!(first, second);
    }

    #[test]
    fn test_trend_table_is_complete() {
        for trend in TrendCode::ALL {
            assert!(!trend.arrow().is_empty());
            assert!(!trend.description().is_empty());
        }
        assert_eq!(TrendCode::Unknown.arrow(), "?");
        assert_eq!(TrendCode::Unknown.description(), "unknown");
    }
}
