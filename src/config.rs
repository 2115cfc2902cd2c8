//! Editor configuration.
//!
//! Every field has a default, so a host can pass `{}` (or nothing) and
//! override only what it cares about.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Tunables for windowing, search and ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Estimated row height in pixels
    pub row_height: f64,
    /// Rows rendered beyond each edge of the viewport
    pub overscan: usize,
    /// Threshold used when a search does not specify one
    pub default_threshold: f64,
    /// Lowest threshold the search surface accepts
    pub min_threshold: f64,
    /// Highest threshold the search surface accepts
    pub max_threshold: f64,
    /// Percentage of cells scanned between two yields (1 or 2)
    pub progress_step_percent: u8,
    pub column_sizing: ColumnSizing,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            row_height: 35.0,
            overscan: 10,
            default_threshold: 0.6,
            min_threshold: 0.3,
            max_threshold: 0.95,
            progress_step_percent: 1,
            column_sizing: ColumnSizing::default(),
        }
    }
}

/// Width hints computed for ingested columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnSizing {
    pub char_width: f64,
    /// Room for sort icons, drag handle and resizer
    pub padding: f64,
    pub min_width: f64,
    pub max_width: f64,
    /// Rows sampled for content length
    pub sample_rows: usize,
    /// Fraction of the longest sampled value that has to fit
    pub content_factor: f64,
}

impl Default for ColumnSizing {
    fn default() -> Self {
        Self {
            char_width: 10.0,
            padding: 60.0,
            min_width: 100.0,
            max_width: 500.0,
            sample_rows: 10,
            content_factor: 0.85,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config, filling gaps with defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.row_height.is_nan() || self.row_height <= 0.0 {
            return Err(GridError::InvalidOption(format!(
                "rowHeight must be positive, got {}",
                self.row_height
            )));
        }
        let in_unit = |t: f64| (0.0..=1.0).contains(&t);
        if !in_unit(self.min_threshold)
            || !in_unit(self.max_threshold)
            || self.min_threshold > self.max_threshold
        {
            return Err(GridError::InvalidOption(format!(
                "threshold bounds [{}, {}] must be ordered within [0, 1]",
                self.min_threshold, self.max_threshold
            )));
        }
        if !(self.min_threshold..=self.max_threshold).contains(&self.default_threshold) {
            return Err(GridError::InvalidOption(format!(
                "defaultThreshold {} is outside [{}, {}]",
                self.default_threshold, self.min_threshold, self.max_threshold
            )));
        }
        if self.column_sizing.min_width > self.column_sizing.max_width {
            return Err(GridError::InvalidOption(
                "columnSizing.minWidth exceeds maxWidth".into(),
            ));
        }
        Ok(())
    }

    /// Clamp a requested fuzzy threshold to the accepted range. NaN falls
    /// back to the default.
    pub fn clamp_threshold(&self, threshold: f64) -> f64 {
        if threshold.is_nan() {
            return self.default_threshold;
        }
        threshold.clamp(self.min_threshold, self.max_threshold)
    }

    /// Yield granularity, kept within 1..=2 percent.
    pub fn progress_step(&self) -> u8 {
        self.progress_step_percent.clamp(1, 2)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{"rowHeight": 28, "overscan": 4}"#).unwrap();
        assert_eq!(config.row_height, 28.0);
        assert_eq!(config.overscan, 4);
        assert_eq!(config.default_threshold, 0.6);
        assert_eq!(config.column_sizing.max_width, 500.0);
    }

    #[test]
    fn test_rejects_bad_row_height() {
        assert!(EditorConfig::from_json(r#"{"rowHeight": 0}"#).is_err());
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        assert!(EditorConfig::from_json(r#"{"minThreshold": 0.9, "maxThreshold": 0.5}"#).is_err());
    }

    #[test]
    fn test_rejects_default_threshold_outside_bounds() {
        assert!(EditorConfig::from_json(r#"{"defaultThreshold": 0.2}"#).is_err());
        assert!(EditorConfig::from_json(r#"{"defaultThreshold": 0.8}"#).is_ok());
    }

    #[test]
    fn test_clamp_threshold() {
        let config = EditorConfig::default();
        assert_eq!(config.clamp_threshold(0.1), 0.3);
        assert_eq!(config.clamp_threshold(0.99), 0.95);
        assert_eq!(config.clamp_threshold(0.7), 0.7);
        assert_eq!(config.clamp_threshold(f64::NAN), 0.6);
    }

    #[test]
    fn test_progress_step_clamped() {
        let config = EditorConfig {
            progress_step_percent: 9,
            ..EditorConfig::default()
        };
        assert_eq!(config.progress_step(), 2);
    }
}
