//! Plot Settings Module
//! JSON-loadable settings for every chart. Missing fields keep their defaults.

use crate::charts::{
    parse_hex_color, ColorError, Palette, Smoothing, TripleStyle, PALETTE_HEX, TRIPLE_INDEX,
};
use crate::data::ColumnNames;
use crate::stats::DEFAULT_TRUNCATE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid settings in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error("{0} must be positive, got {1}")]
    NonPositive(&'static str, f64),
}

/// Triple plot parameters. `color` of `None` uses the third palette entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripleSettings {
    pub color: Option<String>,
    pub alpha: f64,
    pub markersize: f64,
    pub yr_bin: f64,
    pub hr_bin: f64,
}

impl Default for TripleSettings {
    fn default() -> Self {
        let style = TripleStyle::default();
        Self {
            color: None,
            alpha: style.alpha,
            markersize: style.marker_size,
            yr_bin: style.yr_bin,
            hr_bin: style.hr_bin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingSettings {
    pub sigma: f64,
    pub truncate: f64,
    pub samples: usize,
}

impl Default for SmoothingSettings {
    fn default() -> Self {
        let smoothing = Smoothing::default();
        Self {
            sigma: smoothing.sigma,
            truncate: DEFAULT_TRUNCATE,
            samples: smoothing.samples,
        }
    }
}

impl From<&SmoothingSettings> for Smoothing {
    fn from(s: &SmoothingSettings) -> Self {
        Smoothing {
            sigma: s.sigma,
            truncate: s.truncate,
            samples: s.samples,
        }
    }
}

/// User settings for every chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub width: u32,
    pub height: u32,
    pub columns: ColumnNames,
    pub palette: Vec<String>,
    /// Per-day bin width in years.
    pub day_bin: f64,
    /// Per-hour bin width in hours.
    pub hour_bin: f64,
    pub smoothing: SmoothingSettings,
    pub triple: TripleSettings,
    /// Appended to the time-of-day Y axis description.
    pub time_of_day_label: String,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            columns: ColumnNames::default(),
            palette: PALETTE_HEX.iter().map(|s| s.to_string()).collect(),
            day_bin: 0.3,
            hour_bin: 1.0,
            smoothing: SmoothingSettings::default(),
            triple: TripleSettings::default(),
            time_of_day_label: "(overall)".to_string(),
        }
    }
}

impl PlotSettings {
    /// Load settings from a JSON file. Values absent from the file keep
    /// their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: PlotSettings =
            serde_json::from_str(&text).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("day_bin", self.day_bin),
            ("hour_bin", self.hour_bin),
            ("triple.yr_bin", self.triple.yr_bin),
            ("triple.hr_bin", self.triple.hr_bin),
            ("smoothing.truncate", self.smoothing.truncate),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive(name, value));
            }
        }
        if self.smoothing.sigma < 0.0 {
            return Err(ConfigError::NonPositive("smoothing.sigma", self.smoothing.sigma));
        }
        self.palette()?;
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn palette(&self) -> Result<Palette, ColorError> {
        Palette::from_hex(self.palette.as_slice())
    }

    pub fn triple_style(&self) -> Result<TripleStyle, ConfigError> {
        let color = match &self.triple.color {
            Some(hex) => parse_hex_color(hex)?,
            None => self.palette()?.get(TRIPLE_INDEX),
        };
        Ok(TripleStyle {
            color,
            alpha: self.triple.alpha,
            marker_size: self.triple.markersize,
            yr_bin: self.triple.yr_bin,
            hr_bin: self.triple.hr_bin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::style::RGBColor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_the_chart_defaults() {
        let settings = PlotSettings::default();
        assert_eq!(settings.size(), (1000, 600));
        assert_eq!(settings.triple.yr_bin, 0.1);
        assert_eq!(settings.triple.hr_bin, 0.5);
        assert_eq!(settings.smoothing.samples, 10_000);
        assert_eq!(
            settings.triple_style().unwrap().color,
            RGBColor(0xd2, 0x99, 0x00)
        );
        settings.validate().unwrap();
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_json(
            r#"{ "width": 1600, "columns": { "year": "yr" }, "triple": { "hr_bin": 0.25 } }"#,
        );
        let settings = PlotSettings::load(file.path()).unwrap();
        assert_eq!(settings.width, 1600);
        assert_eq!(settings.height, 600);
        assert_eq!(settings.columns.year, "yr");
        assert_eq!(settings.columns.time_of_day, "time_of_day");
        assert_eq!(settings.triple.hr_bin, 0.25);
        assert_eq!(settings.triple.alpha, 0.8);
    }

    #[test]
    fn invalid_palette_is_rejected() {
        let file = write_json(r##"{ "palette": ["#112233", "nope"] }"##);
        assert!(matches!(
            PlotSettings::load(file.path()),
            Err(ConfigError::Color(_))
        ));
    }

    #[test]
    fn non_positive_bins_are_rejected() {
        let file = write_json(r#"{ "day_bin": 0.0 }"#);
        assert!(matches!(
            PlotSettings::load(file.path()),
            Err(ConfigError::NonPositive("day_bin", _))
        ));
    }

    #[test]
    fn malformed_json_names_the_file() {
        let file = write_json("{ width: ");
        let err = PlotSettings::load(file.path()).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn triple_color_override() {
        let settings = PlotSettings {
            triple: TripleSettings {
                color: Some("#007cbf".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            settings.triple_style().unwrap().color,
            RGBColor(0x00, 0x7c, 0xbf)
        );
    }
}
