//! Chart configuration.
//!
//! Loaded from JSON; every field is optional and falls back to the built-in
//! noise monitor layout.

use crate::charts::geometry::{Padding, DB_MAX};
use crate::charts::style::Color;
use crate::error::{ChartError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identifier of the drawing target the chart mounts on.
pub const DEFAULT_TARGET_ID: &str = "noiseChart";

const DEFAULT_TICKS: [&str; 12] = [
    "5:18", "5:20", "5:22", "5:24", "5:26", "5:28", "5:30", "5:32", "5:34", "5:36", "5:38",
    "5:40",
];

const DEFAULT_SAMPLES: [f64; 11] = [72.0, 22.0, 38.0, 32.0, 48.0, 16.0, 76.0, 44.0, 50.0, 88.0, 40.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub target_id: String,
    pub padding: Padding,
    pub x_ticks: Vec<String>,
    pub samples: Vec<f64>,
    /// Reference line level in dB.
    pub threshold: f64,
    pub animation: AnimationConfig,
    pub theme: Theme,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            target_id: DEFAULT_TARGET_ID.to_string(),
            padding: Padding::default(),
            x_ticks: DEFAULT_TICKS.iter().map(|t| t.to_string()).collect(),
            samples: DEFAULT_SAMPLES.to_vec(),
            threshold: 50.0,
            animation: AnimationConfig::default(),
            theme: Theme::default(),
        }
    }
}

/// Per-tick jitter: `v[i] += sin(phase + i * index_phase) * amplitude`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub phase_step: f64,
    pub amplitude: f64,
    pub index_phase: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            phase_step: 0.02,
            amplitude: 1.5,
            index_phase: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: Color,
    pub grid: Color,
    pub label: Color,
    pub threshold: Color,
    pub series: Color,
    pub fill_top: Color,
    pub fill_bottom: Color,
    pub marker_outline: Color,
    pub font_family: String,
    pub font_size: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::rgb(0x2D, 0x30, 0x37),
            grid: Color::rgba(138, 146, 168, 89),
            label: Color::rgb(0x8A, 0x92, 0xA8),
            threshold: Color::rgb(0xFF, 0x3A, 0x3A),
            series: Color::rgb(0xC2, 0xF4, 0x67),
            fill_top: Color::rgba(194, 244, 103, 128),
            fill_bottom: Color::rgba(194, 244, 103, 13),
            marker_outline: Color::WHITE,
            font_family: "sans-serif".to_string(),
            font_size: 12.0,
        }
    }
}

impl ChartConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ChartError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded chart config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: ChartConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.x_ticks.len() < 2 {
            return Err(ChartError::invalid_config("at least 2 x_ticks are required"));
        }
        if self.samples.is_empty() {
            return Err(ChartError::invalid_config("at least one sample is required"));
        }
        if self.samples.len() > self.x_ticks.len() {
            return Err(ChartError::invalid_config(format!(
                "{} samples but only {} x_ticks",
                self.samples.len(),
                self.x_ticks.len()
            )));
        }
        if let Some(v) = self
            .samples
            .iter()
            .find(|v| !(0.0..=DB_MAX).contains(*v))
        {
            return Err(ChartError::invalid_config(format!(
                "sample {v} is outside 0..={DB_MAX}"
            )));
        }
        if !(0.0..=DB_MAX).contains(&self.threshold) {
            return Err(ChartError::invalid_config(format!(
                "threshold {} is outside 0..={DB_MAX}",
                self.threshold
            )));
        }
        let p = &self.padding;
        if [p.top, p.right, p.bottom, p.left]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ChartError::invalid_config(
                "padding must be finite and non-negative",
            ));
        }
        if !(self.theme.font_size.is_finite() && self.theme.font_size > 0.0) {
            return Err(ChartError::invalid_config("font_size must be positive"));
        }
        Ok(())
    }
}
