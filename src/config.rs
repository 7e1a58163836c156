//! Session configuration: which two scenarios are compared and how they look.
//!
//! Defaults reproduce the California CMIP comparison (SSP2-4.5 left in blue,
//! SSP1-2.6 right in orange). A JSON file may override any subset of fields,
//! and the binaries apply command-line flags on top of that.

use crate::error::{ChartError, Result};
use crate::layout::Margins;
use crate::scale::DEFAULT_BAND_PADDING;
use crate::viz::color::{Rgba, oklch_to_srgb};
use crate::viz::{ChartSide, ChartStyle};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One compared model run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Model identifier as found in the documents (`"ssp2-45"`).
    pub model: String,
    /// Human header text, shown as `"{label} — {year}"`.
    pub label: String,
    pub color: Rgba,
}

impl Scenario {
    pub fn header(&self, year: i32) -> String {
        format!("{} — {}", self.label, year)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub left: Scenario,
    pub right: Scenario,
    pub margins: Margins,
    pub band_padding: f64,
    pub y_tick_count: usize,
    pub font_px: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            left: Scenario {
                model: "ssp2-45".into(),
                label: "Model SSP2.45".into(),
                color: oklch_to_srgb(0.6029, 0.1283, 235.05), // blue
            },
            right: Scenario {
                model: "ssp1-26".into(),
                label: "Model SSP1.26".into(),
                color: oklch_to_srgb(0.7559, 0.1579, 69.88), // orange
            },
            margins: Margins::default(),
            band_padding: DEFAULT_BAND_PADDING,
            y_tick_count: 5,
            font_px: 12.0,
        }
    }
}

impl Config {
    /// Read a JSON config file; missing fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ChartError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// `from_file` when a path is given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn scenario(&self, side: ChartSide) -> &Scenario {
        match side {
            ChartSide::Left => &self.left,
            ChartSide::Right => &self.right,
        }
    }

    pub fn scenario_mut(&mut self, side: ChartSide) -> &mut Scenario {
        match side {
            ChartSide::Left => &mut self.left,
            ChartSide::Right => &mut self.right,
        }
    }

    pub fn chart_style(&self) -> ChartStyle {
        ChartStyle {
            margins: self.margins,
            band_padding: self.band_padding,
            y_tick_count: self.y_tick_count,
            font_px: self.font_px,
            ..ChartStyle::default()
        }
    }
}
