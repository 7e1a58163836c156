//! Chart layout: margins, inner drawing rectangle and tick geometry.

use crate::scale::{BandScale, LinearScale};
use serde::{Deserialize, Serialize};

/// Fixed margins around the plotting rectangle (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 10.0,
            right: 18.0,
            bottom: 38.0,
            left: 42.0,
        }
    }
}

/// Inner rectangle of one chart. Inner sizes may be negative when the
/// container is smaller than the margins; callers then draw nothing useful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub inner_width: f64,
    pub inner_height: f64,
}

impl Layout {
    pub fn new(width: f64, height: f64, margins: Margins) -> Self {
        Self {
            width,
            height,
            margins,
            inner_width: width - margins.left - margins.right,
            inner_height: height - margins.top - margins.bottom,
        }
    }

    /// Translation applied to everything drawn inside the plotting rectangle.
    pub fn offset(&self) -> (f64, f64) {
        (self.margins.left, self.margins.top)
    }

    /// Inner coordinates → surface coordinates.
    pub fn to_surface(&self, (x, y): (f64, f64)) -> (f64, f64) {
        let (dx, dy) = self.offset();
        (x + dx, y + dy)
    }

    /// Anchor of the "Month" title (surface coordinates, centred).
    pub fn x_title_anchor(&self) -> (f64, f64) {
        (self.width / 2.0, self.height - self.margins.bottom / 30.0)
    }

    /// Anchor of the y title (surface coordinates, centred, text rotated -90°).
    pub fn y_title_anchor(&self) -> (f64, f64) {
        (self.margins.left / 3.0, self.height / 2.0)
    }

    pub fn is_degenerate(&self) -> bool {
        self.inner_width <= 0.0 || self.inner_height <= 0.0
    }
}

/// One y tick: data value and pixel row (inner coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YTick {
    pub value: f64,
    pub y: f64,
}

/// One x tick: band index and pixel column of the band centre (inner coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XTick {
    pub index: usize,
    pub x: f64,
}

/// Y ticks shared by the gridlines and the left axis.
pub fn y_ticks(y: &LinearScale, count: usize) -> Vec<YTick> {
    y.ticks(count)
        .into_iter()
        .map(|value| YTick {
            value,
            y: y.map(value),
        })
        .collect()
}

pub fn x_ticks(x: &BandScale, n: usize) -> Vec<XTick> {
    (0..n)
        .map(|index| XTick {
            index,
            x: x.center(index),
        })
        .collect()
}

/// Label for a y tick: whole numbers without decimals, otherwise the shortest
/// representation up to two decimals.
pub fn format_y_tick(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        let s = format!("{:.2}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
