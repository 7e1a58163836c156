//! Colors: CSS-like parsing (`#rrggbb`, `rgb()`, `rgba()`, `oklch()`) into sRGB.

use crate::error::{ChartError, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in 0..=1
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with its opacity multiplied by `factor`.
    pub fn with_opacity(self, factor: f64) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            f.write_str(&self.to_hex())
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

fn rgb_fn_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?\)$")
            .expect("valid rgb regex")
    })
}

fn oklch_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^oklch\(\s*([0-9]*\.?[0-9]+)(%?)\s+([0-9]*\.?[0-9]+)\s+(-?[0-9]*\.?[0-9]+)(?:deg)?\s*\)$")
            .expect("valid oklch regex")
    })
}

impl FromStr for Rgba {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        let t = s.trim().to_ascii_lowercase();
        let bad = || ChartError::Color(s.to_string());

        if let Some(hex) = t.strip_prefix('#') {
            let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2).unwrap_or(""), 16);
            return match hex.len() {
                6 => Ok(Rgba::rgb(
                    byte(0).map_err(|_| bad())?,
                    byte(2).map_err(|_| bad())?,
                    byte(4).map_err(|_| bad())?,
                )),
                8 => Ok(Rgba::rgba(
                    byte(0).map_err(|_| bad())?,
                    byte(2).map_err(|_| bad())?,
                    byte(4).map_err(|_| bad())?,
                    byte(6).map_err(|_| bad())? as f64 / 255.0,
                )),
                _ => Err(bad()),
            };
        }

        if let Some(c) = rgb_fn_re().captures(&t) {
            let channel = |i: usize| -> Result<u8> {
                c[i].parse::<u16>()
                    .ok()
                    .and_then(|v| u8::try_from(v).ok())
                    .ok_or_else(bad)
            };
            let a = match c.get(4) {
                Some(m) => m.as_str().parse::<f64>().map_err(|_| bad())?.clamp(0.0, 1.0),
                None => 1.0,
            };
            return Ok(Rgba::rgba(channel(1)?, channel(2)?, channel(3)?, a));
        }

        if let Some(c) = oklch_re().captures(&t) {
            let mut l: f64 = c[1].parse().map_err(|_| bad())?;
            if &c[2] == "%" {
                l /= 100.0;
            }
            let chroma: f64 = c[3].parse().map_err(|_| bad())?;
            let hue: f64 = c[4].parse().map_err(|_| bad())?;
            return Ok(oklch_to_srgb(l, chroma, hue));
        }

        Err(bad())
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// OKLCH (lightness 0..1, chroma, hue in degrees) → gamut-clipped sRGB.
pub fn oklch_to_srgb(l: f64, chroma: f64, hue_deg: f64) -> Rgba {
    let h = hue_deg.to_radians();
    let (a, b) = (chroma * h.cos(), chroma * h.sin());

    let l_ = l + 0.396_337_777_4 * a + 0.215_803_757_3 * b;
    let m_ = l - 0.105_561_345_8 * a - 0.063_854_172_8 * b;
    let s_ = l - 0.089_484_177_5 * a - 1.291_485_548_0 * b;
    let (l3, m3, s3) = (l_ * l_ * l_, m_ * m_ * m_, s_ * s_ * s_);

    let r = 4.076_741_662_1 * l3 - 3.307_711_591_3 * m3 + 0.230_969_929_2 * s3;
    let g = -1.268_438_004_6 * l3 + 2.609_757_401_1 * m3 - 0.341_319_396_5 * s3;
    let bl = -0.004_196_086_3 * l3 - 0.703_418_614_7 * m3 + 1.707_614_701_0 * s3;

    Rgba::rgb(encode_srgb(r), encode_srgb(g), encode_srgb(bl))
}

fn encode_srgb(linear: f64) -> u8 {
    let c = linear.clamp(0.0, 1.0);
    let v = if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
