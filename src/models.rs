use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Calendar month, used as the categorical axis of every chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// All months in calendar order. This is also the band order of the x axis.
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Lower-case key as used in the `mean_pr` mapping (`"jan"`).
    pub fn key(self) -> &'static str {
        match self {
            Month::Jan => "jan",
            Month::Feb => "feb",
            Month::Mar => "mar",
            Month::Apr => "apr",
            Month::May => "may",
            Month::Jun => "jun",
            Month::Jul => "jul",
            Month::Aug => "aug",
            Month::Sep => "sep",
            Month::Oct => "oct",
            Month::Nov => "nov",
            Month::Dec => "dec",
        }
    }

    /// Zero-based position in the calendar (and on the band scale).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_key(key: &str) -> Option<Month> {
        Month::ALL.iter().copied().find(|m| m.key() == key)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One input document: a model/year pair with twelve monthly means.
///
/// `year` may arrive as a JSON number or a string; `mean_pr` is kept as raw JSON
/// values so that absent or non-numeric months survive deserialization and turn
/// into missing values downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    pub model: String,
    #[serde(deserialize_with = "de_i32_from_string_or_number")]
    pub year: i32,
    #[serde(default)]
    pub mean_pr: BTreeMap<String, serde_json::Value>,
}

impl RawDocument {
    /// Numeric value for `month`, if present and numeric.
    pub fn value_for(&self, month: Month) -> Option<f64> {
        self.mean_pr.get(month.key()).and_then(serde_json::Value::as_f64)
    }
}

/// Serde helper: parse `i32` from a JSON integer, float (truncated) or string.
fn de_i32_from_string_or_number<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct I32Visitor;

    impl<'de> Visitor<'de> for I32Visitor {
        type Value = i32;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or number representing a year")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i32::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i32::try_from(v).map_err(E::custom)
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() {
                return Err(E::custom("non-finite year"));
            }
            Ok(v.trunc() as i32)
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let s = s.trim();
            s.parse::<i32>()
                .or_else(|_| s.parse::<f64>().map(|f| f.trunc() as i32))
                .map_err(E::custom)
        }
    }

    deserializer.deserialize_any(I32Visitor)
}

/// Tidy structure used by this crate (one row = one model/year/month observation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub model: String,
    pub year: i32,
    pub month: Month,
    /// Monthly mean precipitation in mm/day; `None` when the document lacked it.
    pub value: Option<f64>,
}

/// Key identifying a record within a dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    pub model: String,
    pub year: i32,
    pub month: Month,
}

impl From<&Record> for RecordKey {
    fn from(r: &Record) -> Self {
        Self {
            model: r.model.clone(),
            year: r.year,
            month: r.month,
        }
    }
}
