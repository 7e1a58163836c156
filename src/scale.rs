//! Band (categorical) and linear scales.
//!
//! Both scales are plain values built from their inputs; nothing is cached
//! between renders.

use crate::models::{Month, Record};

/// Lower bound for the top of the y domain, so charts of dry years stay
/// comparable with wet ones.
pub const Y_DOMAIN_FLOOR: f64 = 11.0;

/// Default fractional padding between (and around) month bands.
pub const DEFAULT_BAND_PADDING: f64 = 0.18;

/// Categorical scale assigning each month a fixed-width slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Twelve month bands over `[0, width]` with equal inner/outer padding and
    /// centred alignment.
    pub fn months(width: f64, padding: f64) -> Self {
        Self::new(Month::ALL.len(), 0.0, width, padding, padding, 0.5)
    }

    pub fn new(
        n: usize,
        range_start: f64,
        range_stop: f64,
        padding_inner: f64,
        padding_outer: f64,
        align: f64,
    ) -> Self {
        let n = n as f64;
        let span = range_stop - range_start;
        let step = span / (n - padding_inner + padding_outer * 2.0).max(1.0);
        let start = range_start + (span - step * (n - padding_inner)) * align;
        Self {
            start,
            step,
            bandwidth: step * (1.0 - padding_inner),
        }
    }

    /// Left edge of band `index`.
    pub fn position(&self, index: usize) -> f64 {
        self.start + self.step * index as f64
    }

    pub fn month(&self, month: Month) -> f64 {
        self.position(month.index())
    }

    /// Centre of band `index` (where ticks and labels go).
    pub fn center(&self, index: usize) -> f64 {
        self.position(index) + self.bandwidth / 2.0
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

/// Linear value → pixel mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            d0: domain.0,
            d1: domain.1,
            r0: range.0,
            r1: range.1,
        }
    }

    /// The vertical precipitation scale: `[0, nice(max(11, max value))]` onto
    /// `[inner_height, 0]`. Missing values are ignored, not counted as zero.
    pub fn precipitation<'a, I>(records: I, inner_height: f64) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let top = domain_max(records.into_iter().filter_map(|r| r.value));
        Self::new((0.0, top), (inner_height, 0.0)).nice(10)
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.d0, self.d1)
    }

    pub fn range(&self) -> (f64, f64) {
        (self.r0, self.r1)
    }

    pub fn map(&self, v: f64) -> f64 {
        let span = self.d1 - self.d0;
        if span == 0.0 {
            return (self.r0 + self.r1) / 2.0;
        }
        self.r0 + (v - self.d0) / span * (self.r1 - self.r0)
    }

    /// Extend the domain outward to multiples of a 1/2/5 × 10^k step.
    pub fn nice(self, count: usize) -> Self {
        let (mut start, mut stop) = (self.d0, self.d1);
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }
        let mut prestep: Option<f64> = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if prestep == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = Some(step);
        }
        let (d0, d1) = if reversed { (stop, start) } else { (start, stop) };
        Self { d0, d1, ..self }
    }

    /// Roughly `count` human-friendly tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.d0 <= self.d1 {
            (self.d0, self.d1)
        } else {
            (self.d1, self.d0)
        };
        nice_ticks(lo, hi, count)
    }
}

/// Top of the y domain before niceing.
pub fn domain_max<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(Y_DOMAIN_FLOOR, f64::max)
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

fn step_factor(error: f64) -> f64 {
    if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    }
}

/// Positive: the tick step. Negative: the inverse of a sub-unit step (so that
/// `-10.0` means 0.1) which keeps decimal steps exact.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = step_factor(error);
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let inc = tick_increment(start, stop, count);
    if inc == 0.0 {
        return Vec::new();
    }
    if inc > 0.0 {
        let i1 = (start / inc).ceil() as i64;
        let i2 = (stop / inc).floor() as i64;
        (i1..=i2).map(|i| i as f64 * inc).collect()
    } else {
        let inv = -inc;
        let i1 = (start * inv).ceil() as i64;
        let i2 = (stop * inv).floor() as i64;
        (i1..=i2).map(|i| i as f64 / inv).collect()
    }
}
