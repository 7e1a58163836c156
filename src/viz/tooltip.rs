//! Hover tooltip shared by both charts.
//!
//! The content is a pure function of the record and the selected year; the
//! [`Tooltip`] state machine only tracks which bar is hovered and where the
//! pointer is.

use super::ChartSide;
use crate::models::{Month, Record};

/// Pointer offset applied to the tooltip so it does not cover the bar.
pub const TOOLTIP_OFFSET: (f64, f64) = (6.0, -90.0);

pub const HOVER_OPACITY: f64 = 0.85;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    /// e.g. `JUL — 2030`
    pub title: String,
    /// e.g. `8.50 mm/day`
    pub body: String,
}

/// Describe a bar. Records without a value have no bar and therefore no tooltip.
pub fn tooltip_content(record: &Record, year: i32) -> Option<TooltipContent> {
    let value = record.value?;
    Some(TooltipContent {
        title: format!("{} — {}", record.month.key().to_uppercase(), year),
        body: format!("{value:.2} mm/day"),
    })
}

/// Identity of a hovered bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoverTarget {
    pub side: ChartSide,
    pub month: Month,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tooltip {
    target: Option<HoverTarget>,
    content: Option<TooltipContent>,
    pointer: (f64, f64),
}

impl Tooltip {
    /// Pointer entered a bar: replace whatever was shown before.
    pub fn pointer_enter(
        &mut self,
        target: HoverTarget,
        content: TooltipContent,
        pointer: (f64, f64),
    ) {
        self.target = Some(target);
        self.content = Some(content);
        self.pointer = pointer;
    }

    pub fn pointer_move(&mut self, pointer: (f64, f64)) {
        self.pointer = pointer;
    }

    /// Pointer left `target`. A stale leave for a bar that is no longer the
    /// hovered one is ignored.
    pub fn pointer_leave(&mut self, target: HoverTarget) {
        if self.target == Some(target) {
            self.target = None;
            self.content = None;
        }
    }

    /// Drop any hover state, e.g. after the bars were redrawn for another year.
    pub fn hide(&mut self) {
        self.target = None;
        self.content = None;
    }

    /// Feed the current hit-test result, emitting enter/move/leave as needed.
    pub fn track(&mut self, hit: Option<(HoverTarget, TooltipContent)>, pointer: (f64, f64)) {
        match (self.target, hit) {
            (Some(cur), Some((t, _))) if cur == t => self.pointer_move(pointer),
            (cur, Some((t, content))) => {
                if let Some(cur) = cur {
                    self.pointer_leave(cur);
                }
                self.pointer_enter(t, content, pointer);
            }
            (Some(cur), None) => self.pointer_leave(cur),
            (None, None) => {}
        }
    }

    pub fn is_visible(&self) -> bool {
        self.content.is_some()
    }

    pub fn target(&self) -> Option<HoverTarget> {
        self.target
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        self.content.as_ref()
    }

    /// Top-left corner of the tooltip box (pointer plus offset).
    pub fn position(&self) -> (f64, f64) {
        (
            self.pointer.0 + TOOLTIP_OFFSET.0,
            self.pointer.1 + TOOLTIP_OFFSET.1,
        )
    }

    pub fn bar_opacity(&self, target: HoverTarget) -> f64 {
        if self.target == Some(target) {
            HOVER_OPACITY
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(month: Month, value: Option<f64>) -> Record {
        Record {
            model: "ssp2-45".into(),
            year: 2030,
            month,
            value,
        }
    }

    fn target(side: ChartSide, month: Month) -> HoverTarget {
        HoverTarget { side, month }
    }

    #[test]
    fn content_formats_month_and_value() {
        let c = tooltip_content(&rec(Month::Jul, Some(8.5)), 2030).unwrap();
        assert_eq!(c.title, "JUL — 2030");
        assert_eq!(c.body, "8.50 mm/day");
        assert!(tooltip_content(&rec(Month::Jul, None), 2030).is_none());
    }

    #[test]
    fn enter_move_leave() {
        let mut tt = Tooltip::default();
        let t = target(ChartSide::Left, Month::Jul);
        let c = tooltip_content(&rec(Month::Jul, Some(8.5)), 2030).unwrap();

        tt.pointer_enter(t, c.clone(), (100.0, 200.0));
        assert!(tt.is_visible());
        assert_eq!(tt.bar_opacity(t), HOVER_OPACITY);
        assert_eq!(tt.position(), (106.0, 110.0));

        tt.pointer_move((120.0, 210.0));
        assert_eq!(tt.position(), (126.0, 120.0));
        assert_eq!(tt.content(), Some(&c));

        tt.pointer_leave(t);
        assert!(!tt.is_visible());
        assert_eq!(tt.bar_opacity(t), 1.0);
    }

    #[test]
    fn moving_between_bars_replaces_content() {
        let mut tt = Tooltip::default();
        let left = target(ChartSide::Left, Month::Jan);
        let right = target(ChartSide::Right, Month::Feb);
        let a = tooltip_content(&rec(Month::Jan, Some(1.0)), 2030).unwrap();
        let b = tooltip_content(&rec(Month::Feb, Some(2.0)), 2030).unwrap();

        tt.track(Some((left, a)), (10.0, 10.0));
        tt.track(Some((right, b.clone())), (300.0, 10.0));
        assert_eq!(tt.target(), Some(right));
        assert_eq!(tt.content(), Some(&b));
        assert_eq!(tt.bar_opacity(left), 1.0);

        // late leave for the old bar must not hide the new one
        tt.pointer_leave(left);
        assert!(tt.is_visible());

        tt.track(None, (0.0, 0.0));
        assert!(!tt.is_visible());
    }
}
