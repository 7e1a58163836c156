//! Year selection and the re-render loop.
//!
//! The controller owns the selection state and the two chart surfaces. Every
//! triggering event (start, slider input, resize) runs the full pipeline for
//! both charts synchronously, so a render always completes before the next
//! event is handled.

use crate::config::{Config, Scenario};
use crate::error::{ChartError, Result};
use crate::models::Record;
use crate::reshape::Dataset;
use crate::viz::{
    ChartFrame, ChartSide, ChartStyle, HoverTarget, Surface, Tooltip, draw_bar_chart,
    tooltip_content,
};

/// Sorted year domain plus the slider index into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    years: Vec<i32>,
    index: usize,
}

impl Selection {
    pub fn new(years: Vec<i32>) -> Result<Self> {
        if years.is_empty() {
            return Err(ChartError::EmptyDataset);
        }
        Ok(Self { years, index: 0 })
    }

    /// Clamp any slider value into `[0, len - 1]`.
    pub fn clamp_index(&self, raw: i64) -> usize {
        raw.clamp(0, self.max_index() as i64) as usize
    }

    pub fn set_index(&mut self, raw: i64) -> usize {
        self.index = self.clamp_index(raw);
        self.index
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn max_index(&self) -> usize {
        self.years.len() - 1
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn current_year(&self) -> i32 {
        self.years[self.index]
    }

    /// Year for an arbitrary slider value, clamped to the boundary years.
    pub fn year_at(&self, raw: i64) -> i32 {
        self.years[self.clamp_index(raw)]
    }
}

/// Render state. `Rendering` only holds inside one synchronous redraw, so
/// callers always observe `Idle` between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Rendering,
}

/// What caused a render; logged and counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Start,
    Slider,
    Resize,
}

pub struct Controller<S: Surface> {
    dataset: Dataset,
    selection: Selection,
    left: Scenario,
    right: Scenario,
    style: ChartStyle,
    surfaces: [S; 2],
    frames: [Option<ChartFrame>; 2],
    tooltip: Tooltip,
    phase: Phase,
    year_label: String,
    renders: u64,
}

impl<S: Surface> Controller<S> {
    /// Build from a loaded dataset. Fails only when the dataset has no years.
    pub fn new(dataset: Dataset, config: &Config, left: S, right: S) -> Result<Self> {
        let selection = Selection::new(dataset.years())?;
        let models = dataset.models();
        for s in [&config.left, &config.right] {
            if !models.contains(s.model.as_str()) {
                log::warn!("model `{}` not present in data; its chart will be empty", s.model);
            }
        }
        Ok(Self {
            dataset,
            selection,
            left: config.left.clone(),
            right: config.right.clone(),
            style: config.chart_style(),
            surfaces: [left, right],
            frames: [None, None],
            tooltip: Tooltip::default(),
            phase: Phase::Idle,
            year_label: String::new(),
            renders: 0,
        })
    }

    /// Initial draw: selection at the first year.
    pub fn start(&mut self) {
        self.selection.set_index(0);
        self.render(Trigger::Start);
    }

    /// Slider moved to `value` (any integer; clamped).
    pub fn on_slider_input(&mut self, value: i64) {
        let idx = self.selection.set_index(value);
        log::debug!("slider -> index {idx} ({})", self.selection.current_year());
        self.render(Trigger::Slider);
    }

    /// Container size changed: redraw with the unchanged selection.
    pub fn on_resize(&mut self) {
        self.render(Trigger::Resize);
    }

    /// Feed a pointer position (surface coordinates of `side`), or `None` when
    /// the pointer is over neither chart.
    pub fn on_pointer(&mut self, pointer: Option<(ChartSide, (f64, f64))>) {
        let Some((side, pos)) = pointer else {
            self.tooltip.track(None, (0.0, 0.0));
            return;
        };
        let hit = self.frames[side.index()].as_ref().and_then(|f| {
            let bar = f.bar_at(pos)?;
            let content = tooltip_content(&bar.record, f.year)?;
            Some((
                HoverTarget {
                    side,
                    month: bar.month(),
                },
                content,
            ))
        });
        self.tooltip.track(hit, pos);
    }

    fn render(&mut self, trigger: Trigger) {
        debug_assert_eq!(self.phase, Phase::Idle, "re-entrant render");
        self.phase = Phase::Rendering;
        let year = self.selection.current_year();
        self.year_label = year.to_string();
        // bars under the pointer may be gone after a redraw
        self.tooltip.hide();

        for side in ChartSide::BOTH {
            let scenario = match side {
                ChartSide::Left => &self.left,
                ChartSide::Right => &self.right,
            };
            let slice: Vec<&Record> = self.dataset.slice(&scenario.model, year);
            let surface = &mut self.surfaces[side.index()];
            let frame = draw_bar_chart(surface, &slice, scenario.color, year, &self.style);
            self.frames[side.index()] = Some(frame);
        }

        self.renders += 1;
        log::debug!("render #{} ({trigger:?}) year {year}", self.renders);
        self.phase = Phase::Idle;
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn current_year(&self) -> i32 {
        self.selection.current_year()
    }

    /// Text of the year label next to the slider.
    pub fn year_label(&self) -> &str {
        &self.year_label
    }

    pub fn header(&self, side: ChartSide) -> String {
        self.scenario(side).header(self.current_year())
    }

    pub fn scenario(&self, side: ChartSide) -> &Scenario {
        match side {
            ChartSide::Left => &self.left,
            ChartSide::Right => &self.right,
        }
    }

    pub fn surface(&self, side: ChartSide) -> &S {
        &self.surfaces[side.index()]
    }

    /// Mutable access, e.g. to resize a canvas before [`Controller::on_resize`].
    pub fn surface_mut(&mut self, side: ChartSide) -> &mut S {
        &mut self.surfaces[side.index()]
    }

    pub fn frame(&self, side: ChartSide) -> Option<&ChartFrame> {
        self.frames[side.index()].as_ref()
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    /// Always `Idle` between events; see [`Phase`].
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawDocument;
    use crate::viz::{Canvas, ElementKind};

    fn dataset() -> Dataset {
        let docs: Vec<RawDocument> = serde_json::from_str(
            r#"[
              {"model":"ssp2-45","year":2030,"mean_pr":{"jul":8.5}},
              {"model":"ssp1-26","year":2030,"mean_pr":{"jan":1.0,"feb":2.0}},
              {"model":"ssp2-45","year":2050,"mean_pr":{"jan":3.0,"feb":4.0,"mar":5.0}},
              {"model":"ssp1-26","year":2050,"mean_pr":{"jan":14.2}},
              {"model":"ssp2-45","year":2040,"mean_pr":{}}
            ]"#,
        )
        .unwrap();
        Dataset::from_documents(&docs).unwrap()
    }

    fn controller() -> Controller<Canvas> {
        Controller::new(
            dataset(),
            &Config::default(),
            Canvas::new(480.0, 320.0),
            Canvas::new(480.0, 320.0),
        )
        .unwrap()
    }

    #[test]
    fn current_year_is_clamped() {
        let s = Selection::new(vec![2030, 2040, 2050]).unwrap();
        for (i, y) in [2030, 2040, 2050].iter().enumerate() {
            assert_eq!(s.year_at(i as i64), *y);
        }
        assert_eq!(s.year_at(-3), 2030);
        assert_eq!(s.year_at(99), 2050);
        assert!(Selection::new(Vec::new()).is_err());
    }

    #[test]
    fn start_renders_first_year() {
        let mut c = controller();
        c.start();
        assert_eq!(c.current_year(), 2030);
        assert_eq!(c.year_label(), "2030");
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.render_count(), 1);
        assert_eq!(c.surface(ChartSide::Left).count(ElementKind::Bar), 1);
        assert_eq!(c.surface(ChartSide::Right).count(ElementKind::Bar), 2);
        assert_eq!(c.header(ChartSide::Left), "Model SSP2.45 — 2030");
    }

    #[test]
    fn slider_updates_year_and_redraws() {
        let mut c = controller();
        c.start();
        c.on_slider_input(2);
        assert_eq!(c.current_year(), 2050);
        assert_eq!(c.year_label(), "2050");
        assert_eq!(c.surface(ChartSide::Left).count(ElementKind::Bar), 3);
        let right = c.frame(ChartSide::Right).unwrap();
        assert_eq!(right.y.domain(), (0.0, 16.0));

        c.on_slider_input(42);
        assert_eq!(c.selection().index(), 2);
        c.on_slider_input(1);
        assert_eq!(c.surface(ChartSide::Left).count(ElementKind::Bar), 0);
        assert_eq!(c.render_count(), 4);
    }

    #[test]
    fn resize_keeps_the_selected_year() {
        let mut c = controller();
        c.start();
        c.on_slider_input(2);
        let before = c.frame(ChartSide::Left).unwrap().x.bandwidth();
        c.surface_mut(ChartSide::Left).set_size(900.0, 320.0);
        c.on_resize();
        assert_eq!(c.current_year(), 2050);
        assert_eq!(c.year_label(), "2050");
        assert!(c.frame(ChartSide::Left).unwrap().x.bandwidth() > before);
        assert_eq!(c.surface(ChartSide::Left).count(ElementKind::Bar), 3);
    }

    #[test]
    fn hovering_a_bar_shows_the_tooltip() {
        let mut c = controller();
        c.start();
        let bar = c.frame(ChartSide::Left).unwrap().bars[0].clone();
        let inside = (bar.x + bar.width / 2.0, bar.y + bar.height / 2.0);

        c.on_pointer(Some((ChartSide::Left, inside)));
        let tt = c.tooltip().content().unwrap();
        assert_eq!(tt.title, "JUL — 2030");
        assert_eq!(tt.body, "8.50 mm/day");

        // same spot on the other chart has no bar in July
        c.on_pointer(Some((ChartSide::Right, inside)));
        assert!(!c.tooltip().is_visible());

        c.on_pointer(Some((ChartSide::Left, inside)));
        c.on_pointer(None);
        assert!(!c.tooltip().is_visible());
    }

    #[test]
    fn every_trigger_leaves_the_controller_idle() {
        let mut c = controller();
        c.start();
        assert_eq!(c.phase(), Phase::Idle);
        c.on_slider_input(1);
        assert_eq!(c.phase(), Phase::Idle);
        c.surface_mut(ChartSide::Right).set_size(300.0, 200.0);
        c.on_resize();
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.render_count(), 3);
    }

    #[test]
    fn redraw_clears_hover() {
        let mut c = controller();
        c.start();
        let bar = c.frame(ChartSide::Left).unwrap().bars[0].clone();
        c.on_pointer(Some((ChartSide::Left, (bar.x + 1.0, bar.y + 1.0))));
        assert!(c.tooltip().is_visible());
        c.on_slider_input(1);
        assert!(!c.tooltip().is_visible());
    }
}
