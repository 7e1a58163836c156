//! Chart rendering: turns one model/year slice into axis-annotated bar geometry
//! on a [`Surface`].
//!
//! - Every draw clears the surface first, so repeated draws never accumulate
//! - Gridlines are emitted before bars (drawn behind them)
//! - Missing monthly values produce no bar (not a zero-height bar)
//! - Geometry is in surface pixels with the margin offset already applied
//!
//! The surface is backend-neutral. [`export`] paints it through plotters (SVG/PNG),
//! the GUI binary paints it through egui.

pub mod color;
pub mod export;
pub mod tooltip;

pub use color::Rgba;
pub use tooltip::{HoverTarget, Tooltip, TooltipContent, tooltip_content};

use crate::layout::{Layout, Margins, format_y_tick, x_ticks, y_ticks};
use crate::models::{Month, Record};
use crate::scale::{BandScale, DEFAULT_BAND_PADDING, LinearScale};

/// Which of the two side-by-side charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSide {
    Left,
    Right,
}

impl ChartSide {
    pub const BOTH: [ChartSide; 2] = [ChartSide::Left, ChartSide::Right];

    pub fn index(self) -> usize {
        match self {
            ChartSide::Left => 0,
            ChartSide::Right => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Baseline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub color: Rgba,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub at: (f64, f64),
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub font_px: f64,
    pub color: Rgba,
    /// Rotated -90° (reads bottom to top).
    pub vertical: bool,
}

/// One filled bar; keeps its record so pointer handlers can describe it.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub record: Record,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Rgba,
}

impl Bar {
    pub fn month(&self) -> Month {
        self.record.month
    }

    pub fn contains(&self, (px, py): (f64, f64)) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// Drawable primitive on a chart surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    GridLine(Line),
    AxisLine(Line),
    TickLabel(Label),
    Title(Label),
    Bar(Bar),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    GridLine,
    AxisLine,
    TickLabel,
    Title,
    Bar,
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::GridLine(_) => ElementKind::GridLine,
            Element::AxisLine(_) => ElementKind::AxisLine,
            Element::TickLabel(_) => ElementKind::TickLabel,
            Element::Title(_) => ElementKind::Title,
            Element::Bar(_) => ElementKind::Bar,
        }
    }
}

/// Drawable target region for one chart.
///
/// The size is read on every draw; nothing drawn survives a [`Surface::clear`].
pub trait Surface {
    fn size(&self) -> (f64, f64);
    fn clear(&mut self);
    fn push(&mut self, element: Element);
}

/// In-memory surface: an ordered display list painted by a backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canvas {
    width: f64,
    height: f64,
    elements: Vec<Element>,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    /// Update the container size; takes effect on the next draw.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn count(&self, kind: ElementKind) -> usize {
        self.elements.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn bars(&self) -> impl Iterator<Item = &Bar> {
        self.elements.iter().filter_map(|e| match e {
            Element::Bar(b) => Some(b),
            _ => None,
        })
    }
}

impl Surface for Canvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn push(&mut self, element: Element) {
        self.elements.push(element);
    }
}

/// Visual constants shared by both charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub margins: Margins,
    pub band_padding: f64,
    pub y_tick_count: usize,
    pub font_px: f64,
    pub axis_text: Rgba,
    pub axis_line: Rgba,
    pub grid_line: Rgba,
    pub title_text: Rgba,
    pub x_title: String,
    pub y_title: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            band_padding: DEFAULT_BAND_PADDING,
            y_tick_count: 5,
            font_px: 12.0,
            axis_text: Rgba::rgb(0x1d, 0x1f, 0x37),
            axis_line: Rgba::rgba(0, 0, 0, 0.7),
            grid_line: Rgba::rgba(0, 0, 0, 0.15),
            title_text: Rgba::rgb(0x44, 0x44, 0x44),
            x_title: "Month".to_string(),
            y_title: "Avg Precipitation (mm/day)".to_string(),
        }
    }
}

// tick mark length and label gap
const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

/// Geometry of the last draw, kept for pointer hit-testing.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub layout: Layout,
    pub x: BandScale,
    pub y: LinearScale,
    pub year: i32,
    pub bars: Vec<Bar>,
}

impl ChartFrame {
    /// Topmost bar under `pos` (surface coordinates).
    pub fn bar_at(&self, pos: (f64, f64)) -> Option<&Bar> {
        self.bars.iter().rev().find(|b| b.contains(pos))
    }
}

/// Fully redraw one chart on `surface`.
///
/// `data` is the slice for one model and year; records without a value are skipped.
pub fn draw_bar_chart<S: Surface + ?Sized>(
    surface: &mut S,
    data: &[&Record],
    color: Rgba,
    year: i32,
    style: &ChartStyle,
) -> ChartFrame {
    surface.clear();

    let (width, height) = surface.size();
    let layout = Layout::new(width, height, style.margins);
    let inner_w = layout.inner_width;
    let inner_h = layout.inner_height;
    if layout.is_degenerate() {
        log::debug!("chart {width}x{height} is smaller than its margins");
    }

    let x = BandScale::months(inner_w, style.band_padding);
    let y = LinearScale::precipitation(data.iter().copied(), inner_h);
    let to = |p: (f64, f64)| layout.to_surface(p);

    // gridlines (behind everything else)
    let yt = y_ticks(&y, style.y_tick_count);
    for t in &yt {
        surface.push(Element::GridLine(Line {
            from: to((0.0, t.y)),
            to: to((inner_w, t.y)),
            color: style.grid_line,
            width: 1.0,
        }));
    }

    // bottom axis
    surface.push(Element::AxisLine(Line {
        from: to((0.0, inner_h)),
        to: to((inner_w, inner_h)),
        color: style.axis_line,
        width: 1.0,
    }));
    for t in x_ticks(&x, Month::ALL.len()) {
        surface.push(Element::AxisLine(Line {
            from: to((t.x, inner_h)),
            to: to((t.x, inner_h + TICK_SIZE)),
            color: style.axis_line,
            width: 1.0,
        }));
        surface.push(Element::TickLabel(Label {
            text: Month::ALL[t.index].key().to_string(),
            at: to((t.x, inner_h + TICK_SIZE + TICK_PADDING)),
            h_align: HAlign::Middle,
            v_align: VAlign::Top,
            font_px: style.font_px,
            color: style.axis_text,
            vertical: false,
        }));
    }

    // left axis
    surface.push(Element::AxisLine(Line {
        from: to((0.0, 0.0)),
        to: to((0.0, inner_h)),
        color: style.axis_line,
        width: 1.0,
    }));
    for t in &yt {
        surface.push(Element::AxisLine(Line {
            from: to((-TICK_SIZE, t.y)),
            to: to((0.0, t.y)),
            color: style.axis_line,
            width: 1.0,
        }));
        surface.push(Element::TickLabel(Label {
            text: format_y_tick(t.value),
            at: to((-(TICK_SIZE + TICK_PADDING), t.y)),
            h_align: HAlign::End,
            v_align: VAlign::Center,
            font_px: style.font_px,
            color: style.axis_text,
            vertical: false,
        }));
    }

    // bars
    let mut bars = Vec::with_capacity(data.len());
    for r in data {
        let Some(v) = r.value else { continue };
        let top = y.map(v);
        let (bx, by) = to((x.month(r.month), top));
        let bar = Bar {
            record: (*r).clone(),
            x: bx,
            y: by,
            width: x.bandwidth(),
            height: (inner_h - top).max(0.0),
            fill: color,
        };
        surface.push(Element::Bar(bar.clone()));
        bars.push(bar);
    }

    // axis titles
    surface.push(Element::Title(Label {
        text: style.x_title.clone(),
        at: layout.x_title_anchor(),
        h_align: HAlign::Middle,
        v_align: VAlign::Baseline,
        font_px: style.font_px,
        color: style.title_text,
        vertical: false,
    }));
    surface.push(Element::Title(Label {
        text: style.y_title.clone(),
        at: layout.y_title_anchor(),
        h_align: HAlign::Middle,
        v_align: VAlign::Baseline,
        font_px: style.font_px,
        color: style.title_text,
        vertical: true,
    }));

    log::trace!("drew {} bars for {year} on {width}x{height}", bars.len());

    ChartFrame {
        layout,
        x,
        y,
        year,
        bars,
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

    fn draw(c: &mut Canvas, slice: &[&Record]) -> ChartFrame {
        draw_bar_chart(c, slice, Rgba::rgb(0, 0, 0), 2030, &ChartStyle::default())
    }

    fn full_year() -> Vec<Record> {
        Month::ALL
            .iter()
            .enumerate()
            .map(|(i, &m)| rec(m, Some(i as f64 * 0.5)))
            .collect()
    }

    #[test]
    fn redraw_does_not_accumulate() {
        let rows = full_year();
        let slice: Vec<&Record> = rows.iter().collect();
        let mut c = Canvas::new(480.0, 320.0);
        let style = ChartStyle::default();

        draw_bar_chart(&mut c, &slice, Rgba::rgb(0, 0, 255), 2030, &style);
        let first = c.clone();
        draw_bar_chart(&mut c, &slice, Rgba::rgb(0, 0, 255), 2030, &style);

        assert_eq!(c, first);
        assert_eq!(c.count(ElementKind::Bar), 12);
        assert_eq!(c.count(ElementKind::Title), 2);
        // [0, 11] domain → ticks 0,2,..,10
        assert_eq!(c.count(ElementKind::GridLine), 6);
        // 12 month labels + 6 value labels
        assert_eq!(c.count(ElementKind::TickLabel), 18);
        // 2 domain lines + 12 + 6 tick marks
        assert_eq!(c.count(ElementKind::AxisLine), 20);
    }

    #[test]
    fn gridlines_come_before_bars() {
        let rows = full_year();
        let slice: Vec<&Record> = rows.iter().collect();
        let mut c = Canvas::new(480.0, 320.0);
        draw(&mut c, &slice);
        let last_grid = c
            .elements()
            .iter()
            .rposition(|e| e.kind() == ElementKind::GridLine)
            .unwrap();
        let first_bar = c
            .elements()
            .iter()
            .position(|e| e.kind() == ElementKind::Bar)
            .unwrap();
        assert!(last_grid < first_bar);
    }

    #[test]
    fn missing_months_draw_no_bar() {
        let rows = vec![rec(Month::Jan, None), rec(Month::Jul, Some(8.5))];
        let slice: Vec<&Record> = rows.iter().collect();
        let mut c = Canvas::new(480.0, 320.0);
        let frame = draw(&mut c, &slice);
        assert_eq!(c.count(ElementKind::Bar), 1);
        assert_eq!(frame.bars.len(), 1);
        assert_eq!(frame.bars[0].month(), Month::Jul);
        // month labels are drawn for all twelve bands regardless
        assert_eq!(
            c.elements()
                .iter()
                .filter(|e| matches!(e, Element::TickLabel(l) if l.v_align == VAlign::Top))
                .count(),
            12
        );
    }

    #[test]
    fn bar_geometry_matches_scales() {
        let rows = vec![rec(Month::Mar, Some(5.5))];
        let slice: Vec<&Record> = rows.iter().collect();
        let mut c = Canvas::new(500.0, 300.0);
        let frame = draw(&mut c, &slice);
        let bar = &frame.bars[0];
        let inner_h = frame.layout.inner_height;
        assert!((bar.height - inner_h * 5.5 / 11.0).abs() < 1e-9);
        assert!((bar.x - (42.0 + frame.x.position(2))).abs() < 1e-9);
        assert!((bar.y + bar.height - (10.0 + inner_h)).abs() < 1e-9);
        assert!((bar.width - frame.x.bandwidth()).abs() < 1e-9);
        assert!(frame.bar_at((bar.x + 1.0, bar.y + 1.0)).is_some());
        assert!(frame.bar_at((bar.x - 1.0, bar.y + 1.0)).is_none());
    }

    #[test]
    fn size_is_read_on_every_draw() {
        let rows = full_year();
        let slice: Vec<&Record> = rows.iter().collect();
        let mut c = Canvas::new(480.0, 320.0);
        let a = draw(&mut c, &slice);
        c.set_size(960.0, 320.0);
        let b = draw(&mut c, &slice);
        assert!(b.x.bandwidth() > a.x.bandwidth());
        assert_eq!(c.count(ElementKind::Bar), 12);
    }

    #[test]
    fn degenerate_container_does_not_panic() {
        let rows = full_year();
        let slice: Vec<&Record> = rows.iter().collect();
        let mut c = Canvas::new(10.0, 10.0);
        let frame = draw(&mut c, &slice);
        assert!(frame.layout.is_degenerate());
        assert!(frame.bars.iter().all(|b| b.height >= 0.0));
    }
}
