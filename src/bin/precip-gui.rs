/*!
 * Desktop viewer for precip-compare
 *
 * Two bar charts side by side (one per scenario) with a year slider:
 * - Moving the slider redraws both charts for the selected year
 * - Resizing the window redraws both charts at the new size
 * - Hovering a bar shows its month, year and value
 *
 * Platform support: Windows, macOS, Linux
 */

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use precip_compare::loader::{DEFAULT_DATA_FILE, DataSource, load_dataset};
use precip_compare::viz::{ChartSide, Element, HAlign, HoverTarget, Label, Rgba, Surface, VAlign};
use precip_compare::{Canvas, Config, Controller};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "precip-gui", version, about = "Interactive scenario comparison")]
struct GuiArgs {
    /// Data file path or http(s) URL.
    #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
    data: String,
    /// JSON config file (scenarios, colors, margins).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    model_a: Option<String>,
    #[arg(long)]
    model_b: Option<String>,
}

fn main() -> Result<()> {
    // Enable logging for better debugging
    env_logger::init();
    let args = GuiArgs::parse();

    let mut config = Config::load(args.config.as_deref()).context("reading config")?;
    if let Some(m) = args.model_a {
        config.scenario_mut(ChartSide::Left).model = m;
    }
    if let Some(m) = args.model_b {
        config.scenario_mut(ChartSide::Right).model = m;
    }

    // Data must be in place before the first frame; a failed load ends here.
    let source = DataSource::parse(&args.data);
    let data = load_dataset(&source).with_context(|| format!("loading {source}"))?;
    let mut ctl = Controller::new(
        data,
        &config,
        Canvas::new(480.0, 320.0),
        Canvas::new(480.0, 320.0),
    )?;
    ctl.start();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 520.0])
            .with_min_inner_size([500.0, 300.0])
            .with_title("Monthly Precipitation - Scenario Comparison"),
        ..Default::default()
    };

    eframe::run_native(
        "Monthly Precipitation",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(PrecipApp::new(ctl)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

struct PrecipApp {
    ctl: Controller<Canvas>,
    slider: usize,
    chart_rects: [egui::Rect; 2],
}

impl PrecipApp {
    fn new(ctl: Controller<Canvas>) -> Self {
        Self {
            slider: ctl.selection().index(),
            ctl,
            chart_rects: [egui::Rect::NOTHING; 2],
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Year:");
            let max = self.ctl.selection().max_index();
            let resp = ui.add(egui::Slider::new(&mut self.slider, 0..=max).show_value(false));
            if resp.changed() {
                self.ctl.on_slider_input(self.slider as i64);
            }
            ui.strong(self.ctl.year_label());
        });
    }

    fn charts(&mut self, ui: &mut egui::Ui) {
        let mut painters: Vec<egui::Painter> = Vec::with_capacity(2);
        let mut hovered: Option<(ChartSide, (f64, f64))> = None;

        ui.columns(2, |cols| {
            for side in ChartSide::BOTH {
                let ui = &mut cols[side.index()];
                ui.vertical_centered(|ui| {
                    ui.heading(self.ctl.header(side));
                });
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
                self.chart_rects[side.index()] = rect;
                painters.push(ui.painter_at(rect));
                if let Some(p) = response.hover_pos() {
                    let local = p - rect.min;
                    hovered = Some((side, (local.x as f64, local.y as f64)));
                }
            }
        });

        // Re-measure both containers; a changed size triggers a full redraw.
        let mut resized = false;
        for side in ChartSide::BOTH {
            let size = self.chart_rects[side.index()].size();
            let (w, h) = (size.x as f64, size.y as f64);
            let canvas = self.ctl.surface_mut(side);
            if canvas.size() != (w, h) {
                canvas.set_size(w, h);
                resized = true;
            }
        }
        if resized {
            self.ctl.on_resize();
        }

        self.ctl.on_pointer(hovered);

        for (side, painter) in ChartSide::BOTH.into_iter().zip(&painters) {
            self.paint_chart(painter, side);
        }
    }

    fn paint_chart(&self, painter: &egui::Painter, side: ChartSide) {
        let origin = self.chart_rects[side.index()].min;
        let at = |(x, y): (f64, f64)| origin + egui::vec2(x as f32, y as f32);
        let tooltip = self.ctl.tooltip();

        painter.rect_filled(self.chart_rects[side.index()], 0.0, egui::Color32::WHITE);
        for el in self.ctl.surface(side).elements() {
            match el {
                Element::GridLine(l) | Element::AxisLine(l) => {
                    painter.line_segment(
                        [at(l.from), at(l.to)],
                        egui::Stroke::new(l.width as f32, color32(l.color)),
                    );
                }
                Element::Bar(b) => {
                    let opacity = tooltip.bar_opacity(HoverTarget {
                        side,
                        month: b.month(),
                    });
                    let rect = egui::Rect::from_min_size(
                        at((b.x, b.y)),
                        egui::vec2(b.width as f32, b.height as f32),
                    );
                    painter.rect_filled(rect, 0.0, color32(b.fill.with_opacity(opacity)));
                }
                Element::TickLabel(l) | Element::Title(l) => paint_label(painter, at(l.at), l),
            }
        }
    }

    fn tooltip_overlay(&self, ctx: &egui::Context) {
        let tooltip = self.ctl.tooltip();
        let (Some(target), Some(content)) = (tooltip.target(), tooltip.content()) else {
            return;
        };
        let (x, y) = tooltip.position();
        let pos = self.chart_rects[target.side.index()].min + egui::vec2(x as f32, y as f32);
        egui::Area::new(egui::Id::new("precip_tooltip"))
            .order(egui::Order::Tooltip)
            .fixed_pos(pos)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(egui::RichText::new(&content.title).strong());
                    ui.label(&content.body);
                });
            });
    }
}

impl eframe::App for PrecipApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.controls(ui);
            ui.add_space(4.0);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.charts(ui);
        });
        self.tooltip_overlay(ctx);
    }
}

fn color32(c: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, (c.a * 255.0).round() as u8)
}

fn paint_label(painter: &egui::Painter, pos: egui::Pos2, l: &Label) {
    let font = egui::FontId::proportional(l.font_px as f32);
    let color = color32(l.color);
    if l.vertical {
        // rotate -90° about the galley's top-left; centre it on the anchor
        let galley = painter.layout_no_wrap(l.text.clone(), font, color);
        let size = galley.size();
        let top_left = pos + egui::vec2(-size.y, size.x / 2.0);
        painter.add(
            egui::epaint::TextShape::new(top_left, galley, color)
                .with_angle(-std::f32::consts::FRAC_PI_2),
        );
        return;
    }
    let h = match l.h_align {
        HAlign::Start => egui::Align::Min,
        HAlign::Middle => egui::Align::Center,
        HAlign::End => egui::Align::Max,
    };
    let v = match l.v_align {
        VAlign::Top => egui::Align::Min,
        VAlign::Center => egui::Align::Center,
        VAlign::Baseline => egui::Align::Max,
    };
    painter.text(pos, egui::Align2([h, v]), &l.text, font, color);
}
