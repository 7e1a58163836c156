//! Paint rendered chart surfaces to **SVG** or **PNG** files via plotters.
//!
//! The output format follows the file extension (`.svg` → SVG, anything else →
//! PNG). SVG text is emitted as `<text>` elements and needs no font data; the
//! bitmap backend rasterizes glyphs through `ab_glyph`, which cannot discover
//! OS fonts, so PNG output requires a TrueType file registered with
//! [`register_font_file`] first.

use super::{Canvas, Element, HAlign, Label, Line, Rgba, Surface, VAlign};
use crate::error::{ChartError, Result};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle, FontTransform};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;
use std::sync::OnceLock;

/// Height of the header band above each chart (pixels).
pub const HEADER_HEIGHT: u32 = 36;
const HEADER_FONT_PX: f64 = 16.0;

static FONT_REGISTERED: OnceLock<()> = OnceLock::new();

/// Register a TTF/OTF file as the "sans-serif" family for bitmap output.
/// Only the first successful registration takes effect.
pub fn register_font_file<P: AsRef<Path>>(path: P) -> Result<()> {
    if FONT_REGISTERED.get().is_some() {
        return Ok(());
    }
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ChartError::Io {
        path: path.display().to_string(),
        source,
    })?;
    // ab_glyph keeps a 'static reference to the font data
    let data: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font("sans-serif", FontStyle::Normal, data)
        .map_err(|_| {
            ChartError::Font(format!(
                "{}: not a valid TrueType/OpenType font",
                path.display()
            ))
        })?;
    let _ = FONT_REGISTERED.set(());
    log::debug!("registered font {}", path.display());
    Ok(())
}

/// One chart with its header line.
pub struct Panel<'a> {
    pub header: &'a str,
    pub canvas: &'a Canvas,
}

/// Write the panels side by side to `out_path`, each `width / n` wide, headers on top.
pub fn save_panels<P: AsRef<Path>>(
    panels: &[Panel<'_>],
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    let out_path = out_path.as_ref();
    let is_svg = out_path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    if is_svg {
        let root = SVGBackend::new(out_path, (width, height)).into_drawing_area();
        draw_panels(root, panels)?;
    } else {
        if FONT_REGISTERED.get().is_none() {
            return Err(ChartError::Font(
                "bitmap output needs a registered font (use an .svg path or pass a TTF font)"
                    .into(),
            ));
        }
        let root = BitMapBackend::new(out_path, (width, height)).into_drawing_area();
        draw_panels(root, panels)?;
    }
    log::info!("wrote {}", out_path.display());
    Ok(())
}

fn backend_err<E: std::fmt::Debug>(e: E) -> ChartError {
    ChartError::Backend(format!("{e:?}"))
}

fn draw_panels<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    panels: &[Panel<'_>],
) -> Result<()> {
    root.fill(&WHITE).map_err(backend_err)?;
    let columns = root.split_evenly((1, panels.len().max(1)));

    for (col, panel) in columns.iter().zip(panels) {
        let (header, chart) = col.split_vertically(HEADER_HEIGHT);
        let (hw, hh) = header.dim_in_pixel();
        let style = text_style(
            HEADER_FONT_PX,
            Rgba::rgb(0x1d, 0x1f, 0x37),
            HAlign::Middle,
            VAlign::Center,
            false,
        );
        header
            .draw(&Text::new(
                panel.header.to_string(),
                ((hw / 2) as i32, (hh / 2) as i32),
                style,
            ))
            .map_err(backend_err)?;
        draw_canvas(&chart, panel.canvas)?;
    }

    root.present().map_err(backend_err)?;
    Ok(())
}

/// Paint one surface's display list onto a drawing area of the same size.
pub fn draw_canvas<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    canvas: &Canvas,
) -> Result<()> {
    let (w, h) = canvas.size();
    if w <= 0.0 || h <= 0.0 {
        return Ok(());
    }
    for el in canvas.elements() {
        match el {
            Element::GridLine(l) | Element::AxisLine(l) => draw_line(area, l)?,
            Element::Bar(b) => {
                if b.width <= 0.0 || b.height <= 0.0 {
                    continue;
                }
                let rect = Rectangle::new(
                    [
                        (px(b.x), px(b.y)),
                        (px(b.x + b.width), px(b.y + b.height)),
                    ],
                    rgba(b.fill).filled(),
                );
                area.draw(&rect).map_err(backend_err)?;
            }
            Element::TickLabel(l) | Element::Title(l) => draw_label(area, l)?,
        }
    }
    Ok(())
}

fn draw_line<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, l: &Line) -> Result<()> {
    let style = rgba(l.color).stroke_width(l.width.round().max(1.0) as u32);
    area.draw(&PathElement::new(
        vec![(px(l.from.0), px(l.from.1)), (px(l.to.0), px(l.to.1))],
        style,
    ))
    .map_err(backend_err)
}

fn draw_label<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, l: &Label) -> Result<()> {
    let style = text_style(l.font_px, l.color, l.h_align, l.v_align, l.vertical);
    area.draw(&Text::new(l.text.clone(), (px(l.at.0), px(l.at.1)), style))
        .map_err(backend_err)
}

fn text_style(
    font_px: f64,
    color: Rgba,
    h: HAlign,
    v: VAlign,
    vertical: bool,
) -> TextStyle<'static> {
    let h_pos = match h {
        HAlign::Start => HPos::Left,
        HAlign::Middle => HPos::Center,
        HAlign::End => HPos::Right,
    };
    let v_pos = match v {
        VAlign::Top => VPos::Top,
        VAlign::Center => VPos::Center,
        VAlign::Baseline => VPos::Bottom,
    };
    let font = FontDesc::new(FontFamily::SansSerif, font_px, FontStyle::Normal);
    TextStyle {
        font: if vertical {
            font.transform(FontTransform::Rotate270)
        } else {
            font
        },
        color: rgba(color).to_backend_color(),
        pos: Pos::new(h_pos, v_pos),
    }
}

fn rgba(c: Rgba) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, c.a)
}

fn px(v: f64) -> i32 {
    v.round() as i32
}
