use crate::error::{PlotError, Result};
use crate::ir::{Colorbar, DrawCommand, Figure, Legend, PanelScene, Scale};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Width reserved at the right edge for a legend or colorbar
pub const KEY_AREA_WIDTH: u32 = 170;
const GRID_COLOR: RGBColor = RGBColor(225, 225, 225);
/// Largest bitmap the renderer will allocate
pub const MAX_PIXELS: usize = 1 << 26;

/// Style configuration for line primitives
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: RGBColor,
    pub width: u32,
    pub alpha: f64,
}

/// Style configuration for point markers
#[derive(Debug, Clone, PartialEq)]
pub struct PointStyle {
    pub color: RGBColor,
    pub size: u32,
    pub alpha: f64,
}

/// Style configuration for filled rectangles
#[derive(Debug, Clone, PartialEq)]
pub struct RectStyle {
    pub fill: RGBColor,
    pub alpha: f64,
    /// Outline color and stroke width
    pub border: Option<(RGBColor, u32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonStyle {
    pub fill: RGBColor,
    pub alpha: f64,
}

/// Centered text label
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub color: RGBColor,
}

impl LineStyle {
    fn shape(&self) -> ShapeStyle {
        self.color.mix(self.alpha).stroke_width(self.width)
    }
}

impl PointStyle {
    fn shape(&self) -> ShapeStyle {
        self.color.mix(self.alpha).filled()
    }
}

/// A figure rasterized to PNG, ready to hand to a display surface
#[derive(Debug, Clone)]
pub struct RenderedFigure {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub png: Vec<u8>,
}

/// Rasterize a figure: title, panel grid, then legend or colorbar on the right
pub fn render_figure(figure: &Figure, font: &str) -> Result<RenderedFigure> {
    if figure.width == 0 || figure.height == 0 {
        return Err(PlotError::Render(format!(
            "Invalid figure size {}x{}",
            figure.width, figure.height
        )));
    }

    let buffer_len = (figure.width as usize)
        .checked_mul(figure.height as usize)
        .filter(|&pixels| pixels <= MAX_PIXELS)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| {
            PlotError::Render(format!(
                "Figure size {}x{} is too large",
                figure.width, figure.height
            ))
        })?;
    let mut buffer = vec![0u8; buffer_len];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (figure.width, figure.height))
            .into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| PlotError::render("fill background", e))?;

        let body = match &figure.title {
            Some(title) => root
                .titled(title, (font, 24.0))
                .map_err(|e| PlotError::render("draw title", e))?,
            None => root.clone(),
        };

        let has_key = figure.legend.is_some() || figure.colorbar.is_some();
        let (plot_area, key_area) = if has_key {
            let (body_width, _) = body.dim_in_pixel();
            let split = (body_width as i32 - KEY_AREA_WIDTH as i32).max(1);
            let (left, right) = body.split_horizontally(split);
            (left, Some(right))
        } else {
            (body, None)
        };

        let layout = figure.layout;
        let cells = plot_area.split_evenly((layout.nrow.max(1), layout.ncol.max(1)));
        for panel in &figure.panels {
            let idx = panel.row * layout.ncol.max(1) + panel.col;
            let area = cells.get(idx).ok_or_else(|| {
                PlotError::Render(format!(
                    "Panel ({}, {}) lies outside the {}x{} layout",
                    panel.row, panel.col, layout.nrow, layout.ncol
                ))
            })?;
            draw_panel(area, panel, font)?;
        }

        if let Some(area) = key_area {
            if let Some(legend) = &figure.legend {
                draw_legend(&area, legend, font)?;
            } else if let Some(colorbar) = &figure.colorbar {
                draw_colorbar(&area, colorbar, font)?;
            }
        }

        root.present()
            .map_err(|e| PlotError::render("present drawing", e))?;
    }

    let png = encode_png(&buffer, figure.width, figure.height)?;
    tracing::debug!(
        width = figure.width,
        height = figure.height,
        bytes = png.len(),
        "rendered figure"
    );

    Ok(RenderedFigure {
        width: figure.width,
        height: figure.height,
        title: figure.title.clone(),
        png,
    })
}

/// Tick label: the category name on categorical axes, a trimmed number otherwise
fn format_tick(scale: &Scale, value: f64) -> String {
    if scale.is_categorical {
        return scale.category_at(value).unwrap_or("").to_string();
    }
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &PanelScene,
    font: &str,
) -> Result<()> {
    let (x0, x1) = panel.x_scale.domain;
    let (y0, y1) = panel.y_scale.domain;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(12)
        .x_label_area_size(if panel.x_label.is_some() { 50 } else { 30 })
        .y_label_area_size(if panel.y_label.is_some() { 75 } else { 60 });
    if let Some(title) = &panel.title {
        builder.caption(title, (font, 18.0));
    }
    let mut chart = builder
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(|e| PlotError::render("build chart", e))?;

    let x_scale = &panel.x_scale;
    let y_scale = &panel.y_scale;
    let x_fmt = |v: &f64| format_tick(x_scale, *v);
    let y_fmt = |v: &f64| format_tick(y_scale, *v);

    let mut mesh = chart.configure_mesh();
    mesh.x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((font, 14.0))
        .axis_desc_style((font, 15.0))
        .light_line_style(WHITE.mix(0.0))
        .bold_line_style(GRID_COLOR);
    if x_scale.is_categorical {
        mesh.x_labels(x_scale.categories.len().max(1))
            .disable_x_mesh();
    }
    if y_scale.is_categorical {
        mesh.y_labels(y_scale.categories.len().max(1))
            .disable_y_mesh();
    }
    if !panel.grid {
        mesh.disable_mesh();
    }
    if let Some(label) = &panel.x_label {
        mesh.x_desc(label.as_str());
    }
    if let Some(label) = &panel.y_label {
        mesh.y_desc(label.as_str());
    }
    mesh.draw()
        .map_err(|e| PlotError::render("draw mesh", e))?;

    for command in &panel.commands {
        match command {
            DrawCommand::DrawLine { points, style } => {
                chart
                    .draw_series(std::iter::once(PathElement::new(points.clone(), style.shape())))
                    .map_err(|e| PlotError::render("draw line", e))?;
            }
            DrawCommand::DrawPoint { points, style } => {
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|&p| Circle::new(p, style.size as i32, style.shape())),
                    )
                    .map_err(|e| PlotError::render("draw points", e))?;
            }
            DrawCommand::DrawRect { tl, br, style } => {
                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        [*tl, *br],
                        style.fill.mix(style.alpha).filled(),
                    )))
                    .map_err(|e| PlotError::render("draw rect", e))?;
                if let Some((color, width)) = style.border {
                    chart
                        .draw_series(std::iter::once(Rectangle::new(
                            [*tl, *br],
                            color.stroke_width(width),
                        )))
                        .map_err(|e| PlotError::render("draw rect border", e))?;
                }
            }
            DrawCommand::DrawPolygon { points, style } => {
                chart
                    .draw_series(std::iter::once(Polygon::new(
                        points.clone(),
                        style.fill.mix(style.alpha).filled(),
                    )))
                    .map_err(|e| PlotError::render("draw polygon", e))?;
            }
            DrawCommand::DrawText {
                position,
                text,
                style,
            } => {
                let text_style = (font, style.size)
                    .into_font()
                    .color(&style.color)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                chart
                    .draw_series(std::iter::once(Text::new(text.clone(), *position, text_style)))
                    .map_err(|e| PlotError::render("draw text", e))?;
            }
        }
    }

    Ok(())
}

/// Legend with a title and one swatch per entry
fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    legend: &Legend,
    font: &str,
) -> Result<()> {
    area.draw(&Text::new(legend.title.clone(), (12, 40), (font, 16.0)))
        .map_err(|e| PlotError::render("draw legend title", e))?;

    for (i, entry) in legend.entries.iter().enumerate() {
        let y = 70 + i as i32 * 26;
        area.draw(&Rectangle::new([(12, y), (32, y + 18)], entry.color.filled()))
            .map_err(|e| PlotError::render("draw legend swatch", e))?;
        area.draw(&Text::new(entry.label.clone(), (42, y + 2), (font, 14.0)))
            .map_err(|e| PlotError::render("draw legend label", e))?;
    }

    Ok(())
}

/// Vertical gradient from max (top) to min (bottom) with three tick labels
fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    colorbar: &Colorbar,
    font: &str,
) -> Result<()> {
    const STEPS: i32 = 100;
    let (_, height) = area.dim_in_pixel();
    let top = 40;
    let bottom = (height as i32 - 60).max(top + STEPS);
    let step_height = ((bottom - top) as f64 / STEPS as f64).ceil() as i32;

    for step in 0..STEPS {
        let t = 1.0 - step as f64 / (STEPS - 1) as f64;
        let y = top + ((bottom - top) as f64 * step as f64 / STEPS as f64) as i32;
        area.draw(&Rectangle::new(
            [(20, y), (45, y + step_height)],
            colorbar.colormap.at(t).filled(),
        ))
        .map_err(|e| PlotError::render("draw colorbar", e))?;
    }

    let mid = (colorbar.min + colorbar.max) / 2.0;
    let ticks = [(colorbar.max, top), (mid, (top + bottom) / 2), (colorbar.min, bottom)];
    for (value, y) in ticks {
        area.draw(&Text::new(
            format!("{:.2}", value),
            (52, y),
            (font, 13.0)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Center)),
        ))
        .map_err(|e| PlotError::render("draw colorbar label", e))?;
    }

    Ok(())
}

/// Encode an RGB8 pixel buffer as PNG
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(buffer, width, height, image::ColorType::Rgb8)
            .map_err(|e| PlotError::render("encode PNG", e))?;
    }

    Ok(png_bytes)
}
