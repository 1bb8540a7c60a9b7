//! Chart Canvas
//! Retained display list that implements [`DrawingSurface`] for egui.
//! The renderer fills it once per chart frame; the UI repaints it every
//! egui frame at the panel origin.

use crate::charts::geometry::{Point, Rect, Size};
use crate::charts::path::{fill_spans, Path};
use crate::charts::style::{Color, Paint, StrokeStyle, TextAlign, TextBaseline, TextStyle};
use crate::charts::surface::DrawingSurface;
use crate::error::Result;
use egui::{Align2, Color32, FontId, Mesh, Pos2, Shape, Stroke, Vec2};

/// Flattening tolerance in physical pixels.
const FLATTEN_TOLERANCE_PX: f64 = 0.75;

enum CanvasItem {
    Shape(Shape),
    Text {
        pos: Pos2,
        anchor: Align2,
        text: String,
        font: FontId,
        color: Color32,
    },
}

pub struct ChartCanvas {
    size: Size,
    pixels_per_point: f64,
    backing: (u32, u32),
    scale: f64,
    items: Vec<CanvasItem>,
}

impl Default for ChartCanvas {
    fn default() -> Self {
        Self {
            size: Size::default(),
            pixels_per_point: 1.0,
            backing: (0, 0),
            scale: 1.0,
            items: Vec::new(),
        }
    }
}

fn color32(c: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

impl ChartCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the panel size in points and the display scale. Returns `true`
    /// when either changed, i.e. the chart needs a resize render.
    pub fn set_viewport(&mut self, size: Vec2, pixels_per_point: f32) -> bool {
        let size = Size::new(size.x as f64, size.y as f64);
        let ppp = pixels_per_point as f64;
        let changed = size != self.size || ppp != self.pixels_per_point;
        self.size = size;
        self.pixels_per_point = ppp;
        changed
    }

    #[cfg(test)]
    pub fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    /// Paint the last recorded frame with its top-left corner at `origin`.
    pub fn paint(&self, painter: &egui::Painter, origin: Pos2) {
        let offset = origin.to_vec2();
        for item in &self.items {
            match item {
                CanvasItem::Shape(shape) => {
                    let mut shape = shape.clone();
                    shape.translate(offset);
                    painter.add(shape);
                }
                CanvasItem::Text {
                    pos,
                    anchor,
                    text,
                    font,
                    color,
                } => {
                    painter.text(*pos + offset, *anchor, text, font.clone(), *color);
                }
            }
        }
    }

    /// Logical chart pixels are egui points; the surface scale only sets
    /// tessellation density.
    fn to_pos(&self, p: Point) -> Pos2 {
        Pos2::new(p.x as f32, p.y as f32)
    }

    fn to_len(&self, v: f64) -> f32 {
        v as f32
    }

    /// Fill concave or gradient paths with one colour-interpolated quad per
    /// span per physical pixel row.
    fn fill_mesh(&self, path: &Path, paint: &Paint) -> Mesh {
        let mut mesh = Mesh::default();
        let rings = path.flatten(FLATTEN_TOLERANCE_PX / self.scale);
        let Some(bounds) = path.bounds() else {
            return mesh;
        };
        let row = 1.0 / self.scale;
        let mut y = bounds.y;
        while y < bounds.bottom() {
            let y_next = (y + row).min(bounds.bottom());
            let top = color32(paint.color_at(y));
            let bottom = color32(paint.color_at(y_next));
            for (x0, x1) in fill_spans(&rings, (y + y_next) / 2.0) {
                let idx = mesh.vertices.len() as u32;
                mesh.colored_vertex(self.to_pos(Point::new(x0, y)), top);
                mesh.colored_vertex(self.to_pos(Point::new(x1, y)), top);
                mesh.colored_vertex(self.to_pos(Point::new(x1, y_next)), bottom);
                mesh.colored_vertex(self.to_pos(Point::new(x0, y_next)), bottom);
                mesh.add_triangle(idx, idx + 1, idx + 2);
                mesh.add_triangle(idx, idx + 2, idx + 3);
            }
            y = y_next;
        }
        mesh
    }
}

impl DrawingSurface for ChartCanvas {
    fn client_size(&self) -> Size {
        self.size
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixels_per_point
    }

    fn set_backing_size(&mut self, width: u32, height: u32) -> Result<()> {
        if self.backing != (width, height) {
            log::debug!("Chart canvas backing store {width}x{height}");
        }
        self.backing = (width, height);
        self.items.clear();
        Ok(())
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// The display list has no pixels to erase, so any clear drops it.
    fn clear(&mut self, _rect: Rect) -> Result<()> {
        self.items.clear();
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        let r = egui::Rect::from_min_max(
            self.to_pos(Point::new(rect.x, rect.y)),
            self.to_pos(Point::new(rect.right(), rect.bottom())),
        );
        self.items
            .push(CanvasItem::Shape(Shape::rect_filled(r, 0.0, color32(color))));
        Ok(())
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) -> Result<()> {
        let shape = match (path.as_circle(), paint) {
            (Some((center, radius)), Paint::Solid(color)) => {
                Shape::circle_filled(self.to_pos(center), self.to_len(radius), color32(*color))
            }
            _ => Shape::mesh(self.fill_mesh(path, paint)),
        };
        self.items.push(CanvasItem::Shape(shape));
        Ok(())
    }

    fn stroke_path(&mut self, path: &Path, stroke: &StrokeStyle) -> Result<()> {
        let egui_stroke = Stroke::new(self.to_len(stroke.width), color32(stroke.color));
        if let Some((center, radius)) = path.as_circle() {
            self.items.push(CanvasItem::Shape(Shape::circle_stroke(
                self.to_pos(center),
                self.to_len(radius),
                egui_stroke,
            )));
            return Ok(());
        }
        for line in path.flatten(FLATTEN_TOLERANCE_PX / self.scale) {
            let points: Vec<Pos2> = line.points.iter().map(|p| self.to_pos(*p)).collect();
            let shape = if line.closed {
                Shape::closed_line(points, egui_stroke)
            } else {
                Shape::line(points, egui_stroke)
            };
            self.items.push(CanvasItem::Shape(shape));
        }
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) -> Result<()> {
        let h = match style.align {
            TextAlign::Left => egui::Align::Min,
            TextAlign::Center => egui::Align::Center,
            TextAlign::Right => egui::Align::Max,
        };
        let v = match style.baseline {
            TextBaseline::Top => egui::Align::Min,
            TextBaseline::Middle => egui::Align::Center,
            TextBaseline::Bottom => egui::Align::Max,
        };
        self.items.push(CanvasItem::Text {
            pos: self.to_pos(at),
            anchor: Align2([h, v]),
            text: text.to_string(),
            font: FontId::proportional(self.to_len(style.size)),
            color: color32(style.color),
        });
        Ok(())
    }
}
