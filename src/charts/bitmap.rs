//! Bitmap Surface
//! Rasterizes chart drawing calls into an in-memory RGB buffer with the
//! plotters bitmap backend, then encodes PNG bytes with `image`.

use crate::charts::geometry::{Point, Rect, Size};
use crate::charts::path::{fill_spans, Path};
use crate::charts::style::{Color, Paint, StrokeStyle, TextAlign, TextBaseline, TextStyle};
use crate::charts::surface::DrawingSurface;
use crate::error::{ChartError, Result};
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::backend::{BitMapBackend, DrawingBackend};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{IntoFont, RGBAColor, ShapeStyle};
use std::io::Cursor;

/// Flattening tolerance in physical pixels.
const FLATTEN_TOLERANCE_PX: f64 = 0.75;

pub struct BitmapSurface {
    size: Size,
    device_pixel_ratio: f64,
    width_px: u32,
    height_px: u32,
    scale: f64,
    buffer: Vec<u8>,
}

impl BitmapSurface {
    /// Logical `size` shown at `device_pixel_ratio`; the backing store stays
    /// empty until the renderer fits the surface.
    pub fn new(size: Size, device_pixel_ratio: f64) -> Self {
        Self {
            size,
            device_pixel_ratio,
            width_px: 0,
            height_px: 0,
            scale: 1.0,
            buffer: Vec::new(),
        }
    }

    pub fn backing_size(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    /// RGB value at a physical pixel.
    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width_px || y >= self.height_px {
            return None;
        }
        let i = ((y * self.width_px + x) * 3) as usize;
        Some([self.buffer[i], self.buffer[i + 1], self.buffer[i + 2]])
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let img = RgbImage::from_raw(self.width_px, self.height_px, self.buffer.clone())
            .ok_or_else(|| ChartError::render("bitmap buffer does not match its size"))?;
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img).write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    fn is_empty(&self) -> bool {
        self.width_px == 0 || self.height_px == 0
    }

    fn to_px(&self, p: Point) -> (i32, i32) {
        (
            (p.x * self.scale).round() as i32,
            (p.y * self.scale).round() as i32,
        )
    }

    fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BitMapBackend<'_>) -> Result<()>,
    {
        if self.is_empty() {
            return Ok(());
        }
        let mut backend =
            BitMapBackend::with_buffer(&mut self.buffer, (self.width_px, self.height_px));
        f(&mut backend)?;
        backend.present().map_err(ChartError::render)
    }
}

fn shape_style(color: Color, filled: bool, stroke_width: u32) -> ShapeStyle {
    ShapeStyle {
        color: RGBAColor(color.r, color.g, color.b, color.opacity()),
        filled,
        stroke_width,
    }
}

impl DrawingSurface for BitmapSurface {
    fn client_size(&self) -> Size {
        self.size
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn set_backing_size(&mut self, width: u32, height: u32) -> Result<()> {
        self.width_px = width;
        self.height_px = height;
        self.buffer = vec![0; width as usize * height as usize * 3];
        Ok(())
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn clear(&mut self, rect: Rect) -> Result<()> {
        let (x0, y0) = self.to_px(Point::new(rect.x, rect.y));
        let (x1, y1) = self.to_px(Point::new(rect.right(), rect.bottom()));
        let clamp_x = |v: i32| v.clamp(0, self.width_px as i32) as usize;
        let clamp_y = |v: i32| v.clamp(0, self.height_px as i32) as usize;
        let (x0, x1, y0, y1) = (clamp_x(x0), clamp_x(x1), clamp_y(y0), clamp_y(y1));
        let stride = self.width_px as usize * 3;
        for row in y0..y1 {
            self.buffer[row * stride + x0 * 3..row * stride + x1 * 3].fill(0);
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        let ul = self.to_px(Point::new(rect.x, rect.y));
        let br = self.to_px(Point::new(rect.right(), rect.bottom()));
        let style = shape_style(color, true, 0);
        self.draw(|b| b.draw_rect(ul, br, &style, true).map_err(ChartError::render))
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) -> Result<()> {
        if let (Some((center, radius)), Paint::Solid(color)) = (path.as_circle(), paint) {
            let c = self.to_px(center);
            let r = (radius * self.scale).round() as u32;
            let style = shape_style(*color, true, 0);
            return self.draw(|b| b.draw_circle(c, r, &style, true).map_err(ChartError::render));
        }

        let rings = path.flatten(FLATTEN_TOLERANCE_PX / self.scale);
        let scale = self.scale;
        let rows = self.height_px;
        self.draw(|b| {
            for row in 0..rows {
                let y = (row as f64 + 0.5) / scale;
                let color = paint.color_at(y);
                let style = shape_style(color, true, 1);
                for (x0, x1) in fill_spans(&rings, y) {
                    let from = ((x0 * scale).round() as i32, row as i32);
                    let to = ((x1 * scale).round() as i32 - 1, row as i32);
                    if to.0 >= from.0 {
                        b.draw_line(from, to, &style).map_err(ChartError::render)?;
                    }
                }
            }
            Ok(())
        })
    }

    fn stroke_path(&mut self, path: &Path, stroke: &StrokeStyle) -> Result<()> {
        let width = (stroke.width * self.scale).round().max(1.0) as u32;
        let style = shape_style(stroke.color, false, width);
        if let Some((center, radius)) = path.as_circle() {
            let c = self.to_px(center);
            let r = (radius * self.scale).round() as u32;
            return self.draw(|b| b.draw_circle(c, r, &style, false).map_err(ChartError::render));
        }

        let lines: Vec<Vec<(i32, i32)>> = path
            .flatten(FLATTEN_TOLERANCE_PX / self.scale)
            .into_iter()
            .map(|line| {
                let mut px: Vec<(i32, i32)> = line.points.iter().map(|p| self.to_px(*p)).collect();
                if line.closed {
                    if let Some(first) = px.first().copied() {
                        px.push(first);
                    }
                }
                px
            })
            .collect();
        self.draw(|b| {
            for line in lines {
                b.draw_path(line, &style).map_err(ChartError::render)?;
            }
            Ok(())
        })
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) -> Result<()> {
        let h = match style.align {
            TextAlign::Left => HPos::Left,
            TextAlign::Center => HPos::Center,
            TextAlign::Right => HPos::Right,
        };
        let v = match style.baseline {
            TextBaseline::Top => VPos::Top,
            TextBaseline::Middle => VPos::Center,
            TextBaseline::Bottom => VPos::Bottom,
        };
        let c = style.color;
        let desc = (style.family.as_str(), style.size * self.scale).into_font();
        // A host without the font still gets the rest of the chart.
        if let Err(e) = desc.layout_box(text) {
            log::warn!("Skipping label {text:?}: {e}");
            return Ok(());
        }
        let font = desc
            .color(&RGBAColor(c.r, c.g, c.b, c.opacity()))
            .pos(Pos::new(h, v));
        let pos = self.to_px(at);
        self.draw(|b| b.draw_text(text, &font, pos).map_err(ChartError::render))
    }
}
