//! Drawing surface abstraction.
//!
//! A [`DrawingSurface`] behaves like a 2D canvas: it has a displayed size in
//! logical pixels, a device pixel ratio, a backing store that may be larger,
//! and a scale transform that maps logical drawing coordinates onto it.

use crate::charts::geometry::{Point, Rect, Size};
use crate::charts::path::Path;
use crate::charts::style::{Color, Paint, StrokeStyle, TextStyle};
use crate::error::Result;
use std::collections::HashMap;

pub trait DrawingSurface {
    /// Displayed size in logical pixels.
    fn client_size(&self) -> Size;

    fn device_pixel_ratio(&self) -> f64;

    /// Resize the backing store in physical pixels. Resizing discards its
    /// contents.
    fn set_backing_size(&mut self, width: u32, height: u32) -> Result<()>;

    /// Replace the current transform with a uniform scale.
    fn set_scale(&mut self, scale: f64);

    fn clear(&mut self, rect: Rect) -> Result<()>;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()>;

    fn fill_path(&mut self, path: &Path, paint: &Paint) -> Result<()>;

    fn stroke_path(&mut self, path: &Path, stroke: &StrokeStyle) -> Result<()>;

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) -> Result<()>;
}

/// Something that owns drawing surfaces addressable by identifier.
pub trait SurfaceHost {
    type Surface: DrawingSurface;

    fn take_surface(&mut self, id: &str) -> Option<Self::Surface>;
}

impl<S: DrawingSurface> SurfaceHost for HashMap<String, S> {
    type Surface = S;

    fn take_surface(&mut self, id: &str) -> Option<S> {
        self.remove(id)
    }
}

#[cfg(test)]
pub mod recording {
    //! Surface stub that records every drawing call.

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Clear(Rect),
        FillRect { rect: Rect, color: Color },
        FillPath { path: Path, paint: Paint },
        StrokePath { path: Path, stroke: StrokeStyle },
        FillText { text: String, at: Point, style: TextStyle },
    }

    #[derive(Debug, Clone)]
    pub struct RecordingSurface {
        pub size: Size,
        pub dpr: f64,
        pub backing: (u32, u32),
        pub scale: f64,
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn new(width: f64, height: f64, dpr: f64) -> Self {
            Self {
                size: Size::new(width, height),
                dpr,
                backing: (0, 0),
                scale: 1.0,
                calls: Vec::new(),
            }
        }

        pub fn strokes(&self) -> impl Iterator<Item = &Path> {
            self.calls.iter().filter_map(|call| match call {
                DrawCall::StrokePath { path, .. } => Some(path),
                _ => None,
            })
        }

        pub fn texts(&self) -> impl Iterator<Item = (&str, Point)> {
            self.calls.iter().filter_map(|call| match call {
                DrawCall::FillText { text, at, .. } => Some((text.as_str(), *at)),
                _ => None,
            })
        }
    }

    impl DrawingSurface for RecordingSurface {
        fn client_size(&self) -> Size {
            self.size
        }

        fn device_pixel_ratio(&self) -> f64 {
            self.dpr
        }

        fn set_backing_size(&mut self, width: u32, height: u32) -> Result<()> {
            self.backing = (width, height);
            Ok(())
        }

        fn set_scale(&mut self, scale: f64) {
            self.scale = scale;
        }

        fn clear(&mut self, rect: Rect) -> Result<()> {
            self.calls.push(DrawCall::Clear(rect));
            Ok(())
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
            self.calls.push(DrawCall::FillRect { rect, color });
            Ok(())
        }

        fn fill_path(&mut self, path: &Path, paint: &Paint) -> Result<()> {
            self.calls.push(DrawCall::FillPath {
                path: path.clone(),
                paint: *paint,
            });
            Ok(())
        }

        fn stroke_path(&mut self, path: &Path, stroke: &StrokeStyle) -> Result<()> {
            self.calls.push(DrawCall::StrokePath {
                path: path.clone(),
                stroke: *stroke,
            });
            Ok(())
        }

        fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) -> Result<()> {
            self.calls.push(DrawCall::FillText {
                text: text.to_string(),
                at,
                style: style.clone(),
            });
            Ok(())
        }
    }
}
