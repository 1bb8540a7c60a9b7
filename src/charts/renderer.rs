//! Chart Renderer
//! Draws the noise-level chart onto any [`DrawingSurface`].
//!
//! Frame layout, back to front:
//! 1. Background fill
//! 2. Grid: 6 horizontal lines (0..100 dB by 20) and one vertical line per tick,
//!    with Y labels left of the plot and X labels under it
//! 3. Threshold line
//! 4. Filled soft curve through the samples, the outline of that closed area,
//!    and point markers

use crate::charts::geometry::{self, PlotArea, Point, Rect, Size};
use crate::charts::path::Path;
use crate::charts::style::{Paint, StrokeStyle, TextAlign, TextBaseline, TextStyle, VerticalGradient};
use crate::charts::surface::{DrawingSurface, SurfaceHost};
use crate::config::ChartConfig;
use crate::data::{ChartState, SampleSeries};
use crate::error::Result;

/// Horizontal grid levels, top to bottom.
pub const Y_GRID_VALUES: [f64; 6] = [100.0, 80.0, 60.0, 40.0, 20.0, 0.0];

const LINE_WIDTH: f64 = 1.0;
const Y_LABEL_GAP: f64 = 10.0;
const X_LABEL_GAP: f64 = 8.0;
const HALO_RADIUS: f64 = 8.0;
const HALO_ALPHA: f64 = 0.25;
const DOT_RADIUS: f64 = 4.0;

/// Owns one drawing surface and the chart state plotted on it.
pub struct ChartRenderer<S> {
    surface: S,
    config: ChartConfig,
    state: ChartState,
}

impl<S: DrawingSurface> ChartRenderer<S> {
    /// Attach to the host surface named by `config.target_id`.
    ///
    /// Returns `None` without drawing anything when the host has no such
    /// surface.
    pub fn mount<H>(host: &mut H, config: ChartConfig) -> Option<Self>
    where
        H: SurfaceHost<Surface = S>,
    {
        let Some(surface) = host.take_surface(&config.target_id) else {
            log::debug!("No drawing surface '{}', chart not mounted", config.target_id);
            return None;
        };
        Some(Self::new(surface, config))
    }

    pub fn new(surface: S, config: ChartConfig) -> Self {
        let state = ChartState::new(SampleSeries::new(config.samples.clone()));
        Self::with_state(surface, config, state)
    }

    pub fn with_state(surface: S, config: ChartConfig, state: ChartState) -> Self {
        Self {
            surface,
            config,
            state,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }

    /// Size the backing store for the device pixel ratio and scale drawing so
    /// callers keep using logical pixels. Returns the logical size.
    pub fn fit_surface(&mut self) -> Result<Size> {
        let ratio = self.surface.device_pixel_ratio().max(1.0);
        let size = self.surface.client_size();
        let width = (size.width * ratio).floor().max(0.0) as u32;
        let height = (size.height * ratio).floor().max(0.0) as u32;
        self.surface.set_backing_size(width, height)?;
        self.surface.set_scale(ratio);
        Ok(size)
    }

    pub fn value_to_y(&self, value: f64, height: f64) -> f64 {
        geometry::value_to_y(value, height, &self.config.padding)
    }

    pub fn index_to_x(&self, index: usize, width: f64) -> f64 {
        geometry::index_to_x(index, width, &self.config.padding, self.config.x_ticks.len())
    }

    fn label_style(&self, align: TextAlign, baseline: TextBaseline) -> TextStyle {
        let theme = &self.config.theme;
        TextStyle {
            color: theme.label,
            size: theme.font_size,
            family: theme.font_family.clone(),
            align,
            baseline,
        }
    }

    pub fn draw_grid(&mut self, width: f64, height: f64) -> Result<()> {
        let area = PlotArea::new(width, height, &self.config.padding);
        let stroke = StrokeStyle::new(self.config.theme.grid, LINE_WIDTH);

        for value in Y_GRID_VALUES {
            let y = self.value_to_y(value, height);
            let line = Path::line(Point::new(area.left, y), Point::new(area.right, y));
            self.surface.stroke_path(&line, &stroke)?;
        }

        for i in 0..self.config.x_ticks.len() {
            let x = self.index_to_x(i, width);
            let line = Path::line(Point::new(x, area.top), Point::new(x, area.bottom));
            self.surface.stroke_path(&line, &stroke)?;
        }

        let style = self.label_style(TextAlign::Right, TextBaseline::Middle);
        for value in Y_GRID_VALUES {
            let at = Point::new(area.left - Y_LABEL_GAP, self.value_to_y(value, height));
            self.surface.fill_text(&format!("{value:.0}"), at, &style)?;
        }

        let style = self.label_style(TextAlign::Center, TextBaseline::Top);
        let label_y = area.bottom + X_LABEL_GAP;
        for (i, tick) in self.config.x_ticks.iter().enumerate() {
            let at = Point::new(self.index_to_x(i, width), label_y);
            self.surface.fill_text(tick, at, &style)?;
        }
        Ok(())
    }

    pub fn draw_threshold(&mut self, width: f64, height: f64) -> Result<()> {
        let area = PlotArea::new(width, height, &self.config.padding);
        let y = self.value_to_y(self.config.threshold, height);
        let line = Path::line(Point::new(area.left, y), Point::new(area.right, y));
        let stroke = StrokeStyle::new(self.config.theme.threshold, LINE_WIDTH);
        self.surface.stroke_path(&line, &stroke)
    }

    /// Sample positions in logical pixels.
    pub fn series_points(&self, width: f64, height: f64) -> Vec<Point> {
        self.state
            .series
            .values()
            .iter()
            .enumerate()
            .map(|(i, v)| Point::new(self.index_to_x(i, width), self.value_to_y(*v, height)))
            .collect()
    }

    pub fn draw_series(&mut self, width: f64, height: f64) -> Result<()> {
        if self.state.series.is_empty() {
            return Ok(());
        }
        let points = self.series_points(width, height);
        let first = points[0];
        let area = PlotArea::new(width, height, &self.config.padding);
        let theme = &self.config.theme;

        let mut area_path = Path::new();
        area_path.move_to(first);
        for pair in points.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            let mid = prev.midpoint(next);
            area_path.quad_to(prev, mid).quad_to(mid, next);
        }
        area_path
            .line_to(Point::new(area.right, area.bottom))
            .line_to(Point::new(area.left, area.bottom))
            .close();

        let fill = Paint::Gradient(VerticalGradient {
            top: area.top,
            bottom: area.bottom,
            from: theme.fill_top,
            to: theme.fill_bottom,
        });
        let outline = StrokeStyle::new(theme.series, LINE_WIDTH);
        let halo = Paint::Solid(theme.series.with_alpha_factor(HALO_ALPHA));
        let dot = Paint::Solid(theme.series);
        let dot_outline = StrokeStyle::new(theme.marker_outline, LINE_WIDTH);

        self.surface.fill_path(&area_path, &fill)?;
        self.surface.stroke_path(&area_path, &outline)?;

        for p in points {
            self.surface.fill_path(&Path::circle(p, HALO_RADIUS), &halo)?;
            let marker = Path::circle(p, DOT_RADIUS);
            self.surface.fill_path(&marker, &dot)?;
            self.surface.stroke_path(&marker, &dot_outline)?;
        }
        Ok(())
    }

    /// Fit, clear, paint the background, then grid, threshold and series.
    pub fn render_frame(&mut self) -> Result<()> {
        let size = self.fit_surface()?;
        let (width, height) = (size.width, size.height);
        let bounds = Rect::from_size(size);

        self.surface.clear(bounds)?;
        self.surface.fill_rect(bounds, self.config.theme.background)?;

        if PlotArea::new(width, height, &self.config.padding).is_empty() {
            log::trace!("Surface {width}x{height} too small for a plot area");
            return Ok(());
        }

        self.draw_grid(width, height)?;
        self.draw_threshold(width, height)?;
        self.draw_series(width, height)
    }

    /// Advance the phase, jitter the samples, and redraw.
    pub fn animation_step(&mut self) -> Result<()> {
        self.state.advance(&self.config.animation);
        self.render_frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::surface::recording::{DrawCall, RecordingSurface};
    use std::collections::HashMap;

    fn renderer(width: f64, height: f64, dpr: f64) -> ChartRenderer<RecordingSurface> {
        ChartRenderer::new(
            RecordingSurface::new(width, height, dpr),
            ChartConfig::default(),
        )
    }

    #[test]
    fn fit_surface_scales_backing_store() {
        let mut r = renderer(801.5, 400.0, 2.0);
        let size = r.fit_surface().unwrap();
        assert_eq!(size, Size::new(801.5, 400.0));
        assert_eq!(r.surface().backing, (1603, 800));
        assert_eq!(r.surface().scale, 2.0);

        // idempotent
        r.fit_surface().unwrap();
        assert_eq!(r.surface().backing, (1603, 800));
        assert!(r.surface().calls.is_empty());
    }

    #[test]
    fn fit_surface_never_scales_below_one() {
        let mut r = renderer(300.0, 200.0, 0.5);
        r.fit_surface().unwrap();
        assert_eq!(r.surface().backing, (300, 200));
        assert_eq!(r.surface().scale, 1.0);
    }

    #[test]
    fn grid_has_fixed_lines_and_labels() {
        let mut r = renderer(800.0, 400.0, 1.0);
        r.draw_grid(800.0, 400.0).unwrap();

        let strokes: Vec<&Path> = r.surface().strokes().collect();
        let horizontal = strokes
            .iter()
            .filter_map(|p| p.bounds())
            .filter(|b| b.height == 0.0 && b.width > 0.0)
            .count();
        let vertical = strokes
            .iter()
            .filter_map(|p| p.bounds())
            .filter(|b| b.width == 0.0 && b.height > 0.0)
            .count();
        assert_eq!(horizontal, 6);
        assert_eq!(vertical, 12);

        let texts: Vec<&str> = r.surface().texts().map(|(t, _)| t).collect();
        assert_eq!(&texts[..6], &["100", "80", "60", "40", "20", "0"]);
        assert_eq!(&texts[6..], ChartConfig::default().x_ticks.as_slice());
    }

    #[test]
    fn labels_sit_outside_the_plot() {
        let mut r = renderer(800.0, 400.0, 1.0);
        r.draw_grid(800.0, 400.0).unwrap();
        let texts: Vec<(&str, Point)> = r.surface().texts().collect();
        for (_, at) in &texts[..6] {
            assert_eq!(at.x, 54.0);
        }
        for (_, at) in &texts[6..] {
            assert_eq!(at.y, 372.0);
        }
        assert_eq!(texts[0].1.y, 28.0);
        assert_eq!(texts[5].1.y, 364.0);
    }

    #[test]
    fn threshold_is_drawn_at_fifty_db() {
        let mut r = renderer(800.0, 400.0, 1.0);
        r.draw_threshold(800.0, 400.0).unwrap();
        let y = r.value_to_y(50.0, 400.0);
        assert_eq!(
            r.surface().calls,
            vec![DrawCall::StrokePath {
                path: Path::line(Point::new(64.0, y), Point::new(772.0, y)),
                stroke: StrokeStyle::new(ChartConfig::default().theme.threshold, 1.0),
            }]
        );
    }

    #[test]
    fn series_draws_area_outline_and_markers() {
        let mut r = renderer(800.0, 400.0, 1.0);
        r.draw_series(800.0, 400.0).unwrap();
        let calls = &r.surface().calls;
        let samples = ChartConfig::default().samples.len();
        // area + outline + 3 per marker
        assert_eq!(calls.len(), 2 + 3 * samples);

        let DrawCall::FillPath { path, paint } = &calls[0] else {
            panic!("expected area fill first, got {:?}", calls[0]);
        };
        assert!(matches!(paint, Paint::Gradient(_)));
        assert!(path
            .flatten(1.0)
            .first()
            .map(|line| line.closed)
            .unwrap_or(false));

        let markers = calls
            .iter()
            .filter(|c| match c {
                DrawCall::FillPath { path, .. } => path.as_circle().is_some(),
                _ => false,
            })
            .count();
        assert_eq!(markers, 2 * samples);
    }

    #[test]
    fn curve_passes_through_every_sample() {
        let mut r = renderer(800.0, 400.0, 1.0);
        r.draw_series(800.0, 400.0).unwrap();
        let points = r.series_points(800.0, 400.0);
        let DrawCall::StrokePath { path, .. } = &r.surface().calls[1] else {
            panic!("expected curve outline");
        };
        let line = &path.flatten(0.5)[0];
        for p in points {
            assert!(line.points.iter().any(|q| q.distance(p) < 1e-9));
        }
    }

    #[test]
    fn outline_follows_the_closed_area() {
        let mut r = renderer(800.0, 400.0, 1.0);
        r.draw_series(800.0, 400.0).unwrap();
        let calls = &r.surface().calls;
        let (DrawCall::FillPath { path: area, .. }, DrawCall::StrokePath { path: outline, .. }) =
            (&calls[0], &calls[1])
        else {
            panic!("expected area fill then outline");
        };
        assert_eq!(outline, area);

        let lines = outline.flatten(0.5);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].closed);
        let tail = &lines[0].points[lines[0].points.len() - 2..];
        assert_eq!(tail, &[Point::new(772.0, 364.0), Point::new(64.0, 364.0)]);
    }

    #[test]
    fn frame_stays_inside_logical_bounds() {
        for (w, h, dpr) in [(800.0, 400.0, 1.0), (640.0, 360.0, 2.0), (1200.0, 300.0, 1.5)] {
            let mut r = renderer(w, h, dpr);
            for _ in 0..30 {
                r.animation_step().unwrap();
            }
            let bounds = Rect::new(0.0, 0.0, w, h);
            for call in &r.surface().calls {
                let inside = match call {
                    DrawCall::Clear(rect) | DrawCall::FillRect { rect, .. } => {
                        bounds.contains_rect(rect)
                    }
                    DrawCall::FillPath { path, .. } | DrawCall::StrokePath { path, .. } => path
                        .bounds()
                        .map(|b| bounds.contains_rect(&b))
                        .unwrap_or(true),
                    DrawCall::FillText { at, .. } => bounds.contains(*at),
                };
                assert!(inside, "{call:?} escapes {w}x{h}");
            }
        }
    }

    #[test]
    fn frame_draws_in_pipeline_order() {
        let mut r = renderer(800.0, 400.0, 1.0);
        r.render_frame().unwrap();
        let calls = &r.surface().calls;
        assert!(matches!(calls[0], DrawCall::Clear(_)));
        assert!(matches!(calls[1], DrawCall::FillRect { .. }));
        // 18 grid lines + 18 labels precede the threshold line
        let DrawCall::StrokePath { stroke, .. } = &calls[2 + 36] else {
            panic!("expected threshold stroke");
        };
        assert_eq!(stroke.color, ChartConfig::default().theme.threshold);
        assert!(matches!(calls[3 + 36], DrawCall::FillPath { .. }));
    }

    #[test]
    fn tiny_surface_only_paints_background() {
        let mut r = renderer(80.0, 50.0, 1.0);
        r.render_frame().unwrap();
        assert_eq!(r.surface().calls.len(), 2);
    }

    #[test]
    fn animation_step_keeps_samples_in_range() {
        let mut r = renderer(800.0, 400.0, 1.0);
        for _ in 0..1000 {
            r.animation_step().unwrap();
        }
        assert!(r
            .state()
            .series
            .values()
            .iter()
            .all(|v| (0.0..=100.0).contains(v)));
        assert!((r.state().phase - 20.0).abs() < 1e-6);
    }

    #[test]
    fn missing_target_draws_nothing() {
        let mut host: HashMap<String, RecordingSurface> = HashMap::new();
        host.insert("otherChart".to_string(), RecordingSurface::new(800.0, 400.0, 1.0));

        let mounted = ChartRenderer::mount(&mut host, ChartConfig::default());
        assert!(mounted.is_none());
        assert!(host["otherChart"].calls.is_empty());
    }

    #[test]
    fn mount_takes_the_named_surface() {
        let mut host: HashMap<String, RecordingSurface> = HashMap::new();
        host.insert("noiseChart".to_string(), RecordingSurface::new(800.0, 400.0, 1.0));

        let mut r = ChartRenderer::mount(&mut host, ChartConfig::default()).unwrap();
        assert!(host.is_empty());
        r.render_frame().unwrap();
        assert!(!r.surface().calls.is_empty());
    }
}
