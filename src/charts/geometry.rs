//! Logical-pixel geometry and the value/index coordinate mappings.

use serde::{Deserialize, Serialize};

/// Highest plottable noise level in dB; the lowest is 0.
pub const DB_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Containment with a small tolerance for float rounding at the edges.
    #[cfg(test)]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-9;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }

    #[cfg(test)]
    pub fn contains(&self, p: Point) -> bool {
        self.contains_rect(&Rect::new(p.x, p.y, 0.0, 0.0))
    }
}

/// Insets of the plot rectangle from the surface edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 28.0,
            right: 28.0,
            bottom: 36.0,
            left: 64.0,
        }
    }
}

/// Plot rectangle edges for a surface of a given logical size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn new(width: f64, height: f64, padding: &Padding) -> Self {
        Self {
            left: padding.left,
            top: padding.top,
            right: width - padding.right,
            bottom: height - padding.bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// 0 dB lands on the plot floor, `DB_MAX` on the plot ceiling.
pub fn value_to_y(value: f64, height: f64, padding: &Padding) -> f64 {
    let plot_h = height - padding.top - padding.bottom;
    padding.top + (1.0 - value / DB_MAX) * plot_h
}

/// Tick columns split the plot width evenly; `tick_count` must be at least 2.
pub fn index_to_x(index: usize, width: f64, padding: &Padding, tick_count: usize) -> f64 {
    let plot_w = width - padding.left - padding.right;
    let step = plot_w / (tick_count - 1) as f64;
    padding.left + index as f64 * step
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 800.0;
    const H: f64 = 400.0;

    #[test]
    fn value_mapping_hits_plot_bounds_exactly() {
        let padding = Padding::default();
        let area = PlotArea::new(W, H, &padding);
        assert_eq!(value_to_y(0.0, H, &padding), area.bottom);
        assert_eq!(value_to_y(100.0, H, &padding), area.top);
    }

    #[test]
    fn value_mapping_is_decreasing() {
        let padding = Padding::default();
        let ys: Vec<f64> = (0..=1000)
            .map(|i| value_to_y(i as f64 / 10.0, H, &padding))
            .collect();
        assert!(ys.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn index_mapping_is_evenly_spaced() {
        let padding = Padding::default();
        let xs: Vec<f64> = (0..12).map(|i| index_to_x(i, W, &padding, 12)).collect();
        assert_eq!(xs[0], padding.left);
        assert!((xs[11] - (W - padding.right)).abs() < 1e-9);
        let step = xs[1] - xs[0];
        assert!(step > 0.0);
        for pair in xs.windows(2) {
            assert!(pair[1] > pair[0]);
            assert!((pair[1] - pair[0] - step).abs() < 1e-9);
        }
    }

    #[test]
    fn plot_area_detects_degenerate_surfaces() {
        let padding = Padding::default();
        assert!(!PlotArea::new(W, H, &padding).is_empty());
        assert!(PlotArea::new(90.0, H, &padding).is_empty());
        assert!(PlotArea::new(W, 64.0, &padding).is_empty());
    }
}
