//! Vector paths in logical pixels, with flattening and scanline fill spans.
//!
//! Surfaces that cannot fill curves or concave shapes natively flatten a
//! [`Path`] into polylines and fill it row by row with [`fill_spans`] using
//! the even-odd rule.

use crate::charts::geometry::{Point, Rect};
use std::f64::consts::TAU;

/// Maximum segments used for a single curve or circle.
const MAX_SEGMENTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
    Circle { center: Point, radius: f64 },
    Close,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
}

/// One flattened subpath.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Straight segment from `a` to `b`.
    pub fn line(a: Point, b: Point) -> Self {
        let mut path = Self::new();
        path.move_to(a).line_to(b);
        path
    }

    /// Full circle as its own closed subpath.
    pub fn circle(center: Point, radius: f64) -> Self {
        Self {
            commands: vec![PathCommand::Circle { center, radius }],
        }
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn quad_to(&mut self, ctrl: Point, to: Point) -> &mut Self {
        self.commands.push(PathCommand::QuadTo { ctrl, to });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// `Some((center, radius))` when the path is exactly one circle.
    pub fn as_circle(&self) -> Option<(Point, f64)> {
        match self.commands.as_slice() {
            [PathCommand::Circle { center, radius }] => Some((*center, *radius)),
            _ => None,
        }
    }

    /// Conservative bounding box: curve control points and circle extents
    /// are included, so the true shape always lies inside.
    pub fn bounds(&self) -> Option<Rect> {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut include = |p: Point| {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        };
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => include(p),
                PathCommand::QuadTo { ctrl, to } => {
                    include(ctrl);
                    include(to);
                }
                PathCommand::Circle { center, radius } => {
                    include(Point::new(center.x - radius, center.y - radius));
                    include(Point::new(center.x + radius, center.y + radius));
                }
                PathCommand::Close => {}
            }
        }
        if min.x > max.x {
            return None;
        }
        Some(Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// Flatten into polylines; `tolerance` is the target segment length.
    pub fn flatten(&self, tolerance: f64) -> Vec<Polyline> {
        let tolerance = tolerance.max(0.01);
        let mut out = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        let mut start = Point::default();

        let flush = |current: &mut Vec<Point>, out: &mut Vec<Polyline>, closed: bool| {
            if current.len() > 1 {
                out.push(Polyline {
                    points: std::mem::take(current),
                    closed,
                });
            } else {
                current.clear();
            }
        };

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    flush(&mut current, &mut out, false);
                    current.push(p);
                    start = p;
                }
                PathCommand::LineTo(p) => {
                    if current.is_empty() {
                        current.push(start);
                    }
                    current.push(p);
                }
                PathCommand::QuadTo { ctrl, to } => {
                    let from = current.last().copied().unwrap_or(start);
                    if current.is_empty() {
                        current.push(from);
                    }
                    let length = from.distance(ctrl) + ctrl.distance(to);
                    let segments = segment_count(length, tolerance);
                    for i in 1..=segments {
                        let t = i as f64 / segments as f64;
                        current.push(quad_point(from, ctrl, to, t));
                    }
                }
                PathCommand::Circle { center, radius } => {
                    flush(&mut current, &mut out, false);
                    let segments = segment_count(TAU * radius, tolerance).max(8);
                    let points = (0..segments)
                        .map(|i| {
                            let angle = TAU * i as f64 / segments as f64;
                            Point::new(
                                center.x + radius * angle.cos(),
                                center.y + radius * angle.sin(),
                            )
                        })
                        .collect();
                    out.push(Polyline {
                        points,
                        closed: true,
                    });
                }
                PathCommand::Close => {
                    let first = current.first().copied();
                    flush(&mut current, &mut out, true);
                    if let Some(first) = first {
                        start = first;
                    }
                }
            }
        }
        flush(&mut current, &mut out, false);
        out
    }
}

fn segment_count(length: f64, tolerance: f64) -> usize {
    ((length / tolerance).ceil() as usize).clamp(1, MAX_SEGMENTS)
}

fn quad_point(p0: Point, c: Point, p1: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    Point::new(
        mt * mt * p0.x + 2.0 * mt * t * c.x + t * t * p1.x,
        mt * mt * p0.y + 2.0 * mt * t * c.y + t * t * p1.y,
    )
}

/// Horizontal spans `(x_start, x_end)` covered by `rings` at row `y`, using
/// the even-odd rule. Every ring is treated as closed.
pub fn fill_spans(rings: &[Polyline], y: f64) -> Vec<(f64, f64)> {
    let mut crossings: Vec<f64> = Vec::new();
    for ring in rings {
        let n = ring.points.len();
        if n < 3 {
            continue;
        }
        for i in 0..n {
            let a = ring.points[i];
            let b = ring.points[(i + 1) % n];
            if (a.y <= y && y < b.y) || (b.y <= y && y < a.y) {
                let t = (y - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
    }
    crossings.sort_by(|a, b| a.total_cmp(b));
    crossings
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .filter(|(a, b)| b > a)
        .collect()
}
