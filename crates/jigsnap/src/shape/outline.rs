//! Piece outlines: path segments, SVG rendering, flattening.
//!
//! Model
//! - An outline is a closed path in the piece's local frame: `MoveTo (0,0)`,
//!   then the top, right, bottom and left edges clockwise on screen (y down),
//!   then `Close`.
//! - A non-flat edge is a straight run to the bump base, two cubics through
//!   the bump tip, and a straight run to the next corner. The tip and both
//!   base points depend only on the seam polarity and the notch size, so the
//!   two cells sharing a seam meet there regardless of their own `arc_k`.
//!
//! Code cross-refs: `types::{Edges, ShapeCfg, Side}`, `generate::generate_with`

use std::fmt::Write;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::cfg::{BASE_HANDLE, TIP_LIFT};
use super::types::{EdgePolarity, Edges, ShapeCfg, Side};

/// One path command. Coordinates are absolute in the outline's frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum PathSeg {
    MoveTo {
        to: Vector2<f64>,
    },
    LineTo {
        to: Vector2<f64>,
    },
    CubicTo {
        c1: Vector2<f64>,
        c2: Vector2<f64>,
        to: Vector2<f64>,
    },
    Close,
}

impl PathSeg {
    /// End point of the command (`None` for `Close`).
    #[inline]
    pub fn end(&self) -> Option<Vector2<f64>> {
        match *self {
            PathSeg::MoveTo { to } | PathSeg::LineTo { to } | PathSeg::CubicTo { to, .. } => {
                Some(to)
            }
            PathSeg::Close => None,
        }
    }

    fn translated(&self, by: Vector2<f64>) -> PathSeg {
        match *self {
            PathSeg::MoveTo { to } => PathSeg::MoveTo { to: to + by },
            PathSeg::LineTo { to } => PathSeg::LineTo { to: to + by },
            PathSeg::CubicTo { c1, c2, to } => PathSeg::CubicTo {
                c1: c1 + by,
                c2: c2 + by,
                to: to + by,
            },
            PathSeg::Close => PathSeg::Close,
        }
    }
}

/// Axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

impl Bounds {
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
    #[inline]
    fn include(&mut self, p: Vector2<f64>) {
        self.min = self.min.inf(&p);
        self.max = self.max.sup(&p);
    }
}

/// Closed piece outline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub segs: Vec<PathSeg>,
}

impl Outline {
    pub fn start(&self) -> Option<Vector2<f64>> {
        match self.segs.first() {
            Some(PathSeg::MoveTo { to }) => Some(*to),
            _ => None,
        }
    }

    /// Last explicit point before `Close`.
    pub fn end(&self) -> Option<Vector2<f64>> {
        self.segs.iter().rev().find_map(PathSeg::end)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.segs.last(), Some(PathSeg::Close))
    }

    pub fn cubic_count(&self) -> usize {
        self.segs
            .iter()
            .filter(|s| matches!(s, PathSeg::CubicTo { .. }))
            .count()
    }

    pub fn translated(&self, by: Vector2<f64>) -> Outline {
        Outline {
            segs: self.segs.iter().map(|s| s.translated(by)).collect(),
        }
    }

    /// SVG path data: `M 0 0 L x y C x y, x y, x y … Z`.
    pub fn to_svg_path(&self) -> String {
        let mut out = String::new();
        for seg in &self.segs {
            if !out.is_empty() {
                out.push(' ');
            }
            // Writing to a String cannot fail.
            let _ = match *seg {
                PathSeg::MoveTo { to } => write!(out, "M {} {}", to.x, to.y),
                PathSeg::LineTo { to } => write!(out, "L {} {}", to.x, to.y),
                PathSeg::CubicTo { c1, c2, to } => write!(
                    out,
                    "C {} {}, {} {}, {} {}",
                    c1.x, c1.y, c2.x, c2.y, to.x, to.y
                ),
                PathSeg::Close => write!(out, "Z"),
            };
        }
        out
    }

    /// Bounds of all path and control points. Cubics stay inside their control
    /// polygon, so this contains the drawn shape (tabs included).
    pub fn control_bounds(&self) -> Option<Bounds> {
        let mut points = self.segs.iter().flat_map(|seg| {
            let pts: [Option<Vector2<f64>>; 3] = match *seg {
                PathSeg::MoveTo { to } | PathSeg::LineTo { to } => [Some(to), None, None],
                PathSeg::CubicTo { c1, c2, to } => [Some(c1), Some(c2), Some(to)],
                PathSeg::Close => [None, None, None],
            };
            pts.into_iter().flatten()
        });
        let first = points.next()?;
        let mut b = Bounds {
            min: first,
            max: first,
        };
        for p in points {
            b.include(p);
        }
        Some(b)
    }

    /// Polyline approximation; each cubic contributes `steps_per_curve` points.
    /// The closing duplicate of the start point is dropped.
    pub fn flatten(&self, steps_per_curve: usize) -> Vec<Vector2<f64>> {
        let steps = steps_per_curve.max(1);
        let mut pts: Vec<Vector2<f64>> = Vec::with_capacity(self.segs.len() + self.cubic_count() * steps);
        let mut current = Vector2::zeros();
        for seg in &self.segs {
            match *seg {
                PathSeg::MoveTo { to } | PathSeg::LineTo { to } => {
                    pts.push(to);
                    current = to;
                }
                PathSeg::CubicTo { c1, c2, to } => {
                    for step in 1..=steps {
                        let t = step as f64 / steps as f64;
                        pts.push(cubic_point(current, c1, c2, to, t));
                    }
                    current = to;
                }
                PathSeg::Close => {}
            }
        }
        if pts.len() > 1 && pts.first() == pts.last() {
            pts.pop();
        }
        pts
    }

    /// Enclosed area of the flattened outline.
    pub fn area(&self, steps_per_curve: usize) -> f64 {
        polygon_area(&self.flatten(steps_per_curve)).abs()
    }
}

/// Point on a cubic Bézier at parameter `t`.
pub fn cubic_point(
    p0: Vector2<f64>,
    p1: Vector2<f64>,
    p2: Vector2<f64>,
    p3: Vector2<f64>,
    t: f64,
) -> Vector2<f64> {
    let u = 1.0 - t;
    let uu = u * u;
    let tt = t * t;
    p0 * (uu * u) + p1 * (3.0 * uu * t) + p2 * (3.0 * u * tt) + p3 * (tt * t)
}

/// Signed shoelace area (positive for clockwise order with y pointing down).
pub fn polygon_area(points: &[Vector2<f64>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        twice += p.x * q.y - q.x * p.y;
    }
    0.5 * twice
}

/// Append one edge from `start` to `end` (the path is already at `start`).
///
/// `notch_along` is the bump half-width along the edge; `notch_depth` is the
/// tip distance from the edge line.
#[allow(clippy::too_many_arguments)]
fn push_edge(
    segs: &mut Vec<PathSeg>,
    start: Vector2<f64>,
    end: Vector2<f64>,
    side: Side,
    polarity: EdgePolarity,
    notch_along: f64,
    notch_depth: f64,
    arc_k: f64,
) {
    if polarity.is_flat() {
        segs.push(PathSeg::LineTo { to: end });
        return;
    }
    let span = end - start;
    let dir = span / span.norm();
    let a = dir * notch_along;
    // Tab pushes the tip along the outward normal, Slot against it.
    let reach = side.outward() * (notch_depth * polarity.sign() as f64);
    let mid = start + span * 0.5;
    let base_in = mid - a;
    let base_out = mid + a;
    let lift = reach * TIP_LIFT;

    segs.push(PathSeg::LineTo { to: base_in });
    segs.push(PathSeg::CubicTo {
        c1: base_in + a * BASE_HANDLE,
        c2: mid - a * arc_k + lift,
        to: mid + reach,
    });
    segs.push(PathSeg::CubicTo {
        c1: mid + a * arc_k + lift,
        c2: base_out - a * BASE_HANDLE,
        to: base_out,
    });
    segs.push(PathSeg::LineTo { to: end });
}

/// Closed outline of a `cell_w × cell_h` cell with the given edges.
pub(crate) fn piece_outline(
    cell_w: f64,
    cell_h: f64,
    edges: &Edges,
    cfg: &ShapeCfg,
    arc_k: f64,
) -> Outline {
    let notch_w = cell_w * cfg.notch_scale;
    let notch_h = cell_h * cfg.notch_scale;
    let corners = [
        Vector2::new(0.0, 0.0),
        Vector2::new(cell_w, 0.0),
        Vector2::new(cell_w, cell_h),
        Vector2::new(0.0, cell_h),
    ];

    let mut segs = Vec::with_capacity(2 + 4 * 4);
    segs.push(PathSeg::MoveTo { to: corners[0] });
    for (k, side) in Side::ALL.into_iter().enumerate() {
        let (along, depth) = if side.is_horizontal() {
            (notch_w, notch_h)
        } else {
            (notch_h, notch_w)
        };
        push_edge(
            &mut segs,
            corners[k],
            corners[(k + 1) % 4],
            side,
            edges.get(side),
            along,
            depth,
            arc_k,
        );
    }
    segs.push(PathSeg::Close);
    Outline { segs }
}
