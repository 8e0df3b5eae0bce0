#![forbid(unsafe_code)]

//! Cubic Bezier connector curve and its arrowhead.

use std::fmt::Write;

use sidecar_core::geometry::Point;

/// A cubic Bezier segment `p0 -> p3` with control points `c1`, `c2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point,
    pub c1: Point,
    pub c2: Point,
    pub p3: Point,
}

impl CubicBezier {
    pub const fn new(p0: Point, c1: Point, c2: Point, p3: Point) -> Self {
        Self { p0, c1, c2, p3 }
    }

    /// Horizontal S-curve between two points.
    ///
    /// Both control points share the x found `curvature` of the way from
    /// start toward end; `c1` keeps the start's y and `c2` the end's y, so
    /// the curve leaves and arrives horizontally.
    pub fn s_curve(start: Point, end: Point, curvature: f64) -> Self {
        let cx = start.x + (end.x - start.x) * curvature;
        Self::new(start, Point::new(cx, start.y), Point::new(cx, end.y), end)
    }

    /// Point on the curve at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Point::new(
            a * self.p0.x + b * self.c1.x + c * self.c2.x + d * self.p3.x,
            a * self.p0.y + b * self.c1.y + c * self.c2.y + d * self.p3.y,
        )
    }

    /// First derivative at `t`, as a direction vector `(dx, dy)`.
    pub fn tangent_at(&self, t: f64) -> (f64, f64) {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let a = 3.0 * u * u;
        let b = 6.0 * u * t;
        let c = 3.0 * t * t;
        (
            a * (self.c1.x - self.p0.x) + b * (self.c2.x - self.c1.x) + c * (self.p3.x - self.c2.x),
            a * (self.c1.y - self.p0.y) + b * (self.c2.y - self.c1.y) + c * (self.p3.y - self.c2.y),
        )
    }

    /// Angle of travel at the terminus, in radians.
    ///
    /// Falls back to the chord direction when the end tangent degenerates
    /// (control point on top of the endpoint), and to zero for a point curve.
    pub fn end_angle(&self) -> f64 {
        let (dx, dy) = self.tangent_at(1.0);
        if dx.hypot(dy) > f64::EPSILON {
            return dy.atan2(dx);
        }
        let (cx, cy) = (self.p3.x - self.p0.x, self.p3.y - self.p0.y);
        if cx.hypot(cy) > f64::EPSILON {
            return cy.atan2(cx);
        }
        0.0
    }

    /// SVG path data: `M x y C x y, x y, x y`.
    pub fn to_svg_path(&self) -> String {
        let mut out = String::with_capacity(64);
        let _ = write!(
            out,
            "M {} {} C {} {}, {} {}, {} {}",
            fmt_num(self.p0.x),
            fmt_num(self.p0.y),
            fmt_num(self.c1.x),
            fmt_num(self.c1.y),
            fmt_num(self.c2.x),
            fmt_num(self.c2.y),
            fmt_num(self.p3.x),
            fmt_num(self.p3.y),
        );
        out
    }
}

/// Triangular arrowhead at the end of a connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrowhead {
    pub tip: Point,
    pub left: Point,
    pub right: Point,
    /// Direction of travel at the tip, radians.
    pub angle: f64,
}

impl Arrowhead {
    /// Arrowhead at the curve terminus aligned to its local tangent.
    pub fn at_end(curve: &CubicBezier, length: f64, spread_deg: f64) -> Self {
        let angle = curve.end_angle();
        let spread = spread_deg.to_radians();
        let tip = curve.p3;
        let wing = |a: f64| Point::new(tip.x - length * a.cos(), tip.y - length * a.sin());
        Self {
            tip,
            left: wing(angle - spread),
            right: wing(angle + spread),
            angle,
        }
    }

    /// SVG path data for the closed triangle.
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} L {} {} L {} {} Z",
            fmt_num(self.left.x),
            fmt_num(self.left.y),
            fmt_num(self.tip.x),
            fmt_num(self.tip.y),
            fmt_num(self.right.x),
            fmt_num(self.right.y),
        )
    }
}

/// Format a coordinate with at most two decimals and no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let mut s = format!("{rounded:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}
