//! Geometry primitives shared by all board items.
//!
//! Coordinates are millimetres stored as `f64` inside [`kurbo::Point`].

use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

/// Tolerance used when comparing coordinates against the grid.
const GRID_EPSILON: f64 = 1e-9;

/// Snap a point to the nearest intersection of a square grid.
pub fn snap_to_grid(point: Point, grid_interval: f64) -> Point {
    if grid_interval <= 0.0 {
        return point;
    }
    Point::new(
        (point.x / grid_interval).round() * grid_interval,
        (point.y / grid_interval).round() * grid_interval,
    )
}

/// Snap a delta vector to the grid.
pub fn snap_vec_to_grid(delta: Vec2, grid_interval: f64) -> Vec2 {
    snap_to_grid(delta.to_point(), grid_interval).to_vec2()
}

/// Check whether a point already lies on the grid.
pub fn is_on_grid(point: Point, grid_interval: f64) -> bool {
    let snapped = snap_to_grid(point, grid_interval);
    (snapped.x - point.x).abs() < GRID_EPSILON && (snapped.y - point.y).abs() < GRID_EPSILON
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    point.distance(proj)
}

/// An angle in degrees. Positive values rotate counter-clockwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub const fn from_deg(degrees: f64) -> Self {
        Self(degrees)
    }

    pub const fn deg0() -> Self {
        Self(0.0)
    }

    pub const fn deg90() -> Self {
        Self(90.0)
    }

    pub const fn deg180() -> Self {
        Self(180.0)
    }

    pub const fn deg270() -> Self {
        Self(270.0)
    }

    pub fn to_deg(self) -> f64 {
        self.0
    }

    pub fn to_rad(self) -> f64 {
        self.0.to_radians()
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// The same angle mapped into `[0, 360)`.
    pub fn mapped_to_0_360(self) -> Self {
        let deg = self.0 % 360.0;
        if deg < 0.0 { Self(deg + 360.0) } else { Self(deg) }
    }

    /// Sine and cosine, exact for multiples of 90°.
    pub fn sin_cos(self) -> (f64, f64) {
        let deg = self.mapped_to_0_360().0;
        if deg == 0.0 {
            (0.0, 1.0)
        } else if deg == 90.0 {
            (1.0, 0.0)
        } else if deg == 180.0 {
            (0.0, -1.0)
        } else if deg == 270.0 {
            (-1.0, 0.0)
        } else {
            self.to_rad().sin_cos()
        }
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

/// Mirror axis selector for flip operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Mirror left/right (x coordinates change).
    Horizontal,
    /// Mirror top/bottom (y coordinates change).
    Vertical,
}

/// Rotate a vector around the origin.
pub fn rotate_vec(v: Vec2, angle: Angle) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Rotate a point around a center.
pub fn rotate_point(point: Point, center: Point, angle: Angle) -> Point {
    center + rotate_vec(point - center, angle)
}

/// Mirror a point across the axis through `center`.
pub fn mirror_point(point: Point, center: Point, orientation: Orientation) -> Point {
    let scale = match orientation {
        Orientation::Horizontal => Affine::scale_non_uniform(-1.0, 1.0),
        Orientation::Vertical => Affine::scale_non_uniform(1.0, -1.0),
    };
    let affine = Affine::translate(center.to_vec2()) * scale * Affine::translate(-center.to_vec2());
    affine * point
}

/// A path vertex: position plus the arc angle of the segment to the next vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub pos: Point,
    /// Arc angle towards the following vertex (zero = straight segment).
    #[serde(default)]
    pub angle: Angle,
}

impl Vertex {
    pub fn new(pos: Point, angle: Angle) -> Self {
        Self { pos, angle }
    }

    pub fn straight(pos: Point) -> Self {
        Self::new(pos, Angle::deg0())
    }
}

/// An ordered list of vertices.
///
/// A path is closed when it has at least two vertices and the last vertex sits on
/// the first one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    vertices: Vec<Vertex>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vertices(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    /// Build an open path of straight segments.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            vertices: points.into_iter().map(Vertex::straight).collect(),
        }
    }

    /// Closed outline of a rectangle, counter-clockwise from the bottom-left corner.
    pub fn rect(rect: Rect) -> Self {
        let mut path = Self::from_points([
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ]);
        path.close();
        path
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) if self.vertices.len() >= 2 => first.pos == last.pos,
            _ => false,
        }
    }

    /// Append a copy of the first vertex unless already closed.
    /// Returns true if a vertex was added.
    pub fn close(&mut self) -> bool {
        if self.vertices.len() < 2 || self.is_closed() {
            return false;
        }
        let first = Vertex::straight(self.vertices[0].pos);
        self.vertices.push(first);
        true
    }

    pub fn push(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    pub fn insert(&mut self, index: usize, vertex: Vertex) {
        self.vertices.insert(index, vertex);
    }

    pub fn remove_last(&mut self) -> Option<Vertex> {
        self.vertices.pop()
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.vertices.iter().map(|v| v.pos)
    }

    pub fn translate(&mut self, delta: Vec2) {
        for v in &mut self.vertices {
            v.pos += delta;
        }
    }

    pub fn rotate(&mut self, center: Point, angle: Angle) {
        for v in &mut self.vertices {
            v.pos = rotate_point(v.pos, center, angle);
        }
    }

    /// Mirror all vertices. Arc directions flip with the geometry.
    pub fn mirror(&mut self, center: Point, orientation: Orientation) {
        for v in &mut self.vertices {
            v.pos = mirror_point(v.pos, center, orientation);
            v.angle = -v.angle;
        }
    }

    pub fn snap_to_grid(&mut self, grid_interval: f64) {
        for v in &mut self.vertices {
            v.pos = snap_to_grid(v.pos, grid_interval);
        }
    }

    pub fn is_on_grid(&self, grid_interval: f64) -> bool {
        self.points().all(|p| is_on_grid(p, grid_interval))
    }

    /// Bounding box of all vertex positions, or `None` for an empty path.
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.points();
        let first = points.next()?;
        Some(points.fold(Rect::from_points(first, first), |r, p| {
            r.union_pt(p)
        }))
    }

    /// Total length including arc segments.
    pub fn length(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|w| {
                let chord = w[0].pos.distance(w[1].pos);
                let angle = w[0].angle.to_rad().abs();
                if angle == 0.0 || chord == 0.0 {
                    chord
                } else {
                    let radius = chord / (2.0 * (angle / 2.0).sin());
                    radius * angle
                }
            })
            .sum()
    }

    /// Shortest distance from `point` to any segment (arcs measured by their chord).
    pub fn distance_to(&self, point: Point) -> f64 {
        match self.vertices.len() {
            0 => f64::INFINITY,
            1 => point.distance(self.vertices[0].pos),
            _ => self
                .vertices
                .windows(2)
                .map(|w| point_to_segment_dist(point, w[0].pos, w[1].pos))
                .fold(f64::INFINITY, f64::min),
        }
    }

    /// Even-odd containment test against the polygon formed by the vertices.
    pub fn contains(&self, point: Point) -> bool {
        let pts: Vec<Point> = self.points().collect();
        if pts.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = pts.len() - 1;
        for i in 0..pts.len() {
            let (a, b) = (pts[i], pts[j]);
            if (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}
