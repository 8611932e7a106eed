//! `BezierPath`: the ordered vertex/tangent representation shared by masks,
//! shapes, and animated paths throughout the compiler.

use crate::{Aabb, Matrix2D, Scalar, Vec2};
use smallvec::SmallVec;

/// One edge of a [`BezierPath`], already resolved to absolute control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// A straight line, emitted when both tangents at an edge are nearly
    /// zero.
    Line { from: Vec2, to: Vec2 },
    /// A cubic bezier, with control points expressed in absolute space.
    Cubic {
        from: Vec2,
        c1: Vec2,
        c2: Vec2,
        to: Vec2,
    },
}

/// A closed or open bezier path: vertices plus relative in/out tangents.
///
/// Invariant: `vertices.len() == in_tangents.len() == out_tangents.len()`.
/// Tangents are expressed relative to their owning vertex. An empty path has
/// zero vertices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BezierPath {
    pub vertices: Vec<Vec2>,
    pub in_tangents: Vec<Vec2>,
    pub out_tangents: Vec<Vec2>,
    pub closed: bool,
}

impl BezierPath {
    /// Builds a path, asserting the tangent arrays match the vertex count.
    /// Callers constructing paths from untrusted input should check lengths
    /// themselves and report a validation issue instead of panicking.
    pub fn new(vertices: Vec<Vec2>, in_tangents: Vec<Vec2>, out_tangents: Vec<Vec2>, closed: bool) -> Self {
        debug_assert_eq!(vertices.len(), in_tangents.len());
        debug_assert_eq!(vertices.len(), out_tangents.len());
        Self { vertices, in_tangents, out_tangents, closed }
    }

    /// An empty path.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// True if there are no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Axis-aligned bounding box over the vertices (does not account for
    /// control-point overshoot past the hull, which is a reasonable
    /// approximation for the validator's "rect outside canvas" style checks).
    pub fn aabb(&self) -> Aabb {
        self.vertices.iter().fold(Aabb::EMPTY, |acc, &v| acc.include(v))
    }

    /// Enumerates the path's edges as absolute-space segments. An edge whose
    /// tangents are both nearly zero is reported as a `Line`, otherwise as a
    /// `Cubic` — this mirrors the `cgPath`-style conversion used by the path
    /// builder and by hit testing.
    pub fn segments(&self) -> Vec<Segment> {
        let n = self.vertices.len();
        if n < 2 {
            return Vec::new();
        }
        let edge_count = if self.closed { n } else { n - 1 };
        let mut out = Vec::with_capacity(edge_count);
        for i in 0..edge_count {
            let j = (i + 1) % n;
            let from = self.vertices[i];
            let to = self.vertices[j];
            let out_tan = self.out_tangents[i];
            let in_tan = self.in_tangents[j];
            if out_tan.is_nearly_zero() && in_tan.is_nearly_zero() {
                out.push(Segment::Line { from, to });
            } else {
                out.push(Segment::Cubic {
                    from,
                    c1: from.add(out_tan),
                    c2: to.add(in_tan),
                    to,
                });
            }
        }
        out
    }

    /// Transforms vertices as points and tangents as vectors.
    pub fn applying(&self, m: &Matrix2D) -> BezierPath {
        BezierPath {
            vertices: self.vertices.iter().map(|&v| m.apply(v)).collect(),
            in_tangents: self.in_tangents.iter().map(|&v| m.apply_vector(v)).collect(),
            out_tangents: self.out_tangents.iter().map(|&v| m.apply_vector(v)).collect(),
            closed: self.closed,
        }
    }

    /// Vertex-by-vertex interpolation, requiring matching topology (same
    /// vertex count and closed flag). Returns `None` otherwise.
    pub fn interpolated(&self, other: &BezierPath, t: Scalar) -> Option<BezierPath> {
        if self.vertex_count() != other.vertex_count() || self.closed != other.closed {
            return None;
        }
        let n = self.vertex_count();
        let mut vertices = Vec::with_capacity(n);
        let mut in_tangents = Vec::with_capacity(n);
        let mut out_tangents = Vec::with_capacity(n);
        for i in 0..n {
            vertices.push(self.vertices[i].lerp(other.vertices[i], t));
            in_tangents.push(self.in_tangents[i].lerp(other.in_tangents[i], t));
            out_tangents.push(self.out_tangents[i].lerp(other.out_tangents[i], t));
        }
        Some(BezierPath { vertices, in_tangents, out_tangents, closed: self.closed })
    }

    /// Flattens the path to a polyline using adaptive subdivision with the
    /// given tolerance (`flatness`). Cubic segments are recursively
    /// subdivided until the control points deviate from the chord by less
    /// than `flatness`, or a recursion-depth cap is hit.
    pub fn flatten(&self, flatness: Scalar) -> Vec<Vec2> {
        let segments = self.segments();
        if segments.is_empty() {
            return self.vertices.clone();
        }
        let mut out: Vec<Vec2> = Vec::new();
        for seg in segments {
            match seg {
                Segment::Line { from, to } => {
                    if out.last().copied() != Some(from) {
                        out.push(from);
                    }
                    out.push(to);
                }
                Segment::Cubic { from, c1, c2, to } => {
                    if out.last().copied() != Some(from) {
                        out.push(from);
                    }
                    flatten_cubic(from, c1, c2, to, flatness, 0, &mut out);
                }
            }
        }
        out
    }

    /// Even-odd point containment test, valid for closed paths with at
    /// least three vertices. Flattens first for a robust polygon test.
    pub fn contains(&self, point: Vec2) -> bool {
        if !self.closed || self.vertex_count() < 3 {
            return false;
        }
        let poly = self.flatten(0.25);
        point_in_polygon_even_odd(&poly, point)
    }
}

fn flatten_cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, tolerance: Scalar, depth: u32, out: &mut Vec<Vec2>) {
    const MAX_DEPTH: u32 = 16;
    if depth >= MAX_DEPTH || cubic_flat_enough(p0, p1, p2, p3, tolerance) {
        out.push(p3);
        return;
    }
    // De Casteljau subdivision at t = 0.5.
    let p01 = p0.lerp(p1, 0.5);
    let p12 = p1.lerp(p2, 0.5);
    let p23 = p2.lerp(p3, 0.5);
    let p012 = p01.lerp(p12, 0.5);
    let p123 = p12.lerp(p23, 0.5);
    let mid = p012.lerp(p123, 0.5);
    flatten_cubic(p0, p01, p012, mid, tolerance, depth + 1, out);
    flatten_cubic(mid, p123, p23, p3, tolerance, depth + 1, out);
}

fn cubic_flat_enough(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, tolerance: Scalar) -> bool {
    let d1 = point_line_distance(p1, p0, p3);
    let d2 = point_line_distance(p2, p0, p3);
    d1 <= tolerance && d2 <= tolerance
}

fn point_line_distance(p: Vec2, a: Vec2, b: Vec2) -> Scalar {
    let ab = b.sub(a);
    let len = ab.length();
    if len < crate::scalar::SCALAR_NEARLY_ZERO {
        return p.sub(a).length();
    }
    let ap = p.sub(a);
    (ab.x * ap.y - ab.y * ap.x).abs() / len
}

fn point_in_polygon_even_odd(poly: &[Vec2], point: Vec2) -> bool {
    if poly.len() < 3 {
        return false;
    }
    let mut inside = false;
    let n = poly.len();
    let mut j = n - 1;
    for i in 0..n {
        let pi = poly[i];
        let pj = poly[j];
        let intersects = (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
        if intersects {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Tiny fixed-capacity tangent accumulator used by shape baking, where the
/// number of control points is known up front.
pub type TangentBuf = SmallVec<[Vec2; 8]>;
