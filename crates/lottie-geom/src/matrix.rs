//! 2D affine transformation matrix.

use crate::{Scalar, Vec2};

/// A 2D affine transform, stored as the six coefficients of
///
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// | 0  0  1  |
/// ```
///
/// `apply(point)` includes translation; `apply_vector` drops it, matching
/// the point/vector distinction used when transforming a `BezierPath`'s
/// vertices versus its tangents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix2D {
    /// Row-major: (a, b, c, d, tx, ty) where the matrix is
    /// `[[a, c, tx], [b, d, ty]]`.
    pub a: Scalar,
    pub b: Scalar,
    pub c: Scalar,
    pub d: Scalar,
    pub tx: Scalar,
    pub ty: Scalar,
}

impl Default for Matrix2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix2D {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// A pure translation.
    #[inline]
    pub fn translation(t: Vec2) -> Self {
        Self {
            tx: t.x,
            ty: t.y,
            ..Self::IDENTITY
        }
    }

    /// A pure rotation, in degrees, counter-clockwise in a y-down coordinate
    /// system (matching Lottie's `r`/`rz` convention).
    #[inline]
    pub fn rotation_degrees(degrees: Scalar) -> Self {
        let radians = degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// A pure scale.
    #[inline]
    pub fn scale(s: Vec2) -> Self {
        Self {
            a: s.x,
            d: s.y,
            ..Self::IDENTITY
        }
    }

    /// True if this is the identity transform.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Concatenates `self` after `other`: `self.concatenating(other)` applied
    /// to a point equals `self.apply(other.apply(point))`.
    #[inline]
    pub fn concatenating(&self, other: &Matrix2D) -> Matrix2D {
        Matrix2D {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    /// Transforms a point (applies translation).
    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Transforms a vector (direction only, ignores translation). Used for
    /// bezier tangents, which are relative offsets.
    #[inline]
    pub fn apply_vector(&self, v: Vec2) -> Vec2 {
        Vec2::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }
}

impl std::ops::Mul for Matrix2D {
    type Output = Matrix2D;
    #[inline]
    fn mul(self, rhs: Matrix2D) -> Matrix2D {
        self.concatenating(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_noop() {
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(Matrix2D::IDENTITY.apply(p), p);
    }

    #[test]
    fn translation_moves_points_not_vectors() {
        let m = Matrix2D::translation(Vec2::new(10.0, -5.0));
        assert_eq!(m.apply(Vec2::new(1.0, 1.0)), Vec2::new(11.0, -4.0));
        assert_eq!(m.apply_vector(Vec2::new(1.0, 1.0)), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn concatenation_order() {
        let t = Matrix2D::translation(Vec2::new(10.0, 0.0));
        let s = Matrix2D::scale(Vec2::new(2.0, 2.0));
        let combined = t.concatenating(&s);
        let p = Vec2::new(3.0, 3.0);
        assert_eq!(combined.apply(p), t.apply(s.apply(p)));
    }

    #[test]
    fn rotation_quarter_turn() {
        let m = Matrix2D::rotation_degrees(90.0);
        let p = m.apply(Vec2::new(1.0, 0.0));
        assert!((p.x - 0.0).abs() < 1e-9);
        assert!((p.y - 1.0).abs() < 1e-9);
    }
}
