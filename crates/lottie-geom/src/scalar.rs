//! Scalar type definition and utilities.

/// The scalar type used throughout the geometry kit. Lottie documents every
/// numeric field as a double, so we follow suit rather than narrowing to
/// `f32`.
pub type Scalar = f64;

/// Nearly-zero threshold for comparisons.
pub const SCALAR_NEARLY_ZERO: Scalar = 1.0 / (1u64 << 12) as Scalar;

/// Check if a scalar is nearly zero.
#[inline]
pub fn scalar_nearly_zero(x: Scalar) -> bool {
    x.abs() <= SCALAR_NEARLY_ZERO
}

/// Check if two scalars are nearly equal.
#[inline]
pub fn scalar_nearly_equal(a: Scalar, b: Scalar) -> bool {
    scalar_nearly_zero(a - b)
}

/// Check if `a` and `b` are within a caller-supplied epsilon. Used for
/// keyframe-time comparisons, where the default nearly-zero threshold is too
/// tight for frame-scaled values.
#[inline]
pub fn nearly_equal_eps(a: Scalar, b: Scalar, epsilon: Scalar) -> bool {
    (a - b).abs() < epsilon
}

/// Check if a scalar is finite (not infinity or NaN).
#[inline]
pub fn scalar_is_finite(x: Scalar) -> bool {
    x.is_finite()
}

/// Clamp `x` into `[lo, hi]`.
#[inline]
pub fn clamp(x: Scalar, lo: Scalar, hi: Scalar) -> Scalar {
    if x < lo { lo } else if x > hi { hi } else { x }
}

/// Linearly interpolate between two scalars.
#[inline]
pub fn scalar_interp(a: Scalar, b: Scalar, t: Scalar) -> Scalar {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(2.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn interp_endpoints() {
        assert_eq!(scalar_interp(1.0, 3.0, 0.0), 1.0);
        assert_eq!(scalar_interp(1.0, 3.0, 1.0), 3.0);
        assert_eq!(scalar_interp(1.0, 3.0, 0.5), 2.0);
    }
}
