//! Cubic-bezier easing, the numerical core behind per-segment keyframe
//! interpolation.

use crate::Scalar;

const NEWTON_ITERATIONS: u32 = 8;
const NEWTON_EPSILON: Scalar = 1e-6;
const SUBDIVISION_ITERATIONS: u32 = 8;

/// Solves the cubic-bezier easing curve defined by control points
/// `(x1, y1)` and `(x2, y2)` (with implicit endpoints `(0,0)` and `(1,1)`)
/// for the `y` corresponding to input `x`.
///
/// `x` is clamped to `[0, 1]` first. Degenerate/linear control points
/// (`x1 == y1 && x2 == y2`) short-circuit to `x` itself. Otherwise Newton-
/// Raphson iterates on the bezier's `x(t)` to find `t`, falling back to
/// binary subdivision if the derivative vanishes. The result is always
/// clamped to `[0, 1]`; NaN/infinite results fall back to the clamped input.
pub fn solve(x: Scalar, x1: Scalar, y1: Scalar, x2: Scalar, y2: Scalar) -> Scalar {
    let x = x.clamp(0.0, 1.0);

    if (x1 == y1 && x2 == y2) || (x <= 0.0) || (x >= 1.0) {
        // Linear control points, or already at an endpoint: x(t) = y(t) = t.
        return x;
    }

    let t = solve_t_for_x(x, x1, x2);
    let y = bezier_component(t, y1, y2);

    if !y.is_finite() {
        return x;
    }
    y.clamp(0.0, 1.0)
}

fn solve_t_for_x(x: Scalar, x1: Scalar, x2: Scalar) -> Scalar {
    let mut t = x;
    for _ in 0..NEWTON_ITERATIONS {
        let x_at_t = bezier_component(t, x1, x2) - x;
        if x_at_t.abs() < NEWTON_EPSILON {
            return t;
        }
        let derivative = bezier_derivative(t, x1, x2);
        if derivative.abs() < NEWTON_EPSILON {
            break;
        }
        t -= x_at_t / derivative;
    }
    binary_subdivide_for_x(x, x1, x2)
}

fn binary_subdivide_for_x(x: Scalar, x1: Scalar, x2: Scalar) -> Scalar {
    let mut lo = 0.0;
    let mut hi = 1.0;
    let mut t = x;
    for _ in 0..SUBDIVISION_ITERATIONS {
        t = (lo + hi) / 2.0;
        let x_at_t = bezier_component(t, x1, x2) - x;
        if x_at_t > 0.0 {
            hi = t;
        } else {
            lo = t;
        }
    }
    t
}

/// Evaluates a single bezier component (x or y) at parameter `t`, given the
/// two interior control-point coordinates `c1`, `c2` and implicit endpoints
/// 0 and 1.
#[inline]
fn bezier_component(t: Scalar, c1: Scalar, c2: Scalar) -> Scalar {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * c1 + 3.0 * mt * t * t * c2 + t * t * t
}

#[inline]
fn bezier_derivative(t: Scalar, c1: Scalar, c2: Scalar) -> Scalar {
    let mt = 1.0 - t;
    3.0 * mt * mt * c1 + 6.0 * mt * t * (c2 - c1) + 3.0 * t * t * (1.0 - c2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(solve(0.0, 0.25, 0.1, 0.25, 1.0), 0.0);
        assert_eq!(solve(1.0, 0.25, 0.1, 0.25, 1.0), 1.0);
    }

    #[test]
    fn linear_control_points_return_input() {
        for x in [0.0, 0.1, 0.5, 0.9, 1.0] {
            assert_eq!(solve(x, 0.3, 0.3, 0.7, 0.7), x);
        }
    }

    #[test]
    fn result_is_bounded() {
        for i in 0..=20 {
            let x = i as Scalar / 20.0;
            let y = solve(x, 0.0, 1.0, 1.0, 0.0);
            assert!((0.0..=1.0).contains(&y));
            assert!(y.is_finite());
        }
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(solve(-1.0, 0.25, 0.1, 0.25, 1.0), 0.0);
        assert_eq!(solve(2.0, 0.25, 0.1, 0.25, 1.0), 1.0);
    }

    proptest::proptest! {
        #[test]
        fn solve_is_always_bounded_and_finite(
            x in -2.0f64..2.0,
            x1 in -2.0f64..2.0,
            y1 in -2.0f64..2.0,
            x2 in -2.0f64..2.0,
            y2 in -2.0f64..2.0,
        ) {
            let y = solve(x, x1, y1, x2, y2);
            proptest::prop_assert!(y.is_finite());
            proptest::prop_assert!((0.0..=1.0).contains(&y));
        }

        #[test]
        fn solve_fixes_endpoints(x1 in -2.0f64..2.0, y1 in -2.0f64..2.0, x2 in -2.0f64..2.0, y2 in -2.0f64..2.0) {
            proptest::prop_assert_eq!(solve(0.0, x1, y1, x2, y2), 0.0);
            proptest::prop_assert_eq!(solve(1.0, x1, y1, x2, y2), 1.0);
        }
    }
}
