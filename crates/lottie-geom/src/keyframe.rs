//! Generic keyframe sampling shared by scalar, vector and path-valued
//! animated tracks.

use crate::{BezierPath, Scalar, Vec2, easing};

/// Types that can be linearly blended between two keyframe values.
pub trait Interpolate: Copy {
    /// Blends `self` and `other` at fraction `t` (not required to clamp).
    fn interpolate(self, other: Self, t: Scalar) -> Self;
}

impl Interpolate for Scalar {
    #[inline]
    fn interpolate(self, other: Self, t: Scalar) -> Self {
        crate::scalar::scalar_interp(self, other, t)
    }
}

impl Interpolate for Vec2 {
    #[inline]
    fn interpolate(self, other: Self, t: Scalar) -> Self {
        self.lerp(other, t)
    }
}

/// One keyframe: a value at a point in time, with the time-domain easing
/// control points leading into the *next* keyframe's value.
///
/// `in_tangent`/`out_tangent` here are ease control points in the unit
/// square of the [0,1] time/value domain (Lottie's `i`/`o`), not spatial
/// path tangents — a `Keyframe<BezierPath>`'s `value` carries its own
/// spatial tangents internally.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe<T> {
    pub time: Scalar,
    pub value: T,
    pub in_tangent: Option<Vec2>,
    pub out_tangent: Option<Vec2>,
    pub hold: bool,
}

impl<T> Keyframe<T> {
    /// A plain keyframe with linear easing and no hold.
    pub fn linear(time: Scalar, value: T) -> Self {
        Self { time, value, in_tangent: None, out_tangent: None, hold: false }
    }
}

/// An animated scalar or vector track: either a single static value, or a
/// list of keyframes (kept sorted by time by the constructing code).
#[derive(Debug, Clone, PartialEq)]
pub enum AnimTrack<T> {
    Static(T),
    Keyframed(Vec<Keyframe<T>>),
}

impl<T: Interpolate> AnimTrack<T> {
    /// True if the track carries more than one keyframe's worth of
    /// animation. A single-keyframe `Keyframed` track is treated as
    /// equivalent to `Static` per the open-question resolution in
    /// DESIGN.md.
    pub fn is_animated(&self) -> bool {
        matches!(self, AnimTrack::Keyframed(kfs) if kfs.len() > 1)
    }

    /// Samples the track at `frame`. Before the first keyframe returns the
    /// first value; after the last returns the last value; a `hold`
    /// keyframe holds its left value across the segment.
    pub fn sample(&self, frame: Scalar) -> T {
        match self {
            AnimTrack::Static(v) => *v,
            AnimTrack::Keyframed(kfs) => sample_keyframes(kfs, frame),
        }
    }
}

/// Shared bracketing + easing logic for keyframe lists.
fn sample_keyframes<T: Interpolate>(kfs: &[Keyframe<T>], frame: Scalar) -> T {
    debug_assert!(!kfs.is_empty());
    if kfs.len() == 1 || frame <= kfs[0].time {
        return kfs[0].value;
    }
    let last = kfs.len() - 1;
    if frame >= kfs[last].time {
        return kfs[last].value;
    }
    let idx = match kfs.binary_search_by(|kf| kf.time.partial_cmp(&frame).unwrap()) {
        Ok(i) => i,
        Err(i) => i - 1,
    };
    let left = &kfs[idx];
    let right = &kfs[idx + 1];
    if left.hold {
        return left.value;
    }
    let span = right.time - left.time;
    let t = if span.abs() < crate::scalar::SCALAR_NEARLY_ZERO { 0.0 } else { (frame - left.time) / span };
    let eased = match (left.out_tangent, right.in_tangent) {
        (Some(o), Some(i)) => easing::solve(t, o.x, o.y, i.x, i.y),
        _ => t,
    };
    left.value.interpolate(right.value, eased)
}

/// An animated bezier path: either a single static path, or a list of
/// keyframed paths sharing topology pairwise between neighbours actually
/// sampled together.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimPath {
    StaticBezier(BezierPath),
    KeyframedBezier(Vec<Keyframe<BezierPath>>),
}

/// Returned when bracketing keyframes of an `AnimPath` do not share
/// topology (vertex count and closed flag) at sample time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("path keyframes at t={left_time} and t={right_time} do not share topology")]
pub struct PathTopologyMismatch {
    pub left_time: Scalar,
    pub right_time: Scalar,
}

impl AnimPath {
    /// True if there is more than one keyframe.
    pub fn is_animated(&self) -> bool {
        matches!(self, AnimPath::KeyframedBezier(kfs) if kfs.len() > 1)
    }

    /// Samples the path at `frame`, applying the same bracketing and easing
    /// rules as [`AnimTrack::sample`] but requiring the bracketing
    /// keyframes to share topology.
    pub fn sample(&self, frame: Scalar) -> Result<BezierPath, PathTopologyMismatch> {
        match self {
            AnimPath::StaticBezier(p) => Ok(p.clone()),
            AnimPath::KeyframedBezier(kfs) => {
                debug_assert!(!kfs.is_empty());
                if kfs.len() == 1 || frame <= kfs[0].time {
                    return Ok(kfs[0].value.clone());
                }
                let last = kfs.len() - 1;
                if frame >= kfs[last].time {
                    return Ok(kfs[last].value.clone());
                }
                let idx = match kfs.binary_search_by(|kf| kf.time.partial_cmp(&frame).unwrap()) {
                    Ok(i) => i,
                    Err(i) => i - 1,
                };
                let left = &kfs[idx];
                let right = &kfs[idx + 1];
                if left.hold {
                    return Ok(left.value.clone());
                }
                let span = right.time - left.time;
                let t = if span.abs() < crate::scalar::SCALAR_NEARLY_ZERO {
                    0.0
                } else {
                    (frame - left.time) / span
                };
                let eased = match (left.out_tangent, right.in_tangent) {
                    (Some(o), Some(i)) => easing::solve(t, o.x, o.y, i.x, i.y),
                    _ => t,
                };
                left.value.interpolated(&right.value, eased).ok_or(PathTopologyMismatch {
                    left_time: left.time,
                    right_time: right.time,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_track_is_constant() {
        let track = AnimTrack::Static(42.0);
        assert_eq!(track.sample(0.0), 42.0);
        assert_eq!(track.sample(100.0), 42.0);
    }

    #[test]
    fn linear_keyframes_interpolate() {
        let track = AnimTrack::Keyframed(vec![Keyframe::linear(0.0, 0.0), Keyframe::linear(10.0, 100.0)]);
        assert_eq!(track.sample(-5.0), 0.0);
        assert_eq!(track.sample(5.0), 50.0);
        assert_eq!(track.sample(15.0), 100.0);
    }

    #[test]
    fn hold_keyframe_holds_left_value() {
        let mut kf0 = Keyframe::linear(0.0, 1.0);
        kf0.hold = true;
        let track = AnimTrack::Keyframed(vec![kf0, Keyframe::linear(10.0, 9.0)]);
        assert_eq!(track.sample(5.0), 1.0);
    }

    #[test]
    fn single_keyframe_is_static() {
        let track: AnimTrack<Scalar> = AnimTrack::Keyframed(vec![Keyframe::linear(0.0, 7.0)]);
        assert!(!track.is_animated());
        assert_eq!(track.sample(123.0), 7.0);
    }
}
