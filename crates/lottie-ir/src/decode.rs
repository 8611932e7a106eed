//! Shared helpers for lowering [`crate::model::LottieValue`] payloads into
//! [`lottie_geom`] animated tracks. Used by [`crate::transform`],
//! [`crate::shapes`] and [`crate::mask`] alike, since a scalar, a `Vec2`
//! and a path keyframe track all share the same `t`/`i`/`o`/`h` easing
//! envelope.

use crate::model::{KeyframeModel, KeyframeValueModel, LottieValue, LottieValueData, PathDataModel, TangentModel};
use lottie_geom::{AnimPath, AnimTrack, BezierPath, Keyframe, Vec2};

/// Failure decoding a [`LottieValue`] into a concrete track type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueDecodeError {
    /// The value's `k` payload is not the shape this decoder expects.
    #[error("unrecognised value format")]
    UnrecognisedFormat,
    /// A keyframe array contained no decodable values.
    #[error("keyframe array contains no decodable values")]
    KeyframesMissing,
}

fn tangent_vec2(t: &Option<TangentModel>) -> Option<Vec2> {
    t.as_ref().map(|t| Vec2::new(t.x.first(), t.y.first()))
}

/// Decodes a scalar (`f64`) animated track.
pub fn scalar_track(value: &LottieValue) -> Result<AnimTrack<f64>, ValueDecodeError> {
    match &value.k {
        LottieValueData::Number(n) => Ok(AnimTrack::Static(*n)),
        LottieValueData::NumberArray(arr) => Ok(AnimTrack::Static(arr.first().copied().unwrap_or(0.0))),
        LottieValueData::Keyframes(kfs) => {
            let keyframes = scalar_keyframes(kfs)?;
            Ok(AnimTrack::Keyframed(keyframes))
        }
        LottieValueData::Path(_) | LottieValueData::Unknown(_) => Err(ValueDecodeError::UnrecognisedFormat),
    }
}

fn scalar_keyframes(kfs: &[KeyframeModel]) -> Result<Vec<Keyframe<f64>>, ValueDecodeError> {
    if kfs.is_empty() {
        return Err(ValueDecodeError::KeyframesMissing);
    }
    let mut out = Vec::with_capacity(kfs.len());
    for kf in kfs {
        let start = match &kf.start {
            Some(KeyframeValueModel::Numbers(n)) => n.first().copied().unwrap_or(0.0),
            _ => return Err(ValueDecodeError::UnrecognisedFormat),
        };
        out.push(Keyframe {
            time: kf.time,
            value: start,
            in_tangent: tangent_vec2(&kf.in_tangent),
            out_tangent: tangent_vec2(&kf.out_tangent),
            hold: kf.hold == Some(1),
        });
    }
    Ok(out)
}

/// Decodes a `Vec2` animated track (position, scale, anchor, size, etc.).
pub fn vec2_track(value: &LottieValue) -> Result<AnimTrack<Vec2>, ValueDecodeError> {
    match &value.k {
        LottieValueData::Number(n) => Ok(AnimTrack::Static(Vec2::new(*n, *n))),
        LottieValueData::NumberArray(arr) => {
            Ok(AnimTrack::Static(Vec2::new(arr.first().copied().unwrap_or(0.0), arr.get(1).copied().unwrap_or(0.0))))
        }
        LottieValueData::Keyframes(kfs) => {
            if kfs.is_empty() {
                return Err(ValueDecodeError::KeyframesMissing);
            }
            let mut out = Vec::with_capacity(kfs.len());
            for kf in kfs {
                let start = match &kf.start {
                    Some(KeyframeValueModel::Numbers(n)) => {
                        Vec2::new(n.first().copied().unwrap_or(0.0), n.get(1).copied().unwrap_or(0.0))
                    }
                    _ => return Err(ValueDecodeError::UnrecognisedFormat),
                };
                out.push(Keyframe {
                    time: kf.time,
                    value: start,
                    in_tangent: tangent_vec2(&kf.in_tangent),
                    out_tangent: tangent_vec2(&kf.out_tangent),
                    hold: kf.hold == Some(1),
                });
            }
            Ok(AnimTrack::Keyframed(out))
        }
        LottieValueData::Path(_) | LottieValueData::Unknown(_) => Err(ValueDecodeError::UnrecognisedFormat),
    }
}

/// Decodes a static RGBA color. Per-channel animation is outside this
/// compiler's subset (fill/stroke extraction rejects it before this is
/// called with anything but a static or first-keyframe snapshot), so this
/// takes whatever single set of components the value resolves to.
pub fn color_rgba(value: &LottieValue) -> Result<lottie_geom::Rgba, ValueDecodeError> {
    let components: Vec<f64> = match &value.k {
        LottieValueData::NumberArray(arr) => arr.clone(),
        LottieValueData::Number(n) => vec![*n, *n, *n],
        LottieValueData::Keyframes(kfs) => match kfs.first() {
            Some(KeyframeModel { start: Some(KeyframeValueModel::Numbers(n)), .. }) => n.clone(),
            _ => return Err(ValueDecodeError::UnrecognisedFormat),
        },
        LottieValueData::Path(_) | LottieValueData::Unknown(_) => return Err(ValueDecodeError::UnrecognisedFormat),
    };
    Ok(lottie_geom::Rgba {
        r: components.first().copied().unwrap_or(0.0),
        g: components.get(1).copied().unwrap_or(0.0),
        b: components.get(2).copied().unwrap_or(0.0),
        a: components.get(3).copied().unwrap_or(1.0),
    })
}

/// Converts raw path-data vertex/tangent arrays into a [`BezierPath`].
/// Lottie stores in/out tangents as offsets relative to the vertex, which
/// is exactly `BezierPath`'s own convention, so no further adjustment is
/// needed.
pub fn path_data_to_bezier(pd: &PathDataModel) -> BezierPath {
    let to_vec2 = |pair: &Vec<f64>| Vec2::new(pair.first().copied().unwrap_or(0.0), pair.get(1).copied().unwrap_or(0.0));
    let vertices = pd.v.iter().map(to_vec2).collect();
    let in_tangents = pd.i.iter().map(to_vec2).collect();
    let out_tangents = pd.o.iter().map(to_vec2).collect();
    BezierPath::new(vertices, in_tangents, out_tangents, pd.c)
}

/// Decodes an `AnimPath` (a shape's `ks`/a mask's `pt`).
pub fn anim_path(value: &LottieValue) -> Result<AnimPath, ValueDecodeError> {
    match &value.k {
        LottieValueData::Path(pd) => Ok(AnimPath::StaticBezier(path_data_to_bezier(pd))),
        LottieValueData::Keyframes(kfs) => {
            if kfs.is_empty() {
                return Err(ValueDecodeError::KeyframesMissing);
            }
            let mut out = Vec::with_capacity(kfs.len());
            for kf in kfs {
                let path = match &kf.start {
                    Some(KeyframeValueModel::Path(paths)) if !paths.is_empty() => path_data_to_bezier(&paths[0]),
                    _ => return Err(ValueDecodeError::UnrecognisedFormat),
                };
                out.push(Keyframe {
                    time: kf.time,
                    value: path,
                    in_tangent: tangent_vec2(&kf.in_tangent),
                    out_tangent: tangent_vec2(&kf.out_tangent),
                    hold: kf.hold == Some(1),
                });
            }
            Ok(AnimPath::KeyframedBezier(out))
        }
        LottieValueData::Number(_) | LottieValueData::NumberArray(_) | LottieValueData::Unknown(_) => {
            Err(ValueDecodeError::UnrecognisedFormat)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(json: &str) -> LottieValue {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn scalar_static_number() {
        let v = value(r#"{"a":0,"k":100}"#);
        assert_eq!(scalar_track(&v).unwrap(), AnimTrack::Static(100.0));
    }

    #[test]
    fn scalar_keyframed() {
        let v = value(r#"{"a":1,"k":[{"t":0,"s":[0]},{"t":10,"s":[100]}]}"#);
        let track = scalar_track(&v).unwrap();
        assert!(track.is_animated());
        assert_eq!(track.sample(0.0), 0.0);
    }

    #[test]
    fn vec2_static_array() {
        let v = value(r#"{"a":0,"k":[10,20,0]}"#);
        assert_eq!(vec2_track(&v).unwrap(), AnimTrack::Static(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn single_keyframe_collapses_is_animated_false() {
        let v = value(r#"{"a":1,"k":[{"t":5,"s":[7]}]}"#);
        let track = scalar_track(&v).unwrap();
        assert!(!track.is_animated());
        assert_eq!(track.sample(999.0), 7.0);
    }

    #[test]
    fn anim_path_static() {
        let v = value(r#"{"a":0,"k":{"i":[[0,0]],"o":[[0,0]],"v":[[1,2]],"c":true}}"#);
        let path = anim_path(&v).unwrap();
        assert!(!path.is_animated());
    }

    #[test]
    fn anim_path_rejects_numeric_keyframes() {
        let v = value(r#"{"a":1,"k":[{"t":0,"s":[0]}]}"#);
        assert_eq!(anim_path(&v), Err(ValueDecodeError::UnrecognisedFormat));
    }
}
