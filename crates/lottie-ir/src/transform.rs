//! Layer and shape-group transform tracks.
//!
//! The compiled matrix formula deliberately has no skew term: Lottie skew
//! is validated out entirely (see [`crate::validate::anim`] rule 9) rather
//! than carried through to render time, so neither [`TransformTrack`] nor
//! [`GroupTransform`] models it.

use crate::decode::{ValueDecodeError, scalar_track, vec2_track};
use crate::model::TransformModel;
use lottie_geom::{AnimTrack, Matrix2D, Vec2};

/// A layer's five animated transform channels.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformTrack {
    /// Position.
    pub position: AnimTrack<Vec2>,
    /// Scale, percent (100 = 1.0).
    pub scale: AnimTrack<Vec2>,
    /// Rotation, degrees.
    pub rotation: AnimTrack<f64>,
    /// Opacity, 0..100.
    pub opacity: AnimTrack<f64>,
    /// Anchor point.
    pub anchor: AnimTrack<Vec2>,
}

impl Default for TransformTrack {
    fn default() -> Self {
        TransformTrack {
            position: AnimTrack::Static(Vec2::ZERO),
            scale: AnimTrack::Static(Vec2::new(100.0, 100.0)),
            rotation: AnimTrack::Static(0.0),
            opacity: AnimTrack::Static(100.0),
            anchor: AnimTrack::Static(Vec2::ZERO),
        }
    }
}

impl TransformTrack {
    /// Decodes a layer's `ks`. A missing `ks` yields the identity track.
    pub fn from_model(model: Option<&TransformModel>) -> Result<TransformTrack, ValueDecodeError> {
        let Some(model) = model else {
            return Ok(TransformTrack::default());
        };
        let mut track = TransformTrack::default();
        if let Some(p) = &model.position {
            track.position = vec2_track(p)?;
        }
        if let Some(s) = &model.scale {
            track.scale = vec2_track(s)?;
        }
        if let Some(r) = &model.rotation {
            track.rotation = scalar_track(r)?;
        }
        if let Some(o) = &model.opacity {
            track.opacity = scalar_track(o)?;
        }
        if let Some(a) = &model.anchor {
            track.anchor = vec2_track(a)?;
        }
        Ok(track)
    }

    /// The local matrix at `frame`: `T(position) * R(rotation) * S(scale/100) * T(-anchor)`.
    pub fn matrix(&self, frame: f64) -> Matrix2D {
        local_matrix(self.position.sample(frame), self.rotation.sample(frame), self.scale.sample(frame), self.anchor.sample(frame))
    }

    /// Opacity at `frame`, in Lottie's native 0..100 range.
    pub fn opacity_value(&self, frame: f64) -> f64 {
        self.opacity.sample(frame)
    }
}

fn local_matrix(position: Vec2, rotation_degrees: f64, scale_percent: Vec2, anchor: Vec2) -> Matrix2D {
    Matrix2D::translation(position)
        .concatenating(&Matrix2D::rotation_degrees(rotation_degrees))
        .concatenating(&Matrix2D::scale(Vec2::new(scale_percent.x / 100.0, scale_percent.y / 100.0)))
        .concatenating(&Matrix2D::translation(Vec2::new(-anchor.x, -anchor.y)))
}

/// A shape group's transform (Lottie `tr` item): identical channel set to
/// [`TransformTrack`], but opacity is pre-normalised to `0..1` at decode
/// time since group-transform stacks are composed by multiplying opacity,
/// not by re-reading it from Lottie's `0..100` convention each time.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTransform {
    /// Position.
    pub position: AnimTrack<Vec2>,
    /// Scale, percent (100 = 1.0).
    pub scale: AnimTrack<Vec2>,
    /// Rotation, degrees.
    pub rotation: AnimTrack<f64>,
    /// Opacity, already normalised to `0..1`.
    pub opacity: AnimTrack<f64>,
    /// Anchor point.
    pub anchor: AnimTrack<Vec2>,
}

impl Default for GroupTransform {
    fn default() -> Self {
        GroupTransform {
            position: AnimTrack::Static(Vec2::ZERO),
            scale: AnimTrack::Static(Vec2::new(100.0, 100.0)),
            rotation: AnimTrack::Static(0.0),
            opacity: AnimTrack::Static(1.0),
            anchor: AnimTrack::Static(Vec2::ZERO),
        }
    }
}

impl GroupTransform {
    /// The local matrix at `frame`, identical formula to [`TransformTrack::matrix`].
    pub fn matrix(&self, frame: f64) -> Matrix2D {
        local_matrix(self.position.sample(frame), self.rotation.sample(frame), self.scale.sample(frame), self.anchor.sample(frame))
    }

    /// Opacity at `frame`, already in `0..1`.
    pub fn opacity_value(&self, frame: f64) -> f64 {
        self.opacity.sample(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_track_is_identity() {
        let track = TransformTrack::default();
        assert!(track.matrix(0.0).is_identity());
        assert_eq!(track.opacity_value(0.0), 100.0);
    }

    #[test]
    fn translation_applies() {
        let model = TransformModel {
            position: Some(serde_json::from_str(r#"{"a":0,"k":[10,20]}"#).unwrap()),
            ..Default::default()
        };
        let track = TransformTrack::from_model(Some(&model)).unwrap();
        let p = track.matrix(0.0).apply(Vec2::ZERO);
        assert_eq!(p, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn group_opacity_is_normalised() {
        let group = GroupTransform { opacity: AnimTrack::Static(0.5), ..GroupTransform::default() };
        assert_eq!(group.opacity_value(0.0), 0.5);
    }
}
