//! `PathResourceBuilder`: flattening, topology checks and earcut
//! triangulation for [`PathResource`] construction.

use crate::registry::{PathResource, SegmentEasing};
use lottie_geom::{AnimPath, BezierPath, Keyframe, Scalar};

/// The default flattening tolerance used when the caller doesn't supply
/// one.
pub const DEFAULT_FLATNESS: Scalar = 0.5;

/// Failure modes of [`PathResourceBuilder::build`] / `build_animated`. The
/// caller (the IR compiler) maps these onto the context-specific error
/// codes `MASK_PATH_BUILD_FAILED` / `MATTE_PATH_BUILD_FAILED`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathBuildError {
    #[error("path has fewer than three vertices after flattening")]
    TooFewVertices,
    #[error("earcut triangulation produced no indices")]
    TriangulationFailed,
    #[error("triangulation produced an index that does not fit in u16")]
    IndexOverflow,
    #[error("keyframe {0} flattened to a different vertex count than keyframe 0")]
    KeyframeVertexCountMismatch(usize),
    #[error("no keyframes with decodable values were present")]
    KeyframesMissing,
}

/// Builds [`PathResource`]s from static or keyframed bezier paths.
pub struct PathResourceBuilder;

impl PathResourceBuilder {
    /// Builds a static, single-keyframe resource from one path.
    pub fn build(path: &BezierPath, flatness: Scalar) -> Result<PathResource, PathBuildError> {
        let positions = path.flatten(flatness);
        if positions.len() < 3 {
            return Err(PathBuildError::TooFewVertices);
        }
        let indices = triangulate(&positions)?;
        let vertex_count = positions.len();
        Ok(PathResource {
            positions: vec![positions],
            indices,
            vertex_count,
            keyframe_times: vec![0.0],
            segment_easing: vec![SegmentEasing::LINEAR],
        })
    }

    /// Builds a resource from an [`AnimPath`]. A static path delegates to
    /// [`Self::build`]; a keyframed path flattens every keyframe
    /// independently, requires all flattenings to share a vertex count, and
    /// triangulates only the first (reusing its indices for every
    /// keyframe).
    pub fn build_from_anim_path(path: &AnimPath, flatness: Scalar) -> Result<PathResource, PathBuildError> {
        match path {
            AnimPath::StaticBezier(p) => Self::build(p, flatness),
            AnimPath::KeyframedBezier(kfs) => Self::build_animated(kfs, flatness),
        }
    }

    /// Builds a resource from an explicit keyframe list.
    pub fn build_animated(
        keyframes: &[Keyframe<BezierPath>],
        flatness: Scalar,
    ) -> Result<PathResource, PathBuildError> {
        if keyframes.is_empty() {
            return Err(PathBuildError::KeyframesMissing);
        }
        if keyframes.len() == 1 {
            return Self::build(&keyframes[0].value, flatness);
        }

        let mut positions: Vec<Vec<lottie_geom::Vec2>> = Vec::with_capacity(keyframes.len());
        for (i, kf) in keyframes.iter().enumerate() {
            let flattened = kf.value.flatten(flatness);
            if flattened.len() < 3 {
                return Err(PathBuildError::TooFewVertices);
            }
            if i > 0 && flattened.len() != positions[0].len() {
                return Err(PathBuildError::KeyframeVertexCountMismatch(i));
            }
            positions.push(flattened);
        }

        let indices = triangulate(&positions[0])?;
        let vertex_count = positions[0].len();
        let keyframe_times = keyframes.iter().map(|kf| kf.time).collect();
        let segment_easing = keyframes
            .windows(2)
            .map(|pair| {
                let left = &pair[0];
                SegmentEasing {
                    out_tangent: left.out_tangent.unwrap_or(lottie_geom::Vec2::new(0.0, 0.0)),
                    in_tangent: pair[1].in_tangent.unwrap_or(lottie_geom::Vec2::new(1.0, 1.0)),
                    hold: left.hold,
                }
            })
            .collect();

        Ok(PathResource { positions, indices, vertex_count, keyframe_times, segment_easing })
    }
}

/// Triangulates a flattened, closed polygon via earcut, the external
/// triangulator this crate defers to (see §1 of the specification).
fn triangulate(positions: &[lottie_geom::Vec2]) -> Result<Vec<u16>, PathBuildError> {
    let flat: Vec<f64> = positions.iter().flat_map(|p| [p.x, p.y]).collect();
    let indices = earcutr::earcut(&flat, &[], 2).map_err(|_| PathBuildError::TriangulationFailed)?;
    if indices.is_empty() {
        return Err(PathBuildError::TriangulationFailed);
    }
    indices
        .into_iter()
        .map(|i| u16::try_from(i).map_err(|_| PathBuildError::IndexOverflow))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_geom::Vec2;

    fn square() -> BezierPath {
        BezierPath::new(
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(10.0, 10.0),
                Vec2::new(0.0, 10.0),
            ],
            vec![Vec2::ZERO; 4],
            vec![Vec2::ZERO; 4],
            true,
        )
    }

    #[test]
    fn builds_static_square() {
        let resource = PathResourceBuilder::build(&square(), DEFAULT_FLATNESS).unwrap();
        assert_eq!(resource.vertex_count, 4);
        assert!(!resource.indices.is_empty());
        assert!(!resource.is_animated());
    }

    #[test]
    fn rejects_degenerate_path() {
        let p = BezierPath::new(
            vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)],
            vec![Vec2::ZERO; 2],
            vec![Vec2::ZERO; 2],
            true,
        );
        assert_eq!(PathResourceBuilder::build(&p, DEFAULT_FLATNESS), Err(PathBuildError::TooFewVertices));
    }

    #[test]
    fn animated_requires_matching_vertex_counts() {
        let mut bigger = square();
        bigger.vertices.push(Vec2::new(5.0, 5.0));
        bigger.in_tangents.push(Vec2::ZERO);
        bigger.out_tangents.push(Vec2::ZERO);

        let kfs = vec![Keyframe::linear(0.0, square()), Keyframe::linear(10.0, bigger)];
        assert_eq!(
            PathResourceBuilder::build_animated(&kfs, DEFAULT_FLATNESS),
            Err(PathBuildError::KeyframeVertexCountMismatch(1))
        );
    }

    #[test]
    fn single_keyframe_collapses_to_static() {
        let kfs = vec![Keyframe::linear(5.0, square())];
        let resource = PathResourceBuilder::build_animated(&kfs, DEFAULT_FLATNESS).unwrap();
        assert!(!resource.is_animated());
    }

    #[test]
    fn animated_samples_between_keyframes() {
        let mut bigger = square();
        for v in bigger.vertices.iter_mut() {
            *v = v.scale(2.0);
        }
        let kfs = vec![Keyframe::linear(0.0, square()), Keyframe::linear(10.0, bigger)];
        let resource = PathResourceBuilder::build_animated(&kfs, DEFAULT_FLATNESS).unwrap();
        let mid = resource.sample(5.0);
        assert_eq!(mid.len(), resource.vertex_count);
    }

    fn rectangle(w: f64, h: f64) -> BezierPath {
        BezierPath::new(
            vec![Vec2::new(0.0, 0.0), Vec2::new(w, 0.0), Vec2::new(w, h), Vec2::new(0.0, h)],
            vec![Vec2::ZERO; 4],
            vec![Vec2::ZERO; 4],
            true,
        )
    }

    proptest::proptest! {
        #[test]
        fn rectangle_triangulation_always_yields_two_triangles(w in 1.0f64..1000.0, h in 1.0f64..1000.0) {
            let resource = PathResourceBuilder::build(&rectangle(w, h), DEFAULT_FLATNESS).unwrap();
            proptest::prop_assert_eq!(resource.vertex_count, 4);
            proptest::prop_assert_eq!(resource.indices.len(), 6);
            for &i in &resource.indices {
                proptest::prop_assert!((i as usize) < resource.vertex_count);
            }
        }
    }
}
