//! `PathID` / `PathResource` / `PathRegistry`: the shared, append-only store
//! of triangulated path geometry.

use lottie_geom::{Scalar, Vec2};
use std::sync::atomic::{AtomicU64, Ordering};

/// A stable handle into a [`PathRegistry`], equal to the resource's
/// insertion index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathID(pub usize);

/// Per-segment easing captured between two keyframes of an animated path,
/// or the default for a static path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentEasing {
    pub out_tangent: Vec2,
    pub in_tangent: Vec2,
    pub hold: bool,
}

impl SegmentEasing {
    /// Linear easing, used for the sole segment of a static path and as the
    /// trailing segment past the last keyframe.
    pub const LINEAR: SegmentEasing = SegmentEasing {
        out_tangent: Vec2::new(0.0, 0.0),
        in_tangent: Vec2::new(1.0, 1.0),
        hold: false,
    };
}

/// A triangulated, time-sampleable path: one flattened position array per
/// keyframe, a single shared triangle index buffer, and per-segment easing.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResource {
    /// One flattened position array per keyframe (length 1 for a static
    /// path). Every array has the same length (`vertex_count`).
    pub positions: Vec<Vec<Vec2>>,
    /// Shared triangle index buffer, built once from the first keyframe.
    pub indices: Vec<u16>,
    /// Number of vertices per keyframe's position array.
    pub vertex_count: usize,
    /// Times (in frames) of each keyframe; length 1 for a static path.
    pub keyframe_times: Vec<Scalar>,
    /// Easing from keyframe `i` to keyframe `i+1`; length
    /// `keyframe_times.len().saturating_sub(1)`, or a single linear entry
    /// for a static path.
    pub segment_easing: Vec<SegmentEasing>,
}

impl PathResource {
    /// True if this resource has more than one keyframe.
    pub fn is_animated(&self) -> bool {
        self.positions.len() > 1
    }

    /// Samples the flattened position array at `frame`, interpolating
    /// between bracketing keyframes with the captured per-segment easing.
    pub fn sample(&self, frame: Scalar) -> Vec<Vec2> {
        if self.positions.len() <= 1 {
            return self.positions.first().cloned().unwrap_or_default();
        }
        let last = self.positions.len() - 1;
        if frame <= self.keyframe_times[0] {
            return self.positions[0].clone();
        }
        if frame >= self.keyframe_times[last] {
            return self.positions[last].clone();
        }
        let idx = match self.keyframe_times.binary_search_by(|t| t.partial_cmp(&frame).unwrap()) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let easing = self.segment_easing[idx];
        if easing.hold {
            return self.positions[idx].clone();
        }
        let t0 = self.keyframe_times[idx];
        let t1 = self.keyframe_times[idx + 1];
        let span = t1 - t0;
        let raw_t = if span.abs() < lottie_geom::scalar::SCALAR_NEARLY_ZERO { 0.0 } else { (frame - t0) / span };
        let eased = lottie_geom::easing::solve(
            raw_t,
            easing.out_tangent.x,
            easing.out_tangent.y,
            easing.in_tangent.x,
            easing.in_tangent.y,
        );
        self.positions[idx]
            .iter()
            .zip(self.positions[idx + 1].iter())
            .map(|(a, b)| a.lerp(*b, eased))
            .collect()
    }
}

static GENERATION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Append-only store of [`PathResource`]s, handed out as sequential
/// [`PathID`]s. Shared across the compilation of multiple animations within
/// one scene; read-only once compilation finishes.
#[derive(Debug, Default)]
pub struct PathRegistry {
    resources: Vec<PathResource>,
    generation_id: u64,
}

impl PathRegistry {
    /// Creates a new, empty registry with a fresh generation id.
    pub fn new() -> Self {
        Self { resources: Vec::new(), generation_id: GENERATION_COUNTER.fetch_add(1, Ordering::Relaxed) }
    }

    /// The process-wide generation id distinguishing this registry instance
    /// for cache keying. Does not participate in compile semantics.
    pub fn generation_id(&self) -> u64 {
        self.generation_id
    }

    /// Registers a resource, returning the `PathID` equal to its insertion
    /// index.
    pub fn register(&mut self, resource: PathResource) -> PathID {
        let id = PathID(self.resources.len());
        self.resources.push(resource);
        id
    }

    /// Looks up a resource by id. Returns `None` if `id` is out of range.
    pub fn path(&self, id: PathID) -> Option<&PathResource> {
        self.resources.get(id.0)
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// True if no resources have been registered.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_assigns_sequential_ids() {
        let mut reg = PathRegistry::new();
        let a = reg.register(PathResource {
            positions: vec![vec![]],
            indices: vec![],
            vertex_count: 0,
            keyframe_times: vec![0.0],
            segment_easing: vec![SegmentEasing::LINEAR],
        });
        let b = reg.register(PathResource {
            positions: vec![vec![]],
            indices: vec![],
            vertex_count: 0,
            keyframe_times: vec![0.0],
            segment_easing: vec![SegmentEasing::LINEAR],
        });
        assert_eq!(a, PathID(0));
        assert_eq!(b, PathID(1));
        assert!(reg.path(PathID(2)).is_none());
    }

    #[test]
    fn distinct_registries_have_distinct_generation_ids() {
        let a = PathRegistry::new();
        let b = PathRegistry::new();
        assert_ne!(a.generation_id(), b.generation_id());
    }
}
