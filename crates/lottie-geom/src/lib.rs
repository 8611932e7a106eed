//! # lottie-geom
//!
//! Deterministic, allocation-light 2D geometry primitives shared by the rest
//! of the Lottie compiler:
//! - **Vec2 / Matrix2D**: point, vector and affine-transform algebra.
//! - **BezierPath**: the vertex/tangent representation used by masks, shape
//!   paths and animated paths, plus flattening and point-in-path tests.
//! - **easing**: the cubic-bezier numerical solver that drives keyframe
//!   interpolation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bezier;
pub mod color;
pub mod easing;
pub mod geometry;
pub mod keyframe;
pub mod matrix;
pub mod scalar;

pub use bezier::{BezierPath, Segment, TangentBuf};
pub use color::{Rgb, Rgba};
pub use geometry::{Aabb, SizeD, Vec2};
pub use keyframe::{AnimPath, AnimTrack, Interpolate, Keyframe, PathTopologyMismatch};
pub use matrix::Matrix2D;
pub use scalar::Scalar;

/// Convenience re-exports for downstream crates.
pub mod prelude {
    pub use crate::{
        Aabb, AnimPath, AnimTrack, BezierPath, Interpolate, Keyframe, Matrix2D, PathTopologyMismatch,
        Rgb, Rgba, Scalar, Segment, SizeD, Vec2, easing,
    };
}
