//! Offline Lottie scene compiler: validates a scene descriptor and its
//! bound Lottie/Bodymovin animations, lowers each into a compact
//! intermediate representation, and walks that IR into a flat render
//! command stream a host application can replay against its own canvas.
//!
//! ## Pipeline
//!
//! 1. [`scene`] models the scene descriptor (`scene.json`); [`validate::scene::validate_scene`]
//!    checks it in isolation.
//! 2. [`model`] models one Lottie/Bodymovin document; [`validate::anim::validate_anim`]
//!    checks it against the scene binding it will be compiled under.
//! 3. [`compile::compile_animation`] lowers a validated document into an
//!    [`ir::AnimIR`], registering every mask/shape/clip path it bakes into
//!    a shared `lottie_path::PathRegistry`.
//! 4. [`render::render_commands`] (or [`render::render_edit_commands`])
//!    walks the compiled IR at a given frame into a `Vec<render::RenderCommand>`.
//!
//! Validation never aborts outright: both validators accumulate
//! [`error::ValidationIssue`]s into an [`error::ValidationReport`] and
//! leave it to the caller to decide whether an error-severity entry should
//! block compilation. Compilation is fatal per animation
//! ([`error::CompileError`]); rendering degrades per layer
//! ([`error::RenderIssue`]) rather than failing the whole frame.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compile;
pub mod decode;
pub mod error;
pub mod ir;
pub mod layers;
pub mod mask;
pub mod model;
pub mod render;
pub mod scene;
pub mod shapes;
pub mod transform;
pub mod validate;

pub use compile::{CompileContext, compile_animation};
pub use error::{CompileError, CompileErrorKind, PackageError, RenderIssue, Severity, ValidationIssue, ValidationReport};
pub use ir::{AnimIR, AssetIndexIR, BindingInfo, ImageAssetInfo, InputGeometryInfo, Meta, namespaced_asset_id};
pub use layers::{Composition, Layer, LayerContent, LayerTiming, LayerType};
pub use mask::{Mask, MaskMode, MatteInfo, MatteMode};
pub use model::LottieModel;
pub use render::{RenderCommand, render_commands, render_edit_commands};
pub use scene::{MaskCatalog, Scene};
pub use shapes::ShapeGroup;
pub use validate::anim::{AnimValidationContext, AssetResolver, validate_anim};
pub use validate::scene::validate_scene;
