//! Error and diagnostic taxonomies.
//!
//! Four kinds of failure surface from this crate, matching the four
//! taxonomies of the error-handling design: package/loader errors (typed,
//! but produced outside this crate's boundary), validation issues
//! (accumulated, never fatal), compiler errors (typed, fatal for one
//! animation), and render issues (accumulated, degrade the render instead
//! of failing it).

use std::path::PathBuf;

/// Loader-boundary errors. This crate never constructs these itself — the
/// package/loader is an external collaborator — but defines the type so
/// callers at that boundary have something concrete to match on.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    /// `scene.json` was not found at the package root.
    #[error("scene.json missing from package root")]
    SceneFileMissing,
    /// An `animRef` named by the scene could not be resolved to a file.
    #[error("animation file for anim ref '{anim_ref}' not found")]
    AnimFileMissing {
        /// The unresolved anim ref.
        anim_ref: String,
    },
    /// A file existed but did not parse as JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Severity of a [`ValidationIssue`] or [`RenderIssue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Blocks downstream use of the offending animation.
    Error,
    /// Advisory; pipeline continues.
    Warning,
}

/// One diagnostic from the scene or anim validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Stable error-code string, see [`codes`].
    pub code: &'static str,
    /// Error or warning.
    pub severity: Severity,
    /// JSON-pointer-like path to the offending value, e.g.
    /// `"anim(anim-1.json).fr"`.
    pub path: String,
    /// Human-readable message; stable codes carry the machine-checkable
    /// identity, this carries the detail.
    pub message: String,
}

impl ValidationIssue {
    /// Constructs an error-severity issue.
    pub fn error(code: &'static str, path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue { code, severity: Severity::Error, path: path.into(), message: message.into() }
    }

    /// Constructs a warning-severity issue.
    pub fn warning(code: &'static str, path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue { code, severity: Severity::Warning, path: path.into(), message: message.into() }
    }
}

/// An accumulated set of validation issues, as produced by
/// [`crate::validate::scene`] or [`crate::validate::anim`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one issue.
    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Appends every issue from another report, consuming it.
    pub fn extend(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    /// True if any issue has [`Severity::Error`].
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// The issues in emission order.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Consumes the report, returning its issues.
    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }
}

/// Fatal, per-animation compiler errors (taxonomy 3).
#[derive(Debug, thiserror::Error)]
#[error("compile error for '{anim_ref}': {kind}")]
pub struct CompileError {
    /// The animation being compiled when the error occurred.
    pub anim_ref: String,
    /// The specific failure.
    pub kind: CompileErrorKind,
}

impl CompileError {
    /// Constructs a compile error for `anim_ref`.
    pub fn new(anim_ref: impl Into<String>, kind: CompileErrorKind) -> Self {
        CompileError { anim_ref: anim_ref.into(), kind }
    }
}

/// The specific failure carried by a [`CompileError`].
#[derive(Debug, thiserror::Error)]
pub enum CompileErrorKind {
    /// No layer in any composition matched the binding key.
    #[error("binding layer '{binding_key}' not found")]
    BindingLayerNotFound {
        /// The configured binding key.
        binding_key: String,
    },
    /// More than one layer matched the binding key.
    #[error("binding layer '{binding_key}' is ambiguous: matched {count} layers")]
    BindingLayerAmbiguous {
        /// The configured binding key.
        binding_key: String,
        /// Number of matching layers found.
        count: usize,
    },
    /// The binding layer exists but is not an image layer (`ty == 2`).
    #[error("binding layer '{binding_key}' is not an image layer")]
    BindingLayerNotImage {
        /// The configured binding key.
        binding_key: String,
    },
    /// The binding layer exists and is an image layer, but carries no
    /// `refId`.
    #[error("binding layer '{binding_key}' has no asset reference")]
    BindingLayerNoAsset {
        /// The configured binding key.
        binding_key: String,
    },
    /// A layer's `ty` is outside the supported set `{0, 2, 3, 4}`.
    #[error("unsupported layer type {ty} at {path}")]
    UnsupportedLayerType {
        /// The offending `ty` value.
        ty: i64,
        /// Path to the offending layer.
        path: String,
    },
    /// `mediaInput` was found outside the binding layer's composition.
    #[error("mediaInput layer is not in the binding layer's composition")]
    MediaInputWrongComp,
    /// A defensive check failed: a precondition the validator should have
    /// already rejected. Reaching this indicates a validator bug.
    #[error("unsupported feature [{code}] at {path}: {message}")]
    UnsupportedFeature {
        /// Stable error code.
        code: &'static str,
        /// Detail message.
        message: String,
        /// Path to the offending value.
        path: String,
    },
}

/// Soft, render-time failures (taxonomy 4): the offending subtree is
/// skipped and the command stream stays well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderIssue {
    /// Stable error-code string.
    pub code: &'static str,
    /// Error or warning.
    pub severity: Severity,
    /// Path to the offending layer or composition.
    pub path: String,
    /// Human-readable detail.
    pub message: String,
    /// The frame index being rendered when the issue was recorded.
    pub frame_index: f64,
}

/// Helper used widely enough by asset/path resolution to live alongside
/// the error types: joins a root directory with a package-relative path.
pub fn resolve_under(root: &std::path::Path, relative: &str) -> PathBuf {
    root.join(relative)
}

/// Stable error-code string constants (§6). Kept as associated constants
/// rather than scattered literals so the full set is enumerable and
/// testable.
pub mod codes {
    /// Root `w`/`h`/`fr`/`op>ip` sanity check failed.
    pub const ANIM_ROOT_INVALID: &str = "ANIM_ROOT_INVALID";
    /// `scene.canvas.fps != lottie.fr`.
    pub const ANIM_FPS_MISMATCH: &str = "ANIM_FPS_MISMATCH";
    /// Bound input-rect size differs from animation size.
    pub const WARNING_ANIM_SIZE_MISMATCH: &str = "WARNING_ANIM_SIZE_MISMATCH";
    /// No layer matched the binding key.
    pub const BINDING_LAYER_NOT_FOUND: &str = "BINDING_LAYER_NOT_FOUND";
    /// More than one layer matched the binding key.
    pub const BINDING_LAYER_AMBIGUOUS: &str = "BINDING_LAYER_AMBIGUOUS";
    /// Binding layer is not `ty == 2`.
    pub const BINDING_LAYER_NOT_IMAGE: &str = "BINDING_LAYER_NOT_IMAGE";
    /// Binding layer has no `refId`.
    pub const BINDING_LAYER_NO_ASSET: &str = "BINDING_LAYER_NO_ASSET";
    /// A non-binding image asset could not be resolved on disk.
    pub const ASSET_MISSING: &str = "ASSET_MISSING";
    /// A `ty=0` layer's `refId` does not resolve to a precomp asset.
    pub const PRECOMP_REF_MISSING: &str = "PRECOMP_REF_MISSING";
    /// `ty` outside `{0,2,3,4}`.
    pub const UNSUPPORTED_LAYER_TYPE: &str = "UNSUPPORTED_LAYER_TYPE";
    /// Mask `mode` outside `{a,s,i}`.
    pub const UNSUPPORTED_MASK_MODE: &str = "UNSUPPORTED_MASK_MODE";
    /// Mask invert flag in an unsupported combination (reserved).
    pub const UNSUPPORTED_MASK_INVERT: &str = "UNSUPPORTED_MASK_INVERT";
    /// Animated mask path when `allowAnimatedMaskPath` is false.
    pub const UNSUPPORTED_MASK_PATH_ANIMATED: &str = "UNSUPPORTED_MASK_PATH_ANIMATED";
    /// Animated mask opacity.
    pub const UNSUPPORTED_MASK_OPACITY_ANIMATED: &str = "UNSUPPORTED_MASK_OPACITY_ANIMATED";
    /// Animated mask expansion.
    pub const UNSUPPORTED_MASK_EXPANSION_ANIMATED: &str = "UNSUPPORTED_MASK_EXPANSION_ANIMATED";
    /// Nonzero static mask expansion.
    pub const UNSUPPORTED_MASK_EXPANSION_NONZERO: &str = "UNSUPPORTED_MASK_EXPANSION_NONZERO";
    /// Unrecognised mask expansion value shape.
    pub const UNSUPPORTED_MASK_EXPANSION_FORMAT: &str = "UNSUPPORTED_MASK_EXPANSION_FORMAT";
    /// `tt` outside `{1,2,3,4}`.
    pub const UNSUPPORTED_MATTE_TYPE: &str = "UNSUPPORTED_MATTE_TYPE";
    /// No preceding `td=1` layer for an adjacency-paired consumer.
    pub const UNSUPPORTED_MATTE_LAYER_MISSING: &str = "UNSUPPORTED_MATTE_LAYER_MISSING";
    /// Adjacency-paired consumer at list index 0.
    pub const UNSUPPORTED_MATTE_LAYER_ORDER: &str = "UNSUPPORTED_MATTE_LAYER_ORDER";
    /// `tp` does not resolve to an earlier layer in the list.
    pub const MATTE_TARGET_NOT_FOUND: &str = "MATTE_TARGET_NOT_FOUND";
    /// `tp` resolves to a layer that is not strictly earlier in the list.
    pub const MATTE_TARGET_INVALID_ORDER: &str = "MATTE_TARGET_INVALID_ORDER";
    /// A shape-tree item type outside the supported set.
    pub const UNSUPPORTED_SHAPE_ITEM: &str = "UNSUPPORTED_SHAPE_ITEM";
    /// `ddd == 1`.
    pub const UNSUPPORTED_LAYER_3D: &str = "UNSUPPORTED_LAYER_3D";
    /// `ao == 1`.
    pub const UNSUPPORTED_LAYER_AUTO_ORIENT: &str = "UNSUPPORTED_LAYER_AUTO_ORIENT";
    /// `sr != 1`.
    pub const UNSUPPORTED_LAYER_STRETCH: &str = "UNSUPPORTED_LAYER_STRETCH";
    /// `ct != 0`, downgraded to a warning (see rule 14).
    pub const UNSUPPORTED_LAYER_COLLAPSE_TRANSFORM: &str = "UNSUPPORTED_LAYER_COLLAPSE_TRANSFORM";
    /// `bm != 0`.
    pub const UNSUPPORTED_BLEND_MODE: &str = "UNSUPPORTED_BLEND_MODE";
    /// Animated or nonzero static transform skew, or an unrecognised
    /// scalar format for it.
    pub const UNSUPPORTED_SKEW: &str = "UNSUPPORTED_SKEW";
    /// Animated rectangle roundness.
    pub const UNSUPPORTED_RECT_ROUNDNESS_ANIMATED: &str = "UNSUPPORTED_RECT_ROUNDNESS_ANIMATED";
    /// Position/size keyframe counts or times mismatch on an animated
    /// rectangle or ellipse.
    pub const UNSUPPORTED_RECT_KEYFRAMES_MISMATCH: &str = "UNSUPPORTED_RECT_KEYFRAMES_MISMATCH";
    /// Unrecognised keyframe format on an animated rectangle or ellipse.
    pub const UNSUPPORTED_RECT_KEYFRAME_FORMAT: &str = "UNSUPPORTED_RECT_KEYFRAME_FORMAT";
    /// A `tm` (trim paths) item survived shape extraction.
    pub const UNSUPPORTED_TRIM_PATHS: &str = "UNSUPPORTED_TRIM_PATHS";
    /// A shape group's transform failed extraction: more than one `tr`
    /// item, nonzero/animated skew, or non-uniform scale.
    pub const UNSUPPORTED_GROUP_TRANSFORM_KEYFRAME_FORMAT: &str = "UNSUPPORTED_GROUP_TRANSFORM_KEYFRAME_FORMAT";
    /// Two keyframes of an `AnimPath` disagree on vertex count or closed
    /// flag.
    pub const PATH_TOPOLOGY_MISMATCH: &str = "PATH_TOPOLOGY_MISMATCH";
    /// A keyframe array contained no decodable values.
    pub const PATH_KEYFRAMES_MISSING: &str = "PATH_KEYFRAMES_MISSING";
    /// No `mediaInput` layer found (feature optional; only emitted if
    /// other mediaInput rules are in play).
    pub const MEDIA_INPUT_MISSING: &str = "MEDIA_INPUT_MISSING";
    /// `mediaInput` exists but is not a shape layer.
    pub const MEDIA_INPUT_NOT_SHAPE: &str = "MEDIA_INPUT_NOT_SHAPE";
    /// `mediaInput` is not in the same composition as the binding layer.
    pub const MEDIA_INPUT_NOT_IN_SAME_COMP: &str = "MEDIA_INPUT_NOT_IN_SAME_COMP";
    /// `mediaInput` contains no path-producing shape.
    pub const MEDIA_INPUT_NO_PATH: &str = "MEDIA_INPUT_NO_PATH";
    /// `mediaInput` contains more than one path-producing shape.
    pub const MEDIA_INPUT_MULTIPLE_PATHS: &str = "MEDIA_INPUT_MULTIPLE_PATHS";
    /// `mediaInput` contains a forbidden modifier item.
    pub const MEDIA_INPUT_FORBIDDEN_MODIFIER: &str = "MEDIA_INPUT_FORBIDDEN_MODIFIER";
    /// Mask path flattening/triangulation failed.
    pub const MASK_PATH_BUILD_FAILED: &str = "MASK_PATH_BUILD_FAILED";
    /// Matte-source path flattening/triangulation failed.
    pub const MATTE_PATH_BUILD_FAILED: &str = "MATTE_PATH_BUILD_FAILED";
    /// A layer's parent chain references a nonexistent layer.
    pub const PARENT_NOT_FOUND: &str = "PARENT_NOT_FOUND";
    /// A layer's parent chain cycles back on itself.
    pub const PARENT_CYCLE: &str = "PARENT_CYCLE";
    /// A precomp recursion revisits a composition already on the stack.
    pub const PRECOMP_CYCLE: &str = "PRECOMP_CYCLE";
    /// A precomp layer's `refId` does not resolve to a known composition.
    pub const PRECOMP_ASSET_NOT_FOUND: &str = "PRECOMP_ASSET_NOT_FOUND";
    /// A matte consumer's paired source layer could not be found at
    /// render time.
    pub const MATTE_SOURCE_NOT_FOUND: &str = "MATTE_SOURCE_NOT_FOUND";
}
