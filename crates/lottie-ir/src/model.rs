//! Lottie JSON data model.
//!
//! These types map directly onto the Lottie/Bodymovin JSON subset this
//! compiler accepts. They are deserialized from JSON and then lowered into
//! the normalised IR by [`crate::compile`]; nothing here performs subset
//! enforcement — that is [`crate::validate::anim`]'s job.

use serde::Deserialize;

/// Root Lottie animation document.
#[derive(Debug, Clone, Deserialize)]
pub struct LottieModel {
    /// Animation name.
    #[serde(rename = "nm", default)]
    pub name: String,
    /// Frames per second.
    #[serde(rename = "fr")]
    pub frame_rate: f64,
    /// In point (first visible frame).
    #[serde(rename = "ip")]
    pub in_point: f64,
    /// Out point (one past the last visible frame).
    #[serde(rename = "op")]
    pub out_point: f64,
    /// Composition width.
    #[serde(rename = "w")]
    pub width: f64,
    /// Composition height.
    #[serde(rename = "h")]
    pub height: f64,
    /// Root layer list.
    #[serde(default)]
    pub layers: Vec<LayerModel>,
    /// Precomp and image assets.
    #[serde(default)]
    pub assets: Vec<AssetModel>,
}

/// One layer entry, from either the root layer list or a precomp asset.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerModel {
    /// Layer name. Used to locate the binding layer and `mediaInput`.
    #[serde(rename = "nm", default)]
    pub name: String,
    /// Layer type: 0 precomp, 2 image, 3 null, 4 shape. Anything else is
    /// rejected by the anim validator.
    #[serde(rename = "ty")]
    pub layer_type: i64,
    /// Explicit layer index (`ind`). Falls back to the layer's position in
    /// its list when absent.
    #[serde(rename = "ind", default)]
    pub index: Option<i64>,
    /// Parent layer id, if this layer is nested under another via the
    /// transform chain.
    #[serde(rename = "parent", default)]
    pub parent: Option<i64>,
    /// In point, in frames.
    #[serde(rename = "ip")]
    pub in_point: f64,
    /// Out point, in frames.
    #[serde(rename = "op")]
    pub out_point: f64,
    /// Start time offset used when recursing into a precomp.
    #[serde(rename = "st", default)]
    pub start_time: f64,
    /// Transform track.
    #[serde(rename = "ks", default)]
    pub transform: Option<TransformModel>,
    /// Auto-orient flag; any value other than 0 is rejected.
    #[serde(rename = "ao", default)]
    pub auto_orient: i64,
    /// Blend mode; any value other than 0 is rejected.
    #[serde(rename = "bm", default)]
    pub blend_mode: i64,
    /// 3D layer flag; any value other than 0 is rejected.
    #[serde(rename = "ddd", default)]
    pub is_3d: i64,
    /// Stretch factor; any value other than 1 is rejected. Lottie defaults
    /// this to 1 when absent.
    #[serde(rename = "sr", default = "default_stretch")]
    pub stretch: f64,
    /// Collapse-transform flag; any value other than 0 is rejected.
    #[serde(rename = "ct", default)]
    pub collapse_transform: i64,
    /// Hidden flag.
    #[serde(rename = "hd", default)]
    pub hidden: bool,
    /// Shape items, for shape layers.
    #[serde(rename = "shapes", default)]
    pub shapes: Vec<ShapeModel>,
    /// Asset reference id, for image and precomp layers.
    #[serde(rename = "refId", default)]
    pub ref_id: Option<String>,
    /// Layer masks.
    #[serde(rename = "masksProperties", default)]
    pub masks: Vec<MaskModel>,
    /// Track matte type: 1 alpha, 2 alpha-inverted, 3 luma, 4 luma-inverted.
    #[serde(rename = "tt", default)]
    pub track_matte_type: Option<i64>,
    /// Explicit matte source reference, by layer id.
    #[serde(rename = "tp", default)]
    pub track_matte_target: Option<i64>,
    /// Legacy adjacency matte marker: this layer is a matte source for the
    /// layer immediately following it.
    #[serde(rename = "td", default)]
    pub track_matte_source: Option<i64>,
}

fn default_stretch() -> f64 {
    1.0
}

impl LayerModel {
    /// The layer's id: its explicit `ind`, or its position in the list it
    /// was decoded from.
    pub fn id_or_index(&self, position: usize) -> i64 {
        self.index.unwrap_or(position as i64)
    }
}

/// A layer's transform track (`ks`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransformModel {
    /// Anchor point.
    #[serde(rename = "a", default)]
    pub anchor: Option<LottieValue>,
    /// Position.
    #[serde(rename = "p", default)]
    pub position: Option<LottieValue>,
    /// Scale, percent (100 = 1.0).
    #[serde(rename = "s", default)]
    pub scale: Option<LottieValue>,
    /// Rotation, degrees.
    #[serde(rename = "r", default)]
    pub rotation: Option<LottieValue>,
    /// Opacity, 0..100.
    #[serde(rename = "o", default)]
    pub opacity: Option<LottieValue>,
    /// Skew amount. Any nonzero or animated value is unsupported.
    #[serde(rename = "sk", default)]
    pub skew: Option<LottieValue>,
    /// Skew axis. Only meaningful alongside a nonzero skew.
    #[serde(rename = "sa", default)]
    pub skew_axis: Option<LottieValue>,
}

/// A Lottie animatable value wrapper: `{ "a": 0|1, "k": <data> }`. The `a`
/// flag is advisory; whether a value is actually animated is determined by
/// the shape of `k` (a keyframe array vs. a bare value).
#[derive(Debug, Clone, Deserialize)]
pub struct LottieValue {
    /// Animated flag as written in the JSON; not trusted on its own.
    #[serde(rename = "a", default)]
    pub animated_flag: i64,
    /// The value payload.
    #[serde(rename = "k")]
    pub k: LottieValueData,
}

/// The `k` payload of a [`LottieValue`], decoded by trying each shape in
/// order. Unrecognised shapes fall through to `Unknown` rather than failing
/// decode, but callers that need a concrete scalar/vector/path must reject
/// `Unknown` explicitly — decoding tolerates it, the compiler does not.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LottieValueData {
    /// A single scalar, e.g. `"k": 100`.
    Number(f64),
    /// A fixed-size vector, e.g. `"k": [100, 100, 0]`.
    NumberArray(Vec<f64>),
    /// A keyframe track, e.g. `"k": [{"t":0, "s":[0]}, ...]`.
    Keyframes(Vec<KeyframeModel>),
    /// Static path data, e.g. a shape's `"ks"` on a non-animated `sh`.
    Path(PathDataModel),
    /// Any other JSON shape this decoder does not interpret.
    Unknown(serde_json::Value),
}

/// One entry of a keyframe track.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyframeModel {
    /// Time, in frames.
    #[serde(rename = "t")]
    pub time: f64,
    /// Start value of this keyframe's span. Lottie always populates this
    /// ("startValue" in the specification); its absence is a decode error
    /// except on a track's trailing keyframe.
    #[serde(rename = "s", default)]
    pub start: Option<KeyframeValueModel>,
    /// End value, present on all but the trailing keyframe in some
    /// exporters; when absent, samplers hold `start`.
    #[serde(rename = "e", default)]
    pub end: Option<KeyframeValueModel>,
    /// Incoming bezier-easing handle.
    #[serde(rename = "i", default)]
    pub in_tangent: Option<TangentModel>,
    /// Outgoing bezier-easing handle.
    #[serde(rename = "o", default)]
    pub out_tangent: Option<TangentModel>,
    /// Hold-keyframe flag: the value is held constant until the next
    /// keyframe's time, then steps.
    #[serde(rename = "h", default)]
    pub hold: Option<i64>,
}

/// A keyframe's start/end value. Unlike [`LottieValueData`] this has no
/// `Unknown` fallback: any other shape is a decode error, per the
/// decoding contract that a keyframe's value must be either numeric or
/// path data.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KeyframeValueModel {
    /// A numeric vector keyframe value.
    Numbers(Vec<f64>),
    /// A path-data keyframe value, wrapped in Lottie's one-element array.
    Path(Vec<PathDataModel>),
}

/// Raw bezier path data: vertices plus relative in/out tangent handles.
#[derive(Debug, Clone, Deserialize)]
pub struct PathDataModel {
    /// Incoming tangent handles, one `[x, y]` pair per vertex.
    #[serde(default)]
    pub i: Vec<Vec<f64>>,
    /// Outgoing tangent handles, one `[x, y]` pair per vertex.
    #[serde(default)]
    pub o: Vec<Vec<f64>>,
    /// Vertices, one `[x, y]` pair each.
    #[serde(default)]
    pub v: Vec<Vec<f64>>,
    /// Whether the path is closed.
    #[serde(default)]
    pub c: bool,
}

/// A bezier-easing tangent handle, which Lottie allows as either a scalar
/// or a single-element array in either axis.
#[derive(Debug, Clone, Deserialize)]
pub struct TangentModel {
    /// X component(s).
    pub x: TangentValue,
    /// Y component(s).
    pub y: TangentValue,
}

/// One axis of a [`TangentModel`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TangentValue {
    /// A bare scalar.
    Single(f64),
    /// A single-element (or multi-element, for multi-dimensional tracks)
    /// array; only the first component is used.
    Array(Vec<f64>),
}

impl TangentValue {
    /// The first (and, for the tracks this compiler supports, only
    /// meaningful) component.
    pub fn first(&self) -> f64 {
        match self {
            TangentValue::Single(v) => *v,
            TangentValue::Array(arr) => arr.first().copied().unwrap_or(0.0),
        }
    }
}

/// One shape-tree item. A single flattened struct covers every shape type
/// this compiler understands (`gr`, `sh`, `fl`, `st`, `tr`, `rc`, `el`,
/// `sr`); fields are reused across types the same way Lottie itself reuses
/// JSON keys (e.g. `s` is size on `rc`/`el`/`sr` and scale on `tr`).
#[derive(Debug, Clone, Deserialize)]
pub struct ShapeModel {
    /// Shape type discriminator.
    #[serde(rename = "ty")]
    pub shape_type: String,
    /// Shape name.
    #[serde(rename = "nm", default)]
    pub name: String,
    /// Hidden flag.
    #[serde(rename = "hd", default)]
    pub hidden: bool,
    /// Child items, for `gr` groups.
    #[serde(rename = "it", default)]
    pub items: Vec<ShapeModel>,
    /// Path data, for `sh`.
    #[serde(rename = "ks", default)]
    pub path: Option<LottieValue>,
    /// Position: `rc`/`el`/`sr` center, or `tr` position.
    #[serde(rename = "p", default)]
    pub position: Option<LottieValue>,
    /// Anchor point, for `tr`.
    #[serde(rename = "a", default)]
    pub anchor: Option<LottieValue>,
    /// Size: `rc`/`el`/`sr` dimensions, or `tr` scale (percent).
    #[serde(rename = "s", default)]
    pub size: Option<LottieValue>,
    /// Roundness (`rc`) or rotation in degrees (`tr`, `sr`).
    #[serde(rename = "r", default)]
    pub rotation_or_roundness: Option<LottieValue>,
    /// Fill/stroke color, RGBA 0..1.
    #[serde(rename = "c", default)]
    pub color: Option<LottieValue>,
    /// Fill/stroke/`tr` opacity, 0..100.
    #[serde(rename = "o", default)]
    pub opacity: Option<LottieValue>,
    /// Stroke width.
    #[serde(rename = "w", default)]
    pub stroke_width: Option<LottieValue>,
    /// Stroke line cap: 1 butt, 2 round, 3 square.
    #[serde(rename = "lc", default)]
    pub line_cap: Option<i64>,
    /// Stroke line join: 1 miter, 2 round, 3 bevel.
    #[serde(rename = "lj", default)]
    pub line_join: Option<i64>,
    /// Stroke miter limit.
    #[serde(rename = "ml", default)]
    pub miter_limit: Option<f64>,
    /// Polystar point count.
    #[serde(rename = "pt", default)]
    pub points: Option<LottieValue>,
    /// Polystar outer radius.
    #[serde(rename = "or", default)]
    pub outer_radius: Option<LottieValue>,
    /// Polystar inner radius (star only).
    #[serde(rename = "ir", default)]
    pub inner_radius: Option<LottieValue>,
    /// Polystar outer roundness. Always rejected when nonzero/animated.
    #[serde(rename = "os", default)]
    pub outer_roundness: Option<LottieValue>,
    /// Polystar inner roundness. Always rejected when nonzero/animated.
    #[serde(rename = "is", default)]
    pub inner_roundness: Option<LottieValue>,
    /// Polystar kind: 1 star, 2 polygon.
    #[serde(rename = "sy", default)]
    pub star_type: Option<i64>,
    /// Direction (shape items) or dash array (`st`); the two uses share
    /// the `d` key in Lottie, disambiguated by `shape_type` at extraction
    /// time.
    #[serde(rename = "d", default)]
    pub direction_or_dash: Option<serde_json::Value>,
    /// Skew, for `tr`. Always rejected when nonzero/animated.
    #[serde(rename = "sk", default)]
    pub skew: Option<LottieValue>,
    /// Skew axis, for `tr`.
    #[serde(rename = "sa", default)]
    pub skew_axis: Option<LottieValue>,
}

/// A precomp or image asset.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetModel {
    /// Asset id, referenced by layers' `refId`.
    pub id: String,
    /// Nested layers, for precomp assets.
    #[serde(default)]
    pub layers: Vec<LayerModel>,
    /// Width, for image or precomp assets.
    #[serde(rename = "w", default)]
    pub width: Option<f64>,
    /// Height, for image or precomp assets.
    #[serde(rename = "h", default)]
    pub height: Option<f64>,
    /// Image directory, relative to the package root.
    #[serde(rename = "u", default)]
    pub path: Option<String>,
    /// Image filename.
    #[serde(rename = "p", default)]
    pub filename: Option<String>,
}

impl AssetModel {
    /// An asset is an image asset iff it carries no nested layers and has
    /// a filename.
    pub fn is_image(&self) -> bool {
        self.layers.is_empty() && self.filename.is_some()
    }

    /// An asset is a precomp iff it carries nested layers.
    pub fn is_precomp(&self) -> bool {
        !self.layers.is_empty()
    }

    /// The asset's relative path on disk, joining `u` and `p` the way
    /// Lottie exporters do.
    pub fn relative_path(&self) -> Option<String> {
        let filename = self.filename.as_ref()?;
        match &self.path {
            Some(dir) if !dir.is_empty() => Some(format!("{dir}{filename}")),
            _ => Some(filename.clone()),
        }
    }
}

/// Mask entry on a layer (`masksProperties`).
#[derive(Debug, Clone, Deserialize)]
pub struct MaskModel {
    /// Mask mode: `"a"` add, `"s"` subtract, `"i"` intersect, or any other
    /// (legacy `l`/`d`/`f`) string, rejected by the validator.
    #[serde(rename = "mode")]
    pub mode: String,
    /// Mask path.
    #[serde(rename = "pt")]
    pub path: LottieValue,
    /// Mask opacity, 0..100.
    #[serde(rename = "o")]
    pub opacity: LottieValue,
    /// Inverted flag.
    #[serde(rename = "inv", default)]
    pub inverted: bool,
    /// Mask expansion; must be absent or static zero.
    #[serde(rename = "x", default)]
    pub expansion: Option<LottieValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_minimal_root() {
        let json = r#"{"nm":"Test","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[]}"#;
        let model: LottieModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.name, "Test");
        assert_eq!(model.frame_rate, 30.0);
        assert!(model.layers.is_empty());
    }

    #[test]
    fn decodes_scalar_or_array_value() {
        let scalar: LottieValue = serde_json::from_str(r#"{"a":0,"k":100}"#).unwrap();
        assert!(matches!(scalar.k, LottieValueData::Number(n) if n == 100.0));

        let array: LottieValue = serde_json::from_str(r#"{"a":0,"k":[100,100]}"#).unwrap();
        assert!(matches!(array.k, LottieValueData::NumberArray(ref v) if v.len() == 2));
    }

    #[test]
    fn decodes_keyframed_value() {
        let json = r#"{"a":1,"k":[{"t":0,"s":[0]},{"t":10,"s":[100]}]}"#;
        let value: LottieValue = serde_json::from_str(json).unwrap();
        assert!(matches!(value.k, LottieValueData::Keyframes(ref kfs) if kfs.len() == 2));
    }

    #[test]
    fn decodes_path_data() {
        let json = r#"{"a":0,"k":{"i":[[0,0]],"o":[[0,0]],"v":[[0,0]],"c":true}}"#;
        let value: LottieValue = serde_json::from_str(json).unwrap();
        match value.k {
            LottieValueData::Path(p) => {
                assert_eq!(p.v.len(), 1);
                assert!(p.c);
            }
            other => panic!("expected path data, got {other:?}"),
        }
    }

    #[test]
    fn keyframe_value_rejects_unknown_shape() {
        let json = r#"{"t":0,"s":{"nope":true}}"#;
        let result: Result<KeyframeModel, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn layer_id_falls_back_to_position() {
        let json = r#"{"ty":4,"ip":0,"op":60}"#;
        let layer: LayerModel = serde_json::from_str(json).unwrap();
        assert_eq!(layer.id_or_index(3), 3);
    }

    #[test]
    fn asset_relative_path_joins_dir_and_filename() {
        let asset = AssetModel {
            id: "image_0".into(),
            layers: vec![],
            width: Some(10.0),
            height: Some(10.0),
            path: Some("images/".into()),
            filename: Some("img_1.png".into()),
        };
        assert_eq!(asset.relative_path().as_deref(), Some("images/img_1.png"));
        assert!(asset.is_image());
        assert!(!asset.is_precomp());
    }
}
