//! Scene descriptor model (component B): the canvas, media blocks and
//! bindings that sit above the individual Lottie animations.

use serde::Deserialize;

/// The scene descriptor root (`scene.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    /// Schema version string, checked against a configured supported set.
    #[serde(rename = "schemaVersion")]
    pub schema_version: String,
    /// Canvas geometry and timing.
    pub canvas: Canvas,
    /// Media blocks, in z-order.
    #[serde(rename = "mediaBlocks", default)]
    pub media_blocks: Vec<MediaBlock>,
}

/// Canvas geometry and timing shared by every media block.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Canvas {
    /// Canvas width, in pixels.
    pub w: f64,
    /// Canvas height, in pixels.
    pub h: f64,
    /// Canvas frame rate.
    pub fps: f64,
    /// Total duration, in frames.
    #[serde(rename = "durationFrames")]
    pub duration_frames: f64,
}

/// A rectangle in canvas space.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: f64,
    /// Y coordinate of the top-left corner.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// True iff every component is finite and `w`, `h` are strictly
    /// positive.
    pub fn is_finite_and_positive(&self) -> bool {
        [self.x, self.y, self.w, self.h].iter().all(|v| v.is_finite()) && self.w > 0.0 && self.h > 0.0
    }

    /// True iff this rect lies entirely within `[0, canvas_w] x [0,
    /// canvas_h]`.
    pub fn within(&self, canvas_w: f64, canvas_h: f64) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.x + self.w <= canvas_w && self.y + self.h <= canvas_h
    }
}

/// How a media block's content is clipped to its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerClip {
    /// No clipping.
    None,
    /// Clipped to the block's slot rectangle.
    SlotRect,
}

/// One placed animation slot within the scene.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaBlock {
    /// Unique id within the scene.
    #[serde(rename = "blockId")]
    pub block_id: String,
    /// Stacking order.
    #[serde(rename = "zIndex")]
    pub z_index: i64,
    /// Placement rectangle in canvas space.
    pub rect: Rect,
    /// Clip mode.
    #[serde(rename = "containerClip")]
    pub container_clip: ContainerClip,
    /// Optional active window within the canvas timeline.
    #[serde(default)]
    pub timing: Option<BlockTiming>,
    /// User-media injection slot.
    pub input: MediaInput,
    /// Selectable animation variants.
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Optional named layer visibility toggles.
    #[serde(rename = "layerToggles", default)]
    pub layer_toggles: Vec<LayerToggle>,
}

/// A block's active window within the canvas timeline.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BlockTiming {
    /// Inclusive start frame.
    #[serde(rename = "startFrame")]
    pub start_frame: f64,
    /// Exclusive end frame.
    #[serde(rename = "endFrame")]
    pub end_frame: f64,
}

/// The user-replaceable media slot of a block.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaInput {
    /// Clip rectangle for the injected media, in canvas space.
    pub rect: Rect,
    /// The Lottie layer name the media binds to.
    #[serde(rename = "bindingKey")]
    pub binding_key: String,
    /// Accepted media kinds for this slot.
    #[serde(rename = "allowedMedia", default)]
    pub allowed_media: Vec<String>,
    /// Optional reference into an externally supplied mask catalog.
    #[serde(rename = "maskRef", default)]
    pub mask_ref: Option<String>,
}

/// One selectable animation variant of a media block.
#[derive(Debug, Clone, Deserialize)]
pub struct Variant {
    /// Variant id, unique within the block.
    #[serde(rename = "variantId")]
    pub variant_id: String,
    /// The Lottie animation this variant renders.
    #[serde(rename = "animRef")]
    pub anim_ref: String,
    /// Override for the variant's default playback duration.
    #[serde(rename = "defaultDurationFrames", default)]
    pub default_duration_frames: Option<f64>,
    /// Optional loop window, in frames.
    #[serde(rename = "loopRange", default)]
    pub loop_range: Option<LoopRange>,
}

/// A half-open loop window, in frames.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LoopRange {
    /// Inclusive start frame.
    pub start: f64,
    /// Exclusive end frame.
    pub end: f64,
}

/// A named layer-visibility toggle exposed to the host application.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerToggle {
    /// Toggle id, unique within the block.
    pub id: String,
    /// Human-readable title.
    pub title: String,
}

/// Capability injected by the caller to check `maskRef` values against an
/// externally maintained catalog (§4.F, §9 "dynamic dispatch").
pub trait MaskCatalog {
    /// True if `mask_ref` is a known entry.
    fn contains(&self, mask_ref: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_minimal_scene() {
        let json = r#"{
            "schemaVersion": "0.1",
            "canvas": {"w": 1080, "h": 1920, "fps": 30, "durationFrames": 300},
            "mediaBlocks": [{
                "blockId": "b1",
                "zIndex": 0,
                "rect": {"x": 0, "y": 0, "w": 1080, "h": 1920},
                "containerClip": "slotRect",
                "input": {
                    "rect": {"x": 0, "y": 0, "w": 1080, "h": 1920},
                    "bindingKey": "media",
                    "allowedMedia": ["image"]
                },
                "variants": [{"variantId": "v1", "animRef": "anim-1.json"}]
            }]
        }"#;
        let scene: Scene = serde_json::from_str(json).unwrap();
        assert_eq!(scene.media_blocks.len(), 1);
        assert_eq!(scene.media_blocks[0].variants[0].anim_ref, "anim-1.json");
    }

    #[test]
    fn rect_rejects_nonpositive_dims() {
        let rect = Rect { x: 0.0, y: 0.0, w: 0.0, h: 10.0 };
        assert!(!rect.is_finite_and_positive());
    }

    #[test]
    fn rect_within_canvas() {
        let inside = Rect { x: 0.0, y: 0.0, w: 1080.0, h: 1920.0 };
        assert!(inside.within(1080.0, 1920.0));
        let outside = Rect { x: 0.0, y: 0.0, w: 2000.0, h: 1920.0 };
        assert!(!outside.within(1080.0, 1920.0));
    }
}
