//! Compiled layer, layer-content and composition types.
//!
//! Construction (mapping [`crate::model::LayerModel`] to a [`Layer`],
//! matte pairing, shape extraction) lives in [`crate::compile`], which
//! needs the full layer list and the shared path registry; this module
//! only defines the resulting shapes.

use crate::mask::{Mask, MatteInfo};
use crate::shapes::ShapeGroup;
use crate::transform::TransformTrack;
use lottie_geom::SizeD;

/// The four layer kinds this compiler accepts. Anything else in a
/// Lottie's `ty` field is rejected by the anim validator and, defensively,
/// by the IR compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerType {
    /// Nested composition (`ty == 0`).
    Precomp,
    /// Image (`ty == 2`).
    Image,
    /// Invisible parenting layer (`ty == 3`).
    Null,
    /// Shape layer, potentially a matte source (`ty == 4`).
    ShapeMatte,
}

impl LayerType {
    /// Parses a Lottie `ty` value, returning `None` outside `{0,2,3,4}`.
    pub fn from_code(ty: i64) -> Option<LayerType> {
        match ty {
            0 => Some(LayerType::Precomp),
            2 => Some(LayerType::Image),
            3 => Some(LayerType::Null),
            4 => Some(LayerType::ShapeMatte),
            _ => None,
        }
    }
}

/// A layer's timing window, in frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTiming {
    /// Inclusive start frame of visibility.
    pub in_point: f64,
    /// Exclusive end frame of visibility.
    pub out_point: f64,
    /// Offset applied to the local frame when recursing into a precomp
    /// (Lottie `st`).
    pub start_time: f64,
}

impl LayerTiming {
    /// True iff `frame` lies in `[in_point, out_point)`.
    pub fn is_visible(&self, frame: f64) -> bool {
        frame >= self.in_point && frame < self.out_point
    }
}

/// What a layer draws, once content compilation has run.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerContent {
    /// Draws a namespaced image asset.
    Image(String),
    /// Recurses into a nested composition.
    Precomp(String),
    /// Draws a shape group (fill/stroke over an extracted path).
    Shapes(ShapeGroup),
    /// Draws nothing (null layers, or content that failed to compile
    /// after the validator should already have rejected its cause).
    None,
}

/// One compiled layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// The layer's id: explicit `ind`, or list position.
    pub id: i64,
    /// Layer name.
    pub name: String,
    /// Layer kind.
    pub layer_type: LayerType,
    /// Visibility window and precomp time offset.
    pub timing: LayerTiming,
    /// Parent layer id, if any.
    pub parent: Option<i64>,
    /// Local transform track.
    pub transform: TransformTrack,
    /// Masks, in their original (AE) order.
    pub masks: Vec<Mask>,
    /// Track-matte pairing, if this layer is a matte consumer.
    pub matte: Option<MatteInfo>,
    /// What this layer draws.
    pub content: LayerContent,
    /// True if this layer is the source of another layer's matte (`td ==
    /// 1`); such layers are never rendered directly.
    pub is_matte_source: bool,
    /// Lottie's `hd` flag.
    pub is_hidden: bool,
}

/// One composition: the root composition (`"__root__"`) or a precomp
/// asset, with its layers in render (JSON) order.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Composition id.
    pub id: String,
    /// Canvas size.
    pub size: SizeD,
    /// Layers in render order.
    pub layers: Vec<Layer>,
}

impl Composition {
    /// The conventional id of the top-level composition.
    pub const ROOT_ID: &'static str = "__root__";

    /// Looks up a layer by id within this composition.
    pub fn layer(&self, id: i64) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_type_rejects_unsupported_codes() {
        assert_eq!(LayerType::from_code(0), Some(LayerType::Precomp));
        assert_eq!(LayerType::from_code(1), None);
        assert_eq!(LayerType::from_code(5), None);
    }

    #[test]
    fn timing_visibility_is_half_open() {
        let timing = LayerTiming { in_point: 10.0, out_point: 50.0, start_time: 0.0 };
        assert!(!timing.is_visible(5.0));
        assert!(timing.is_visible(10.0));
        assert!(!timing.is_visible(50.0));
    }
}
