//! The compiled intermediate representation (component H's output):
//! [`AnimIR`] and its supporting types.
//!
//! `AnimIR` is otherwise-immutable once [`crate::compile::compile_animation`]
//! returns; the two caches it carries (`last_render_issues`,
//! `comp_contains_binding_cache`) are the one piece of interior mutability
//! this crate allows, kept deliberately separate from the structural fields
//! rather than threaded through every render call.

use crate::layers::Composition;
use lottie_path::PathID;
use std::cell::RefCell;
use std::collections::HashMap;

/// Animation-level metadata carried alongside the compiled scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Meta {
    /// The animation's identifying ref (its file name within the package).
    pub anim_ref: String,
    /// Composition size, in pixels.
    pub size: lottie_geom::SizeD,
    /// Frame rate.
    pub fps: f64,
    /// First visible frame of the root composition.
    pub in_point: f64,
    /// One past the last visible frame of the root composition.
    pub out_point: f64,
}

/// Identifies the layer a user asset binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingInfo {
    /// The binding layer's id.
    pub layer_id: i64,
    /// The composition the binding layer lives in.
    pub composition_id: String,
    /// The namespaced asset id ([`namespaced_asset_id`]) the binding layer's
    /// placeholder `refId` was rewritten to.
    pub asset_id: String,
}

/// A non-binding image asset indexed by its namespaced id.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAssetInfo {
    /// Path to the asset file, relative to the package root.
    pub relative_path: String,
    /// Declared size, in pixels, if the Lottie asset entry carried one.
    pub size: Option<lottie_geom::SizeD>,
}

/// The rebuilt, namespaced asset table for one compiled animation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetIndexIR {
    /// Namespaced image asset id to its resolved info.
    pub images: HashMap<String, ImageAssetInfo>,
}

/// Builds the namespaced id a Lottie asset is indexed under once compiled
/// into a scene that may host many animations: `"<anim_ref>|<asset_id>"`.
/// This is the law that keeps asset ids unique across every animation
/// compiled into one scene.
pub fn namespaced_asset_id(anim_ref: &str, lottie_asset_id: &str) -> String {
    format!("{anim_ref}|{lottie_asset_id}")
}

/// The clip-path geometry resolved from a block's `mediaInput`
/// configuration, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct InputGeometryInfo {
    /// The layer id the clip path was extracted from.
    pub layer_id: i64,
    /// The composition the mediaInput layer lives in.
    pub composition_id: String,
    /// The registered, triangulated clip path.
    pub clip_path_id: PathID,
}

/// The full compiled form of one Lottie animation: metadata, every
/// composition reachable from the root, the binding and mediaInput
/// resolutions, and the namespaced asset table.
#[derive(Debug)]
pub struct AnimIR {
    /// Animation-level metadata.
    pub meta: Meta,
    /// The top-level composition (`Composition::ROOT_ID`).
    pub root: Composition,
    /// Every precomp composition reachable from the root, by its Lottie
    /// asset id (not namespaced — composition ids are scoped to this
    /// `AnimIR` and never compared across animations).
    pub precomps: HashMap<String, Composition>,
    /// The resolved binding layer.
    pub binding: BindingInfo,
    /// The resolved mediaInput clip geometry, if the block configured one.
    pub input_geometry: Option<InputGeometryInfo>,
    /// Namespaced asset table.
    pub assets: AssetIndexIR,
    last_render_issues: RefCell<Vec<crate::error::RenderIssue>>,
    comp_contains_binding_cache: RefCell<HashMap<String, bool>>,
}

impl AnimIR {
    /// Constructs a fresh `AnimIR`; the render caches start empty.
    pub fn new(
        meta: Meta,
        root: Composition,
        precomps: HashMap<String, Composition>,
        binding: BindingInfo,
        input_geometry: Option<InputGeometryInfo>,
        assets: AssetIndexIR,
    ) -> Self {
        AnimIR {
            meta,
            root,
            precomps,
            binding,
            input_geometry,
            assets,
            last_render_issues: RefCell::new(Vec::new()),
            comp_contains_binding_cache: RefCell::new(HashMap::new()),
        }
    }

    /// Looks up a composition by id: the root, or a precomp by its Lottie
    /// asset id.
    pub fn composition(&self, id: &str) -> Option<&Composition> {
        if id == Composition::ROOT_ID { Some(&self.root) } else { self.precomps.get(id) }
    }

    /// Replaces the render-issue log recorded by the most recent render
    /// call.
    pub fn set_last_render_issues(&self, issues: Vec<crate::error::RenderIssue>) {
        *self.last_render_issues.borrow_mut() = issues;
    }

    /// The render issues recorded by the most recent render call.
    pub fn last_render_issues(&self) -> Vec<crate::error::RenderIssue> {
        self.last_render_issues.borrow().clone()
    }

    /// Memoised lookup used by edit-mode rendering: does composition `id`
    /// contain (directly or via nested precomp) the binding layer?
    pub fn comp_contains_binding(&self, id: &str) -> bool {
        if let Some(cached) = self.comp_contains_binding_cache.borrow().get(id) {
            return *cached;
        }
        let result = self.comp_contains_binding_uncached(id, &mut Vec::new());
        self.comp_contains_binding_cache.borrow_mut().insert(id.to_string(), result);
        result
    }

    fn comp_contains_binding_uncached(&self, id: &str, visiting: &mut Vec<String>) -> bool {
        if visiting.iter().any(|v| v == id) {
            return false;
        }
        visiting.push(id.to_string());
        let result = if id == self.binding.composition_id {
            true
        } else {
            match self.composition(id) {
                Some(comp) => comp.layers.iter().any(|l| match &l.content {
                    crate::layers::LayerContent::Precomp(ref_id) => self.comp_contains_binding_uncached(ref_id, visiting),
                    _ => false,
                }),
                None => false,
            }
        };
        visiting.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaced_ids_differ_across_anims() {
        assert_ne!(namespaced_asset_id("a.json", "image_0"), namespaced_asset_id("b.json", "image_0"));
    }

    #[test]
    fn comp_contains_binding_is_memoised_and_correct() {
        let meta = Meta { anim_ref: "a.json".into(), size: lottie_geom::SizeD { w: 10.0, h: 10.0 }, fps: 30.0, in_point: 0.0, out_point: 60.0 };
        let root = Composition { id: Composition::ROOT_ID.into(), size: meta.size, layers: vec![] };
        let binding = BindingInfo { layer_id: 0, composition_id: Composition::ROOT_ID.into(), asset_id: "a.json|image_0".into() };
        let ir = AnimIR::new(meta, root, HashMap::new(), binding, None, AssetIndexIR::default());
        assert!(ir.comp_contains_binding(Composition::ROOT_ID));
        assert!(!ir.comp_contains_binding("nonexistent"));
        assert!(ir.comp_contains_binding(Composition::ROOT_ID));
    }
}
