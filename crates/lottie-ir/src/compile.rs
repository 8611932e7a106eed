//! IR compilation (component H): lowers a validated [`LottieModel`] plus
//! its scene binding context into an [`AnimIR`].
//!
//! Compilation assumes the model has already passed
//! [`crate::validate::anim::validate_anim`] with no errors; failures
//! surfaced here are either binding-specific (no validator rule covers
//! "does a layer with this exact name exist", since the binding key comes
//! from the scene, not the animation) or defensive
//! (`CompileErrorKind::UnsupportedFeature`, reached only if the validator
//! has a bug).

use crate::error::{CompileError, CompileErrorKind, codes};
use crate::ir::{AnimIR, AssetIndexIR, BindingInfo, ImageAssetInfo, InputGeometryInfo, Meta, namespaced_asset_id};
use crate::layers::{Composition, Layer, LayerContent, LayerTiming, LayerType};
use crate::mask::{Mask, MatteInfo, MatteMode, decode_mask};
use crate::model::{AssetModel, LayerModel, LottieModel};
use crate::shapes::extract_shape_group;
use crate::transform::TransformTrack;
use lottie_geom::SizeD;
use lottie_path::{DEFAULT_FLATNESS, PathRegistry, PathResourceBuilder};
use std::collections::HashMap;

/// The scene-supplied context a single animation is compiled under.
pub struct CompileContext<'a> {
    /// The animation's file-name ref, used for diagnostics and asset
    /// namespacing.
    pub anim_ref: &'a str,
    /// The layer name the scene binds a user asset to.
    pub binding_key: &'a str,
    /// The layer name used as the clip-path source for the binding layer's
    /// media, if the block configures one.
    pub media_input_key: Option<&'a str>,
}

struct RawComposition<'a> {
    id: String,
    layers: &'a [LayerModel],
}

fn raw_compositions(model: &LottieModel) -> Vec<RawComposition<'_>> {
    let mut precomp_assets: Vec<&AssetModel> = model.assets.iter().filter(|a| a.is_precomp()).collect();
    precomp_assets.sort_by(|a, b| a.id.cmp(&b.id));
    let mut comps = vec![RawComposition { id: Composition::ROOT_ID.to_string(), layers: &model.layers }];
    comps.extend(precomp_assets.into_iter().map(|a| RawComposition { id: a.id.clone(), layers: &a.layers }));
    comps
}

/// Compiles one validated Lottie document into an [`AnimIR`], registering
/// every mask/shape/mediaInput path it bakes into `registry`.
pub fn compile_animation(model: &LottieModel, registry: &mut PathRegistry, ctx: &CompileContext) -> Result<AnimIR, CompileError> {
    tracing::debug!(anim_ref = ctx.anim_ref, binding_key = ctx.binding_key, "compiling animation");
    let meta = Meta {
        anim_ref: ctx.anim_ref.to_string(),
        size: SizeD { w: model.width, h: model.height },
        fps: model.frame_rate,
        in_point: model.in_point,
        out_point: model.out_point,
    };

    let raw_comps = raw_compositions(model);

    let (binding_comp_id, binding_layer) = find_named_layer(&raw_comps, ctx.binding_key)
        .ok_or_else(|| CompileError::new(ctx.anim_ref, CompileErrorKind::BindingLayerNotFound { binding_key: ctx.binding_key.to_string() }))?;
    if LayerType::from_code(binding_layer.layer_type) != Some(LayerType::Image) {
        return Err(CompileError::new(ctx.anim_ref, CompileErrorKind::BindingLayerNotImage { binding_key: ctx.binding_key.to_string() }));
    }
    let binding_asset_lottie_id = binding_layer
        .ref_id
        .clone()
        .ok_or_else(|| CompileError::new(ctx.anim_ref, CompileErrorKind::BindingLayerNoAsset { binding_key: ctx.binding_key.to_string() }))?;
    let binding_layer_id = binding_layer.id_or_index(0);
    let binding_asset_id = namespaced_asset_id(ctx.anim_ref, &binding_asset_lottie_id);

    let mut compiled: HashMap<String, Composition> = HashMap::new();
    for comp in &raw_comps {
        let size = composition_size(model, &comp.id);
        let compiled_comp = compile_composition(comp.id.clone(), comp.layers, size, registry, ctx)?;
        compiled.insert(comp.id.clone(), compiled_comp);
    }
    let root = compiled.remove(Composition::ROOT_ID).expect("root composition is always compiled");

    let assets = build_asset_index(model, &raw_comps, ctx.anim_ref);

    let input_geometry = match ctx.media_input_key.and_then(|key| find_named_layer(&raw_comps, key)) {
        Some((comp_id, layer)) => {
            if comp_id != binding_comp_id {
                return Err(CompileError::new(ctx.anim_ref, CompileErrorKind::MediaInputWrongComp));
            }
            compile_media_input(comp_id, layer, registry)
        }
        None => None,
    };

    tracing::debug!(anim_ref = ctx.anim_ref, composition_count = compiled.len() + 1, "compiled animation");
    Ok(AnimIR::new(
        meta,
        root,
        compiled,
        BindingInfo { layer_id: binding_layer_id, composition_id: binding_comp_id, asset_id: binding_asset_id },
        input_geometry,
        assets,
    ))
}

fn find_named_layer<'a>(comps: &'a [RawComposition<'a>], name: &str) -> Option<(String, &'a LayerModel)> {
    for comp in comps {
        for layer in comp.layers {
            if layer.name == name {
                return Some((comp.id.clone(), layer));
            }
        }
    }
    None
}

fn composition_size(model: &LottieModel, id: &str) -> SizeD {
    if id == Composition::ROOT_ID {
        return SizeD { w: model.width, h: model.height };
    }
    model
        .assets
        .iter()
        .find(|a| a.id == id)
        .and_then(|a| match (a.width, a.height) {
            (Some(w), Some(h)) => Some(SizeD { w, h }),
            _ => None,
        })
        .unwrap_or(SizeD { w: model.width, h: model.height })
}

fn build_asset_index(model: &LottieModel, comps: &[RawComposition], anim_ref: &str) -> AssetIndexIR {
    let mut images = HashMap::new();
    for comp in comps {
        for layer in comp.layers {
            if LayerType::from_code(layer.layer_type) != Some(LayerType::Image) {
                continue;
            }
            let Some(ref_id) = &layer.ref_id else { continue };
            let Some(asset) = model.assets.iter().find(|a| &a.id == ref_id) else { continue };
            let nid = namespaced_asset_id(anim_ref, ref_id);
            images.insert(
                nid,
                ImageAssetInfo {
                    relative_path: asset.relative_path().unwrap_or_default(),
                    size: match (asset.width, asset.height) {
                        (Some(w), Some(h)) => Some(SizeD { w, h }),
                        _ => None,
                    },
                },
            );
        }
    }
    AssetIndexIR { images }
}

fn compile_media_input(comp_id: String, layer: &LayerModel, registry: &mut PathRegistry) -> Option<InputGeometryInfo> {
    if LayerType::from_code(layer.layer_type) != Some(LayerType::ShapeMatte) {
        return None;
    }
    let group = extract_shape_group(&layer.shapes).ok()?;
    let anim_path = group.anim_path?;
    let resource = PathResourceBuilder::build_from_anim_path(&anim_path, DEFAULT_FLATNESS).ok()?;
    let clip_path_id = registry.register(resource);
    Some(InputGeometryInfo { layer_id: layer.id_or_index(0), composition_id: comp_id, clip_path_id })
}

fn compile_composition(id: String, layers: &[LayerModel], size: SizeD, registry: &mut PathRegistry, ctx: &CompileContext) -> Result<Composition, CompileError> {
    let matte_info = compute_matte_pairing(layers, ctx)?;

    let mut compiled_layers = Vec::with_capacity(layers.len());
    for (i, layer) in layers.iter().enumerate() {
        compiled_layers.push(compile_layer(layer, i, matte_info[i], registry, ctx)?);
    }
    Ok(Composition { id, size, layers: compiled_layers })
}

fn compute_matte_pairing(layers: &[LayerModel], ctx: &CompileContext) -> Result<Vec<Option<MatteInfo>>, CompileError> {
    let mut result = Vec::with_capacity(layers.len());
    for (i, layer) in layers.iter().enumerate() {
        let Some(tt) = layer.track_matte_type else {
            result.push(None);
            continue;
        };
        let mode = MatteMode::from_code(tt).ok_or_else(|| {
            CompileError::new(ctx.anim_ref, CompileErrorKind::UnsupportedFeature { code: codes::UNSUPPORTED_MATTE_TYPE, message: format!("unsupported track matte type {tt}"), path: format!("layers[{i}].tt") })
        })?;
        let source_layer_id = if let Some(target) = layer.track_matte_target {
            let source = layers.iter().enumerate().find(|(si, l)| *si < i && l.id_or_index(*si) == target).map(|(si, l)| l.id_or_index(si));
            source.ok_or_else(|| {
                CompileError::new(
                    ctx.anim_ref,
                    CompileErrorKind::UnsupportedFeature { code: codes::MATTE_TARGET_NOT_FOUND, message: format!("tp target {target} not found"), path: format!("layers[{i}].tp") },
                )
            })?
        } else if i == 0 {
            return Err(CompileError::new(
                ctx.anim_ref,
                CompileErrorKind::UnsupportedFeature { code: codes::UNSUPPORTED_MATTE_LAYER_ORDER, message: "matte consumer with no tp cannot be the first layer".into(), path: format!("layers[{i}]") },
            ));
        } else if layers[i - 1].track_matte_source == Some(1) {
            layers[i - 1].id_or_index(i - 1)
        } else {
            return Err(CompileError::new(
                ctx.anim_ref,
                CompileErrorKind::UnsupportedFeature { code: codes::UNSUPPORTED_MATTE_LAYER_MISSING, message: "no td=1 matte source immediately precedes this consumer".into(), path: format!("layers[{i}]") },
            ));
        };
        result.push(Some(MatteInfo { mode, source_layer_id }));
    }
    Ok(result)
}

fn compile_layer(layer: &LayerModel, index: usize, matte: Option<MatteInfo>, registry: &mut PathRegistry, ctx: &CompileContext) -> Result<Layer, CompileError> {
    let layer_type = LayerType::from_code(layer.layer_type).ok_or_else(|| {
        CompileError::new(ctx.anim_ref, CompileErrorKind::UnsupportedLayerType { ty: layer.layer_type, path: format!("layers[{index}]") })
    })?;

    let transform = TransformTrack::from_model(layer.transform.as_ref()).map_err(|e| {
        CompileError::new(ctx.anim_ref, CompileErrorKind::UnsupportedFeature { code: codes::UNSUPPORTED_SKEW, message: e.to_string(), path: format!("layers[{index}].ks") })
    })?;

    let mut masks = Vec::with_capacity(layer.masks.len());
    for (mi, mask_model) in layer.masks.iter().enumerate() {
        masks.push(compile_mask(mask_model, registry, ctx, index, mi)?);
    }

    let content = match layer_type {
        LayerType::Image => {
            let ref_id = layer.ref_id.clone().unwrap_or_default();
            LayerContent::Image(namespaced_asset_id(ctx.anim_ref, &ref_id))
        }
        LayerType::Precomp => LayerContent::Precomp(layer.ref_id.clone().unwrap_or_default()),
        LayerType::ShapeMatte => {
            let group = extract_shape_group(&layer.shapes).map_err(|e| {
                CompileError::new(ctx.anim_ref, CompileErrorKind::UnsupportedFeature { code: e.code, message: e.message.clone(), path: format!("layers[{index}].shapes") })
            })?;
            let mut group = group;
            if let Some(anim_path) = &group.anim_path {
                let resource = PathResourceBuilder::build_from_anim_path(anim_path, DEFAULT_FLATNESS).map_err(|e| {
                    CompileError::new(
                        ctx.anim_ref,
                        CompileErrorKind::UnsupportedFeature { code: codes::MATTE_PATH_BUILD_FAILED, message: e.to_string(), path: format!("layers[{index}].shapes") },
                    )
                })?;
                group.path_id = Some(registry.register(resource));
            }
            LayerContent::Shapes(group)
        }
        LayerType::Null => LayerContent::None,
    };

    Ok(Layer {
        id: layer.id_or_index(index),
        name: layer.name.clone(),
        layer_type,
        timing: LayerTiming { in_point: layer.in_point, out_point: layer.out_point, start_time: layer.start_time },
        parent: layer.parent,
        transform,
        masks,
        matte,
        content,
        is_matte_source: layer.track_matte_source == Some(1),
        is_hidden: layer.hidden,
    })
}

fn compile_mask(model: &crate::model::MaskModel, registry: &mut PathRegistry, ctx: &CompileContext, layer_index: usize, mask_index: usize) -> Result<Mask, CompileError> {
    let path_str = format!("layers[{layer_index}].masksProperties[{mask_index}]");
    let (mode, opacity, path) = decode_mask(model).map_err(|e| {
        CompileError::new(ctx.anim_ref, CompileErrorKind::UnsupportedFeature { code: codes::UNSUPPORTED_MASK_MODE, message: e.to_string(), path: path_str.clone() })
    })?;
    let mode = mode.ok_or_else(|| {
        CompileError::new(ctx.anim_ref, CompileErrorKind::UnsupportedFeature { code: codes::UNSUPPORTED_MASK_MODE, message: format!("unsupported mask mode '{}'", model.mode), path: path_str.clone() })
    })?;
    let resource = PathResourceBuilder::build_from_anim_path(&path, DEFAULT_FLATNESS).map_err(|e| {
        CompileError::new(ctx.anim_ref, CompileErrorKind::UnsupportedFeature { code: codes::MASK_PATH_BUILD_FAILED, message: e.to_string(), path: path_str })
    })?;
    let path_id = registry.register(resource);
    Ok(Mask { mode, inverted: model.inverted, opacity, path, path_id: Some(path_id) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>() -> CompileContext<'a> {
        CompileContext { anim_ref: "a.json", binding_key: "media", media_input_key: None }
    }

    fn model(json: &str) -> LottieModel {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn compiles_minimal_binding_layer() {
        let m = model(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"}
            ],"assets":[{"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"}]}"#,
        );
        let mut registry = PathRegistry::new();
        let ir = compile_animation(&m, &mut registry, &ctx()).unwrap();
        assert_eq!(ir.binding.asset_id, "a.json|image_0");
        assert_eq!(ir.root.layers.len(), 1);
    }

    #[test]
    fn missing_binding_layer_errors() {
        let m = model(r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":10,"h":10,"layers":[]}"#);
        let mut registry = PathRegistry::new();
        assert!(compile_animation(&m, &mut registry, &ctx()).is_err());
    }

    #[test]
    fn registers_shape_path_and_mask_path() {
        let m = model(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"},
                {"ty":4,"nm":"shape","ip":0,"op":60,"shapes":[
                    {"ty":"sh","ks":{"a":0,"k":{"i":[[0,0],[0,0],[0,0]],"o":[[0,0],[0,0],[0,0]],"v":[[0,0],[10,0],[5,10]],"c":true}}}
                ],"masksProperties":[
                    {"mode":"a","inv":false,"o":{"a":0,"k":100},"pt":{"a":0,"k":{"i":[[0,0],[0,0],[0,0]],"o":[[0,0],[0,0],[0,0]],"v":[[0,0],[10,0],[5,10]],"c":true}}}
                ]}
            ],"assets":[{"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"}]}"#,
        );
        let mut registry = PathRegistry::new();
        let ir = compile_animation(&m, &mut registry, &ctx()).unwrap();
        let shape_layer = &ir.root.layers[1];
        match &shape_layer.content {
            LayerContent::Shapes(group) => assert!(group.path_id.is_some()),
            other => panic!("expected shapes content, got {other:?}"),
        }
        assert!(shape_layer.masks[0].path_id.is_some());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn precomp_inherits_its_own_asset_size() {
        let m = model(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"},
                {"ty":0,"nm":"nested","ip":0,"op":60,"refId":"precomp_0"}
            ],"assets":[
                {"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"},
                {"id":"precomp_0","w":50,"h":50,"layers":[]}
            ]}"#,
        );
        let mut registry = PathRegistry::new();
        let ir = compile_animation(&m, &mut registry, &ctx()).unwrap();
        let nested = ir.precomps.get("precomp_0").unwrap();
        assert_eq!(nested.size, SizeD { w: 50.0, h: 50.0 });
    }

    #[test]
    fn media_input_in_a_different_composition_than_binding_is_an_error() {
        let m = model(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"},
                {"ty":0,"nm":"nested","ip":0,"op":60,"refId":"precomp_0"}
            ],"assets":[
                {"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"},
                {"id":"precomp_0","w":50,"h":50,"layers":[
                    {"ty":4,"nm":"clip","ip":0,"op":60,"shapes":[
                        {"ty":"sh","ks":{"a":0,"k":{"i":[[0,0],[0,0],[0,0]],"o":[[0,0],[0,0],[0,0]],"v":[[0,0],[10,0],[5,10]],"c":true}}}
                    ]}
                ]}
            ]}"#,
        );
        let mut registry = PathRegistry::new();
        let mut c = ctx();
        c.media_input_key = Some("clip");
        let err = compile_animation(&m, &mut registry, &c).unwrap_err();
        assert!(matches!(err.kind, CompileErrorKind::MediaInputWrongComp));
    }

    #[test]
    fn compiling_the_same_document_twice_assigns_the_same_path_ids() {
        let json = r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
            {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"},
            {"ty":4,"nm":"shape","ip":0,"op":60,"shapes":[
                {"ty":"sh","ks":{"a":0,"k":{"i":[[0,0],[0,0],[0,0]],"o":[[0,0],[0,0],[0,0]],"v":[[0,0],[10,0],[5,10]],"c":true}}}
            ],"masksProperties":[
                {"mode":"a","inv":false,"o":{"a":0,"k":100},"pt":{"a":0,"k":{"i":[[0,0],[0,0],[0,0]],"o":[[0,0],[0,0],[0,0]],"v":[[0,0],[10,0],[5,10]],"c":true}}}
            ]}
        ],"assets":[{"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"}]}"#;
        let m = model(json);
        let mut registry_a = PathRegistry::new();
        let ir_a = compile_animation(&m, &mut registry_a, &ctx()).unwrap();
        let mut registry_b = PathRegistry::new();
        let ir_b = compile_animation(&m, &mut registry_b, &ctx()).unwrap();

        let path_id = |ir: &AnimIR| match &ir.root.layers[1].content {
            LayerContent::Shapes(group) => group.path_id.unwrap(),
            other => panic!("expected shapes content, got {other:?}"),
        };
        assert_eq!(path_id(&ir_a), path_id(&ir_b));
        assert_eq!(ir_a.root.layers[1].masks[0].path_id, ir_b.root.layers[1].masks[0].path_id);
    }
}
