//! Lottie document validation (component G): everything that must hold for
//! one animation JSON, given the scene context (frame rate, binding key,
//! bound input-rect sizes) it is compiled under.

use crate::decode::{anim_path, scalar_track};
use crate::error::{ValidationIssue, ValidationReport, codes};
use crate::mask::{MaskMode, MatteMode};
use crate::model::{AssetModel, LayerModel, LottieModel, ShapeModel};
use lottie_geom::AnimPath;

/// Capability injected by the caller to check whether a non-binding asset's
/// file actually exists in the package, mirroring the scene validator's
/// `MaskCatalog` (§9 "dynamic dispatch"). This validator never performs I/O
/// itself.
pub trait AssetResolver {
    /// True if `relative_path` resolves to a real file in the package.
    fn resolve(&self, relative_path: &str) -> bool;
}

/// Shape item types this compiler's subset understands at the validation
/// stage (mirrors the extraction-time set in [`crate::shapes`]).
const SUPPORTED_SHAPE_TYPES: &[&str] = &["gr", "sh", "fl", "st", "tr", "rc", "el", "sr"];

/// Everything the anim validator needs to know about the scene context an
/// animation is being checked against.
pub struct AnimValidationContext<'a> {
    /// The animation's identifying ref, used only for diagnostic paths.
    pub anim_ref: &'a str,
    /// The scene canvas's frame rate, checked against the animation's `fr`.
    pub scene_fps: f64,
    /// Distinct `(w, h)` sizes of every input rect bound to this animation,
    /// for the size-mismatch warning (one per distinct size).
    pub bound_input_sizes: &'a [(f64, f64)],
    /// The layer name the scene binds a user asset to.
    pub binding_key: &'a str,
    /// The layer name used as the clip-path source for the binding layer's
    /// media, if the block configures one.
    pub media_input_key: Option<&'a str>,
    /// Capability used to check non-binding asset presence; when absent,
    /// presence checks are skipped rather than assumed to fail.
    pub resolver: Option<&'a dyn AssetResolver>,
    /// When `false`, any animated mask path is rejected outright regardless
    /// of keyframe topology consistency. Callers default this to `true`.
    pub allow_animated_mask_path: bool,
}

struct Composition<'a> {
    id: &'a str,
    layers: &'a [LayerModel],
}

/// Runs every anim-validator rule against `model`, returning the
/// accumulated report.
pub fn validate_anim(model: &LottieModel, ctx: &AnimValidationContext) -> ValidationReport {
    tracing::debug!(anim_ref = ctx.anim_ref, binding_key = ctx.binding_key, "validating animation");
    let mut report = ValidationReport::new();

    validate_root(model, ctx, &mut report);

    let mut precomp_assets: Vec<&AssetModel> = model.assets.iter().filter(|a| a.is_precomp()).collect();
    precomp_assets.sort_by(|a, b| a.id.cmp(&b.id));
    let mut compositions = vec![Composition { id: "__root__", layers: &model.layers }];
    compositions.extend(precomp_assets.iter().map(|a| Composition { id: &a.id, layers: &a.layers }));

    for comp in &compositions {
        validate_layers(comp, model, ctx, &mut report);
    }

    validate_binding_layer(&compositions, ctx, &mut report);
    validate_media_input(&compositions, ctx, &mut report);

    if report.has_errors() {
        tracing::warn!(anim_ref = ctx.anim_ref, issue_count = report.issues().len(), "animation validation found errors");
    }
    report
}

fn validate_root(model: &LottieModel, ctx: &AnimValidationContext, report: &mut ValidationReport) {
    let path = format!("anim({})", ctx.anim_ref);
    let sane = model.width.is_finite() && model.width > 0.0
        && model.height.is_finite() && model.height > 0.0
        && model.frame_rate.is_finite() && model.frame_rate > 0.0
        && model.in_point.is_finite() && model.out_point.is_finite()
        && model.out_point > model.in_point;
    if !sane {
        report.push(ValidationIssue::error(codes::ANIM_ROOT_INVALID, path.clone(), "root w/h/fr/ip/op must be finite, positive, with op > ip"));
    }

    if (model.frame_rate - ctx.scene_fps).abs() > f64::EPSILON {
        report.push(ValidationIssue::error(
            codes::ANIM_FPS_MISMATCH,
            format!("{path}.fr"),
            format!("animation fps {} does not match scene canvas fps {}", model.frame_rate, ctx.scene_fps),
        ));
    }

    for &(w, h) in ctx.bound_input_sizes {
        if (w - model.width).abs() > f64::EPSILON || (h - model.height).abs() > f64::EPSILON {
            report.push(ValidationIssue::warning(
                codes::WARNING_ANIM_SIZE_MISMATCH,
                path.clone(),
                format!("bound input rect {w}x{h} differs from animation size {}x{}", model.width, model.height),
            ));
        }
    }
}

fn validate_layers(comp: &Composition, model: &LottieModel, ctx: &AnimValidationContext, report: &mut ValidationReport) {
    for (i, layer) in comp.layers.iter().enumerate() {
        let path = format!("comp({}).layers[{i}]", comp.id);
        let layer_type = crate::layers::LayerType::from_code(layer.layer_type);
        if layer_type.is_none() {
            report.push(ValidationIssue::error(codes::UNSUPPORTED_LAYER_TYPE, format!("{path}.ty"), format!("unsupported layer type {}", layer.layer_type)));
            continue;
        }

        if layer.is_3d != 0 {
            report.push(ValidationIssue::error(codes::UNSUPPORTED_LAYER_3D, format!("{path}.ddd"), "3D layers are not supported"));
        }
        if layer.auto_orient != 0 {
            report.push(ValidationIssue::error(codes::UNSUPPORTED_LAYER_AUTO_ORIENT, format!("{path}.ao"), "auto-orient is not supported"));
        }
        if (layer.stretch - 1.0).abs() > f64::EPSILON {
            report.push(ValidationIssue::error(codes::UNSUPPORTED_LAYER_STRETCH, format!("{path}.sr"), "time stretch is not supported"));
        }
        if layer.blend_mode != 0 {
            report.push(ValidationIssue::error(codes::UNSUPPORTED_BLEND_MODE, format!("{path}.bm"), "blend modes other than normal are not supported"));
        }
        if layer.collapse_transform != 0 && !layer.hidden && layer.track_matte_source != Some(1) {
            report.push(ValidationIssue::warning(codes::UNSUPPORTED_LAYER_COLLAPSE_TRANSFORM, format!("{path}.ct"), "collapse-transform is ignored"));
        }

        validate_skew(layer, &path, report);

        for (mi, mask) in layer.masks.iter().enumerate() {
            validate_mask(mask, &format!("{path}.masksProperties[{mi}]"), ctx.allow_animated_mask_path, report);
        }

        if let Some(tt) = layer.track_matte_type {
            validate_matte(layer, comp, i, tt, &path, report);
        }

        if layer_type == Some(crate::layers::LayerType::ShapeMatte) {
            for (si, shape) in layer.shapes.iter().enumerate() {
                validate_shape_item(shape, &format!("{path}.shapes[{si}]"), report);
            }
        }

        if layer_type == Some(crate::layers::LayerType::Image) && layer.name != ctx.binding_key {
            validate_image_asset(layer, model, &path, report, ctx.resolver);
        }
        if layer_type == Some(crate::layers::LayerType::Precomp) {
            validate_precomp_ref(layer, model, &path, report);
        }
    }
}

fn validate_skew(layer: &LayerModel, path: &str, report: &mut ValidationReport) {
    let Some(transform) = &layer.transform else { return };
    let Some(skew) = &transform.skew else { return };
    match scalar_track(skew) {
        Ok(track) if !track.is_animated() => {
            let value = match &track {
                lottie_geom::AnimTrack::Static(v) => *v,
                lottie_geom::AnimTrack::Keyframed(kfs) => kfs.first().map(|k| k.value).unwrap_or(0.0),
            };
            if value.abs() > f64::EPSILON {
                report.push(ValidationIssue::error(codes::UNSUPPORTED_SKEW, format!("{path}.ks.sk"), "nonzero skew is not supported"));
            }
        }
        Ok(_) => {
            report.push(ValidationIssue::error(codes::UNSUPPORTED_SKEW, format!("{path}.ks.sk"), "animated skew is not supported"));
        }
        Err(_) => {
            report.push(ValidationIssue::error(codes::UNSUPPORTED_SKEW, format!("{path}.ks.sk"), "unrecognised skew value format"));
        }
    }
}

fn validate_mask(mask: &crate::model::MaskModel, path: &str, allow_animated_mask_path: bool, report: &mut ValidationReport) {
    if MaskMode::from_code(&mask.mode).is_none() {
        report.push(ValidationIssue::error(codes::UNSUPPORTED_MASK_MODE, format!("{path}.mode"), format!("unsupported mask mode '{}'", mask.mode)));
    }

    match anim_path(&mask.path) {
        Ok(path_value) => {
            if path_value.is_animated() && !allow_animated_mask_path {
                report.push(ValidationIssue::error(codes::UNSUPPORTED_MASK_PATH_ANIMATED, format!("{path}.pt"), "animated mask paths are not allowed"));
            } else if path_value.is_animated() && !path_topology_consistent(&path_value) {
                report.push(ValidationIssue::error(codes::UNSUPPORTED_MASK_PATH_ANIMATED, format!("{path}.pt"), "animated mask path keyframes disagree on topology"));
            }
        }
        Err(e) => {
            report.push(ValidationIssue::error(codes::UNSUPPORTED_MASK_PATH_ANIMATED, format!("{path}.pt"), e.to_string()));
        }
    }

    match scalar_track(&mask.opacity) {
        Ok(track) if track.is_animated() => {
            report.push(ValidationIssue::error(codes::UNSUPPORTED_MASK_OPACITY_ANIMATED, format!("{path}.o"), "animated mask opacity is not supported"));
        }
        Err(e) => {
            report.push(ValidationIssue::error(codes::UNSUPPORTED_MASK_OPACITY_ANIMATED, format!("{path}.o"), e.to_string()));
        }
        _ => {}
    }

    if let Some(expansion) = &mask.expansion {
        match scalar_track(expansion) {
            Ok(track) if track.is_animated() => {
                report.push(ValidationIssue::error(codes::UNSUPPORTED_MASK_EXPANSION_ANIMATED, format!("{path}.x"), "animated mask expansion is not supported"));
            }
            Ok(lottie_geom::AnimTrack::Static(v)) if v.abs() > f64::EPSILON => {
                report.push(ValidationIssue::error(codes::UNSUPPORTED_MASK_EXPANSION_NONZERO, format!("{path}.x"), "nonzero mask expansion is not supported"));
            }
            Err(_) => {
                report.push(ValidationIssue::error(codes::UNSUPPORTED_MASK_EXPANSION_FORMAT, format!("{path}.x"), "unrecognised mask expansion value format"));
            }
            _ => {}
        }
    }
}

fn path_topology_consistent(path: &AnimPath) -> bool {
    match path {
        AnimPath::StaticBezier(_) => true,
        AnimPath::KeyframedBezier(kfs) => {
            let Some(first) = kfs.first() else { return true };
            kfs.iter().all(|kf| kf.value.vertices.len() == first.value.vertices.len() && kf.value.closed == first.value.closed)
        }
    }
}

fn validate_matte(layer: &LayerModel, comp: &Composition, index: usize, tt: i64, path: &str, report: &mut ValidationReport) {
    if MatteMode::from_code(tt).is_none() {
        report.push(ValidationIssue::error(codes::UNSUPPORTED_MATTE_TYPE, format!("{path}.tt"), format!("unsupported track matte type {tt}")));
        return;
    }

    if let Some(target) = layer.track_matte_target {
        let source_index = comp.layers.iter().enumerate().find(|(i, l)| l.id_or_index(*i) == target).map(|(i, _)| i);
        match source_index {
            None => report.push(ValidationIssue::error(codes::MATTE_TARGET_NOT_FOUND, format!("{path}.tp"), format!("tp target {target} not found in composition"))),
            Some(si) if si >= index => report.push(ValidationIssue::error(codes::MATTE_TARGET_INVALID_ORDER, format!("{path}.tp"), "tp target must be strictly earlier in the layer list")),
            Some(_) => {}
        }
    } else if index == 0 {
        report.push(ValidationIssue::error(codes::UNSUPPORTED_MATTE_LAYER_ORDER, path.to_string(), "a matte consumer with no tp cannot be the first layer"));
    } else {
        let source = &comp.layers[index - 1];
        if source.track_matte_source != Some(1) {
            report.push(ValidationIssue::error(codes::UNSUPPORTED_MATTE_LAYER_MISSING, path.to_string(), "no td=1 matte source immediately precedes this consumer"));
        }
    }
}

fn validate_shape_item(shape: &ShapeModel, path: &str, report: &mut ValidationReport) {
    if !SUPPORTED_SHAPE_TYPES.contains(&shape.shape_type.as_str()) {
        report.push(ValidationIssue::error(codes::UNSUPPORTED_SHAPE_ITEM, format!("{path}.ty"), format!("unsupported shape item type '{}'", shape.shape_type)));
        return;
    }
    if shape.shape_type == "gr" {
        for (i, item) in shape.items.iter().enumerate() {
            validate_shape_item(item, &format!("{path}.it[{i}]"), report);
        }
    }
}

fn validate_image_asset(layer: &LayerModel, model: &LottieModel, path: &str, report: &mut ValidationReport, resolver: Option<&dyn AssetResolver>) {
    let Some(ref_id) = &layer.ref_id else { return };
    match model.assets.iter().find(|a| &a.id == ref_id) {
        None => report.push(ValidationIssue::error(codes::ASSET_MISSING, format!("{path}.refId"), format!("asset '{ref_id}' not found"))),
        Some(asset) if !asset.is_image() => {
            report.push(ValidationIssue::error(codes::ASSET_MISSING, format!("{path}.refId"), format!("asset '{ref_id}' is not an image asset")))
        }
        Some(asset) => {
            if let (Some(resolver), Some(relative)) = (resolver, asset.relative_path()) {
                if !resolver.resolve(&relative) {
                    report.push(ValidationIssue::error(codes::ASSET_MISSING, format!("{path}.refId"), format!("asset file '{relative}' does not exist in package")));
                }
            }
        }
    }
}

fn validate_precomp_ref(layer: &LayerModel, model: &LottieModel, path: &str, report: &mut ValidationReport) {
    let Some(ref_id) = &layer.ref_id else {
        report.push(ValidationIssue::error(codes::PRECOMP_REF_MISSING, format!("{path}.refId"), "precomp layer has no refId"));
        return;
    };
    match model.assets.iter().find(|a| &a.id == ref_id) {
        Some(asset) if asset.is_precomp() => {}
        _ => report.push(ValidationIssue::error(codes::PRECOMP_REF_MISSING, format!("{path}.refId"), format!("refId '{ref_id}' does not resolve to a precomp asset"))),
    }
}

fn validate_binding_layer(compositions: &[Composition], ctx: &AnimValidationContext, report: &mut ValidationReport) {
    let path = format!("anim({})", ctx.anim_ref);
    let matches: Vec<(&Composition, &LayerModel)> =
        compositions.iter().flat_map(|c| c.layers.iter().map(move |l| (c, l))).filter(|(_, l)| l.name == ctx.binding_key).collect();

    if matches.is_empty() {
        report.push(ValidationIssue::error(codes::BINDING_LAYER_NOT_FOUND, path, format!("no layer named '{}' found", ctx.binding_key)));
        return;
    }
    if matches.len() > 1 {
        report.push(ValidationIssue::error(
            codes::BINDING_LAYER_AMBIGUOUS,
            path,
            format!("binding key '{}' matched {} layers", ctx.binding_key, matches.len()),
        ));
        return;
    }
    let (_, layer) = matches[0];
    if crate::layers::LayerType::from_code(layer.layer_type) != Some(crate::layers::LayerType::Image) {
        report.push(ValidationIssue::error(codes::BINDING_LAYER_NOT_IMAGE, path, "binding layer is not an image layer"));
        return;
    }
    if layer.ref_id.is_none() {
        report.push(ValidationIssue::error(codes::BINDING_LAYER_NO_ASSET, path, "binding layer has no asset reference"));
    }
}

fn validate_media_input(compositions: &[Composition], ctx: &AnimValidationContext, report: &mut ValidationReport) {
    let Some(key) = ctx.media_input_key else { return };
    let path = format!("anim({})", ctx.anim_ref);

    let binding_comp = compositions.iter().find(|c| c.layers.iter().any(|l| l.name == ctx.binding_key)).map(|c| c.id);
    let matches: Vec<(&Composition, &LayerModel)> = compositions.iter().flat_map(|c| c.layers.iter().map(move |l| (c, l))).filter(|(_, l)| l.name == key).collect();

    let Some((comp, layer)) = matches.first().copied() else {
        report.push(ValidationIssue::warning(codes::MEDIA_INPUT_MISSING, path, format!("no mediaInput layer named '{key}' found")));
        return;
    };

    if crate::layers::LayerType::from_code(layer.layer_type) != Some(crate::layers::LayerType::ShapeMatte) {
        report.push(ValidationIssue::warning(codes::MEDIA_INPUT_NOT_SHAPE, path.clone(), "mediaInput layer is not a shape layer"));
        return;
    }
    if binding_comp.is_some_and(|id| id != comp.id) {
        report.push(ValidationIssue::warning(codes::MEDIA_INPUT_NOT_IN_SAME_COMP, path.clone(), "mediaInput layer is not in the binding layer's composition"));
    }

    let mut path_count = 0usize;
    let mut has_forbidden_modifier = false;
    count_path_shapes(&layer.shapes, &mut path_count, &mut has_forbidden_modifier);
    if path_count == 0 {
        report.push(ValidationIssue::warning(codes::MEDIA_INPUT_NO_PATH, path.clone(), "mediaInput contains no path-producing shape"));
    } else if path_count > 1 {
        report.push(ValidationIssue::warning(codes::MEDIA_INPUT_MULTIPLE_PATHS, path.clone(), "mediaInput contains more than one path-producing shape"));
    }
    if has_forbidden_modifier {
        report.push(ValidationIssue::warning(codes::MEDIA_INPUT_FORBIDDEN_MODIFIER, path, "mediaInput contains a forbidden modifier item (e.g. trim paths)"));
    }
}

fn count_path_shapes(items: &[ShapeModel], path_count: &mut usize, has_forbidden_modifier: &mut bool) {
    for item in items {
        match item.shape_type.as_str() {
            "sh" | "rc" | "el" | "sr" => *path_count += 1,
            "tm" => *has_forbidden_modifier = true,
            "gr" => count_path_shapes(&item.items, path_count, has_forbidden_modifier),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_model() -> LottieModel {
        serde_json::from_str(
            r#"{"nm":"Test","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"}
            ],"assets":[
                {"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"}
            ]}"#,
        )
        .unwrap()
    }

    fn ctx<'a>(anim_ref: &'a str) -> AnimValidationContext<'a> {
        AnimValidationContext {
            anim_ref,
            scene_fps: 30.0,
            bound_input_sizes: &[],
            binding_key: "media",
            media_input_key: None,
            resolver: None,
            allow_animated_mask_path: true,
        }
    }

    #[test]
    fn accepts_minimal_valid_anim() {
        let model = base_model();
        let report = validate_anim(&model, &ctx("a"));
        assert!(!report.has_errors());
    }

    #[test]
    fn validation_is_deterministic_across_repeated_runs() {
        let model = base_model();
        let mut c = ctx("a");
        c.bound_input_sizes = &[(200.0, 200.0)];
        let first = validate_anim(&model, &c);
        let second = validate_anim(&model, &c);
        let codes_of = |r: &ValidationReport| r.issues().iter().map(|i| (i.code, i.path.clone(), i.message.clone())).collect::<Vec<_>>();
        assert_eq!(codes_of(&first), codes_of(&second));
    }

    #[test]
    fn fps_mismatch_is_an_error() {
        let model = base_model();
        let mut c = ctx("a");
        c.scene_fps = 24.0;
        let report = validate_anim(&model, &c);
        assert!(report.issues().iter().any(|i| i.code == codes::ANIM_FPS_MISMATCH));
    }

    #[test]
    fn size_mismatch_is_a_warning() {
        let model = base_model();
        let mut c = ctx("a");
        c.bound_input_sizes = &[(200.0, 200.0)];
        let report = validate_anim(&model, &c);
        assert!(!report.has_errors());
        assert!(report.issues().iter().any(|i| i.code == codes::WARNING_ANIM_SIZE_MISMATCH));
    }

    #[test]
    fn animated_mask_path_is_rejected_when_disallowed_even_with_consistent_topology() {
        let model: LottieModel = serde_json::from_str(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":10,"h":10,"layers":[
                {"ty":4,"nm":"media","ip":0,"op":60,"masksProperties":[
                    {"mode":"a","inv":false,"o":{"a":0,"k":100},"pt":{"a":1,"k":[
                        {"t":0,"s":[{"i":[[0,0],[0,0],[0,0]],"o":[[0,0],[0,0],[0,0]],"v":[[0,0],[10,0],[5,10]],"c":true}]},
                        {"t":10,"s":[{"i":[[0,0],[0,0],[0,0]],"o":[[0,0],[0,0],[0,0]],"v":[[0,0],[20,0],[10,20]],"c":true}]}
                    ]}}
                ]}
            ]}"#,
        )
        .unwrap();

        let mut allowed = ctx("a");
        allowed.allow_animated_mask_path = true;
        let report = validate_anim(&model, &allowed);
        assert!(!report.issues().iter().any(|i| i.code == codes::UNSUPPORTED_MASK_PATH_ANIMATED));

        let mut disallowed = ctx("a");
        disallowed.allow_animated_mask_path = false;
        let report = validate_anim(&model, &disallowed);
        assert!(report.issues().iter().any(|i| i.code == codes::UNSUPPORTED_MASK_PATH_ANIMATED));
    }

    #[test]
    fn missing_binding_layer_is_an_error() {
        let model = base_model();
        let mut c = ctx("a");
        c.binding_key = "nope";
        let report = validate_anim(&model, &c);
        assert!(report.issues().iter().any(|i| i.code == codes::BINDING_LAYER_NOT_FOUND));
    }

    #[test]
    fn unsupported_layer_type_is_rejected() {
        let model: LottieModel = serde_json::from_str(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":10,"h":10,"layers":[{"ty":1,"nm":"solid","ip":0,"op":60}]}"#,
        )
        .unwrap();
        let report = validate_anim(&model, &ctx("a"));
        assert!(report.issues().iter().any(|i| i.code == codes::UNSUPPORTED_LAYER_TYPE));
    }

    #[test]
    fn unsupported_mask_mode_is_rejected_supported_ones_are_not() {
        let mask = |mode: &str| {
            format!(
                r#"{{"mode":"{mode}","inv":false,"o":{{"a":0,"k":100}},"pt":{{"a":0,"k":{{"i":[[0,0],[0,0],[0,0]],"o":[[0,0],[0,0],[0,0]],"v":[[0,0],[10,0],[5,10]],"c":true}}}}}}"#
            )
        };
        let model_with = |mode: &str| -> LottieModel {
            serde_json::from_str(&format!(
                r#"{{"nm":"t","fr":30,"ip":0,"op":60,"w":10,"h":10,"layers":[
                    {{"ty":4,"nm":"media","ip":0,"op":60,"masksProperties":[{}]}}
                ]}}"#,
                mask(mode)
            ))
            .unwrap()
        };

        let rejected = validate_anim(&model_with("l"), &ctx("a"));
        let issue = rejected.issues().iter().find(|i| i.code == codes::UNSUPPORTED_MASK_MODE).unwrap();
        assert!(issue.message.contains('l'));

        for supported in ["a", "s", "i"] {
            let report = validate_anim(&model_with(supported), &ctx("a"));
            assert!(!report.issues().iter().any(|i| i.code == codes::UNSUPPORTED_MASK_MODE));
        }
    }

    #[test]
    fn adjacency_matte_requires_preceding_source() {
        let model: LottieModel = serde_json::from_str(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":10,"h":10,"layers":[
                {"ty":4,"nm":"consumer","ip":0,"op":60,"tt":1,"shapes":[]}
            ]}"#,
        )
        .unwrap();
        let report = validate_anim(&model, &ctx("a"));
        assert!(report.issues().iter().any(|i| i.code == codes::UNSUPPORTED_MATTE_LAYER_ORDER));
    }

    #[test]
    fn adjacency_matte_pairs_with_preceding_td_source() {
        let model: LottieModel = serde_json::from_str(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":10,"h":10,"layers":[
                {"ty":4,"nm":"source","ind":0,"ip":0,"op":60,"td":1,"shapes":[]},
                {"ty":4,"nm":"consumer","ind":1,"ip":0,"op":60,"tt":1,"shapes":[]}
            ]}"#,
        )
        .unwrap();
        let report = validate_anim(&model, &ctx("a"));
        assert!(!report.issues().iter().any(|i| i.code == codes::UNSUPPORTED_MATTE_LAYER_MISSING));
    }
}
