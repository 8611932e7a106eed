//! Render-command generation (component I): walks a compiled [`AnimIR`] at
//! a given scene frame and emits a flat [`RenderCommand`] stream.
//!
//! This module never touches a canvas. It produces the same instructions a
//! canvas-backed renderer would consume, but as data, so the caller can
//! batch them, diff them against a previous frame, or hand them to whatever
//! drawing backend the embedding application uses. Every walk is
//! cycle-guarded and every failure degrades the subtree rather than
//! aborting the stream: a [`RenderIssue`] is recorded and the walk moves on,
//! per the render-time taxonomy in [`crate::error`].

use crate::error::{Severity, codes};
use crate::ir::AnimIR;
use crate::layers::{Composition, Layer, LayerContent};
use crate::mask::{MaskMode, MatteMode};
use crate::shapes::ShapeGroup;
use lottie_geom::{Matrix2D, Rgb, Rgba, Vec2, scalar};
use lottie_path::{PathID, PathRegistry};

pub use crate::error::RenderIssue;

/// One instruction in the emitted render-command stream.
///
/// Group/transform/mask/matte commands always nest correctly: every
/// `Begin*` has a matching `End*` later in the stream, and the stack depth
/// implied by the nesting never goes negative. [`render_commands`] and
/// [`render_edit_commands`] both uphold this; see their tests.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Opens a layer's drawing scope.
    BeginGroup,
    /// Closes the most recently opened [`RenderCommand::BeginGroup`].
    EndGroup,
    /// Pushes a matrix onto the transform stack.
    PushTransform(Matrix2D),
    /// Pops the most recently pushed transform.
    PopTransform,
    /// Opens a mask scope; content drawn before the matching
    /// [`RenderCommand::EndMask`] is clipped/combined by `mode`.
    BeginMask {
        /// Boolean combination mode.
        mode: MaskMode,
        /// Inverted flag.
        inverted: bool,
        /// The mask's registered path.
        path_id: PathID,
        /// Mask opacity, `0..1`.
        opacity: f64,
    },
    /// Closes the most recently opened [`RenderCommand::BeginMask`].
    EndMask,
    /// Opens a track-matte scope; content drawn before the matching
    /// [`RenderCommand::EndMatte`] is combined with the source geometry.
    BeginMatte {
        /// Combination mode.
        mode: MatteMode,
        /// The matte source's registered path.
        path_id: PathID,
    },
    /// Closes the most recently opened [`RenderCommand::BeginMatte`].
    EndMatte,
    /// Draws a namespaced image asset filling the current transform.
    DrawImage {
        /// Namespaced asset id ([`crate::ir::namespaced_asset_id`]).
        asset_id: String,
        /// Opacity, `0..1`.
        opacity: f64,
    },
    /// Fills a registered path with a solid color.
    DrawShape {
        /// The fill path.
        path_id: PathID,
        /// Fill color.
        color: Rgba,
        /// Opacity, `0..1`.
        opacity: f64,
    },
    /// Strokes a registered path.
    DrawStroke {
        /// The stroke path.
        path_id: PathID,
        /// Stroke color.
        color: Rgb,
        /// Opacity, `0..1`.
        opacity: f64,
        /// Stroke width at the sampled frame.
        width: f64,
        /// 1 butt, 2 round, 3 square.
        line_cap: i64,
        /// 1 miter, 2 round, 3 bevel.
        line_join: i64,
        /// Miter limit.
        miter_limit: f64,
    },
}

/// Renders the full scene graph at `scene_frame`, clamped into the root
/// composition's visible range. Degradations are recorded on `ir` and
/// retrievable afterwards via [`AnimIR::last_render_issues`].
pub fn render_commands(ir: &AnimIR, registry: &PathRegistry, scene_frame: f64) -> Vec<RenderCommand> {
    let frame = clamp_to_root(ir, scene_frame);
    let mut out = Vec::new();
    let mut issues = Vec::new();
    let mut comp_stack = Vec::new();
    render_composition(ir, registry, Composition::ROOT_ID, frame, Matrix2D::IDENTITY, 1.0, &mut out, &mut issues, &mut comp_stack);
    ir.set_last_render_issues(issues);
    out
}

/// Renders only the subgraph needed to draw the binding layer: siblings
/// that do not lead to it are skipped entirely. Used by editors that only
/// need to preview the user's bound media, not the full composited scene.
pub fn render_edit_commands(ir: &AnimIR, registry: &PathRegistry, scene_frame: f64) -> Vec<RenderCommand> {
    let frame = clamp_to_root(ir, scene_frame);
    let mut out = Vec::new();
    let mut issues = Vec::new();
    render_composition_edit(ir, registry, Composition::ROOT_ID, frame, Matrix2D::IDENTITY, 1.0, &mut out, &mut issues);
    ir.set_last_render_issues(issues);
    out
}

fn clamp_to_root(ir: &AnimIR, scene_frame: f64) -> f64 {
    let last = (ir.meta.out_point - 1.0).max(ir.meta.in_point);
    scalar::clamp(scene_frame, ir.meta.in_point, last)
}

#[allow(clippy::too_many_arguments)]
fn render_composition(
    ir: &AnimIR,
    registry: &PathRegistry,
    comp_id: &str,
    frame: f64,
    parent_world: Matrix2D,
    parent_opacity: f64,
    out: &mut Vec<RenderCommand>,
    issues: &mut Vec<RenderIssue>,
    comp_stack: &mut Vec<String>,
) {
    if comp_stack.iter().any(|c| c == comp_id) {
        issues.push(render_issue(codes::PRECOMP_CYCLE, comp_id, format!("composition '{comp_id}' recurses into itself"), frame));
        return;
    }
    let Some(comp) = ir.composition(comp_id) else {
        issues.push(render_issue(codes::PRECOMP_ASSET_NOT_FOUND, comp_id, format!("composition '{comp_id}' not found"), frame));
        return;
    };
    comp_stack.push(comp_id.to_string());
    for layer in &comp.layers {
        if layer.is_hidden || layer.is_matte_source {
            continue;
        }
        if !layer.timing.is_visible(frame) {
            continue;
        }
        render_layer(ir, registry, comp, layer, frame, parent_world, parent_opacity, out, issues, comp_stack);
    }
    comp_stack.pop();
}

#[allow(clippy::too_many_arguments)]
fn render_layer(
    ir: &AnimIR,
    registry: &PathRegistry,
    comp: &Composition,
    layer: &Layer,
    frame: f64,
    parent_world: Matrix2D,
    parent_opacity: f64,
    out: &mut Vec<RenderCommand>,
    issues: &mut Vec<RenderIssue>,
    comp_stack: &mut Vec<String>,
) {
    let local_frame = frame - layer_frame_offset(layer);
    let Some(world) = layer_world_matrix(comp, layer, frame, parent_world, issues) else {
        return;
    };
    let opacity = parent_opacity * (layer.transform.opacity_value(frame) / 100.0);

    let matte = layer.matte.as_ref().and_then(|m| match comp.layer(m.source_layer_id).map(|l| &l.content) {
        Some(LayerContent::Shapes(group)) if group.path_id.is_some() => Some((m.mode, group.path_id.unwrap())),
        _ => {
            issues.push(render_issue(
                codes::MATTE_SOURCE_NOT_FOUND,
                &format!("{}#{}", comp.id, layer.id),
                format!("matte source layer {} is not a shape layer with a built path", m.source_layer_id),
                frame,
            ));
            None
        }
    });
    if let Some((mode, path_id)) = matte {
        out.push(RenderCommand::BeginMatte { mode, path_id });
    }

    out.push(RenderCommand::BeginGroup);

    let input_clip = is_binding_layer(ir, layer).then(|| ir.input_geometry.as_ref()).flatten();
    let clip_emitted = input_clip.is_some_and(|geom| {
        match media_input_layer_world_matrix(ir, comp, frame, parent_world, issues) {
            Some(mi_world) => {
                out.push(RenderCommand::PushTransform(mi_world));
                out.push(RenderCommand::BeginMask { mode: MaskMode::Intersect, inverted: false, path_id: geom.clip_path_id, opacity: 1.0 });
                out.push(RenderCommand::PopTransform);
                true
            }
            None => false,
        }
    });

    out.push(RenderCommand::PushTransform(world));

    let mask_count = layer.masks.len();
    for mask in layer.masks.iter().rev() {
        let Some(path_id) = mask.path_id else { continue };
        out.push(RenderCommand::BeginMask { mode: mask.mode, inverted: mask.inverted, path_id, opacity: mask.opacity.sample(frame) / 100.0 });
    }

    emit_content(ir, registry, layer, local_frame, opacity, out, issues, comp_stack);

    for _ in 0..mask_count {
        out.push(RenderCommand::EndMask);
    }
    out.push(RenderCommand::PopTransform);

    if clip_emitted {
        out.push(RenderCommand::EndMask);
    }
    out.push(RenderCommand::EndGroup);

    if matte.is_some() {
        out.push(RenderCommand::EndMatte);
    }
}

/// The mediaInput layer's own world matrix within `comp` (the same
/// composition the binding layer lives in), used to interpret the input-clip
/// mask path in the mediaInput layer's space rather than the binding
/// layer's.
fn media_input_layer_world_matrix(ir: &AnimIR, comp: &Composition, frame: f64, parent_world: Matrix2D, issues: &mut Vec<RenderIssue>) -> Option<Matrix2D> {
    let geom = ir.input_geometry.as_ref()?;
    let layer = comp.layer(geom.layer_id)?;
    layer_world_matrix(comp, layer, frame, parent_world, issues)
}

/// A layer's own local-frame offset for content drawn beneath it: precomps
/// advance by their `st`, everything else draws at the parent's frame.
fn layer_frame_offset(layer: &Layer) -> f64 {
    match &layer.content {
        LayerContent::Precomp(_) => layer.timing.start_time,
        _ => 0.0,
    }
}

/// Resolves a layer's world matrix by walking its parent chain within
/// `comp`, guarding against cycles independently of the composition-level
/// guard in [`render_composition`].
fn layer_world_matrix(comp: &Composition, layer: &Layer, frame: f64, parent_world: Matrix2D, issues: &mut Vec<RenderIssue>) -> Option<Matrix2D> {
    let mut chain = vec![layer.transform.matrix(frame)];
    let mut visiting = vec![layer.id];
    let mut current = layer.parent;
    while let Some(parent_id) = current {
        if visiting.contains(&parent_id) {
            issues.push(render_issue(codes::PARENT_CYCLE, &format!("{}#{}", comp.id, layer.id), format!("parent chain of layer {} cycles back on itself", layer.id), frame));
            return None;
        }
        let Some(parent_layer) = comp.layer(parent_id) else {
            issues.push(render_issue(codes::PARENT_NOT_FOUND, &format!("{}#{}", comp.id, layer.id), format!("parent layer {parent_id} not found"), frame));
            return None;
        };
        visiting.push(parent_id);
        chain.push(parent_layer.transform.matrix(frame));
        current = parent_layer.parent;
    }
    let local = chain.into_iter().reduce(|outer, inner| outer.concatenating(&inner)).unwrap_or(Matrix2D::IDENTITY);
    Some(parent_world.concatenating(&local))
}

#[allow(clippy::too_many_arguments)]
fn emit_content(
    ir: &AnimIR,
    registry: &PathRegistry,
    layer: &Layer,
    local_frame: f64,
    opacity: f64,
    out: &mut Vec<RenderCommand>,
    issues: &mut Vec<RenderIssue>,
    comp_stack: &mut Vec<String>,
) {
    match &layer.content {
        LayerContent::Image(asset_id) => {
            out.push(RenderCommand::DrawImage { asset_id: asset_id.clone(), opacity });
        }
        LayerContent::Precomp(ref_id) => {
            render_composition(ir, registry, ref_id, local_frame, Matrix2D::IDENTITY, opacity, out, issues, comp_stack);
        }
        LayerContent::Shapes(group) => emit_shape_group(group, local_frame, opacity, out),
        LayerContent::None => {}
    }
}

fn is_binding_layer(ir: &AnimIR, layer: &Layer) -> bool {
    layer.id == ir.binding.layer_id
}

fn emit_shape_group(group: &ShapeGroup, frame: f64, opacity: f64, out: &mut Vec<RenderCommand>) {
    let mut accum_opacity = opacity;
    for gt in &group.group_transforms {
        out.push(RenderCommand::PushTransform(gt.matrix(frame)));
        accum_opacity *= gt.opacity_value(frame);
    }

    if let (Some(color), Some(path_id)) = (group.fill_color, group.path_id) {
        out.push(RenderCommand::DrawShape { path_id, color, opacity: accum_opacity * (group.fill_opacity / 100.0) });
    }
    if let (Some(stroke), Some(path_id)) = (&group.stroke, group.path_id) {
        out.push(RenderCommand::DrawStroke {
            path_id,
            color: stroke.color,
            opacity: accum_opacity * stroke.opacity,
            width: stroke.width.sample(frame),
            line_cap: stroke.line_cap,
            line_join: stroke.line_join,
            miter_limit: stroke.miter_limit,
        });
    }

    for _ in &group.group_transforms {
        out.push(RenderCommand::PopTransform);
    }
}

#[allow(clippy::too_many_arguments)]
fn render_composition_edit(
    ir: &AnimIR,
    registry: &PathRegistry,
    comp_id: &str,
    frame: f64,
    parent_world: Matrix2D,
    parent_opacity: f64,
    out: &mut Vec<RenderCommand>,
    issues: &mut Vec<RenderIssue>,
) -> bool {
    if !ir.comp_contains_binding(comp_id) {
        return false;
    }
    let Some(comp) = ir.composition(comp_id) else {
        issues.push(render_issue(codes::PRECOMP_ASSET_NOT_FOUND, comp_id, format!("composition '{comp_id}' not found"), frame));
        return false;
    };
    for layer in &comp.layers {
        if layer.is_hidden || layer.is_matte_source || !layer.timing.is_visible(frame) {
            continue;
        }
        let on_path = match &layer.content {
            LayerContent::Precomp(ref_id) => ir.comp_contains_binding(ref_id),
            _ => is_binding_layer(ir, layer),
        };
        if !on_path {
            continue;
        }
        let Some(world) = layer_world_matrix(comp, layer, frame, parent_world, issues) else { continue };
        let opacity = parent_opacity * (layer.transform.opacity_value(frame) / 100.0);
        let local_frame = frame - layer_frame_offset(layer);

        out.push(RenderCommand::BeginGroup);

        let clip_emitted = matches!(&layer.content, LayerContent::Image(_))
            .then(|| ir.input_geometry.as_ref())
            .flatten()
            .is_some_and(|geom| match media_input_layer_world_matrix(ir, comp, frame, parent_world, issues) {
                Some(mi_world) => {
                    out.push(RenderCommand::PushTransform(mi_world));
                    out.push(RenderCommand::BeginMask { mode: MaskMode::Intersect, inverted: false, path_id: geom.clip_path_id, opacity: 1.0 });
                    out.push(RenderCommand::PopTransform);
                    true
                }
                None => false,
            });

        out.push(RenderCommand::PushTransform(world));
        match &layer.content {
            LayerContent::Precomp(ref_id) => {
                render_composition_edit(ir, registry, ref_id, local_frame, Matrix2D::IDENTITY, opacity, out, issues);
            }
            LayerContent::Image(asset_id) => {
                out.push(RenderCommand::DrawImage { asset_id: asset_id.clone(), opacity });
            }
            _ => {}
        }
        out.push(RenderCommand::PopTransform);
        if clip_emitted {
            out.push(RenderCommand::EndMask);
        }
        out.push(RenderCommand::EndGroup);
        return true;
    }
    false
}

fn render_issue(code: &'static str, path: &str, message: impl Into<String>, frame_index: f64) -> RenderIssue {
    let message = message.into();
    tracing::warn!(code, path, frame_index, "{message}");
    RenderIssue { code, severity: Severity::Warning, path: path.to_string(), message, frame_index }
}

/// The mediaInput layer's own world matrix at `frame`, for hit-testing where
/// the user's media currently sits on screen. Returns `None` when no
/// mediaInput layer is configured.
pub fn media_input_world_matrix(ir: &AnimIR, frame: f64) -> Option<Matrix2D> {
    let frame = clamp_to_root(ir, frame);
    let geom = ir.input_geometry.as_ref()?;
    let comp = ir.composition(&geom.composition_id)?;
    let layer = comp.layer(geom.layer_id)?;
    let mut issues = Vec::new();
    layer_world_matrix(comp, layer, frame, Matrix2D::IDENTITY, &mut issues)
}

/// The configured mediaInput clip path, sampled at `frame` and transformed
/// by the mediaInput layer's own world matrix into composition space.
pub fn media_input_path(ir: &AnimIR, registry: &PathRegistry, frame: f64) -> Option<Vec<Vec2>> {
    let clamped = clamp_to_root(ir, frame);
    let geom = ir.input_geometry.as_ref()?;
    let resource = registry.path(geom.clip_path_id)?;
    let world = media_input_world_matrix(ir, clamped)?;
    Some(resource.sample(clamped).into_iter().map(|p| world.apply(p)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{CompileContext, compile_animation};
    use crate::model::LottieModel;
    use lottie_path::PathRegistry;

    fn compile(json: &str) -> (AnimIR, PathRegistry) {
        let model: LottieModel = serde_json::from_str(json).unwrap();
        let mut registry = PathRegistry::new();
        let ctx = CompileContext { anim_ref: "a.json", binding_key: "media", media_input_key: None };
        let ir = compile_animation(&model, &mut registry, &ctx).unwrap();
        (ir, registry)
    }

    fn compile_with_media_input(json: &str, media_input_key: &'static str) -> (AnimIR, PathRegistry) {
        let model: LottieModel = serde_json::from_str(json).unwrap();
        let mut registry = PathRegistry::new();
        let ctx = CompileContext { anim_ref: "a.json", binding_key: "media", media_input_key: Some(media_input_key) };
        let ir = compile_animation(&model, &mut registry, &ctx).unwrap();
        (ir, registry)
    }

    #[test]
    fn binding_layer_emits_a_balanced_group_and_draw_image() {
        let (ir, registry) = compile(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"}
            ],"assets":[{"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"}]}"#,
        );
        let cmds = render_commands(&ir, &registry, 0.0);
        assert_eq!(cmds.first(), Some(&RenderCommand::BeginGroup));
        assert_eq!(cmds.last(), Some(&RenderCommand::EndGroup));
        assert!(cmds.iter().any(|c| matches!(c, RenderCommand::DrawImage { asset_id, .. } if asset_id == "a.json|image_0")));
        assert!(ir.last_render_issues().is_empty());
    }

    #[test]
    fn hidden_layer_is_skipped() {
        let (ir, registry) = compile(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0","hd":true}
            ],"assets":[{"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"}]}"#,
        );
        let cmds = render_commands(&ir, &registry, 0.0);
        assert!(cmds.is_empty());
    }

    #[test]
    fn out_of_range_frame_is_clamped_not_rejected() {
        let (ir, registry) = compile(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"}
            ],"assets":[{"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"}]}"#,
        );
        let cmds = render_commands(&ir, &registry, 10_000.0);
        assert!(!cmds.is_empty());
    }

    #[test]
    fn precomp_cycle_is_reported_and_does_not_recurse_forever() {
        let (ir, registry) = compile(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"},
                {"ty":0,"nm":"nested","ip":0,"op":60,"refId":"precomp_0"}
            ],"assets":[
                {"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"},
                {"id":"precomp_0","w":50,"h":50,"layers":[
                    {"ty":0,"nm":"loop","ip":0,"op":60,"refId":"precomp_0"}
                ]}
            ]}"#,
        );
        let _ = render_commands(&ir, &registry, 0.0);
        let issues = ir.last_render_issues();
        assert!(issues.iter().any(|i| i.code == codes::PRECOMP_CYCLE));
    }

    #[test]
    fn shape_layer_draws_fill_and_stroke_with_registered_paths() {
        let (ir, registry) = compile(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"},
                {"ty":4,"nm":"shape","ip":0,"op":60,"shapes":[
                    {"ty":"gr","it":[
                        {"ty":"sh","ks":{"a":0,"k":{"i":[[0,0],[0,0],[0,0]],"o":[[0,0],[0,0],[0,0]],"v":[[0,0],[10,0],[5,10]],"c":true}}},
                        {"ty":"fl","c":{"a":0,"k":[1,0,0,1]},"o":{"a":0,"k":100}},
                        {"ty":"st","c":{"a":0,"k":[0,0,1]},"o":{"a":0,"k":100},"w":{"a":0,"k":2},"lc":2,"lj":2,"ml":4}
                    ]}
                ]}
            ],"assets":[{"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"}]}"#,
        );
        let cmds = render_commands(&ir, &registry, 0.0);
        assert!(cmds.iter().any(|c| matches!(c, RenderCommand::DrawShape { .. })));
        assert!(cmds.iter().any(|c| matches!(c, RenderCommand::DrawStroke { width, .. } if *width == 2.0)));
    }

    #[test]
    fn edit_mode_skips_siblings_not_on_the_path_to_binding() {
        let (ir, registry) = compile(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"},
                {"ty":4,"nm":"decoration","ip":0,"op":60,"shapes":[
                    {"ty":"sh","ks":{"a":0,"k":{"i":[[0,0],[0,0],[0,0]],"o":[[0,0],[0,0],[0,0]],"v":[[0,0],[10,0],[5,10]],"c":true}}},
                    {"ty":"fl","c":{"a":0,"k":[0,1,0,1]},"o":{"a":0,"k":100}}
                ]}
            ],"assets":[{"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"}]}"#,
        );
        let cmds = render_edit_commands(&ir, &registry, 0.0);
        assert!(cmds.iter().any(|c| matches!(c, RenderCommand::DrawImage { .. })));
        assert!(!cmds.iter().any(|c| matches!(c, RenderCommand::DrawShape { .. })));
    }

    #[test]
    fn command_stack_stays_balanced_across_masks_mattes_and_nested_precomps() {
        let (ir, registry) = compile(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"},
                {"ty":4,"nm":"matte-src","ind":1,"ip":0,"op":60,"td":1,"shapes":[
                    {"ty":"sh","ks":{"a":0,"k":{"i":[[0,0],[0,0],[0,0]],"o":[[0,0],[0,0],[0,0]],"v":[[0,0],[10,0],[5,10]],"c":true}}}
                ]},
                {"ty":0,"nm":"nested","ind":2,"ip":0,"op":60,"refId":"precomp_0","tt":1,"masksProperties":[
                    {"mode":"a","inv":false,"o":{"a":0,"k":100},"pt":{"a":0,"k":{"i":[[0,0],[0,0],[0,0]],"o":[[0,0],[0,0],[0,0]],"v":[[0,0],[10,0],[5,10]],"c":true}}}
                ]}
            ],"assets":[
                {"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"},
                {"id":"precomp_0","w":50,"h":50,"layers":[]}
            ]}"#,
        );
        let cmds = render_commands(&ir, &registry, 0.0);
        let mut depth = 0i32;
        for cmd in &cmds {
            match cmd {
                RenderCommand::BeginGroup | RenderCommand::BeginMask { .. } | RenderCommand::BeginMatte { .. } => depth += 1,
                RenderCommand::EndGroup | RenderCommand::EndMask | RenderCommand::EndMatte => depth -= 1,
                _ => {}
            }
            assert!(depth >= 0, "unbalanced close with no matching open");
        }
        assert_eq!(depth, 0, "command stream left {depth} nesting levels open");
    }

    #[test]
    fn edit_and_full_render_agree_when_binding_layer_is_the_only_layer() {
        let (ir, registry) = compile(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"}
            ],"assets":[{"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"}]}"#,
        );
        assert_eq!(render_commands(&ir, &registry, 0.0), render_edit_commands(&ir, &registry, 0.0));
    }

    #[test]
    fn media_input_world_matrix_reflects_the_media_input_layers_own_position() {
        let (ir, _registry) = compile_with_media_input(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0","ks":{"p":{"a":0,"k":[15,25]}}},
                {"ty":4,"nm":"clip","ip":0,"op":60,"ks":{"p":{"a":0,"k":[40,60]}},"shapes":[
                    {"ty":"sh","ks":{"a":0,"k":{"i":[[0,0],[0,0],[0,0]],"o":[[0,0],[0,0],[0,0]],"v":[[0,0],[10,0],[5,10]],"c":true}}}
                ]}
            ],"assets":[{"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"}]}"#,
            "clip",
        );
        let m = media_input_world_matrix(&ir, 0.0).unwrap();
        assert_eq!(m.apply(Vec2::ZERO), Vec2::new(40.0, 60.0));
    }

    #[test]
    fn media_input_path_is_transformed_into_composition_space() {
        let (ir, registry) = compile_with_media_input(
            r#"{"nm":"t","fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
                {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"},
                {"ty":4,"nm":"clip","ip":0,"op":60,"ks":{"p":{"a":0,"k":[40,60]}},"shapes":[
                    {"ty":"sh","ks":{"a":0,"k":{"i":[[0,0],[0,0],[0,0]],"o":[[0,0],[0,0],[0,0]],"v":[[0,0],[10,0],[5,10]],"c":true}}}
                ]}
            ],"assets":[{"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"}]}"#,
            "clip",
        );
        let path = media_input_path(&ir, &registry, 0.0).unwrap();
        assert!(path.contains(&Vec2::new(40.0, 60.0)));
    }

    proptest::proptest! {
        #[test]
        fn clamp_to_root_always_lands_inside_in_out_range(scene_frame in -10_000.0f64..10_000.0) {
            let (ir, _registry) = compile(
                r#"{"nm":"t","fr":30,"ip":10,"op":70,"w":100,"h":100,"layers":[
                    {"ty":2,"nm":"media","ip":0,"op":60,"refId":"image_0"}
                ],"assets":[{"id":"image_0","w":100,"h":100,"u":"images/","p":"img_0.png"}]}"#,
            );
            let clamped = clamp_to_root(&ir, scene_frame);
            proptest::prop_assert!(clamped >= ir.meta.in_point);
            proptest::prop_assert!(clamped <= ir.meta.out_point - 1.0);
        }
    }
}
