//! Scene descriptor validation (component F).

use crate::error::{ValidationIssue, ValidationReport};
use crate::scene::{MaskCatalog, Scene};
use std::collections::HashSet;

/// Schema versions this compiler accepts.
pub const SUPPORTED_SCHEMA_VERSIONS: &[&str] = &["0.1"];

mod codes {
    pub const SCENE_SCHEMA_VERSION_UNSUPPORTED: &str = "SCENE_SCHEMA_VERSION_UNSUPPORTED";
    pub const SCENE_CANVAS_INVALID: &str = "SCENE_CANVAS_INVALID";
    pub const SCENE_NO_MEDIA_BLOCKS: &str = "SCENE_NO_MEDIA_BLOCKS";
    pub const SCENE_DUPLICATE_BLOCK_ID: &str = "SCENE_DUPLICATE_BLOCK_ID";
    pub const SCENE_BLOCK_RECT_INVALID: &str = "SCENE_BLOCK_RECT_INVALID";
    pub const SCENE_BLOCK_RECT_OUT_OF_CANVAS: &str = "SCENE_BLOCK_RECT_OUT_OF_CANVAS";
    pub const SCENE_BLOCK_TIMING_INVALID: &str = "SCENE_BLOCK_TIMING_INVALID";
    pub const SCENE_INPUT_RECT_INVALID: &str = "SCENE_INPUT_RECT_INVALID";
    pub const SCENE_BINDING_KEY_EMPTY: &str = "SCENE_BINDING_KEY_EMPTY";
    pub const SCENE_ALLOWED_MEDIA_INVALID: &str = "SCENE_ALLOWED_MEDIA_INVALID";
    pub const SCENE_MASK_REF_UNKNOWN: &str = "SCENE_MASK_REF_UNKNOWN";
    pub const SCENE_NO_VARIANTS: &str = "SCENE_NO_VARIANTS";
    pub const SCENE_VARIANT_ANIM_REF_EMPTY: &str = "SCENE_VARIANT_ANIM_REF_EMPTY";
    pub const SCENE_VARIANT_DEFAULT_DURATION_INVALID: &str = "SCENE_VARIANT_DEFAULT_DURATION_INVALID";
    pub const SCENE_VARIANT_LOOP_RANGE_INVALID: &str = "SCENE_VARIANT_LOOP_RANGE_INVALID";
    pub const SCENE_LAYER_TOGGLE_INVALID: &str = "SCENE_LAYER_TOGGLE_INVALID";
    pub const SCENE_LAYER_TOGGLE_DUPLICATE_ID: &str = "SCENE_LAYER_TOGGLE_DUPLICATE_ID";
}

/// Validates a [`Scene`] against the canvas/media-block/binding rules,
/// optionally checking `maskRef` values against an externally supplied
/// `catalog`. A missing catalog downgrades any `maskRef` presence to a
/// warning rather than silently accepting it.
pub fn validate_scene(scene: &Scene, catalog: Option<&dyn MaskCatalog>) -> ValidationReport {
    tracing::debug!(schema_version = %scene.schema_version, media_blocks = scene.media_blocks.len(), "validating scene");
    let mut report = ValidationReport::new();

    if !SUPPORTED_SCHEMA_VERSIONS.contains(&scene.schema_version.as_str()) {
        report.push(ValidationIssue::error(
            codes::SCENE_SCHEMA_VERSION_UNSUPPORTED,
            "schemaVersion",
            format!("unsupported schema version '{}'", scene.schema_version),
        ));
    }

    let canvas = &scene.canvas;
    if !(canvas.w.is_finite() && canvas.w > 0.0
        && canvas.h.is_finite() && canvas.h > 0.0
        && canvas.fps.is_finite() && canvas.fps > 0.0
        && canvas.duration_frames.is_finite() && canvas.duration_frames > 0.0)
    {
        report.push(ValidationIssue::error(codes::SCENE_CANVAS_INVALID, "canvas", "canvas w/h/fps/durationFrames must all be finite and positive"));
    }

    if scene.media_blocks.is_empty() {
        report.push(ValidationIssue::error(codes::SCENE_NO_MEDIA_BLOCKS, "mediaBlocks", "scene has no media blocks"));
    }

    let mut seen_block_ids = HashSet::new();
    for (i, block) in scene.media_blocks.iter().enumerate() {
        let path = format!("mediaBlocks[{i}]");
        if !seen_block_ids.insert(block.block_id.clone()) {
            report.push(ValidationIssue::error(
                codes::SCENE_DUPLICATE_BLOCK_ID,
                format!("{path}.blockId"),
                format!("duplicate blockId '{}'", block.block_id),
            ));
        }

        if !block.rect.is_finite_and_positive() {
            report.push(ValidationIssue::error(codes::SCENE_BLOCK_RECT_INVALID, format!("{path}.rect"), "block rect must be finite with positive width/height"));
        } else if !block.rect.within(canvas.w, canvas.h) {
            report.push(ValidationIssue::warning(codes::SCENE_BLOCK_RECT_OUT_OF_CANVAS, format!("{path}.rect"), "block rect extends outside the canvas"));
        }

        if let Some(timing) = block.timing {
            if !(timing.start_frame.is_finite()
                && timing.end_frame.is_finite()
                && timing.start_frame >= 0.0
                && timing.start_frame < timing.end_frame
                && timing.end_frame <= canvas.duration_frames)
            {
                report.push(ValidationIssue::error(
                    codes::SCENE_BLOCK_TIMING_INVALID,
                    format!("{path}.timing"),
                    "timing must satisfy 0 <= startFrame < endFrame <= durationFrames",
                ));
            }
        }

        validate_input(&block.input, &path, catalog, &mut report);

        if block.variants.is_empty() {
            report.push(ValidationIssue::error(codes::SCENE_NO_VARIANTS, format!("{path}.variants"), "media block has no variants"));
        }
        for (vi, variant) in block.variants.iter().enumerate() {
            let vpath = format!("{path}.variants[{vi}]");
            if variant.anim_ref.is_empty() {
                report.push(ValidationIssue::error(codes::SCENE_VARIANT_ANIM_REF_EMPTY, format!("{vpath}.animRef"), "animRef must not be empty"));
            }
            if let Some(duration) = variant.default_duration_frames {
                if !(duration.is_finite() && duration > 0.0) {
                    report.push(ValidationIssue::error(
                        codes::SCENE_VARIANT_DEFAULT_DURATION_INVALID,
                        format!("{vpath}.defaultDurationFrames"),
                        "defaultDurationFrames must be finite and positive",
                    ));
                }
            }
            if let Some(loop_range) = variant.loop_range {
                if !(loop_range.start.is_finite() && loop_range.end.is_finite() && loop_range.start >= 0.0 && loop_range.start < loop_range.end) {
                    report.push(ValidationIssue::error(
                        codes::SCENE_VARIANT_LOOP_RANGE_INVALID,
                        format!("{vpath}.loopRange"),
                        "loopRange must satisfy 0 <= start < end",
                    ));
                }
            }
        }

        let mut seen_toggle_ids = HashSet::new();
        for (ti, toggle) in block.layer_toggles.iter().enumerate() {
            let tpath = format!("{path}.layerToggles[{ti}]");
            if toggle.id.is_empty() || toggle.title.is_empty() {
                report.push(ValidationIssue::error(codes::SCENE_LAYER_TOGGLE_INVALID, tpath.clone(), "layer toggle must have a non-empty id and title"));
            }
            if !seen_toggle_ids.insert(toggle.id.clone()) {
                report.push(ValidationIssue::error(codes::SCENE_LAYER_TOGGLE_DUPLICATE_ID, format!("{tpath}.id"), format!("duplicate layer toggle id '{}'", toggle.id)));
            }
        }
    }

    if report.has_errors() {
        tracing::warn!(issue_count = report.issues().len(), "scene validation found errors");
    }
    report
}

fn validate_input(input: &crate::scene::MediaInput, block_path: &str, catalog: Option<&dyn MaskCatalog>, report: &mut ValidationReport) {
    let path = format!("{block_path}.input");
    if !input.rect.is_finite_and_positive() {
        report.push(ValidationIssue::error(codes::SCENE_INPUT_RECT_INVALID, format!("{path}.rect"), "input rect must be finite with positive width/height"));
    }
    if input.binding_key.is_empty() {
        report.push(ValidationIssue::error(codes::SCENE_BINDING_KEY_EMPTY, format!("{path}.bindingKey"), "bindingKey must not be empty"));
    }

    let mut seen = HashSet::new();
    let mut allowed_media_ok = !input.allowed_media.is_empty();
    for kind in &input.allowed_media {
        if kind.is_empty() || !seen.insert(kind.clone()) {
            allowed_media_ok = false;
        }
    }
    if !allowed_media_ok {
        report.push(ValidationIssue::error(
            codes::SCENE_ALLOWED_MEDIA_INVALID,
            format!("{path}.allowedMedia"),
            "allowedMedia must be non-empty with no duplicate or empty entries",
        ));
    }

    if let Some(mask_ref) = &input.mask_ref {
        match catalog {
            Some(catalog) if !catalog.contains(mask_ref) => {
                report.push(ValidationIssue::warning(codes::SCENE_MASK_REF_UNKNOWN, format!("{path}.maskRef"), format!("maskRef '{mask_ref}' not found in mask catalog")));
            }
            None => {
                report.push(ValidationIssue::warning(codes::SCENE_MASK_REF_UNKNOWN, format!("{path}.maskRef"), "maskRef given but no mask catalog was supplied to validate it"));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Canvas, MediaBlock, MediaInput, Rect, ContainerClip, Variant};

    struct EmptyCatalog;
    impl MaskCatalog for EmptyCatalog {
        fn contains(&self, _mask_ref: &str) -> bool {
            false
        }
    }

    fn minimal_scene() -> Scene {
        Scene {
            schema_version: "0.1".into(),
            canvas: Canvas { w: 1080.0, h: 1920.0, fps: 30.0, duration_frames: 300.0 },
            media_blocks: vec![MediaBlock {
                block_id: "b1".into(),
                z_index: 0,
                rect: Rect { x: 0.0, y: 0.0, w: 1080.0, h: 1920.0 },
                container_clip: ContainerClip::SlotRect,
                timing: None,
                input: MediaInput { rect: Rect { x: 0.0, y: 0.0, w: 1080.0, h: 1920.0 }, binding_key: "media".into(), allowed_media: vec!["image".into()], mask_ref: None },
                variants: vec![Variant { variant_id: "v1".into(), anim_ref: "anim-1.json".into(), default_duration_frames: None, loop_range: None }],
                layer_toggles: vec![],
            }],
        }
    }

    #[test]
    fn accepts_minimal_valid_scene() {
        let report = validate_scene(&minimal_scene(), None);
        assert!(!report.has_errors());
    }

    #[test]
    fn rejects_unsupported_schema_version() {
        let mut scene = minimal_scene();
        scene.schema_version = "9.9".into();
        let report = validate_scene(&scene, None);
        assert!(report.has_errors());
    }

    #[test]
    fn rejects_duplicate_block_ids() {
        let mut scene = minimal_scene();
        let dup = scene.media_blocks[0].clone();
        scene.media_blocks.push(dup);
        let report = validate_scene(&scene, None);
        assert!(report.issues().iter().any(|i| i.code == codes::SCENE_DUPLICATE_BLOCK_ID));
    }

    #[test]
    fn missing_catalog_downgrades_mask_ref_to_warning() {
        let mut scene = minimal_scene();
        scene.media_blocks[0].input.mask_ref = Some("glow".into());
        let report = validate_scene(&scene, None);
        assert!(!report.has_errors());
        assert!(report.issues().iter().any(|i| i.code == codes::SCENE_MASK_REF_UNKNOWN));
    }

    #[test]
    fn unknown_mask_ref_against_catalog_warns() {
        let mut scene = minimal_scene();
        scene.media_blocks[0].input.mask_ref = Some("glow".into());
        let report = validate_scene(&scene, Some(&EmptyCatalog));
        assert!(report.issues().iter().any(|i| i.code == codes::SCENE_MASK_REF_UNKNOWN));
    }

    #[test]
    fn out_of_canvas_rect_is_a_warning_not_an_error() {
        let mut scene = minimal_scene();
        scene.media_blocks[0].rect.w = 5000.0;
        let report = validate_scene(&scene, None);
        assert!(!report.has_errors());
        assert!(report.issues().iter().any(|i| i.code == codes::SCENE_BLOCK_RECT_OUT_OF_CANVAS));
    }
}
