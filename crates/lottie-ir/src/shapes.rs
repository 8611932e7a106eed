//! Shape-tree walking: first-path extraction, group-transform hoisting,
//! fill/stroke extraction, and rect/ellipse/polystar baking to bezier.
//!
//! The geometric baking here does not resemble a generic path-builder API —
//! each shape kind has its own closed-form cubic-bezier layout, which is
//! the normative behaviour for this compiler's subset rather than an
//! approximation.

use crate::decode::{ValueDecodeError, color_rgba, scalar_track, vec2_track};
use crate::error::codes;
use crate::model::ShapeModel;
use lottie_geom::{AnimPath, AnimTrack, BezierPath, Keyframe, Rgb, Rgba, Vec2, scalar};
use lottie_path::PathID;

/// The control-point offset factor approximating a quarter circle with a
/// single cubic bezier.
pub const KAPPA: f64 = 0.5522847498307936;

/// A failure extracting shape content. Carries the stable code its caller
/// (the IR compiler) surfaces as a [`crate::error::CompileErrorKind::UnsupportedFeature`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct ShapeExtractError {
    pub code: &'static str,
    pub message: String,
}

impl ShapeExtractError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        ShapeExtractError { code, message: message.into() }
    }
}

impl From<ValueDecodeError> for ShapeExtractError {
    fn from(e: ValueDecodeError) -> Self {
        ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, e.to_string())
    }
}

/// A shape layer's stroke style. Color and opacity are compile-time
/// constants (animation is rejected during extraction); width may animate.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgb,
    /// Opacity, already normalised to `0..1`.
    pub opacity: f64,
    pub width: AnimTrack<f64>,
    /// 1 butt, 2 round, 3 square.
    pub line_cap: i64,
    /// 1 miter, 2 round, 3 bevel.
    pub line_join: i64,
    pub miter_limit: f64,
}

/// The fully extracted content of a shape layer's `shapes` list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeGroup {
    /// The first path-producing shape found, not yet transformed by any
    /// hoisted group transform.
    pub anim_path: Option<AnimPath>,
    pub fill_color: Option<Rgba>,
    /// Opacity, `0..100`, defaulting to 100 when no `fl` carries one.
    pub fill_opacity: f64,
    pub stroke: Option<StrokeStyle>,
    /// Group transforms on the branch leading to `anim_path`, outermost
    /// first.
    pub group_transforms: Vec<crate::transform::GroupTransform>,
    /// Registered path id, set once the compiler builds and registers the
    /// triangulated resource.
    pub path_id: Option<PathID>,
}

impl ShapeGroup {
    fn new() -> Self {
        ShapeGroup { fill_opacity: 100.0, ..Default::default() }
    }
}

/// Extracts a shape layer's fill, stroke, first animated path and hoisted
/// group-transform stack.
pub fn extract_shape_group(items: &[ShapeModel]) -> Result<ShapeGroup, ShapeExtractError> {
    validate_no_trim_paths(items)?;
    let mut group = ShapeGroup::new();
    if let Some((color, opacity)) = extract_fill(items)? {
        group.fill_color = Some(color);
        group.fill_opacity = opacity;
    }
    group.stroke = extract_stroke(items)?;
    let mut trail = Vec::new();
    group.anim_path = extract_path_with_transforms(items, &mut trail)?;
    group.group_transforms = trail;
    Ok(group)
}

/// Defensive check that no `tm` (trim paths) item survived into the shape
/// tree. The anim validator is expected to have already rejected these;
/// this is the last line of defence before geometry is baked.
pub fn validate_no_trim_paths(items: &[ShapeModel]) -> Result<(), ShapeExtractError> {
    for item in items {
        if item.shape_type == "tm" {
            return Err(ShapeExtractError::new(codes::UNSUPPORTED_TRIM_PATHS, "trim paths ('tm') are not supported"));
        }
        if item.shape_type == "gr" {
            validate_no_trim_paths(&item.items)?;
        }
    }
    Ok(())
}

fn extract_path_with_transforms(
    items: &[ShapeModel],
    trail: &mut Vec<crate::transform::GroupTransform>,
) -> Result<Option<AnimPath>, ShapeExtractError> {
    for item in items {
        if item.hidden {
            continue;
        }
        match item.shape_type.as_str() {
            "sh" => {
                if let Some(path) = &item.path {
                    return Ok(Some(crate::decode::anim_path(path)?));
                }
            }
            "rc" => return Ok(Some(bake_rectangle(item)?)),
            "el" => return Ok(Some(bake_ellipse(item)?)),
            "sr" => return Ok(Some(bake_polystar(item)?)),
            "gr" => {
                let transform = extract_group_transform(&item.items)?;
                trail.push(transform);
                let found = extract_path_with_transforms(&item.items, trail)?;
                if found.is_some() {
                    return Ok(found);
                }
                trail.pop();
            }
            _ => {}
        }
    }
    Ok(None)
}

fn extract_group_transform(items: &[ShapeModel]) -> Result<crate::transform::GroupTransform, ShapeExtractError> {
    let mut tr_items = items.iter().filter(|i| i.shape_type == "tr");
    let Some(tr) = tr_items.next() else {
        return Ok(crate::transform::GroupTransform::default());
    };
    if tr_items.next().is_some() {
        return Err(group_transform_error("a shape group has more than one 'tr' item"));
    }
    if let Some(skew) = &tr.skew {
        let track = scalar_track(skew).map_err(|_| group_transform_error("group transform skew has an unrecognised format"))?;
        let is_zero = match &track {
            AnimTrack::Static(v) => scalar::scalar_nearly_zero(*v),
            AnimTrack::Keyframed(_) => false,
        };
        if track.is_animated() || !is_zero {
            return Err(group_transform_error("group transform skew is animated or nonzero"));
        }
    }
    let mut out = crate::transform::GroupTransform::default();
    if let Some(p) = &tr.position {
        out.position = vec2_track(p).map_err(|_| group_transform_error("group transform position has an unrecognised format"))?;
    }
    if let Some(a) = &tr.anchor {
        out.anchor = vec2_track(a).map_err(|_| group_transform_error("group transform anchor has an unrecognised format"))?;
    }
    if let Some(s) = &tr.size {
        let track = vec2_track(s).map_err(|_| group_transform_error("group transform scale has an unrecognised format"))?;
        check_uniform_scale(&track)?;
        out.scale = track;
    }
    if let Some(r) = &tr.rotation_or_roundness {
        out.rotation = scalar_track(r).map_err(|_| group_transform_error("group transform rotation has an unrecognised format"))?;
    }
    if let Some(o) = &tr.opacity {
        let track = scalar_track(o).map_err(|_| group_transform_error("group transform opacity has an unrecognised format"))?;
        out.opacity = normalize_opacity(track);
    }
    Ok(out)
}

fn group_transform_error(message: &str) -> ShapeExtractError {
    ShapeExtractError::new(codes::UNSUPPORTED_GROUP_TRANSFORM_KEYFRAME_FORMAT, message)
}

fn check_uniform_scale(track: &AnimTrack<Vec2>) -> Result<(), ShapeExtractError> {
    let uniform = |v: Vec2| scalar::scalar_nearly_equal(v.x, v.y);
    let ok = match track {
        AnimTrack::Static(v) => uniform(*v),
        AnimTrack::Keyframed(kfs) => kfs.iter().all(|kf| uniform(kf.value)),
    };
    if ok { Ok(()) } else { Err(group_transform_error("group transform scale is non-uniform")) }
}

fn normalize_opacity(track: AnimTrack<f64>) -> AnimTrack<f64> {
    match track {
        AnimTrack::Static(v) => AnimTrack::Static(v / 100.0),
        AnimTrack::Keyframed(kfs) => {
            AnimTrack::Keyframed(kfs.into_iter().map(|mut kf| {
                kf.value /= 100.0;
                kf
            }).collect())
        }
    }
}

fn extract_fill(items: &[ShapeModel]) -> Result<Option<(Rgba, f64)>, ShapeExtractError> {
    for item in items {
        if item.hidden {
            continue;
        }
        match item.shape_type.as_str() {
            "fl" => {
                let color = item
                    .color
                    .as_ref()
                    .ok_or_else(|| ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "fill item has no color"))?;
                let color = color_rgba(color)?;
                let opacity = match &item.opacity {
                    Some(o) => scalar_track(o)?.sample(0.0),
                    None => 100.0,
                };
                return Ok(Some((color, opacity)));
            }
            "gr" => {
                if let Some(found) = extract_fill(&item.items)? {
                    return Ok(Some(found));
                }
            }
            _ => {}
        }
    }
    Ok(None)
}

fn extract_stroke(items: &[ShapeModel]) -> Result<Option<StrokeStyle>, ShapeExtractError> {
    for item in items {
        if item.hidden {
            continue;
        }
        match item.shape_type.as_str() {
            "st" => return Ok(Some(decode_stroke(item)?)),
            "gr" => {
                if let Some(found) = extract_stroke(&item.items)? {
                    return Ok(Some(found));
                }
            }
            _ => {}
        }
    }
    Ok(None)
}

fn decode_stroke(item: &ShapeModel) -> Result<StrokeStyle, ShapeExtractError> {
    if let Some(dash) = &item.direction_or_dash {
        let non_empty = dash.as_array().map(|a| !a.is_empty()).unwrap_or(false);
        if non_empty {
            return Err(ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "stroke dash arrays are not supported"));
        }
    }
    let color = item.color.as_ref().map(color_rgba).transpose()?.unwrap_or(Rgba::new(0.0, 0.0, 0.0, 1.0));
    let opacity_track = item.opacity.as_ref().map(scalar_track).transpose()?;
    if opacity_track.as_ref().is_some_and(AnimTrack::is_animated) {
        return Err(ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "stroke opacity must not be animated"));
    }
    let opacity = opacity_track.map(|t| t.sample(0.0)).unwrap_or(100.0) / 100.0;
    let width_value = item
        .stroke_width
        .as_ref()
        .ok_or_else(|| ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "stroke item has no width"))?;
    let width = scalar_track(width_value)?;
    validate_stroke_width(&width)?;
    let line_cap = item.line_cap.unwrap_or(2);
    if !(1..=3).contains(&line_cap) {
        return Err(ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, format!("stroke line cap {line_cap} is unsupported")));
    }
    let line_join = item.line_join.unwrap_or(2);
    if !(1..=3).contains(&line_join) {
        return Err(ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, format!("stroke line join {line_join} is unsupported")));
    }
    let miter_limit = item.miter_limit.unwrap_or(4.0);
    if miter_limit <= 0.0 {
        return Err(ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "stroke miter limit must be positive"));
    }
    Ok(StrokeStyle { color: Rgb::new(color.r, color.g, color.b), opacity, width, line_cap, line_join, miter_limit })
}

fn validate_stroke_width(track: &AnimTrack<f64>) -> Result<(), ShapeExtractError> {
    let check = |w: f64| -> Result<(), ShapeExtractError> {
        if w <= 0.0 || w > 2048.0 {
            Err(ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, format!("stroke width {w} is out of range")))
        } else {
            Ok(())
        }
    };
    match track {
        AnimTrack::Static(w) => check(*w),
        AnimTrack::Keyframed(kfs) => kfs.iter().try_for_each(|kf| check(kf.value)),
    }
}

/// Reverses vertex order and maps tangents so the resulting path traverses
/// in the opposite direction (used when `direction == 2`).
fn reverse_bezier(path: BezierPath) -> BezierPath {
    let n = path.vertices.len();
    let mut vertices = path.vertices;
    vertices.reverse();
    let mut in_tangents = Vec::with_capacity(n);
    let mut out_tangents = Vec::with_capacity(n);
    for i in 0..n {
        let src = n - 1 - i;
        in_tangents.push(-path.out_tangents[src]);
        out_tangents.push(-path.in_tangents[src]);
    }
    BezierPath::new(vertices, in_tangents, out_tangents, path.closed)
}

fn static_value<T: Copy>(track: &AnimTrack<T>) -> T {
    match track {
        AnimTrack::Static(v) => *v,
        AnimTrack::Keyframed(kfs) => kfs[0].value,
    }
}

/// Resolves an animated driver/follower pair into a single [`AnimPath`],
/// per the rectangle/ellipse animation rule: prefer `size` as the driver
/// keyframe series when both animate, requiring matching counts and times.
fn bake_driven(
    position: AnimTrack<Vec2>,
    size: AnimTrack<Vec2>,
    bake: impl Fn(Vec2, Vec2) -> Result<BezierPath, ShapeExtractError>,
) -> Result<AnimPath, ShapeExtractError> {
    let pos_animated = position.is_animated();
    let size_animated = size.is_animated();
    if !pos_animated && !size_animated {
        return Ok(AnimPath::StaticBezier(bake(static_value(&position), static_value(&size))?));
    }
    if pos_animated && size_animated {
        let (AnimTrack::Keyframed(pos_kfs), AnimTrack::Keyframed(size_kfs)) = (&position, &size) else {
            unreachable!("is_animated() implies Keyframed with len > 1")
        };
        if pos_kfs.len() != size_kfs.len() {
            return Err(ShapeExtractError::new(
                codes::UNSUPPORTED_RECT_KEYFRAMES_MISMATCH,
                "animated position and size keyframe counts do not match",
            ));
        }
        for (a, b) in pos_kfs.iter().zip(size_kfs.iter()) {
            if !scalar::nearly_equal_eps(a.time, b.time, 1e-6) {
                return Err(ShapeExtractError::new(
                    codes::UNSUPPORTED_RECT_KEYFRAMES_MISMATCH,
                    "animated position and size keyframe times do not match",
                ));
            }
        }
    }
    let driver: &[Keyframe<Vec2>] = match (&position, &size) {
        (_, AnimTrack::Keyframed(kfs)) if size_animated => kfs,
        (AnimTrack::Keyframed(kfs), _) => kfs,
        _ => unreachable!("one of position/size is animated"),
    };
    let mut out = Vec::with_capacity(driver.len());
    for kf in driver {
        let p = position.sample(kf.time);
        let s = size.sample(kf.time);
        let path = bake(p, s)?;
        out.push(Keyframe { time: kf.time, value: path, in_tangent: kf.in_tangent, out_tangent: kf.out_tangent, hold: kf.hold });
    }
    Ok(AnimPath::KeyframedBezier(out))
}

fn bake_rectangle(item: &ShapeModel) -> Result<AnimPath, ShapeExtractError> {
    let position = item
        .position
        .as_ref()
        .map(vec2_track)
        .transpose()?
        .unwrap_or(AnimTrack::Static(Vec2::ZERO));
    let size = item
        .size
        .as_ref()
        .map(vec2_track)
        .transpose()?
        .ok_or_else(|| ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "rectangle has no size"))?;
    let roundness_track = item.rotation_or_roundness.as_ref().map(scalar_track).transpose()?;
    if roundness_track.as_ref().is_some_and(AnimTrack::is_animated) {
        return Err(ShapeExtractError::new(codes::UNSUPPORTED_RECT_ROUNDNESS_ANIMATED, "rectangle roundness must not be animated"));
    }
    let roundness = roundness_track.map(|t| t.sample(0.0)).unwrap_or(0.0);
    let direction = direction_of(item);
    bake_driven(position, size, move |p, s| Ok(rounded_rect_path(p, s, roundness, direction)))
}

fn rounded_rect_path(center: Vec2, size: Vec2, roundness: f64, direction: i64) -> BezierPath {
    let hw = size.x / 2.0;
    let hh = size.y / 2.0;
    let r = scalar::clamp(roundness, 0.0, hw.min(hh).max(0.0));
    let path = if scalar::scalar_nearly_zero(r) {
        let vertices = vec![
            Vec2::new(center.x - hw, center.y - hh),
            Vec2::new(center.x + hw, center.y - hh),
            Vec2::new(center.x + hw, center.y + hh),
            Vec2::new(center.x - hw, center.y + hh),
        ];
        BezierPath::new(vertices, vec![Vec2::ZERO; 4], vec![Vec2::ZERO; 4], true)
    } else {
        let k = KAPPA * r;
        let vertices = vec![
            Vec2::new(center.x + hw - r, center.y - hh),
            Vec2::new(center.x + hw, center.y - hh + r),
            Vec2::new(center.x + hw, center.y + hh - r),
            Vec2::new(center.x + hw - r, center.y + hh),
            Vec2::new(center.x - hw + r, center.y + hh),
            Vec2::new(center.x - hw, center.y + hh - r),
            Vec2::new(center.x - hw, center.y - hh + r),
            Vec2::new(center.x - hw + r, center.y - hh),
        ];
        let mut in_tangents = vec![Vec2::ZERO; 8];
        let mut out_tangents = vec![Vec2::ZERO; 8];
        out_tangents[0] = Vec2::new(k, 0.0);
        in_tangents[1] = Vec2::new(0.0, -k);
        out_tangents[2] = Vec2::new(0.0, k);
        in_tangents[3] = Vec2::new(k, 0.0);
        out_tangents[4] = Vec2::new(-k, 0.0);
        in_tangents[5] = Vec2::new(0.0, k);
        out_tangents[6] = Vec2::new(0.0, -k);
        in_tangents[7] = Vec2::new(-k, 0.0);
        BezierPath::new(vertices, in_tangents, out_tangents, true)
    };
    if direction == 2 { reverse_bezier(path) } else { path }
}

fn bake_ellipse(item: &ShapeModel) -> Result<AnimPath, ShapeExtractError> {
    let position = item
        .position
        .as_ref()
        .map(vec2_track)
        .transpose()?
        .unwrap_or(AnimTrack::Static(Vec2::ZERO));
    let size = item
        .size
        .as_ref()
        .map(vec2_track)
        .transpose()?
        .ok_or_else(|| ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "ellipse has no size"))?;
    let direction = direction_of(item);
    bake_driven(position, size, move |p, s| {
        if s.x <= 0.0 || s.y <= 0.0 {
            return Err(ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "ellipse size must be positive"));
        }
        Ok(ellipse_path(p, s, direction))
    })
}

fn ellipse_path(center: Vec2, size: Vec2, direction: i64) -> BezierPath {
    let rx = size.x / 2.0;
    let ry = size.y / 2.0;
    let kx = rx * KAPPA;
    let ky = ry * KAPPA;
    let top = Vec2::new(center.x, center.y - ry);
    let right = Vec2::new(center.x + rx, center.y);
    let bottom = Vec2::new(center.x, center.y + ry);
    let left = Vec2::new(center.x - rx, center.y);
    let vertices = vec![top, right, bottom, left];
    let out_tangents = vec![Vec2::new(kx, 0.0), Vec2::new(0.0, ky), Vec2::new(-kx, 0.0), Vec2::new(0.0, -ky)];
    let in_tangents = vec![Vec2::new(-kx, 0.0), Vec2::new(0.0, -ky), Vec2::new(kx, 0.0), Vec2::new(0.0, ky)];
    let path = BezierPath::new(vertices, in_tangents, out_tangents, true);
    if direction == 2 { reverse_bezier(path) } else { path }
}

fn bake_polystar(item: &ShapeModel) -> Result<AnimPath, ShapeExtractError> {
    for field in [&item.outer_roundness, &item.inner_roundness] {
        if let Some(v) = field {
            let track = scalar_track(v)?;
            let zero = !track.is_animated() && scalar::scalar_nearly_zero(static_value(&track));
            if !zero {
                return Err(ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "polystar roundness must be zero and not animated"));
            }
        }
    }
    let position = item
        .position
        .as_ref()
        .map(vec2_track)
        .transpose()?
        .unwrap_or(AnimTrack::Static(Vec2::ZERO));
    let points_track = item
        .points
        .as_ref()
        .map(scalar_track)
        .transpose()?
        .ok_or_else(|| ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "polystar has no point count"))?;
    let outer_track = item
        .outer_radius
        .as_ref()
        .map(scalar_track)
        .transpose()?
        .ok_or_else(|| ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "polystar has no outer radius"))?;
    let inner_track = item.inner_radius.as_ref().map(scalar_track).transpose()?;
    let rotation_track = item.rotation_or_roundness.as_ref().map(scalar_track).transpose()?.unwrap_or(AnimTrack::Static(0.0));
    let star_type = item.star_type.unwrap_or(1);
    let direction = direction_of(item);

    let points = static_value(&points_track);
    if points.fract().abs() > 1e-6 || !(3.0..=100.0).contains(&points) {
        return Err(ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "polystar point count must be an integer in [3,100]"));
    }
    let n = points.round() as usize;

    let position_animated = position.is_animated();
    let outer_animated = outer_track.is_animated();
    let points_animated = points_track.is_animated();
    let inner_animated = inner_track.as_ref().is_some_and(AnimTrack::is_animated);
    let rotation_animated = rotation_track.is_animated();
    let animated = position_animated || points_animated || outer_animated || inner_animated || rotation_animated;

    let bake_at = {
        let position = position.clone();
        let outer_track = outer_track.clone();
        let inner_track = inner_track.clone();
        let rotation_track = rotation_track.clone();
        move |time: f64| -> Result<BezierPath, ShapeExtractError> {
            let p = position.sample(time);
            let outer = outer_track.sample(time);
            let inner = inner_track.as_ref().map(|t| t.sample(time));
            let rotation = rotation_track.sample(time);
            bake_polystar_vertices(p, n, outer, inner, rotation, star_type, direction)
        }
    };

    if !animated {
        return Ok(AnimPath::StaticBezier(bake_at(0.0)?));
    }

    // Driver preference mirrors the rectangle/ellipse rule: the property
    // most likely to define the animation's cadence drives sample times.
    let driver_kfs: Vec<f64> = if outer_animated {
        match &outer_track {
            AnimTrack::Keyframed(kfs) => kfs.iter().map(|kf| kf.time).collect(),
            AnimTrack::Static(_) => unreachable!(),
        }
    } else if position_animated {
        match &position {
            AnimTrack::Keyframed(kfs) => kfs.iter().map(|kf| kf.time).collect(),
            AnimTrack::Static(_) => unreachable!(),
        }
    } else if points_animated {
        match &points_track {
            AnimTrack::Keyframed(kfs) => kfs.iter().map(|kf| kf.time).collect(),
            AnimTrack::Static(_) => unreachable!(),
        }
    } else if inner_animated {
        match inner_track.as_ref().unwrap() {
            AnimTrack::Keyframed(kfs) => kfs.iter().map(|kf| kf.time).collect(),
            AnimTrack::Static(_) => unreachable!(),
        }
    } else {
        match &rotation_track {
            AnimTrack::Keyframed(kfs) => kfs.iter().map(|kf| kf.time).collect(),
            AnimTrack::Static(_) => unreachable!(),
        }
    };
    let mut out = Vec::with_capacity(driver_kfs.len());
    for time in driver_kfs {
        let path = bake_at(time)?;
        out.push(Keyframe::linear(time, path));
    }
    Ok(AnimPath::KeyframedBezier(out))
}

fn bake_polystar_vertices(
    center: Vec2,
    n: usize,
    outer: f64,
    inner: Option<f64>,
    rotation_degrees: f64,
    star_type: i64,
    direction: i64,
) -> Result<BezierPath, ShapeExtractError> {
    if outer <= 0.0 {
        return Err(ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "polystar outer radius must be positive"));
    }
    let is_star = star_type == 1;
    if is_star {
        let inner = inner.ok_or_else(|| ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "star has no inner radius"))?;
        if !(inner > 0.0 && inner < outer) {
            return Err(ShapeExtractError::new(codes::UNSUPPORTED_SHAPE_ITEM, "star inner radius must satisfy 0 < inner < outer"));
        }
    }
    let start_angle = -std::f64::consts::FRAC_PI_2 + rotation_degrees.to_radians();
    let (vertex_count, step) =
        if is_star { (2 * n, std::f64::consts::PI / n as f64) } else { (n, 2.0 * std::f64::consts::PI / n as f64) };
    let mut vertices = Vec::with_capacity(vertex_count);
    for i in 0..vertex_count {
        let angle = start_angle + step * i as f64;
        let radius = if is_star && i % 2 == 1 { inner.unwrap_or(outer) } else { outer };
        vertices.push(Vec2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin()));
    }
    let path = BezierPath::new(vertices, vec![Vec2::ZERO; vertex_count], vec![Vec2::ZERO; vertex_count], true);
    Ok(if direction == 2 { reverse_bezier(path) } else { path })
}

fn direction_of(item: &ShapeModel) -> i64 {
    match &item.direction_or_dash {
        Some(v) => v.as_i64().unwrap_or(1),
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(json: &str) -> ShapeModel {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn extracts_first_sh_path() {
        let items = vec![shape(
            r#"{"ty":"sh","ks":{"a":0,"k":{"i":[[0,0]],"o":[[0,0]],"v":[[1,2]],"c":true}}}"#,
        )];
        let group = extract_shape_group(&items).unwrap();
        assert!(group.anim_path.is_some());
        assert!(group.group_transforms.is_empty());
    }

    #[test]
    fn bakes_sharp_rectangle() {
        let item = shape(r#"{"ty":"rc","p":{"a":0,"k":[0,0]},"s":{"a":0,"k":[10,20]},"r":{"a":0,"k":0}}"#);
        let path = bake_rectangle(&item).unwrap();
        match path {
            AnimPath::StaticBezier(p) => {
                assert_eq!(p.vertex_count(), 4);
                assert!(p.closed);
                assert!(p.in_tangents.iter().all(|t| t.is_nearly_zero()));
            }
            _ => panic!("expected static bezier"),
        }
    }

    #[test]
    fn bakes_rounded_rectangle_with_eight_vertices() {
        let item = shape(r#"{"ty":"rc","p":{"a":0,"k":[0,0]},"s":{"a":0,"k":[10,10]},"r":{"a":0,"k":2}}"#);
        let path = bake_rectangle(&item).unwrap();
        match path {
            AnimPath::StaticBezier(p) => assert_eq!(p.vertex_count(), 8),
            _ => panic!("expected static bezier"),
        }
    }

    #[test]
    fn rectangle_roundness_animated_rejected() {
        let item = shape(
            r#"{"ty":"rc","p":{"a":0,"k":[0,0]},"s":{"a":0,"k":[10,10]},"r":{"a":1,"k":[{"t":0,"s":[0]},{"t":10,"s":[2]}]}}"#,
        );
        let err = bake_rectangle(&item).unwrap_err();
        assert_eq!(err.code, codes::UNSUPPORTED_RECT_ROUNDNESS_ANIMATED);
    }

    #[test]
    fn bakes_ellipse_four_vertices() {
        let item = shape(r#"{"ty":"el","p":{"a":0,"k":[5,5]},"s":{"a":0,"k":[10,10]}}"#);
        let path = bake_ellipse(&item).unwrap();
        match path {
            AnimPath::StaticBezier(p) => assert_eq!(p.vertex_count(), 4),
            _ => panic!("expected static bezier"),
        }
    }

    #[test]
    fn bakes_star_with_twice_point_count_vertices() {
        let item = shape(
            r#"{"ty":"sr","p":{"a":0,"k":[0,0]},"pt":{"a":0,"k":5},"or":{"a":0,"k":10},"ir":{"a":0,"k":5},"sy":1}"#,
        );
        let path = bake_polystar(&item).unwrap();
        match path {
            AnimPath::StaticBezier(p) => assert_eq!(p.vertex_count(), 10),
            _ => panic!("expected static bezier"),
        }
    }

    #[test]
    fn bakes_polygon_with_point_count_vertices() {
        let item = shape(r#"{"ty":"sr","p":{"a":0,"k":[0,0]},"pt":{"a":0,"k":6},"or":{"a":0,"k":10},"sy":2}"#);
        let path = bake_polystar(&item).unwrap();
        match path {
            AnimPath::StaticBezier(p) => assert_eq!(p.vertex_count(), 6),
            _ => panic!("expected static bezier"),
        }
    }

    #[test]
    fn star_requires_inner_radius() {
        let item = shape(r#"{"ty":"sr","p":{"a":0,"k":[0,0]},"pt":{"a":0,"k":5},"or":{"a":0,"k":10},"sy":1}"#);
        assert!(bake_polystar(&item).is_err());
    }

    #[test]
    fn group_transform_rejects_multiple_tr() {
        let items = vec![shape(
            r#"{"ty":"gr","it":[{"ty":"tr"},{"ty":"tr"},{"ty":"sh","ks":{"a":0,"k":{"i":[[0,0]],"o":[[0,0]],"v":[[0,0]],"c":true}}}]}"#,
        )];
        let err = extract_shape_group(&items).unwrap_err();
        assert_eq!(err.code, codes::UNSUPPORTED_GROUP_TRANSFORM_KEYFRAME_FORMAT);
    }

    #[test]
    fn group_transform_rejects_non_uniform_scale() {
        let items = vec![shape(
            r#"{"ty":"gr","it":[{"ty":"tr","s":{"a":0,"k":[100,50]}},{"ty":"sh","ks":{"a":0,"k":{"i":[[0,0]],"o":[[0,0]],"v":[[0,0]],"c":true}}}]}"#,
        )];
        let err = extract_shape_group(&items).unwrap_err();
        assert_eq!(err.code, codes::UNSUPPORTED_GROUP_TRANSFORM_KEYFRAME_FORMAT);
    }

    #[test]
    fn fill_and_stroke_extracted_from_group() {
        let items = vec![shape(
            r#"{"ty":"gr","it":[
                {"ty":"fl","c":{"a":0,"k":[1,0,0,1]},"o":{"a":0,"k":50}},
                {"ty":"st","c":{"a":0,"k":[0,0,1]},"o":{"a":0,"k":100},"w":{"a":0,"k":2},"lc":2,"lj":2,"ml":4}
            ]}"#,
        )];
        let group = extract_shape_group(&items).unwrap();
        assert_eq!(group.fill_opacity, 50.0);
        assert!(group.stroke.is_some());
        assert_eq!(group.stroke.unwrap().width, AnimTrack::Static(2.0));
    }

    #[test]
    fn stroke_rejects_out_of_range_width() {
        let item = shape(r#"{"ty":"st","w":{"a":0,"k":0},"c":{"a":0,"k":[0,0,0]},"o":{"a":0,"k":100}}"#);
        assert!(decode_stroke(&item).is_err());
    }

    #[test]
    fn stroke_rejects_non_empty_dash() {
        let item = shape(r#"{"ty":"st","w":{"a":0,"k":2},"c":{"a":0,"k":[0,0,0]},"o":{"a":0,"k":100},"d":[{"n":"d","v":{"a":0,"k":4}}]}"#);
        assert!(decode_stroke(&item).is_err());
    }

    #[test]
    fn trim_paths_are_rejected_defensively() {
        let items = vec![shape(r#"{"ty":"tm"}"#)];
        assert!(validate_no_trim_paths(&items).is_err());
    }
}
