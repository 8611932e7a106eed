//! Masks and track mattes.

use crate::decode::{ValueDecodeError, anim_path, scalar_track};
use crate::model::MaskModel;
use lottie_geom::AnimPath;
use lottie_path::PathID;

/// Boolean combination mode of a mask. Lottie's legacy `l`/`d`/`f` modes
/// are not part of this subset and are rejected by the anim validator
/// before a `Mask` is ever constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskMode {
    /// Union (`"a"`).
    Add,
    /// Difference (`"s"`).
    Subtract,
    /// Intersection (`"i"`).
    Intersect,
}

impl MaskMode {
    /// Parses a Lottie mask mode code, returning `None` for anything
    /// outside `{a, s, i}`.
    pub fn from_code(code: &str) -> Option<MaskMode> {
        match code {
            "a" => Some(MaskMode::Add),
            "s" => Some(MaskMode::Subtract),
            "i" => Some(MaskMode::Intersect),
            _ => None,
        }
    }
}

/// Track-matte combination mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatteMode {
    /// Use the source layer's alpha channel (`tt == 1`).
    Alpha,
    /// Use the source layer's inverted alpha channel (`tt == 2`).
    AlphaInverted,
    /// Use the source layer's luminance (`tt == 3`).
    Luma,
    /// Use the source layer's inverted luminance (`tt == 4`).
    LumaInverted,
}

impl MatteMode {
    /// Parses a Lottie `tt` value, returning `None` outside `{1,2,3,4}`.
    pub fn from_code(tt: i64) -> Option<MatteMode> {
        match tt {
            1 => Some(MatteMode::Alpha),
            2 => Some(MatteMode::AlphaInverted),
            3 => Some(MatteMode::Luma),
            4 => Some(MatteMode::LumaInverted),
            _ => None,
        }
    }
}

/// A compiled mask. `path_id` is `None` until the IR compiler builds and
/// registers the mask's [`lottie_path::PathResource`].
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    /// Boolean combination mode.
    pub mode: MaskMode,
    /// Inverted flag.
    pub inverted: bool,
    /// Opacity, 0..100.
    pub opacity: lottie_geom::AnimTrack<f64>,
    /// The mask's animated path.
    pub path: AnimPath,
    /// Registered path id, set once the compiler builds the triangulated
    /// resource.
    pub path_id: Option<PathID>,
}

/// Decodes a Lottie mask model into its mode, opacity track and path.
/// Expansion handling and mode validation belong to the anim validator;
/// this only performs the mechanical decode, surfacing an unrecognised
/// mode as `None` so the caller can emit `UNSUPPORTED_MASK_MODE`.
pub fn decode_mask(model: &MaskModel) -> Result<(Option<MaskMode>, lottie_geom::AnimTrack<f64>, AnimPath), ValueDecodeError> {
    let mode = MaskMode::from_code(&model.mode);
    let opacity = scalar_track(&model.opacity)?;
    let path = anim_path(&model.path)?;
    Ok((mode, opacity, path))
}

/// Information pairing a matte consumer with its source layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatteInfo {
    /// The combination mode.
    pub mode: MatteMode,
    /// The layer id providing the matte geometry.
    pub source_layer_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_mode_parses_supported_codes() {
        assert_eq!(MaskMode::from_code("a"), Some(MaskMode::Add));
        assert_eq!(MaskMode::from_code("s"), Some(MaskMode::Subtract));
        assert_eq!(MaskMode::from_code("i"), Some(MaskMode::Intersect));
        assert_eq!(MaskMode::from_code("l"), None);
    }

    #[test]
    fn matte_mode_parses_supported_codes() {
        assert_eq!(MatteMode::from_code(1), Some(MatteMode::Alpha));
        assert_eq!(MatteMode::from_code(3), Some(MatteMode::Luma));
        assert_eq!(MatteMode::from_code(5), None);
    }
}
